// ============================================================================
// Structure : PriceHistory (historique quotidien)
// ============================================================================
// Représente les barres journalières (High/Low/Close) d'un ticker sur une
// période glissante se terminant aujourd'hui
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : instant exact renvoyé par Yahoo
// 2. NaiveDate : date de séance dans le fuseau de la place de cotation
// 3. Enum Copy : Period est copié gratuitement, pas besoin de références
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Période glissante demandée au provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// Dernière séance (cours de clôture du jour)
    OneDay,
    /// 1 an (moyennes trimestrielles)
    OneYear,
}

impl Period {
    /// Retourne le label pour l'affichage et les logs
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::OneYear => "1y",
        }
    }
}

/// Une barre journalière
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Timestamp de la barre (UTC)
    pub timestamp: DateTime<Utc>,

    /// Date de la séance dans le fuseau de la place (sert au découpage en trimestres)
    pub trading_date: NaiveDate,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    /// Crée une barre dont la date de séance est la date UTC du timestamp
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            trading_date: timestamp.date_naive(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Remplace la date de séance (décalage horaire de la place)
    pub fn with_trading_date(mut self, trading_date: NaiveDate) -> Self {
        self.trading_date = trading_date;
        self
    }
}

/// Historique de barres journalières, triées par timestamp croissant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Symbole qualifié (ex: "RELIANCE.NS")
    pub symbol: String,

    /// Période demandée
    pub period: Period,

    /// Barres, la plus ancienne en premier
    pub bars: Vec<DailyBar>,
}

impl PriceHistory {
    /// Crée un historique vide
    pub fn new(symbol: String, period: Period) -> Self {
        Self {
            symbol,
            period,
            bars: Vec::new(),
        }
    }

    /// Crée un historique à partir de barres déjà construites
    pub fn with_bars(symbol: String, period: Period, bars: Vec<DailyBar>) -> Self {
        Self { symbol, period, bars }
    }

    /// Ajoute une barre
    pub fn add_bar(&mut self, bar: DailyBar) {
        self.bars.push(bar);
    }

    /// Retourne le nombre de barres
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Vérifie si l'historique est vide
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Retourne la barre la plus récente
    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    /// Dernier cours de clôture connu
    pub fn last_close(&self) -> Option<f64> {
        self.last().map(|bar| bar.close)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
