// ============================================================================
// Structure : QuarterlyFinancials
// ============================================================================
// Trois séries parallèles (résultat net, chiffre d'affaires, résultat
// opérationnel) sur les 3 derniers trimestres publiés, le plus récent en tête
//
// CONCEPT RUST : tableaux de taille fixe [T; N]
// - La longueur 3 fait partie du type, impossible de l'oublier
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nombre de trimestres retenus
pub const QUARTERS: usize = 3;

/// Lignes du compte de résultat trimestriel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyFinancials {
    /// Dates de clôture des colonnes retenues (vide si table vide)
    pub periods: Vec<NaiveDate>,

    /// Résultat net ("Net Income")
    pub net_profit: [Option<f64>; QUARTERS],

    /// Chiffre d'affaires ("Total Revenue")
    pub sales: [Option<f64>; QUARTERS],

    /// Résultat opérationnel ("Operating Income")
    pub operating_income: [Option<f64>; QUARTERS],
}

impl QuarterlyFinancials {
    /// Triplet sentinelle : table trimestrielle vide côté provider
    pub fn not_available() -> Self {
        Self {
            periods: Vec::new(),
            net_profit: [None; QUARTERS],
            sales: [None; QUARTERS],
            operating_income: [None; QUARTERS],
        }
    }

    /// Vrai si aucune valeur n'est disponible
    pub fn is_empty(&self) -> bool {
        self.net_profit
            .iter()
            .chain(self.sales.iter())
            .chain(self.operating_income.iter())
            .all(Option::is_none)
    }

    pub fn latest_net_profit(&self) -> Option<f64> {
        self.net_profit[0]
    }

    pub fn latest_sales(&self) -> Option<f64> {
        self.sales[0]
    }

    pub fn latest_operating_income(&self) -> Option<f64> {
        self.operating_income[0]
    }
}

impl Default for QuarterlyFinancials {
    fn default() -> Self {
        Self::not_available()
    }
}
