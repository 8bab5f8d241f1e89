// ============================================================================
// Formatage des montants
// ============================================================================
// Convertit un montant brut en texte lisible avec un palier d'unité
// (Million / Billion / Trillion) et le symbole monétaire configuré
//
// Règles :
// - None ou non fini (NaN, inf) → "N/A"
// - >= 10^12 → "₹1.23 Trillion"
// - >= 10^9  → "₹1.23 Billion"
// - >= 10^6  → "₹1.23 Million"
// - sinon    → "₹1.23"
// Les bornes appartiennent au palier supérieur (10^9 pile = Billion).
// ============================================================================

use crate::models::NOT_AVAILABLE;

/// Symbole monétaire par défaut (roupie indienne, place NSE)
pub const DEFAULT_CURRENCY: &str = "₹";

const TIERS: [(f64, &str); 3] = [
    (1_000_000_000_000.0, "Trillion"),
    (1_000_000_000.0, "Billion"),
    (1_000_000.0, "Million"),
];

/// Formateur de montants pour un symbole monétaire donné
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    symbol: String,
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }

    /// Symbole monétaire (ex: "₹")
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Formate un montant optionnel
    ///
    /// CONCEPT RUST : let-else
    /// - Sort tôt si la valeur est absente ou non numérique
    pub fn format(&self, value: Option<f64>) -> String {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return NOT_AVAILABLE.to_string();
        };

        for (divisor, unit) in TIERS {
            if value >= divisor {
                return format!("{}{:.2} {}", self.symbol, value / divisor, unit);
            }
        }

        format!("{}{:.2}", self.symbol, value)
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

/// Formate un ratio en pourcentage à 2 décimales (0.0234 → "2.34%")
///
/// Un ratio absent ou nul s'affiche "N/A".
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r != 0.0 && r.is_finite() => format!("{:.2}%", r * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Formate une valeur brute sans unité (PE, beta)
///
/// Utilise la représentation décimale la plus courte de f64.
pub fn format_plain(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
