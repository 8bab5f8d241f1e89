// ============================================================================
// Structure : CompanyProfile
// ============================================================================
// Champs de profil renvoyés par le provider (nom, capitalisation, ratios...)
//
// CONCEPT RUST : Option<T> comme sentinelle "non disponible"
// - None : le provider n'a pas renvoyé le champ
// - Jamais une erreur : l'affichage dégrade en "N/A"
// ============================================================================

use serde::{Deserialize, Serialize};

/// Profil d'une société tel que rapporté par le provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Raison sociale (ex: "Reliance Industries Limited")
    pub long_name: Option<String>,
    pub market_cap: Option<f64>,
    pub forward_pe: Option<f64>,
    /// Rendement du dividende en ratio (0.0234 = 2.34%)
    pub dividend_yield: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub total_revenue: Option<f64>,
    pub beta: Option<f64>,
    pub sector: Option<String>,
    /// Recommandation consensus des analystes (ex: "buy", "hold")
    pub recommendation_key: Option<String>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}
