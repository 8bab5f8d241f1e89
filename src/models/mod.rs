// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
// ============================================================================

pub mod financials; // Lignes du compte de résultat trimestriel
pub mod history;    // Historique quotidien (High/Low/Close)
pub mod profile;    // Profil société renvoyé par le provider
pub mod quarter;    // Trimestres calendaires et moyennes
pub mod stock_info; // Table clé/valeur affichée
pub mod ticker;     // Symbole qualifié pour la place de cotation

// Re-export des structures principales pour simplifier les imports
pub use financials::{QuarterlyFinancials, QUARTERS};
pub use history::{DailyBar, Period, PriceHistory};
pub use profile::CompanyProfile;
pub use quarter::{Quarter, QuarterlyAverage};
pub use stock_info::{StockField, StockInfo, NOT_AVAILABLE};
pub use ticker::{Ticker, DEFAULT_EXCHANGE_SUFFIX};
