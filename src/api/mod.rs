// ============================================================================
// Module : api
// ============================================================================
// Accès aux données de marché : le trait MarketDataProvider et son
// implémentation Yahoo Finance
// ============================================================================

pub mod error;        // ProviderError
pub mod fundamentals; // Parsing quoteSummary / timeseries
pub mod provider;     // Trait MarketDataProvider
pub mod yahoo;        // Client API Yahoo Finance

// Re-export des types principaux
pub use error::ProviderError;
pub use provider::MarketDataProvider;
pub use yahoo::{YahooClient, YahooEndpoints};
