// ============================================================================
// Erreurs du provider de données de marché
// ============================================================================
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error et Display
// - #[from] génère la conversion automatique utilisée par l'opérateur ?
//
// MissingField sépare une dérive de schéma côté provider (une ligne ou un
// champ attendu a disparu) d'une donnée simplement indisponible (None).
// ============================================================================

use thiserror::Error;

/// Erreur renvoyée par une opération du provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Échec réseau / TLS / lecture du corps
    #[error("échec de la requête HTTP : {0}")]
    Transport(#[from] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("le provider a retourné HTTP {status} pour {endpoint}")]
    Status { status: u16, endpoint: String },

    /// JSON illisible ou structure inattendue
    #[error("réponse illisible : {0}")]
    Decode(#[from] serde_json::Error),

    /// Champ ou ligne attendu absent d'une réponse non vide
    #[error("champ attendu absent de la réponse : {0}")]
    MissingField(String),

    /// Aucune donnée pour ce symbole (symbole inconnu, erreur explicite du provider)
    #[error("aucune donnée pour {symbol} : {reason}")]
    NoData { symbol: String, reason: String },

    /// Session anonyme (cookie + crumb) impossible à obtenir
    #[error("authentification refusée : {0}")]
    Auth(String),
}

impl ProviderError {
    pub fn missing_field(name: impl Into<String>) -> Self {
        ProviderError::MissingField(name.into())
    }

    pub fn no_data(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::NoData {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Vrai si l'erreur trahit un changement de schéma côté provider
    pub fn is_schema_drift(&self) -> bool {
        matches!(self, ProviderError::MissingField(_) | ProviderError::Decode(_))
    }
}
