// ============================================================================
// Structure : Ticker
// ============================================================================
// Représente un symbole boursier qualifié pour une place de cotation
//
// CONCEPTS RUST :
// 1. Immutabilité : pas de setters, les champs sont privés
// 2. Display : le format qualifié ("RELIANCE.NS") est ce qu'attend Yahoo
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffixe Yahoo de la National Stock Exchange of India
pub const DEFAULT_EXCHANGE_SUFFIX: &str = "NS";

/// Ticker : symbole nu + suffixe de la place de cotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    /// Symbole tel que listé dans le catalogue (ex: "RELIANCE")
    symbol: String,

    /// Suffixe de la place (ex: "NS"), vide pour les places US
    suffix: String,
}

impl Ticker {
    /// Qualifie un symbole nu pour une place donnée
    ///
    /// Le symbole est nettoyé (trim + majuscules), le suffixe aussi.
    pub fn qualify(symbol: &str, suffix: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            suffix: suffix.trim().trim_start_matches('.').to_uppercase(),
        }
    }

    /// Symbole nu (ex: "RELIANCE")
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Suffixe de la place (ex: "NS")
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Forme qualifiée envoyée au provider (ex: "RELIANCE.NS")
    pub fn qualified(&self) -> String {
        if self.suffix.is_empty() {
            self.symbol.clone()
        } else {
            format!("{}.{}", self.symbol, self.suffix)
        }
    }

    /// Nom de fichier sans point ni caractère spécial (ex: "RELIANCE_NS")
    pub fn file_stem(&self) -> String {
        self.qualified()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_with_suffix() {
        let ticker = Ticker::qualify("reliance ", "NS");
        assert_eq!(ticker.symbol(), "RELIANCE");
        assert_eq!(ticker.qualified(), "RELIANCE.NS");
        assert_eq!(ticker.to_string(), "RELIANCE.NS");
    }

    #[test]
    fn test_qualify_without_suffix() {
        let ticker = Ticker::qualify("AAPL", "");
        assert_eq!(ticker.qualified(), "AAPL");
    }

    #[test]
    fn test_leading_dot_in_suffix_is_ignored() {
        let ticker = Ticker::qualify("TCS", ".bo");
        assert_eq!(ticker.qualified(), "TCS.BO");
    }

    #[test]
    fn test_file_stem() {
        let ticker = Ticker::qualify("M&M", "NS");
        assert_eq!(ticker.file_stem(), "M_M_NS");
    }
}
