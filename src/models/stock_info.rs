// ============================================================================
// Structure : StockInfo
// ============================================================================
// Table clé/valeur prête à l'affichage, dans un ordre fixe
//
// CONCEPTS RUST :
// 1. Enum + tableau constant : l'ordre des champs est défini une seule fois
// 2. Construction unique : pas de &mut self, l'objet est figé une fois créé
// ============================================================================

use serde::{Deserialize, Serialize};

/// Valeur affichée quand une donnée est absente
pub const NOT_AVAILABLE: &str = "N/A";

/// Champs affichés, dans l'ordre d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockField {
    CompanyName,
    Ticker,
    CurrentPrice,
    MarketCap,
    PeRatio,
    DividendYield,
    Eps,
    Revenue,
    NetProfitLastQuarter,
    SalesLastQuarter,
    OperatingIncomeLastQuarter,
    Beta,
    FiftyTwoWeekHigh,
    FiftyTwoWeekLow,
    Sector,
    Recommendation,
}

impl StockField {
    /// Tous les champs, dans l'ordre d'affichage
    pub const ALL: [StockField; 16] = [
        StockField::CompanyName,
        StockField::Ticker,
        StockField::CurrentPrice,
        StockField::MarketCap,
        StockField::PeRatio,
        StockField::DividendYield,
        StockField::Eps,
        StockField::Revenue,
        StockField::NetProfitLastQuarter,
        StockField::SalesLastQuarter,
        StockField::OperatingIncomeLastQuarter,
        StockField::Beta,
        StockField::FiftyTwoWeekHigh,
        StockField::FiftyTwoWeekLow,
        StockField::Sector,
        StockField::Recommendation,
    ];

    /// Libellé affiché
    pub fn label(&self) -> &'static str {
        match self {
            StockField::CompanyName => "Company Name",
            StockField::Ticker => "Ticker",
            StockField::CurrentPrice => "Current Price",
            StockField::MarketCap => "Market Cap",
            StockField::PeRatio => "PE Ratio",
            StockField::DividendYield => "Dividend Yield",
            StockField::Eps => "EPS",
            StockField::Revenue => "Revenue",
            StockField::NetProfitLastQuarter => "Net Profit (Last Quarter)",
            StockField::SalesLastQuarter => "Sales (Last Quarter)",
            StockField::OperatingIncomeLastQuarter => "Operating Income (Last Quarter)",
            StockField::Beta => "Beta",
            StockField::FiftyTwoWeekHigh => "52-Week High",
            StockField::FiftyTwoWeekLow => "52-Week Low",
            StockField::Sector => "Sector",
            StockField::Recommendation => "Recommendation",
        }
    }
}

/// Informations d'une action, une valeur formatée par champ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    entries: Vec<(StockField, String)>,
}

impl StockInfo {
    /// Construit la table à partir d'une fonction qui fournit la valeur de chaque champ
    ///
    /// CONCEPT RUST : FnMut
    /// - La closure est appelée une fois par champ, dans l'ordre de StockField::ALL
    /// - Garantit que tous les champs sont présents
    pub fn from_fn(mut value_of: impl FnMut(StockField) -> String) -> Self {
        let entries = StockField::ALL
            .iter()
            .map(|&field| (field, value_of(field)))
            .collect();
        Self { entries }
    }

    /// Valeur formatée d'un champ
    pub fn get(&self, field: StockField) -> &str {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Itère sur (libellé, valeur) dans l'ordre d'affichage
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.label(), value.as_str()))
    }

    /// Bloc de texte markdown : `**champ**: valeur`, une entrée par paragraphe
    pub fn to_markdown(&self) -> String {
        self.iter()
            .map(|(label, value)| format!("**{}**: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_markdown() {
        let info = StockInfo::from_fn(|field| match field {
            StockField::CompanyName => "Acme".to_string(),
            _ => NOT_AVAILABLE.to_string(),
        });

        let labels: Vec<&str> = info.iter().map(|(label, _)| label).collect();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[0], "Company Name");
        assert_eq!(labels[15], "Recommendation");

        let text = info.to_markdown();
        assert!(text.starts_with("**Company Name**: Acme\n\n**Ticker**: N/A"));
        assert!(text.ends_with("**Recommendation**: N/A"));
    }

    #[test]
    fn test_get() {
        let info = StockInfo::from_fn(|field| field.label().to_uppercase());
        assert_eq!(info.get(StockField::Beta), "BETA");
    }
}
