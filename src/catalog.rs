// ============================================================================
// Catalogue de symboles
// ============================================================================
// Charge la colonne SYMBOL d'un fichier CSV (ex: liste des actions NSE)
//
// CONCEPTS RUST :
// 1. csv::Reader : en-têtes + enregistrements, sans désérialisation serde
// 2. Immutabilité : le catalogue n'expose que des lectures après chargement
// ============================================================================

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::Reader;
use thiserror::Error;
use tracing::{info, warn};

/// Nom de la colonne contenant les symboles
pub const SYMBOL_COLUMN: &str = "SYMBOL";

/// Erreurs de chargement du catalogue
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Le fichier n'a pas de colonne SYMBOL
    #[error("colonne SYMBOL absente de {}", .0.display())]
    MissingColumn(PathBuf),

    /// Lecture ou parsing CSV
    #[error("lecture du catalogue impossible : {0}")]
    Csv(#[from] csv::Error),
}

/// Liste ordonnée des symboles disponibles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolCatalog {
    symbols: Vec<String>,
}

impl SymbolCatalog {
    /// Construit un catalogue depuis une liste déjà connue
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Charge le catalogue depuis un CSV
    ///
    /// Fichier absent → catalogue vide (pas une erreur).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let mut reader = match Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) if is_not_found(&e) => {
                warn!(path = %path.display(), "Catalog file not found, starting with an empty list");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let column = reader
            .headers()?
            .iter()
            .position(|name| name.trim() == SYMBOL_COLUMN)
            .ok_or_else(|| CatalogError::MissingColumn(path.to_path_buf()))?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(symbol) = record.get(column).map(str::trim).filter(|s| !s.is_empty()) {
                symbols.push(symbol.to_string());
            }
        }

        info!(path = %path.display(), symbols = symbols.len(), "Catalog loaded");
        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Indices des symboles contenant `query` (insensible à la casse)
    ///
    /// Requête vide → tous les indices. L'ordre du catalogue est conservé.
    pub fn filter(&self, query: &str) -> Vec<usize> {
        let query = query.trim().to_uppercase();
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.to_uppercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SymbolCatalog::load(&dir.path().join("absent.csv")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_symbol_column() {
        let file = csv_file(
            "NAME OF COMPANY, SYMBOL ,SERIES\n\
             Reliance Industries,RELIANCE,EQ\n\
             Tata Consultancy,  TCS ,EQ\n\
             Blank,,EQ\n\
             Infosys,INFY,EQ\n",
        );

        let catalog = SymbolCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.symbols(), &["RELIANCE", "TCS", "INFY"]);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("TCS"));
        assert!(!catalog.contains("WIPRO"));
    }

    #[test]
    fn test_missing_column() {
        let file = csv_file("TICKER,NAME\nRELIANCE,Reliance\n");
        let err = SymbolCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(_)));
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let catalog = SymbolCatalog::from_symbols(["TATAMOTORS", "INFY", "TATASTEEL", "TCS"]);

        assert_eq!(catalog.filter("tata"), vec![0, 2]);
        assert_eq!(catalog.filter(""), vec![0, 1, 2, 3]);
        assert!(catalog.filter("xyz").is_empty());
    }
}
