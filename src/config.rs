// ============================================================================
// Configuration
// ============================================================================
// Arguments de ligne de commande, chacun surchargeable par une variable
// d'environnement STOCKSCOPE_*
//
// CONCEPT RUST : clap derive
// - #[derive(Parser)] génère le parsing et l'aide --help
// - env = "..." : valeur lue dans l'environnement si le flag est absent
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::format::DEFAULT_CURRENCY;
use crate::models::DEFAULT_EXCHANGE_SUFFIX;

/// Explorateur d'actions : fondamentaux, trimestres et graphiques
#[derive(Debug, Clone, Parser)]
#[command(name = "stockscope", author, version, about)]
pub struct Config {
    /// Fichier CSV du catalogue (colonne SYMBOL)
    #[arg(long, env = "STOCKSCOPE_CATALOG", default_value = "nse_stocks.csv")]
    pub catalog: PathBuf,

    /// Suffixe de la place de cotation ajouté aux symboles
    #[arg(long, env = "STOCKSCOPE_EXCHANGE_SUFFIX", default_value = DEFAULT_EXCHANGE_SUFFIX)]
    pub exchange_suffix: String,

    /// Symbole monétaire des montants affichés
    #[arg(long, env = "STOCKSCOPE_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Répertoire où les graphiques PNG sont enregistrés
    #[arg(long, env = "STOCKSCOPE_CHART_DIR", default_value = "charts")]
    pub chart_dir: PathBuf,

    /// Répertoire des logs (défaut : répertoire de données local)
    #[arg(long, env = "STOCKSCOPE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Police TTF/OTF utilisée pour le texte des graphiques
    #[arg(long, env = "STOCKSCOPE_FONT")]
    pub font: Option<PathBuf>,

    /// Largeur du graphique en pixels
    #[arg(long, env = "STOCKSCOPE_CHART_WIDTH", default_value_t = 1000)]
    pub chart_width: u32,

    /// Hauteur du graphique en pixels
    #[arg(long, env = "STOCKSCOPE_CHART_HEIGHT", default_value_t = 1500)]
    pub chart_height: u32,

    /// Mode non interactif : traite ce symbole puis quitte
    #[arg(long, env = "STOCKSCOPE_SYMBOL")]
    pub symbol: Option<String>,
}

impl Config {
    /// Répertoire des logs effectif
    ///
    /// - Linux : ~/.local/share/stockscope/logs
    /// - macOS : ~/Library/Application Support/stockscope/logs
    /// - Sinon : ./logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("stockscope").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["stockscope"]).unwrap();

        assert_eq!(config.exchange_suffix, "NS");
        assert_eq!(config.currency, "₹");
        assert_eq!((config.chart_width, config.chart_height), (1000, 1500));
        assert!(config.symbol.is_none());
        assert!(config.log_dir().ends_with("logs"));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "stockscope",
            "--exchange-suffix",
            "BO",
            "--symbol",
            "TCS",
            "--log-dir",
            "/tmp/stockscope",
        ])
        .unwrap();

        assert_eq!(config.exchange_suffix, "BO");
        assert_eq!(config.symbol.as_deref(), Some("TCS"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/stockscope"));
    }
}
