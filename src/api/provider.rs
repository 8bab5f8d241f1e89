// ============================================================================
// Trait : MarketDataProvider
// ============================================================================
// Interface entre le pipeline et la source de données de marché
//
// CONCEPTS RUST :
// 1. async fn dans un trait (Rust 1.75+) : chaque implémentation renvoie
//    sa propre Future, appelée en dispatch statique via les génériques
// 2. Le trait isole le schéma du provider (noms de champs, libellés de
//    lignes) : le reste du crate ne voit que des types du domaine
// ============================================================================

use crate::api::error::ProviderError;
use crate::models::{CompanyProfile, Period, PriceHistory, QuarterlyFinancials, Ticker};

/// Source de données de marché pour un ticker qualifié
///
/// Aucune opération ne réessaie ni ne bascule sur un cache : toute erreur
/// remonte à l'appelant.
#[allow(async_fn_in_trait)]
pub trait MarketDataProvider {
    /// Résultat net, chiffre d'affaires et résultat opérationnel des 3 derniers trimestres
    ///
    /// Table vide → triplet sentinelle. Table non vide sans l'une des lignes → MissingField.
    async fn fetch_quarterly_financials(
        &self,
        ticker: &Ticker,
    ) -> Result<QuarterlyFinancials, ProviderError>;

    /// Profil société, un None par champ absent
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<CompanyProfile, ProviderError>;

    /// Dernier cours de clôture de la séance du jour, None si pas de séance
    async fn fetch_latest_close(&self, ticker: &Ticker) -> Result<Option<f64>, ProviderError>;

    /// Barres journalières sur la période glissante demandée
    async fn fetch_daily_history(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<PriceHistory, ProviderError>;
}
