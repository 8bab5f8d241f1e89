// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère profil, cours et comptes trimestriels depuis Yahoo Finance
//
// Endpoints :
// - /v8/finance/chart/{sym}              : barres journalières (pas d'auth)
// - /v10/finance/quoteSummary/{sym}      : profil (cookie de session + crumb)
// - /ws/fundamentals-timeseries/...      : lignes du compte de résultat
//
// CONCEPTS RUST :
// 1. async/await : appels réseau non bloquants
// 2. Serde : désérialisation JSON automatique
// 3. OnceCell : crumb récupéré une seule fois par client
// ============================================================================

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use crate::api::error::ProviderError;
use crate::api::fundamentals::{
    parse_quote_summary, parse_timeseries, QuoteSummaryResponse, TimeseriesResponse,
    STATEMENT_ROWS,
};
use crate::api::provider::MarketDataProvider;
use crate::models::{CompanyProfile, DailyBar, Period, PriceHistory, QuarterlyFinancials, Ticker};

/// User-Agent navigateur, sans lui Yahoo répond 429
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Modules quoteSummary nécessaires au profil
const PROFILE_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile";

/// Début de la fenêtre des séries fondamentales (1985), comme le site Yahoo
const TIMESERIES_START: i64 = 493_590_046;

// ============================================================================
// Endpoints
// ============================================================================

/// URLs de base des services Yahoo (surchargées dans les tests)
#[derive(Debug, Clone)]
pub struct YahooEndpoints {
    pub query1: String,
    pub query2: String,
    /// Page visitée pour obtenir le cookie de session
    pub session: String,
}

impl Default for YahooEndpoints {
    fn default() -> Self {
        Self {
            query1: "https://query1.finance.yahoo.com".to_string(),
            query2: "https://query2.finance.yahoo.com".to_string(),
            session: "https://fc.yahoo.com".to_string(),
        }
    }
}

impl YahooEndpoints {
    /// Tous les services derrière une même URL (serveur de test)
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            query1: base.clone(),
            query2: base.clone(),
            session: base,
        }
    }
}

// ============================================================================
// Structures pour parser la réponse du endpoint chart
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

/// Erreur explicite renvoyée par Yahoo dans le corps JSON
#[derive(Debug, Deserialize)]
pub(crate) struct YahooError {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl YahooError {
    pub(crate) fn reason(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "erreur inconnue".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Métadonnées du ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    symbol: Option<String>,
    /// Décalage de la place par rapport à UTC, en secondes (19800 pour la NSE)
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Colonnes OHLCV, une valeur par timestamp (null si pas de cotation)
#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

// ============================================================================
// Client
// ============================================================================

/// Client Yahoo Finance implémentant MarketDataProvider
pub struct YahooClient {
    http: reqwest::Client,
    endpoints: YahooEndpoints,
    crumb: OnceCell<String>,
}

impl YahooClient {
    /// Client vers les vrais endpoints Yahoo
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_endpoints(YahooEndpoints::default())
    }

    /// Client vers des endpoints donnés
    ///
    /// cookie_store(true) : le cookie de session posé par la page `session`
    /// est renvoyé automatiquement avec le crumb
    pub fn with_endpoints(endpoints: YahooEndpoints) -> Result<Self, ProviderError> {
        debug!(?endpoints, "Creating Yahoo HTTP client");
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            endpoints,
            crumb: OnceCell::new(),
        })
    }

    /// GET + vérification du statut, renvoie le corps brut
    async fn get_text(&self, request: reqwest::RequestBuilder, endpoint: &str) -> Result<String, ProviderError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = %status, endpoint, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, endpoint, "Yahoo Finance returned error status");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// GET + désérialisation JSON
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ProviderError> {
        let body = self.get_text(request, endpoint).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Crumb de la session anonyme, obtenu au premier appel puis réutilisé
    async fn crumb(&self) -> Result<&str, ProviderError> {
        let crumb = self
            .crumb
            .get_or_try_init(|| self.fetch_crumb())
            .await?;
        Ok(crumb.as_str())
    }

    /// Handshake : visite de la page de session (pose le cookie) puis lecture du crumb
    async fn fetch_crumb(&self) -> Result<String, ProviderError> {
        debug!("Fetching Yahoo session cookie");
        // Le statut importe peu (fc.yahoo.com répond 404), seul le cookie compte
        let session = self
            .http
            .get(&self.endpoints.session)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await?;
        debug!(status = %session.status(), "Session page visited");

        let url = format!("{}/v1/test/getcrumb", self.endpoints.query1);
        let body = self.get_text(self.http.get(&url), "getcrumb").await?;
        let crumb = body.trim();

        if crumb.is_empty()
            || crumb.len() >= 100
            || crumb.contains(' ')
            || crumb.contains("<html")
        {
            warn!(len = crumb.len(), "Rejected Yahoo crumb");
            return Err(ProviderError::Auth(
                "crumb Yahoo invalide ou absent".to_string(),
            ));
        }

        info!("Yahoo crumb obtained");
        Ok(crumb.to_string())
    }
}

/// Construit l'URL du endpoint chart pour une période glissante
///
/// Le paramètre `range` de Yahoo suit les mêmes libellés que Period ("1d", "1y"...).
fn build_chart_url(base: &str, symbol: &str, period: Period) -> String {
    format!(
        "{}/v8/finance/chart/{}?interval=1d&range={}",
        base,
        symbol,
        period.label()
    )
}

/// Parse la réponse chart et la convertit en PriceHistory
///
/// Les barres incomplètes (High/Low/Close manquant) sont ignorées.
/// Une réponse sans aucune séance donne un historique vide, pas une erreur.
fn parse_chart_response(
    response: ChartResponse,
    symbol: &str,
    period: Period,
) -> Result<PriceHistory, ProviderError> {
    if let Some(err) = response.chart.error {
        return Err(ProviderError::no_data(symbol, err.reason()));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ProviderError::no_data(symbol, "aucun résultat dans la réponse chart"))?;

    if let Some(returned) = &result.meta.symbol {
        if !returned.eq_ignore_ascii_case(symbol) {
            warn!(requested = %symbol, returned = %returned, "Yahoo returned a different symbol");
        }
    }

    let mut history = PriceHistory::new(symbol.to_string(), period);
    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        debug!("No trading session in requested range");
        return Ok(history);
    }

    let offset = result.meta.gmtoffset.unwrap_or(0);
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::missing_field("indicators.quote"))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut skipped_count = 0;
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let (Some(high), Some(low), Some(close)) = (at(&highs, i), at(&lows, i), at(&closes, i)) else {
            skipped_count += 1;
            continue;
        };
        let open = at(&opens, i).unwrap_or(close);
        let volume = volumes.get(i).copied().flatten().unwrap_or(0);

        let (Some(datetime), Some(local)) = (
            DateTime::<Utc>::from_timestamp(timestamp, 0),
            DateTime::<Utc>::from_timestamp(timestamp + offset, 0),
        ) else {
            return Err(ProviderError::missing_field(format!("timestamp valide (index {})", i)));
        };

        history.add_bar(
            DailyBar::new(datetime, open, high, low, close, volume)
                .with_trading_date(local.date_naive()),
        );
    }

    if skipped_count > 0 {
        warn!(
            skipped = skipped_count,
            total = timestamps.len(),
            "Skipped bars with missing data"
        );
    }

    Ok(history)
}

// ============================================================================
// Implémentation du trait
// ============================================================================

impl MarketDataProvider for YahooClient {
    #[instrument(skip(self, ticker), fields(ticker = %ticker))]
    async fn fetch_quarterly_financials(
        &self,
        ticker: &Ticker,
    ) -> Result<QuarterlyFinancials, ProviderError> {
        let symbol = ticker.qualified();
        let url = format!(
            "{}/ws/fundamentals-timeseries/v1/finance/timeseries/{}",
            self.endpoints.query2, symbol
        );
        let types = STATEMENT_ROWS
            .iter()
            .map(|(key, _)| *key)
            .collect::<Vec<_>>()
            .join(",");
        let now = Utc::now().timestamp();

        let request = self.http.get(&url).query(&[
            ("symbol", symbol.clone()),
            ("type", types),
            ("period1", TIMESERIES_START.to_string()),
            ("period2", now.to_string()),
        ]);

        let response: TimeseriesResponse = self.get_json(request, "timeseries").await?;
        let financials = parse_timeseries(response)?;

        info!(quarters = financials.periods.len(), "Fetched quarterly financials");
        Ok(financials)
    }

    #[instrument(skip(self, ticker), fields(ticker = %ticker))]
    async fn fetch_profile(&self, ticker: &Ticker) -> Result<CompanyProfile, ProviderError> {
        let symbol = ticker.qualified();
        let crumb = self.crumb().await?;
        let url = format!("{}/v10/finance/quoteSummary/{}", self.endpoints.query1, symbol);

        let request = self
            .http
            .get(&url)
            .query(&[("modules", PROFILE_MODULES), ("crumb", crumb)]);

        let response: QuoteSummaryResponse = self.get_json(request, "quoteSummary").await?;
        let profile = parse_quote_summary(response, &symbol)?;

        info!(name = ?profile.long_name, "Fetched company profile");
        Ok(profile)
    }

    #[instrument(skip(self, ticker), fields(ticker = %ticker))]
    async fn fetch_latest_close(&self, ticker: &Ticker) -> Result<Option<f64>, ProviderError> {
        let history = self.fetch_daily_history(ticker, Period::OneDay).await?;
        let close = history.last_close();
        debug!(?close, "Latest close");
        Ok(close)
    }

    #[instrument(skip(self, ticker, period), fields(ticker = %ticker, period = %period.label()))]
    async fn fetch_daily_history(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<PriceHistory, ProviderError> {
        let symbol = ticker.qualified();
        let url = build_chart_url(&self.endpoints.query1, &symbol, period);
        debug!(url = %url, "Built Yahoo Finance chart URL");

        let response: ChartResponse = self.get_json(self.http.get(&url), "chart").await?;
        let history = parse_chart_response(response, &symbol, period)?;

        info!(bars = history.len(), "Fetched daily history");
        Ok(history)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_build_chart_url() {
        let url = build_chart_url("https://query1.finance.yahoo.com", "TCS.NS", Period::OneYear);
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/TCS.NS?interval=1d&range=1y"
        );
    }

    #[test]
    fn test_parse_chart_skips_incomplete_bars() {
        let response = chart(
            r#"{"chart":{"result":[{
                "meta":{"symbol":"TCS.NS","gmtoffset":19800},
                "timestamp":[1711943100,1712029500,1712115900],
                "indicators":{"quote":[{
                    "open":[3900.0,null,3950.0],
                    "high":[3950.0,3990.0,null],
                    "low":[3880.0,3930.0,3920.0],
                    "close":[3940.0,3980.0,3960.0],
                    "volume":[1000,2000,null]
                }]}
            }],"error":null}}"#,
        );

        let history = parse_chart_response(response, "TCS.NS", Period::OneYear).unwrap();
        assert_eq!(history.len(), 2);
        // open manquant : remplacé par le close
        assert_eq!(history.bars[1].open, 3980.0);
        assert_eq!(history.last_close(), Some(3980.0));
    }

    #[test]
    fn test_parse_chart_uses_exchange_offset_for_trading_date() {
        // 2024-03-31 20:00 UTC = 2024-04-01 01:30 IST
        let response = chart(
            r#"{"chart":{"result":[{
                "meta":{"symbol":"X.NS","gmtoffset":19800},
                "timestamp":[1711915200],
                "indicators":{"quote":[{"open":[1.0],"high":[2.0],"low":[0.5],"close":[1.5],"volume":[10]}]}
            }],"error":null}}"#,
        );

        let history = parse_chart_response(response, "X.NS", Period::OneYear).unwrap();
        assert_eq!(history.bars[0].trading_date.to_string(), "2024-04-01");
        assert_eq!(history.bars[0].timestamp.date_naive().to_string(), "2024-03-31");
    }

    #[test]
    fn test_parse_chart_without_session_is_empty() {
        let response = chart(
            r#"{"chart":{"result":[{
                "meta":{"symbol":"TCS.NS"},
                "indicators":{"quote":[{}]}
            }],"error":null}}"#,
        );

        let history = parse_chart_response(response, "TCS.NS", Period::OneDay).unwrap();
        assert!(history.is_empty());
        assert_eq!(history.last_close(), None);
    }

    #[test]
    fn test_parse_chart_error_body() {
        let response = chart(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );

        let err = parse_chart_response(response, "NOPE.NS", Period::OneYear).unwrap_err();
        assert!(matches!(err, ProviderError::NoData { .. }));
        assert!(err.to_string().contains("symbol may be delisted"));
    }

    #[test]
    fn test_endpoints_single() {
        let endpoints = YahooEndpoints::single("http://127.0.0.1:1234/");
        assert_eq!(endpoints.query1, "http://127.0.0.1:1234");
        assert_eq!(endpoints.session, "http://127.0.0.1:1234");
    }
}
