// ============================================================================
// Request Handler - Pipeline complet pour un symbole
// ============================================================================
// Symbole nu → profil, dernier cours, trimestres, historique 1 an
//            → StockInfo + moyennes trimestrielles + graphique PNG
//
// CONCEPTS RUST :
// 1. Génériques + trait bounds : le handler ne connaît ni Yahoo ni plotters
// 2. Opérateur ? sur HandlerError : chaque étape remonte via From
// 3. Result<StockReport, RequestFailure> : l'échec ne porte aucune donnée partielle
// ============================================================================

use std::fmt;

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::api::{MarketDataProvider, ProviderError};
use crate::chart::{ChartError, ChartImage, ChartInput, ChartRenderer};
use crate::format::CurrencyFormatter;
use crate::metrics::build_stock_info;
use crate::models::{Period, QuarterlyAverage, QuarterlyFinancials, StockInfo, Ticker};
use crate::quarterly::quarterly_averages;

/// Erreur d'une étape du pipeline
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Résultat complet d'une requête réussie
#[derive(Debug, Clone)]
pub struct StockReport {
    pub ticker: Ticker,
    pub info: StockInfo,
    /// Bloc texte `**champ**: valeur`
    pub text: String,
    pub financials: QuarterlyFinancials,
    pub averages: Vec<QuarterlyAverage>,
    pub chart: ChartImage,
}

/// Échec d'une requête : seulement le ticker et la raison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub ticker: Ticker,
    pub reason: String,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error fetching data for {}: {}",
            self.ticker.qualified(),
            self.reason
        )
    }
}

impl std::error::Error for RequestFailure {}

/// Exécute le pipeline pour un symbole
pub struct RequestHandler<P, R> {
    provider: P,
    renderer: R,
    formatter: CurrencyFormatter,
    exchange_suffix: String,
}

impl<P: MarketDataProvider, R: ChartRenderer> RequestHandler<P, R> {
    pub fn new(
        provider: P,
        renderer: R,
        formatter: CurrencyFormatter,
        exchange_suffix: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            renderer,
            formatter,
            exchange_suffix: exchange_suffix.into(),
        }
    }

    /// Traite un symbole nu du catalogue (ex: "RELIANCE")
    #[instrument(skip(self))]
    pub async fn handle(&self, symbol: &str) -> Result<StockReport, RequestFailure> {
        let ticker = Ticker::qualify(symbol, &self.exchange_suffix);

        match self.run(&ticker).await {
            Ok(report) => {
                info!(ticker = %ticker, quarters = report.averages.len(), "Report ready");
                Ok(report)
            }
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Request failed");
                Err(RequestFailure {
                    ticker,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn run(&self, ticker: &Ticker) -> Result<StockReport, HandlerError> {
        let profile = self.provider.fetch_profile(ticker).await?;
        let latest_close = self.provider.fetch_latest_close(ticker).await?;
        let financials = self.provider.fetch_quarterly_financials(ticker).await?;

        let info = build_stock_info(ticker, &profile, latest_close, &financials, &self.formatter);

        let history = self
            .provider
            .fetch_daily_history(ticker, Period::OneYear)
            .await?;
        let averages = quarterly_averages(&history);

        let label = ticker.qualified();
        let chart = self.renderer.render(&ChartInput {
            ticker: &label,
            net_profit: &financials.net_profit,
            sales: &financials.sales,
            averages: &averages,
        })?;

        let text = info.to_markdown();

        Ok(StockReport {
            ticker: ticker.clone(),
            info,
            text,
            financials,
            averages,
            chart,
        })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::models::{CompanyProfile, DailyBar, PriceHistory, StockField, QUARTERS};

    /// Provider en mémoire : chaque champ fixe la réponse d'une opération
    struct StubProvider {
        profile: Result<CompanyProfile, String>,
        financials: QuarterlyFinancials,
        missing_row: Option<&'static str>,
    }

    impl Default for StubProvider {
        fn default() -> Self {
            Self {
                profile: Ok(CompanyProfile {
                    long_name: Some("Reliance Industries Limited".to_string()),
                    dividend_yield: Some(0.0234),
                    ..CompanyProfile::default()
                }),
                financials: QuarterlyFinancials {
                    periods: Vec::new(),
                    net_profit: [Some(1.9e11), Some(1.7e11), Some(1.8e11)],
                    sales: [Some(2.4e12), Some(2.3e12), Some(2.2e12)],
                    operating_income: [Some(3.1e11), None, None],
                },
                missing_row: None,
            }
        }
    }

    impl MarketDataProvider for StubProvider {
        async fn fetch_quarterly_financials(
            &self,
            _ticker: &Ticker,
        ) -> Result<QuarterlyFinancials, ProviderError> {
            match self.missing_row {
                Some(row) => Err(ProviderError::missing_field(row)),
                None => Ok(self.financials.clone()),
            }
        }

        async fn fetch_profile(&self, ticker: &Ticker) -> Result<CompanyProfile, ProviderError> {
            self.profile
                .clone()
                .map_err(|reason| ProviderError::no_data(ticker.qualified(), reason))
        }

        async fn fetch_latest_close(&self, _ticker: &Ticker) -> Result<Option<f64>, ProviderError> {
            Ok(Some(2950.5))
        }

        async fn fetch_daily_history(
            &self,
            ticker: &Ticker,
            period: Period,
        ) -> Result<PriceHistory, ProviderError> {
            let bar = |y, m, d, high, low| {
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                let ts = Utc.from_utc_datetime(&date.and_hms_opt(4, 0, 0).unwrap());
                DailyBar::new(ts, low, high, low, high, 1_000).with_trading_date(date)
            };
            Ok(PriceHistory::with_bars(
                ticker.qualified(),
                period,
                vec![bar(2024, 2, 1, 110.0, 90.0), bar(2024, 5, 2, 130.0, 120.0)],
            ))
        }
    }

    /// Renderer factice : compte les appels, peut échouer
    #[derive(Default)]
    struct StubRenderer {
        calls: Cell<usize>,
        fail: bool,
    }

    impl ChartRenderer for StubRenderer {
        fn render(&self, input: &ChartInput<'_>) -> Result<ChartImage, ChartError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ChartError::Draw(format!("no canvas for {}", input.ticker)));
            }
            Ok(ChartImage { png: vec![1, 2, 3], width: 10, height: 30 })
        }
    }

    fn handler(provider: StubProvider, renderer: StubRenderer) -> RequestHandler<StubProvider, StubRenderer> {
        RequestHandler::new(provider, renderer, CurrencyFormatter::default(), "NS")
    }

    #[tokio::test]
    async fn test_handle_success() {
        let h = handler(StubProvider::default(), StubRenderer::default());
        let report = h.handle(" reliance ").await.unwrap();

        assert_eq!(report.ticker.qualified(), "RELIANCE.NS");
        assert_eq!(report.info.get(StockField::Ticker), "RELIANCE.NS");
        assert_eq!(report.info.get(StockField::CurrentPrice), "₹2950.50");
        assert_eq!(report.info.get(StockField::DividendYield), "2.34%");
        assert_eq!(report.info.get(StockField::SalesLastQuarter), "₹2.40 Trillion");
        assert_eq!(report.averages.len(), 2);
        assert_eq!(report.averages[0].label(), "2024-Q1");
        assert_eq!(report.chart.png, vec![1, 2, 3]);
        assert_eq!(h.renderer.calls.get(), 1);

        assert!(report.text.starts_with("**Company Name**: Reliance Industries Limited\n\n"));
        assert!(report.text.ends_with("**Recommendation**: N/A"));
    }

    #[tokio::test]
    async fn test_profile_failure_has_no_image() {
        let provider = StubProvider {
            profile: Err("symbol delisted".to_string()),
            ..StubProvider::default()
        };
        let h = handler(provider, StubRenderer::default());

        let failure = h.handle("RELIANCE").await.unwrap_err();
        let message = failure.to_string();

        assert!(message.starts_with("Error fetching data for RELIANCE.NS: "));
        assert!(message.contains("symbol delisted"));
        assert_eq!(h.renderer.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_empty_statement_table_gives_na() {
        let provider = StubProvider {
            financials: QuarterlyFinancials::not_available(),
            ..StubProvider::default()
        };
        let h = handler(provider, StubRenderer::default());

        let report = h.handle("TCS").await.unwrap();
        for field in [
            StockField::NetProfitLastQuarter,
            StockField::SalesLastQuarter,
            StockField::OperatingIncomeLastQuarter,
        ] {
            assert_eq!(report.info.get(field), "N/A");
            assert!(report.text.contains(&format!("**{}**: N/A", field.label())));
        }
        assert_eq!(report.financials.net_profit, [None; QUARTERS]);
    }

    #[tokio::test]
    async fn test_missing_row_is_request_failure() {
        let provider = StubProvider {
            missing_row: Some("Operating Income"),
            ..StubProvider::default()
        };
        let h = handler(provider, StubRenderer::default());

        let failure = h.handle("INFY").await.unwrap_err();
        assert_eq!(failure.ticker.qualified(), "INFY.NS");
        assert!(failure.reason.contains("Operating Income"));
    }

    #[tokio::test]
    async fn test_chart_failure_is_request_failure() {
        let renderer = StubRenderer { fail: true, ..StubRenderer::default() };
        let h = handler(StubProvider::default(), renderer);

        let failure = h.handle("WIPRO").await.unwrap_err();
        assert_eq!(
            failure.to_string(),
            "Error fetching data for WIPRO.NS: échec du dessin du graphique : no canvas for WIPRO.NS"
        );
    }
}
