// ============================================================================
// Tests d'intégration : YahooClient contre un serveur HTTP simulé (mockito)
// ============================================================================
// Chaque test utilise un symbole distinct : le serveur mockito est partagé.
// ============================================================================

use mockito::{mock, Matcher};

use stockscope::api::{MarketDataProvider, ProviderError, YahooClient, YahooEndpoints};
use stockscope::models::{Period, Ticker};

fn client() -> YahooClient {
    YahooClient::with_endpoints(YahooEndpoints::single(&mockito::server_url())).unwrap()
}

fn chart_body(symbol: &str) -> String {
    format!(
        r#"{{"chart":{{"result":[{{
            "meta":{{"symbol":"{}","gmtoffset":19800}},
            "timestamp":[1704167100,1709264700,1717213500],
            "indicators":{{"quote":[{{
                "open":[100.0,110.0,120.0],
                "high":[105.0,115.0,125.0],
                "low":[95.0,105.0,115.0],
                "close":[101.0,111.0,121.5],
                "volume":[1000,2000,3000]
            }}]}}
        }}],"error":null}}}}"#,
        symbol
    )
}

#[tokio::test]
async fn test_profile_uses_cached_crumb() {
    let _session = mock("GET", "/").with_status(404).create();
    let crumb = mock("GET", "/v1/test/getcrumb")
        .with_status(200)
        .with_body("aBcD3fGh1")
        .expect(1)
        .create();
    let summary = mock("GET", "/v10/finance/quoteSummary/RELIANCE.NS")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("crumb".into(), "aBcD3fGh1".into()),
            Matcher::UrlEncoded(
                "modules".into(),
                "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"quoteSummary":{"result":[{
                "price":{"longName":"Reliance Industries Limited","marketCap":{"raw":19500000000000}},
                "summaryDetail":{"dividendYield":{"raw":0.0034},"beta":{"raw":0.9}},
                "assetProfile":{"sector":"Energy"}
            }],"error":null}}"#,
        )
        .expect(2)
        .create();

    let client = client();
    let ticker = Ticker::qualify("RELIANCE", "NS");

    let profile = client.fetch_profile(&ticker).await.unwrap();
    assert_eq!(profile.long_name.as_deref(), Some("Reliance Industries Limited"));
    assert_eq!(profile.market_cap, Some(19_500_000_000_000.0));
    assert_eq!(profile.dividend_yield, Some(0.0034));
    assert_eq!(profile.sector.as_deref(), Some("Energy"));
    assert_eq!(profile.forward_pe, None);

    // Deuxième appel : le crumb n'est pas redemandé
    client.fetch_profile(&ticker).await.unwrap();

    crumb.assert();
    summary.assert();
}

#[tokio::test]
async fn test_daily_history_and_latest_close() {
    let _year = mock("GET", "/v8/finance/chart/INFY.NS")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("interval".into(), "1d".into()),
            Matcher::UrlEncoded("range".into(), "1y".into()),
        ]))
        .with_status(200)
        .with_body(chart_body("INFY.NS"))
        .create();
    let _day = mock("GET", "/v8/finance/chart/INFY.NS")
        .match_query(Matcher::UrlEncoded("range".into(), "1d".into()))
        .with_status(200)
        .with_body(chart_body("INFY.NS"))
        .create();

    let client = client();
    let ticker = Ticker::qualify("infy", "NS");

    let history = client
        .fetch_daily_history(&ticker, Period::OneYear)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.bars[0].trading_date.to_string(), "2024-01-02");

    let close = client.fetch_latest_close(&ticker).await.unwrap();
    assert_eq!(close, Some(121.5));
}

#[tokio::test]
async fn test_quarterly_financials_from_timeseries() {
    let _series = mock("GET", "/ws/fundamentals-timeseries/v1/finance/timeseries/TCS.NS")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "TCS.NS".into()),
            Matcher::UrlEncoded(
                "type".into(),
                "quarterlyNetIncome,quarterlyTotalRevenue,quarterlyOperatingIncome".into(),
            ),
        ]))
        .with_status(200)
        .with_body(
            r#"{"timeseries":{"result":[
                {"meta":{"type":["quarterlyNetIncome"]},"quarterlyNetIncome":[
                    {"asOfDate":"2024-03-31","reportedValue":{"raw":124340000000}},
                    {"asOfDate":"2024-06-30","reportedValue":{"raw":120400000000}}]},
                {"meta":{"type":["quarterlyTotalRevenue"]},"quarterlyTotalRevenue":[
                    {"asOfDate":"2024-03-31","reportedValue":{"raw":612370000000}},
                    {"asOfDate":"2024-06-30","reportedValue":{"raw":626130000000}}]},
                {"meta":{"type":["quarterlyOperatingIncome"]},"quarterlyOperatingIncome":[
                    {"asOfDate":"2024-06-30","reportedValue":{"raw":152880000000}}]}
            ],"error":null}}"#,
        )
        .create();

    let financials = client()
        .fetch_quarterly_financials(&Ticker::qualify("TCS", "NS"))
        .await
        .unwrap();

    assert_eq!(financials.net_profit, [Some(120_400_000_000.0), Some(124_340_000_000.0), None]);
    assert_eq!(financials.sales[0], Some(626_130_000_000.0));
    assert_eq!(financials.operating_income, [Some(152_880_000_000.0), None, None]);
}

#[tokio::test]
async fn test_http_error_status() {
    let _missing = mock("GET", "/v8/finance/chart/NOPE.NS")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("Not Found")
        .create();

    let err = client()
        .fetch_daily_history(&Ticker::qualify("NOPE", "NS"), Period::OneYear)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Status { status: 404, .. }));
}
