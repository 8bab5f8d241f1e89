// ============================================================================
// Yahoo Finance : profil (quoteSummary) et comptes trimestriels (timeseries)
// ============================================================================
// Le schéma Yahoo n'est ni documenté ni versionné. Tout ce qui en dépend
// (noms de modules, noms de champs, libellés de lignes) vit ici.
//
// CONCEPTS RUST :
// 1. #[serde(rename_all = "camelCase")] : "fiftyTwoWeekHigh" → fifty_two_week_high
// 2. serde_json::Value : pour le endpoint timeseries dont les clés sont dynamiques
// ============================================================================

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::error::ProviderError;
use crate::api::yahoo::YahooError;
use crate::models::{CompanyProfile, QuarterlyFinancials, QUARTERS};

/// Lignes du compte de résultat : (type Yahoo, libellé de la ligne)
pub const STATEMENT_ROWS: [(&str, &str); 3] = [
    ("quarterlyNetIncome", "Net Income"),
    ("quarterlyTotalRevenue", "Total Revenue"),
    ("quarterlyOperatingIncome", "Operating Income"),
];

// ============================================================================
// quoteSummary
// ============================================================================

/// Réponse complète du endpoint quoteSummary
#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetail>,
    default_key_statistics: Option<KeyStatistics>,
    financial_data: Option<FinancialData>,
    asset_profile: Option<AssetProfile>,
}

/// Valeur numérique Yahoo : {"raw": 1.23, "fmt": "1.23"} ou {} si absente
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    market_cap: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
    beta: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    trailing_eps: Option<RawValue>,
    beta: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    total_revenue: Option<RawValue>,
    recommendation_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
}

/// Extrait le nombre d'un champ Yahoo optionnel
fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

/// Texte non vide
fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Convertit la réponse quoteSummary en profil
///
/// Chaque champ absent devient None. Quand un champ existe dans plusieurs
/// modules, summaryDetail a priorité, puis defaultKeyStatistics.
pub fn parse_quote_summary(
    response: QuoteSummaryResponse,
    symbol: &str,
) -> Result<CompanyProfile, ProviderError> {
    if let Some(err) = response.quote_summary.error {
        return Err(ProviderError::no_data(symbol, err.reason()));
    }

    let result = response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ProviderError::no_data(symbol, "aucun résultat dans la réponse quoteSummary"))?;

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();
    let asset = result.asset_profile.unwrap_or_default();

    Ok(CompanyProfile {
        long_name: text(&price.long_name).or_else(|| text(&price.short_name)),
        market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
        forward_pe: raw(&detail.forward_pe).or_else(|| raw(&stats.forward_pe)),
        dividend_yield: raw(&detail.dividend_yield),
        trailing_eps: raw(&stats.trailing_eps),
        total_revenue: raw(&financial.total_revenue),
        beta: raw(&detail.beta).or_else(|| raw(&stats.beta)),
        sector: text(&asset.sector),
        recommendation_key: text(&financial.recommendation_key),
        fifty_two_week_high: raw(&detail.fifty_two_week_high),
        fifty_two_week_low: raw(&detail.fifty_two_week_low),
    })
}

// ============================================================================
// fundamentals-timeseries
// ============================================================================

/// Réponse du endpoint timeseries
///
/// Chaque résultat porte sa série sous une clé égale à son type
/// (ex: "quarterlyNetIncome"), d'où le passage par serde_json::Value.
#[derive(Debug, Deserialize)]
pub struct TimeseriesResponse {
    timeseries: Timeseries,
}

#[derive(Debug, Deserialize)]
struct Timeseries {
    result: Option<Vec<Value>>,
    error: Option<Value>,
}

/// Une ligne du compte de résultat : date de clôture → valeur publiée
type StatementRow = BTreeMap<NaiveDate, Option<f64>>;

/// Lit la série d'un résultat timeseries : (type, ligne)
fn read_series(result: &Value) -> Option<(String, StatementRow)> {
    let kind = result.pointer("/meta/type/0")?.as_str()?.to_string();

    let mut row = StatementRow::new();
    if let Some(points) = result.get(&kind).and_then(Value::as_array) {
        for point in points {
            let Some(date) = point
                .get("asOfDate")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            else {
                continue;
            };
            let value = point.pointer("/reportedValue/raw").and_then(Value::as_f64);
            row.insert(date, value);
        }
    }

    Some((kind, row))
}

/// Convertit la réponse timeseries en QuarterlyFinancials
///
/// - Aucune donnée sur aucune ligne → triplet sentinelle
/// - Table non vide mais une ligne sans aucune donnée → MissingField(libellé)
/// - Colonnes : les 3 dates de clôture les plus récentes, toutes lignes confondues
pub fn parse_timeseries(response: TimeseriesResponse) -> Result<QuarterlyFinancials, ProviderError> {
    if let Some(err) = response.timeseries.error.filter(|e| !e.is_null()) {
        warn!(error = %err, "Timeseries endpoint returned an error body");
    }

    let rows: HashMap<String, StatementRow> = response
        .timeseries
        .result
        .unwrap_or_default()
        .iter()
        .filter_map(read_series)
        .filter(|(_, row)| !row.is_empty())
        .collect();

    if rows.is_empty() {
        debug!("Quarterly statement table is empty");
        return Ok(QuarterlyFinancials::not_available());
    }

    let mut selected = Vec::with_capacity(STATEMENT_ROWS.len());
    for (kind, label) in STATEMENT_ROWS {
        let row = rows
            .get(kind)
            .ok_or_else(|| ProviderError::missing_field(label))?;
        selected.push(row);
    }

    // Colonnes les plus récentes en premier
    let periods: Vec<NaiveDate> = rows
        .values()
        .flat_map(|row| row.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .take(QUARTERS)
        .collect();

    let column = |row: &StatementRow| -> [Option<f64>; QUARTERS] {
        let mut values = [None; QUARTERS];
        for (slot, date) in values.iter_mut().zip(&periods) {
            *slot = row.get(date).copied().flatten();
        }
        values
    };

    Ok(QuarterlyFinancials {
        net_profit: column(selected[0]),
        sales: column(selected[1]),
        operating_income: column(selected[2]),
        periods,
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================
