// ============================================================================
// Agrégation des métriques
// ============================================================================
// Fonction pure : profil + dernier cours + trimestres → StockInfo
// ============================================================================

use crate::format::{format_percent, format_plain, CurrencyFormatter};
use crate::models::{
    CompanyProfile, QuarterlyFinancials, StockField, StockInfo, Ticker, NOT_AVAILABLE,
};

/// Construit la table d'informations affichée pour un ticker
///
/// - Montants : passent par le CurrencyFormatter
/// - Dividende : pourcentage, "N/A" si absent ou nul
/// - PE, beta : valeur brute
/// - Secteur, recommandation : texte tel quel
pub fn build_stock_info(
    ticker: &Ticker,
    profile: &CompanyProfile,
    latest_close: Option<f64>,
    financials: &QuarterlyFinancials,
    formatter: &CurrencyFormatter,
) -> StockInfo {
    let text = |value: &Option<String>| {
        value
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    StockInfo::from_fn(|field| match field {
        StockField::CompanyName => text(&profile.long_name),
        StockField::Ticker => ticker.qualified(),
        StockField::CurrentPrice => formatter.format(latest_close),
        StockField::MarketCap => formatter.format(profile.market_cap),
        StockField::PeRatio => format_plain(profile.forward_pe),
        StockField::DividendYield => format_percent(profile.dividend_yield),
        StockField::Eps => formatter.format(profile.trailing_eps),
        StockField::Revenue => formatter.format(profile.total_revenue),
        StockField::NetProfitLastQuarter => formatter.format(financials.latest_net_profit()),
        StockField::SalesLastQuarter => formatter.format(financials.latest_sales()),
        StockField::OperatingIncomeLastQuarter => {
            formatter.format(financials.latest_operating_income())
        }
        StockField::Beta => format_plain(profile.beta),
        StockField::FiftyTwoWeekHigh => formatter.format(profile.fifty_two_week_high),
        StockField::FiftyTwoWeekLow => formatter.format(profile.fifty_two_week_low),
        StockField::Sector => text(&profile.sector),
        StockField::Recommendation => text(&profile.recommendation_key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> CompanyProfile {
        CompanyProfile {
            long_name: Some("Infosys Limited".to_string()),
            market_cap: Some(7_650_000_000_000.0),
            forward_pe: Some(24.8),
            dividend_yield: Some(0.0234),
            trailing_eps: Some(63.39),
            total_revenue: Some(1_530_000_000_000.0),
            beta: Some(0.52),
            sector: Some("Technology".to_string()),
            recommendation_key: Some("buy".to_string()),
            fifty_two_week_high: Some(2006.45),
            fifty_two_week_low: Some(1358.35),
        }
    }

    #[test]
    fn test_full_profile() {
        let ticker = Ticker::qualify("INFY", "NS");
        let financials = QuarterlyFinancials {
            periods: Vec::new(),
            net_profit: [Some(65_000_000_000.0), None, None],
            sales: [Some(409_000_000_000.0), None, None],
            operating_income: [Some(86_000_000.0), None, None],
        };

        let info = build_stock_info(
            &ticker,
            &full_profile(),
            Some(1875.3),
            &financials,
            &CurrencyFormatter::default(),
        );

        assert_eq!(info.get(StockField::CompanyName), "Infosys Limited");
        assert_eq!(info.get(StockField::Ticker), "INFY.NS");
        assert_eq!(info.get(StockField::CurrentPrice), "₹1875.30");
        assert_eq!(info.get(StockField::MarketCap), "₹7.65 Trillion");
        assert_eq!(info.get(StockField::PeRatio), "24.8");
        assert_eq!(info.get(StockField::DividendYield), "2.34%");
        assert_eq!(info.get(StockField::Revenue), "₹1.53 Trillion");
        assert_eq!(info.get(StockField::NetProfitLastQuarter), "₹65.00 Billion");
        assert_eq!(info.get(StockField::SalesLastQuarter), "₹409.00 Billion");
        assert_eq!(info.get(StockField::OperatingIncomeLastQuarter), "₹86.00 Million");
        assert_eq!(info.get(StockField::Beta), "0.52");
        assert_eq!(info.get(StockField::Sector), "Technology");
        assert_eq!(info.get(StockField::Recommendation), "buy");
    }

    #[test]
    fn test_missing_fields_degrade_to_na() {
        let ticker = Ticker::qualify("XYZ", "NS");
        let info = build_stock_info(
            &ticker,
            &CompanyProfile::default(),
            None,
            &QuarterlyFinancials::not_available(),
            &CurrencyFormatter::default(),
        );

        for (label, value) in info.iter() {
            if label == "Ticker" {
                assert_eq!(value, "XYZ.NS");
            } else {
                assert_eq!(value, "N/A", "{}", label);
            }
        }
    }
}
