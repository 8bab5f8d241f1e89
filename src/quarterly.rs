// ============================================================================
// Moyennes trimestrielles
// ============================================================================
// Découpe un historique quotidien en trimestres calendaires et calcule la
// moyenne arithmétique des plus hauts et des plus bas de chaque trimestre
// ============================================================================

use std::collections::BTreeMap;

use crate::models::{PriceHistory, Quarter, QuarterlyAverage};

/// Accumulateur (somme des High, somme des Low, nombre de séances)
#[derive(Default)]
struct Sums {
    high: f64,
    low: f64,
    count: usize,
}

/// Calcule les moyennes High/Low par trimestre, triées chronologiquement
///
/// Un trimestre sans séance dans l'historique n'apparaît pas.
///
/// CONCEPT RUST : BTreeMap
/// - Clés triées : l'itération suit l'ordre (année, trimestre)
/// - entry().or_default() : insère un accumulateur vide au besoin
pub fn quarterly_averages(history: &PriceHistory) -> Vec<QuarterlyAverage> {
    let mut by_quarter: BTreeMap<Quarter, Sums> = BTreeMap::new();

    for bar in &history.bars {
        let sums = by_quarter.entry(Quarter::of(bar.trading_date)).or_default();
        sums.high += bar.high;
        sums.low += bar.low;
        sums.count += 1;
    }

    by_quarter
        .into_iter()
        .map(|(quarter, sums)| QuarterlyAverage {
            quarter,
            high: sums.high / sums.count as f64,
            low: sums.low / sums.count as f64,
        })
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyBar, Period};
    use chrono::{Duration, TimeZone, Utc};

    fn bar(y: i32, m: u32, d: u32, high: f64, low: f64) -> DailyBar {
        let ts = Utc.with_ymd_and_hms(y, m, d, 3, 45, 0).unwrap();
        DailyBar::new(ts, low, high, low, high, 0)
    }

    #[test]
    fn test_means_per_quarter() {
        let history = PriceHistory::with_bars(
            "TEST.NS".to_string(),
            Period::OneYear,
            vec![
                bar(2023, 11, 2, 10.0, 8.0),
                bar(2023, 12, 29, 14.0, 10.0),
                bar(2024, 1, 2, 20.0, 15.0),
                bar(2024, 2, 15, 22.0, 17.0),
                bar(2024, 3, 28, 24.0, 19.0),
            ],
        );

        let averages = quarterly_averages(&history);
        assert_eq!(averages.len(), 2);

        assert_eq!(averages[0].label(), "2023-Q4");
        assert_eq!(averages[0].high, 12.0);
        assert_eq!(averages[0].low, 9.0);

        assert_eq!(averages[1].label(), "2024-Q1");
        assert_eq!(averages[1].high, 22.0);
        assert_eq!(averages[1].low, 17.0);
    }

    #[test]
    fn test_missing_quarter_is_absent() {
        // Aucune séance au T2 2024
        let history = PriceHistory::with_bars(
            "TEST.NS".to_string(),
            Period::OneYear,
            vec![bar(2024, 3, 1, 5.0, 4.0), bar(2024, 8, 1, 7.0, 6.0)],
        );

        let labels: Vec<String> = quarterly_averages(&history)
            .iter()
            .map(QuarterlyAverage::label)
            .collect();
        assert_eq!(labels, vec!["2024-Q1", "2024-Q3"]);
    }

    #[test]
    fn test_synthetic_year() {
        // Une séance par jour ouvré sur 2024, High = jour de l'année, Low = High / 2
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap();
        let bars: Vec<DailyBar> = (0..366)
            .map(|i| start + Duration::days(i))
            .map(|ts| {
                let high = ts.format("%j").to_string().parse::<f64>().unwrap();
                DailyBar::new(ts, high, high, high / 2.0, high, 0)
            })
            .collect();

        let expected: Vec<(f64, f64)> = [(1u32, 3u32), (4, 6), (7, 9), (10, 12)]
            .iter()
            .map(|&(first, last)| {
                let values: Vec<f64> = bars
                    .iter()
                    .filter(|b| {
                        let m = b.trading_date.format("%m").to_string().parse::<u32>().unwrap();
                        m >= first && m <= last
                    })
                    .map(|b| b.high)
                    .collect();
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (mean, mean / 2.0)
            })
            .collect();

        let history = PriceHistory::with_bars("TEST.NS".to_string(), Period::OneYear, bars);
        let averages = quarterly_averages(&history);

        assert_eq!(averages.len(), 4);
        for (avg, (high, low)) in averages.iter().zip(expected) {
            assert!((avg.high - high).abs() < 1e-9);
            assert!((avg.low - low).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_history() {
        let history = PriceHistory::new("TEST.NS".to_string(), Period::OneYear);
        assert!(quarterly_averages(&history).is_empty());
    }
}
