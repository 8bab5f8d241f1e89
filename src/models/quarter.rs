// ============================================================================
// Trimestres calendaires
// ============================================================================

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trimestre calendaire (année, 1..=4)
///
/// CONCEPT RUST : derive(PartialOrd, Ord)
/// - Ordre lexicographique des champs : année puis trimestre
/// - Permet d'utiliser Quarter comme clé de BTreeMap, triée chronologiquement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u32,
}

impl Quarter {
    /// Trimestre contenant la date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

/// Moyennes des plus hauts / plus bas sur un trimestre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyAverage {
    pub quarter: Quarter,
    pub high: f64,
    pub low: f64,
}

impl QuarterlyAverage {
    /// Libellé d'axe (ex: "2024-Q3")
    pub fn label(&self) -> String {
        self.quarter.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_of() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(Quarter::of(d(2024, 1, 1)), Quarter { year: 2024, quarter: 1 });
        assert_eq!(Quarter::of(d(2024, 3, 31)), Quarter { year: 2024, quarter: 1 });
        assert_eq!(Quarter::of(d(2024, 4, 1)), Quarter { year: 2024, quarter: 2 });
        assert_eq!(Quarter::of(d(2024, 12, 31)).to_string(), "2024-Q4");
    }

    #[test]
    fn test_quarter_ordering() {
        let q4_2023 = Quarter { year: 2023, quarter: 4 };
        let q1_2024 = Quarter { year: 2024, quarter: 1 };
        assert!(q4_2023 < q1_2024);
    }
}
