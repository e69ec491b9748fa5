use crate::types::LegendRow;
use crate::util::format_ten_thousand;
use serde::Serialize;
use std::fmt;

/// Categorical fill class of a village on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorToken {
    NoData,
    Bucket1,
    Bucket2,
    Bucket3,
    Bucket4,
    Bucket5,
    Bucket6,
    Bucket7,
    Bucket8,
    Bucket9,
}

/// Inclusive upper bounds of buckets 1 through 8, in thousand NTD.
pub const BREAKPOINTS: [f64; 8] = [300.0, 400.0, 500.0, 700.0, 900.0, 1100.0, 1300.0, 1500.0];

const BUCKETS: [ColorToken; 9] = [
    ColorToken::Bucket1,
    ColorToken::Bucket2,
    ColorToken::Bucket3,
    ColorToken::Bucket4,
    ColorToken::Bucket5,
    ColorToken::Bucket6,
    ColorToken::Bucket7,
    ColorToken::Bucket8,
    ColorToken::Bucket9,
];

impl ColorToken {
    pub const COUNT: usize = 10;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorToken::NoData => "no-data",
            ColorToken::Bucket1 => "bucket1",
            ColorToken::Bucket2 => "bucket2",
            ColorToken::Bucket3 => "bucket3",
            ColorToken::Bucket4 => "bucket4",
            ColorToken::Bucket5 => "bucket5",
            ColorToken::Bucket6 => "bucket6",
            ColorToken::Bucket7 => "bucket7",
            ColorToken::Bucket8 => "bucket8",
            ColorToken::Bucket9 => "bucket9",
        }
    }

    /// Translucent fill, light for low incomes and dark red for high ones.
    pub fn rgba(self) -> &'static str {
        match self {
            ColorToken::NoData => "rgba(255,255,255,0.6)",
            ColorToken::Bucket1 => "rgba(254,232,200,0.6)",
            ColorToken::Bucket2 => "rgba(253,212,158,0.6)",
            ColorToken::Bucket3 => "rgba(253,187,132,0.6)",
            ColorToken::Bucket4 => "rgba(252,141,89,0.6)",
            ColorToken::Bucket5 => "rgba(239,101,72,0.6)",
            ColorToken::Bucket6 => "rgba(215,48,31,0.6)",
            ColorToken::Bucket7 => "rgba(179,0,0,0.6)",
            ColorToken::Bucket8 => "rgba(127,0,0,0.6)",
            ColorToken::Bucket9 => "rgba(64,0,0,0.6)",
        }
    }

    /// Value range covered by this token, `(lower, upper]`.
    pub fn range(self) -> Option<(f64, Option<f64>)> {
        let idx = self.index().checked_sub(1)?;
        let lower = if idx == 0 { 0.0 } else { BREAKPOINTS[idx - 1] };
        Some((lower, BREAKPOINTS.get(idx).copied()))
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-breakpoint step function from a value to its fill class.
///
/// `0` means "no data". Each bucket includes its upper bound, so `300` is
/// still bucket 1. Negative values land in bucket 1 and NaN is "no data".
pub fn color_for_value(value: f64) -> ColorToken {
    if value == 0.0 || value.is_nan() {
        return ColorToken::NoData;
    }
    BREAKPOINTS
        .iter()
        .position(|upper| value <= *upper)
        .map(|idx| BUCKETS[idx])
        .unwrap_or(ColorToken::Bucket9)
}

/// Same as [`color_for_value`] with absence mapped to "no data".
pub fn color_for_optional(value: Option<f64>) -> ColorToken {
    value.map(color_for_value).unwrap_or(ColorToken::NoData)
}

/// Legend entries for the nine value buckets, labels in ten-thousand NTD.
pub fn legend() -> Vec<LegendRow> {
    BUCKETS
        .iter()
        .filter_map(|token| {
            let (lower, upper) = token.range()?;
            let range = match upper {
                Some(upper) => format!(
                    "{}-{} 萬",
                    format_ten_thousand(lower),
                    format_ten_thousand(upper)
                ),
                None => format!("{}+ 萬", format_ten_thousand(lower)),
            };
            Some(LegendRow {
                token: token.as_str().to_string(),
                fill: token.rgba().to_string(),
                range,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_no_data() {
        assert_eq!(color_for_value(0.0), ColorToken::NoData);
        assert_eq!(color_for_value(-0.0), ColorToken::NoData);
        assert_eq!(color_for_optional(None), ColorToken::NoData);
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        assert_eq!(color_for_value(300.0), ColorToken::Bucket1);
        assert_eq!(color_for_value(300.01), ColorToken::Bucket2);
        assert_eq!(color_for_value(400.0), ColorToken::Bucket2);
        assert_eq!(color_for_value(500.0), ColorToken::Bucket3);
        assert_eq!(color_for_value(700.0), ColorToken::Bucket4);
        assert_eq!(color_for_value(900.0), ColorToken::Bucket5);
        assert_eq!(color_for_value(1100.0), ColorToken::Bucket6);
        assert_eq!(color_for_value(1300.0), ColorToken::Bucket7);
        assert_eq!(color_for_value(1500.0), ColorToken::Bucket8);
        assert_eq!(color_for_value(1500.5), ColorToken::Bucket9);
    }

    #[test]
    fn extremes() {
        assert_eq!(color_for_value(0.001), ColorToken::Bucket1);
        assert_eq!(color_for_value(100_000.0), ColorToken::Bucket9);
        assert_eq!(color_for_value(f64::INFINITY), ColorToken::Bucket9);
        assert_eq!(color_for_value(-20.0), ColorToken::Bucket1);
        assert_eq!(color_for_value(f64::NAN), ColorToken::NoData);
    }

    #[test]
    fn step_function_is_stable() {
        for v in [1.0, 299.99, 300.0, 650.0, 1499.0, 4000.0] {
            assert_eq!(color_for_value(v), color_for_value(v));
        }
    }

    #[test]
    fn ranges_follow_breakpoints() {
        assert_eq!(ColorToken::NoData.range(), None);
        assert_eq!(ColorToken::Bucket1.range(), Some((0.0, Some(300.0))));
        assert_eq!(ColorToken::Bucket4.range(), Some((500.0, Some(700.0))));
        assert_eq!(ColorToken::Bucket9.range(), Some((1500.0, None)));
    }

    #[test]
    fn legend_lists_nine_buckets() {
        let rows = legend();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].range, "0-30 萬");
        assert_eq!(rows[0].fill, "rgba(254,232,200,0.6)");
        assert_eq!(rows[8].range, "150+ 萬");
        assert_eq!(rows[8].token, "bucket9");
    }
}
