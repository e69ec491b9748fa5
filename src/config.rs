use crate::types::{MetricKey, Year};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "fia_data.json";
pub const DEFAULT_YEAR: &str = "2022";
pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
pub const DEFAULT_NAMES_PER_ROW: usize = 8;

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn data_path() -> PathBuf {
    non_empty_var("FIA_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

/// Optional CSV of village names; without it lists show bare codes.
pub fn villages_path() -> Option<PathBuf> {
    non_empty_var("FIA_VILLAGES_PATH").map(PathBuf::from)
}

pub fn default_year() -> Year {
    non_empty_var("FIA_DEFAULT_YEAR").unwrap_or_else(|| DEFAULT_YEAR.to_string())
}

/// Unknown metric names fall back to the median.
pub fn default_metric() -> MetricKey {
    non_empty_var("FIA_DEFAULT_METRIC")
        .map(|value| MetricKey::parse_or_default(&value))
        .unwrap_or(MetricKey::DEFAULT)
}

pub fn export_dir() -> PathBuf {
    non_empty_var("FIA_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR))
}

pub fn preview_rows() -> usize {
    std::env::var("FIA_PREVIEW_ROWS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PREVIEW_ROWS)
}

/// Village names shown per value in the ranked list before "(+N more)".
pub fn names_per_row() -> usize {
    std::env::var("FIA_NAMES_PER_ROW")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_NAMES_PER_ROW)
}
