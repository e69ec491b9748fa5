use crate::error::{FiaError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// Fixed-width administrative code of a village, treated as an opaque key.
pub type VillageCode = String;

/// Year key exactly as it appears in the dataset (e.g. `"2022"`).
pub type Year = String;

/// The five ranked statistics recorded per village and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    Avg,
    Mid,
    Sd,
    Mid1,
    Mid3,
}

impl MetricKey {
    pub const ALL: [MetricKey; 5] = [
        MetricKey::Avg,
        MetricKey::Mid,
        MetricKey::Sd,
        MetricKey::Mid1,
        MetricKey::Mid3,
    ];

    /// Metric used whenever a front end has to recover from an unknown key.
    pub const DEFAULT: MetricKey = MetricKey::Mid;

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Avg => "avg",
            MetricKey::Mid => "mid",
            MetricKey::Sd => "sd",
            MetricKey::Mid1 => "mid1",
            MetricKey::Mid3 => "mid3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKey::Avg => "Mean",
            MetricKey::Mid => "Median",
            MetricKey::Sd => "Standard deviation",
            MetricKey::Mid1 => "First quartile",
            MetricKey::Mid3 => "Third quartile",
        }
    }

    /// Lenient parse: unknown keys fall back to [`MetricKey::DEFAULT`].
    ///
    /// Only front ends that must always show *something* should use this;
    /// everything else goes through `FromStr` and handles the error.
    pub fn parse_or_default(s: &str) -> MetricKey {
        s.parse().unwrap_or(MetricKey::DEFAULT)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = FiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "avg" => Ok(MetricKey::Avg),
            "mid" => Ok(MetricKey::Mid),
            "sd" => Ok(MetricKey::Sd),
            "mid1" => Ok(MetricKey::Mid1),
            "mid3" => Ok(MetricKey::Mid3),
            other => Err(FiaError::InvalidSelection(format!(
                "unknown metric '{}' (expected one of avg, mid, sd, mid1, mid3)",
                other
            ))),
        }
    }
}

/// One village's figures for one year. Values are in thousand NTD.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearRecord {
    pub metrics: BTreeMap<MetricKey, f64>,
    /// Number of tax units. Ingestion-only, never ranked.
    pub adm: Option<f64>,
    /// Total income. Ingestion-only, never ranked.
    pub total: Option<f64>,
    /// Coefficient of variation. Ingestion-only, never ranked.
    pub cv: Option<f64>,
}

impl YearRecord {
    pub fn get(&self, metric: MetricKey) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }
}

/// Village -> year -> record, as fetched. Immutable once handed to the index builder.
///
/// Villages keep the order they were first inserted in, which is document
/// order when loaded from JSON; list views group tied villages in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub(crate) villages: IndexMap<VillageCode, BTreeMap<Year, YearRecord>>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric value, creating the village and year entries as needed.
    pub fn insert(&mut self, village: &str, year: &str, metric: MetricKey, value: f64) {
        self.record_mut(village, year).metrics.insert(metric, value);
    }

    pub(crate) fn record_mut(&mut self, village: &str, year: &str) -> &mut YearRecord {
        self.villages
            .entry(village.to_string())
            .or_default()
            .entry(year.to_string())
            .or_default()
    }

    pub fn village(&self, code: &str) -> Option<&BTreeMap<Year, YearRecord>> {
        self.villages.get(code)
    }

    pub fn value(&self, village: &str, year: &str, metric: MetricKey) -> Option<f64> {
        self.villages.get(village)?.get(year)?.get(metric)
    }

    pub fn villages(&self) -> impl Iterator<Item = (&VillageCode, &BTreeMap<Year, YearRecord>)> {
        self.villages.iter()
    }

    pub fn len(&self) -> usize {
        self.villages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.villages.is_empty()
    }
}

/// Names of a village as decoded from the boundary data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VillageInfo {
    #[serde(rename = "VILLCODE")]
    pub village_code: VillageCode,
    #[serde(rename = "COUNTYNAME")]
    pub county_name: String,
    #[serde(rename = "TOWNNAME")]
    pub town_name: String,
    #[serde(rename = "VILLNAME")]
    pub village_name: String,
}

impl VillageInfo {
    pub fn display_name(&self) -> String {
        format!("{}{}{}", self.county_name, self.town_name, self.village_name)
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankedListRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Color")]
    #[tabled(rename = "Color")]
    pub color: String,
    #[serde(rename = "NumVillages")]
    #[tabled(rename = "NumVillages")]
    pub num_villages: usize,
    #[serde(rename = "Villages")]
    #[tabled(rename = "Villages")]
    pub villages: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct VillageYearRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: String,
    #[serde(rename = "TaxUnits")]
    #[tabled(rename = "TaxUnits")]
    pub adm: String,
    #[serde(rename = "TotalIncome")]
    #[tabled(rename = "TotalIncome")]
    pub total: String,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean")]
    pub avg: String,
    #[serde(rename = "Median")]
    #[tabled(rename = "Median")]
    pub mid: String,
    #[serde(rename = "Q1")]
    #[tabled(rename = "Q1")]
    pub mid1: String,
    #[serde(rename = "Q3")]
    #[tabled(rename = "Q3")]
    pub mid3: String,
    #[serde(rename = "StdDev")]
    #[tabled(rename = "StdDev")]
    pub sd: String,
    #[serde(rename = "CV")]
    #[tabled(rename = "CV")]
    pub cv: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LegendRow {
    #[serde(rename = "Token")]
    #[tabled(rename = "Token")]
    pub token: String,
    #[serde(rename = "Fill")]
    #[tabled(rename = "Fill")]
    pub fill: String,
    #[serde(rename = "Range")]
    #[tabled(rename = "Range")]
    pub range: String,
}
