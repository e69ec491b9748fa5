use crate::error::{FiaError, Result};
use crate::types::{MetricKey, VillageCode, Year};
use std::fmt;
use std::str::FromStr;

/// What the viewer is looking at: a year, a metric and optionally one village.
///
/// The textual form is `year/metric/village`, with the village part possibly
/// empty, which is also what the map keeps in its address bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub year: Year,
    pub metric: MetricKey,
    pub village: Option<VillageCode>,
}

impl Selection {
    pub fn new(year: impl Into<Year>, metric: MetricKey) -> Self {
        Selection {
            year: year.into(),
            metric,
            village: None,
        }
    }

    pub fn with_village(mut self, village: impl Into<VillageCode>) -> Self {
        self.village = Some(village.into());
        self
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.year,
            self.metric,
            self.village.as_deref().unwrap_or("")
        )
    }
}

impl FromStr for Selection {
    type Err = FiaError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_start_matches('#');
        let mut parts = s.splitn(3, '/');
        let year = parts.next().map(str::trim).unwrap_or("");
        let metric = parts.next().map(str::trim).ok_or_else(|| {
            FiaError::InvalidSelection(format!("expected year/metric[/village], got '{}'", s))
        })?;
        if year.is_empty() {
            return Err(FiaError::InvalidSelection(format!("missing year in '{}'", s)));
        }
        let village = parts
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(Selection {
            year: year.to_string(),
            metric: metric.parse()?,
            village,
        })
    }
}
