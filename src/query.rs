//! Read-only lookups served to the map, list and detail views.
//!
//! Every call takes the selection explicitly; the session keeps no notion of
//! a "current" year, metric or village.
use crate::colors::{color_for_optional, ColorToken};
use crate::index::Rank;
use crate::session::DatasetSession;
use crate::types::{MetricKey, RankedListRow, VillageCode, VillageYearRow, Year};
use crate::util::{compare_years, format_int, format_optional, format_value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Direction of a ranked list. Rankings are stored highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Descending,
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue<'a> {
    pub value: f64,
    pub rank: Rank,
    pub villages: &'a [VillageCode],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub token: ColorToken,
    /// Rank of the village, shown on the map when present.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRecord {
    pub year: Year,
    pub metrics: BTreeMap<MetricKey, f64>,
    pub adm: Option<f64>,
    pub total: Option<f64>,
    pub cv: Option<f64>,
}

/// A village's figures by ascending year plus the two chart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VillageSeries {
    pub village: VillageCode,
    pub records: Vec<SeriesRecord>,
    /// Median per record; `None` where that year has no median.
    pub mid: Vec<Option<f64>>,
    /// Mean per record; `None` where that year has no mean.
    pub avg: Vec<Option<f64>>,
}

impl VillageSeries {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.year.as_str()).collect()
    }
}

impl DatasetSession {
    pub fn get_rank(&self, village: &str, year: &str, metric: MetricKey) -> Option<Rank> {
        self.index.rank(village, year, metric)
    }

    pub fn value(&self, village: &str, year: &str, metric: MetricKey) -> Option<f64> {
        self.raw.value(village, year, metric)
    }

    /// Distinct values for the pair with their rank and villages.
    ///
    /// Empty when the pair has no data at all.
    pub fn ordered_value_list(
        &self,
        year: &str,
        metric: MetricKey,
        orientation: Orientation,
    ) -> Vec<RankedValue<'_>> {
        let Some(ranking) = self.index.ranking(year, metric) else {
            return Vec::new();
        };
        let rows = ranking.iter().map(|(value, rank, villages)| RankedValue {
            value,
            rank,
            villages,
        });
        match orientation {
            Orientation::Descending => rows.collect(),
            Orientation::Ascending => rows.rev().collect(),
        }
    }

    /// Per-year records of one village. Unknown villages give an empty series.
    ///
    /// Years without any ranked metric are left out.
    pub fn village_series(&self, village: &str) -> VillageSeries {
        let Some(years) = self.raw.village(village) else {
            return VillageSeries {
                village: village.to_string(),
                ..VillageSeries::default()
            };
        };

        let mut entries: Vec<_> = years
            .iter()
            .filter(|(_, record)| !record.metrics.is_empty())
            .collect();
        entries.sort_by(|a, b| compare_years(a.0, b.0));

        let mut series = VillageSeries {
            village: village.to_string(),
            ..VillageSeries::default()
        };
        for (year, record) in entries {
            series.mid.push(record.get(MetricKey::Mid));
            series.avg.push(record.get(MetricKey::Avg));
            series.records.push(SeriesRecord {
                year: year.clone(),
                metrics: record.metrics.clone(),
                adm: record.adm,
                total: record.total,
                cv: record.cv,
            });
        }
        series
    }

    /// Fill class and label for one map feature under the given selection.
    pub fn feature_style(&self, village: &str, year: &str, metric: MetricKey) -> FeatureStyle {
        FeatureStyle {
            token: color_for_optional(self.value(village, year, metric)),
            label: self
                .get_rank(village, year, metric)
                .map(|rank| rank.to_string()),
        }
    }

    /// Years with ranked data, newest first, for a year picker.
    pub fn years_desc(&self) -> Vec<Year> {
        let mut years: Vec<Year> = self.index.years().cloned().collect();
        years.sort_by(|a, b| compare_years(b, a));
        years
    }

    pub fn detail_title(&self, village: &str) -> String {
        self.directory.display_name(village)
    }

    /// Display rows for the ranked list, at most `max_names` names per value.
    pub fn ranked_rows(
        &self,
        year: &str,
        metric: MetricKey,
        orientation: Orientation,
        max_names: usize,
    ) -> Vec<RankedListRow> {
        self.ordered_value_list(year, metric, orientation)
            .into_iter()
            .map(|entry| {
                let mut names: Vec<String> = entry
                    .villages
                    .iter()
                    .take(max_names)
                    .map(|code| self.directory.display_name(code))
                    .collect();
                if entry.villages.len() > max_names {
                    names.push(format!("(+{} more)", format_int(entry.villages.len() - max_names)));
                }
                RankedListRow {
                    rank: entry.rank,
                    value: format_value(entry.value),
                    color: color_for_optional(Some(entry.value)).to_string(),
                    num_villages: entry.villages.len(),
                    villages: names.join(" "),
                }
            })
            .collect()
    }

    pub fn detail_rows(&self, village: &str) -> Vec<VillageYearRow> {
        self.village_series(village)
            .records
            .into_iter()
            .map(|record| {
                let metric = |key: MetricKey| format_optional(record.metrics.get(&key).copied());
                VillageYearRow {
                    year: record.year.clone(),
                    adm: format_optional(record.adm),
                    total: format_optional(record.total),
                    avg: metric(MetricKey::Avg),
                    mid: metric(MetricKey::Mid),
                    mid1: metric(MetricKey::Mid1),
                    mid3: metric(MetricKey::Mid3),
                    sd: metric(MetricKey::Sd),
                    cv: format_optional(record.cv),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::VillageDirectory;
    use crate::loader::parse_dataset;
    use crate::types::{RawDataset, VillageInfo};

    fn tie_session() -> DatasetSession {
        let (raw, _) = parse_dataset(
            r#"{"A":{"2022":{"mid":500}}, "B":{"2022":{"mid":500}}, "C":{"2022":{"mid":300}}}"#,
        )
        .unwrap();
        DatasetSession::build(raw).unwrap()
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ordered_list_groups_ties() {
        let session = tie_session();
        let list = session.ordered_value_list("2022", MetricKey::Mid, Orientation::Descending);
        assert_eq!(list.len(), 2);
        assert_eq!((list[0].value, list[0].rank), (500.0, 1));
        assert_eq!(list[0].villages, codes(&["A", "B"]).as_slice());
        assert_eq!((list[1].value, list[1].rank), (300.0, 2));
        assert_eq!(list[1].villages, codes(&["C"]).as_slice());
    }

    #[test]
    fn tied_villages_follow_document_order() {
        let (raw, _) = parse_dataset(
            r#"{"B":{"2022":{"mid":500}}, "A":{"2022":{"mid":500}}, "C":{"2022":{"mid":300}}}"#,
        )
        .unwrap();
        let session = DatasetSession::build(raw).unwrap();
        let list = session.ordered_value_list("2022", MetricKey::Mid, Orientation::Descending);
        assert_eq!(list[0].villages, codes(&["B", "A"]).as_slice());
        assert_eq!(session.get_rank("A", "2022", MetricKey::Mid), Some(1));
        assert_eq!(session.get_rank("B", "2022", MetricKey::Mid), Some(1));
        assert_eq!(session.get_rank("C", "2022", MetricKey::Mid), Some(2));
    }

    #[test]
    fn ascending_is_an_explicit_reversal() {
        let session = tie_session();
        let list = session.ordered_value_list("2022", MetricKey::Mid, Orientation::Ascending);
        let ranks: Vec<Rank> = list.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![2, 1]);
    }

    #[test]
    fn unknown_pair_gives_empty_list() {
        let session = tie_session();
        assert!(session
            .ordered_value_list("2010", MetricKey::Mid, Orientation::Descending)
            .is_empty());
        assert!(session
            .ordered_value_list("2022", MetricKey::Sd, Orientation::Descending)
            .is_empty());
    }

    #[test]
    fn missing_year_is_absent_everywhere() {
        let mut raw = RawDataset::new();
        raw.insert("D", "2018", MetricKey::Mid, 410.0);
        raw.insert("D", "2018", MetricKey::Avg, 520.0);
        raw.insert("D", "2020", MetricKey::Mid, 430.0);
        raw.insert("E", "2019", MetricKey::Mid, 390.0);
        let session = DatasetSession::build(raw).unwrap();

        assert_eq!(session.get_rank("D", "2019", MetricKey::Mid), None);
        let series = session.village_series("D");
        assert_eq!(series.years(), vec!["2018", "2020"]);
        assert_eq!(series.mid, vec![Some(410.0), Some(430.0)]);
        assert_eq!(series.avg, vec![Some(520.0), None]);
    }

    #[test]
    fn unknown_village_has_empty_series() {
        let session = tie_session();
        let series = session.village_series("Z");
        assert!(series.is_empty());
        assert!(series.mid.is_empty() && series.avg.is_empty());
        assert_eq!(series.village, "Z");
    }

    #[test]
    fn series_is_ordered_by_year() {
        let mut raw = RawDataset::new();
        for (year, mid) in [("2022", 600.0), ("2011", 420.0), ("2015", 480.0)] {
            raw.insert("A", year, MetricKey::Mid, mid);
        }
        let session = DatasetSession::build(raw).unwrap();
        let series = session.village_series("A");
        assert_eq!(series.years(), vec!["2011", "2015", "2022"]);
        assert_eq!(series.mid, vec![Some(420.0), Some(480.0), Some(600.0)]);
    }

    #[test]
    fn feature_style_without_data_is_neutral() {
        let session = tie_session();
        let style = session.feature_style("A", "2022", MetricKey::Mid);
        assert_eq!(style.token, ColorToken::Bucket3);
        assert_eq!(style.label.as_deref(), Some("1"));

        let style = session.feature_style("C", "2022", MetricKey::Mid);
        assert_eq!(style.token, ColorToken::Bucket1);
        assert_eq!(style.label.as_deref(), Some("2"));

        let missing = session.feature_style("A", "2021", MetricKey::Mid);
        assert_eq!(missing.token, ColorToken::NoData);
        assert_eq!(missing.label, None);
    }

    #[test]
    fn ranked_rows_use_directory_names() {
        let (raw, _) = parse_dataset(
            r#"{"A":{"2022":{"mid":500}}, "B":{"2022":{"mid":500}}, "C":{"2022":{"mid":300}}}"#,
        )
        .unwrap();
        let directory: VillageDirectory = vec![VillageInfo {
            village_code: "A".into(),
            county_name: "臺南市".into(),
            town_name: "東區".into(),
            village_name: "大學里".into(),
        }]
        .into_iter()
        .collect();
        let session = DatasetSession::with_directory(raw, directory).unwrap();

        let rows = session.ranked_rows("2022", MetricKey::Mid, Orientation::Descending, 1);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].num_villages, 2);
        assert_eq!(rows[0].villages, "臺南市東區大學里 (+1 more)");
        assert_eq!(rows[0].color, "bucket3");
        assert_eq!(rows[1].villages, "C");
        assert_eq!(session.detail_title("A"), "臺南市東區大學里");
    }

    #[test]
    fn detail_rows_render_missing_cells() {
        let mut raw = RawDataset::new();
        raw.insert("A", "2021", MetricKey::Mid, 1234.0);
        let session = DatasetSession::build(raw).unwrap();
        let rows = session.detail_rows("A");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mid, "1,234");
        assert_eq!(rows[0].avg, "-");
        assert_eq!(rows[0].adm, "-");
    }

    #[test]
    fn years_are_listed_newest_first() {
        let mut raw = RawDataset::new();
        raw.insert("A", "2012", MetricKey::Mid, 1.0);
        raw.insert("A", "2022", MetricKey::Mid, 1.0);
        raw.insert("B", "2017", MetricKey::Avg, 1.0);
        let session = DatasetSession::build(raw).unwrap();
        assert_eq!(session.years_desc(), vec!["2022", "2017", "2012"]);
    }
}
