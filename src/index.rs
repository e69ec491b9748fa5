//! Ranking indices built once from a loaded dataset.
//!
//! For every (year, metric) pair the distinct values are sorted descending and
//! each value's 1-based position is its rank, so equal values share a rank and
//! no rank numbers are skipped. Villages are grouped by exact value for the
//! list view.
use crate::error::{FiaError, Result};
use crate::types::{MetricKey, RawDataset, VillageCode, Year};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

pub type Rank = usize;

/// Distinct values of one (year, metric) pair and the villages holding each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricRanking {
    /// Strictly descending.
    order: Vec<f64>,
    /// `villages[i]` hold `order[i]`, in dataset iteration order.
    villages: Vec<Vec<VillageCode>>,
    positions: HashMap<u64, usize>,
}

impl MetricRanking {
    pub fn order(&self) -> &[f64] {
        &self.order
    }

    /// Villages whose value is exactly `value`.
    pub fn bucket(&self, value: f64) -> Option<&[VillageCode]> {
        let idx = *self.positions.get(&value_key(value))?;
        Some(&self.villages[idx])
    }

    pub fn rank_of(&self, value: f64) -> Option<Rank> {
        self.positions.get(&value_key(value)).map(|idx| idx + 1)
    }

    /// `(value, rank, villages)` from the highest value down.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, Rank, &[VillageCode])> + '_ {
        self.order
            .iter()
            .zip(&self.villages)
            .enumerate()
            .map(|(idx, (value, villages))| (*value, idx + 1, villages.as_slice()))
    }

    pub fn distinct_values(&self) -> usize {
        self.order.len()
    }

    pub fn village_count(&self) -> usize {
        self.villages.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankIndex {
    rank_table: HashMap<VillageCode, HashMap<Year, BTreeMap<MetricKey, Rank>>>,
    rankings: BTreeMap<Year, BTreeMap<MetricKey, MetricRanking>>,
}

impl RankIndex {
    pub fn rank(&self, village: &str, year: &str, metric: MetricKey) -> Option<Rank> {
        self.rank_table.get(village)?.get(year)?.get(&metric).copied()
    }

    pub fn ranking(&self, year: &str, metric: MetricKey) -> Option<&MetricRanking> {
        self.rankings.get(year)?.get(&metric)
    }

    pub fn rank_order(&self, year: &str, metric: MetricKey) -> Option<&[f64]> {
        self.ranking(year, metric).map(MetricRanking::order)
    }

    pub fn value_bucket(&self, year: &str, metric: MetricKey, value: f64) -> Option<&[VillageCode]> {
        self.ranking(year, metric)?.bucket(value)
    }

    /// Years that have at least one ranked value, in map order.
    pub fn years(&self) -> impl Iterator<Item = &Year> {
        self.rankings.keys()
    }

    pub fn metrics_for(&self, year: &str) -> Vec<MetricKey> {
        self.rankings
            .get(year)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }
}

/// `-0.0` and `0.0` are the same value; everything else compares bit for bit.
fn value_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

#[derive(Default)]
struct Collector {
    positions: HashMap<u64, usize>,
    values: Vec<f64>,
    villages: Vec<Vec<VillageCode>>,
}

impl Collector {
    fn push(&mut self, value: f64, village: &VillageCode) {
        let key = value_key(value);
        let idx = match self.positions.get(&key) {
            Some(idx) => *idx,
            None => {
                let idx = self.values.len();
                self.positions.insert(key, idx);
                self.values.push(if value == 0.0 { 0.0 } else { value });
                self.villages.push(Vec::new());
                idx
            }
        };
        self.villages[idx].push(village.clone());
    }

    fn into_ranking(self) -> MetricRanking {
        let Collector { values, villages, .. } = self;
        let mut pairs: Vec<(f64, Vec<VillageCode>)> = values.into_iter().zip(villages).collect();
        pairs.sort_unstable_by(|a, b| b.0.total_cmp(&a.0));

        let mut ranking = MetricRanking {
            order: Vec::with_capacity(pairs.len()),
            villages: Vec::with_capacity(pairs.len()),
            positions: HashMap::with_capacity(pairs.len()),
        };
        for (idx, (value, villages)) in pairs.into_iter().enumerate() {
            ranking.positions.insert(value_key(value), idx);
            ranking.order.push(value);
            ranking.villages.push(villages);
        }
        ranking
    }
}

/// Build the rank table, value buckets and rank order for a dataset.
///
/// Missing metrics are simply absent from the result. Non-finite values are
/// rejected since they have no place in a descending order.
pub fn build_indices(raw: &RawDataset) -> Result<RankIndex> {
    let mut collected: BTreeMap<Year, BTreeMap<MetricKey, Collector>> = BTreeMap::new();

    for (code, years) in raw.villages() {
        for (year, record) in years {
            for (&metric, &value) in &record.metrics {
                if !value.is_finite() {
                    return Err(FiaError::malformed(
                        format!("$.{}.{}.{}", code, year, metric),
                        format!("value {} is not finite", value),
                    ));
                }
                collected
                    .entry(year.clone())
                    .or_default()
                    .entry(metric)
                    .or_default()
                    .push(value, code);
            }
        }
    }

    let mut index = RankIndex::default();
    for (year, metrics) in collected {
        let mut by_metric = BTreeMap::new();
        for (metric, collector) in metrics {
            let ranking = collector.into_ranking();
            debug!(
                year = %year,
                metric = %metric,
                distinct = ranking.distinct_values(),
                villages = ranking.village_count(),
                "ranked pair"
            );
            for (_, rank, villages) in ranking.iter() {
                for village in villages {
                    index
                        .rank_table
                        .entry(village.clone())
                        .or_default()
                        .entry(year.clone())
                        .or_default()
                        .insert(metric, rank);
                }
            }
            by_metric.insert(metric, ranking);
        }
        index.rankings.insert(year, by_metric);
    }

    info!(
        villages = index.rank_table.len(),
        years = index.rankings.len(),
        "rank index built"
    );
    Ok(index)
}
