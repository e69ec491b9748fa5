//! Ranking and lookup core for a village-level income choropleth.
//!
//! A [`RawDataset`] is loaded once, turned into a [`DatasetSession`] holding
//! the rank index, and then queried by the map, list and detail views with an
//! explicit year/metric selection.
pub mod colors;
pub mod config;
pub mod directory;
pub mod error;
pub mod index;
pub mod loader;
pub mod output;
pub mod query;
pub mod selection;
pub mod session;
pub mod style;
pub mod types;
pub mod util;

pub use colors::{color_for_value, ColorToken};
pub use directory::VillageDirectory;
pub use error::{FiaError, Result};
pub use index::{build_indices, MetricRanking, Rank, RankIndex};
pub use query::{FeatureStyle, Orientation, RankedValue, VillageSeries};
pub use selection::Selection;
pub use session::{DatasetSession, SharedSession};
pub use style::{Style, StyleCache};
pub use types::{MetricKey, RawDataset, VillageCode, VillageInfo, Year, YearRecord};
