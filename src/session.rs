use crate::directory::VillageDirectory;
use crate::error::Result;
use crate::index::{build_indices, RankIndex};
use crate::types::RawDataset;
use std::sync::{Arc, RwLock};
use tracing::info;

/// A loaded dataset together with the indices derived from it.
///
/// Built once, then only read. Consumers receive it by reference; nothing
/// reaches it through global state.
#[derive(Debug, Clone)]
pub struct DatasetSession {
    pub(crate) raw: RawDataset,
    pub(crate) index: RankIndex,
    pub(crate) directory: VillageDirectory,
}

impl DatasetSession {
    pub fn build(raw: RawDataset) -> Result<Self> {
        Self::with_directory(raw, VillageDirectory::new())
    }

    pub fn with_directory(raw: RawDataset, directory: VillageDirectory) -> Result<Self> {
        let index = build_indices(&raw)?;
        Ok(DatasetSession {
            raw,
            index,
            directory,
        })
    }

    pub fn raw(&self) -> &RawDataset {
        &self.raw
    }

    pub fn index(&self) -> &RankIndex {
        &self.index
    }

    pub fn directory(&self) -> &VillageDirectory {
        &self.directory
    }
}

/// Reader-visible handle to the current session.
///
/// Reloading builds a complete session first and then swaps the pointer, so a
/// reader sees either the old session or the new one, never a partial build.
#[derive(Debug, Default)]
pub struct SharedSession {
    current: RwLock<Option<Arc<DatasetSession>>>,
}

impl SharedSession {
    pub fn new(session: DatasetSession) -> Self {
        SharedSession {
            current: RwLock::new(Some(Arc::new(session))),
        }
    }

    pub fn current(&self) -> Option<Arc<DatasetSession>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn replace(&self, session: DatasetSession) -> Option<Arc<DatasetSession>> {
        let next = Arc::new(session);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.replace(next)
    }

    /// Build a session from `raw` and swap it in. On error the current
    /// session stays in place.
    pub fn reload(&self, raw: RawDataset, directory: VillageDirectory) -> Result<()> {
        let session = DatasetSession::with_directory(raw, directory)?;
        let villages = session.raw.len();
        self.replace(session);
        info!(villages, "session swapped");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricKey;

    fn dataset(value: f64) -> RawDataset {
        let mut raw = RawDataset::new();
        raw.insert("A", "2022", MetricKey::Mid, value);
        raw.insert("B", "2022", MetricKey::Mid, 450.0);
        raw
    }

    #[test]
    fn empty_handle_has_no_session() {
        let shared = SharedSession::default();
        assert!(!shared.is_loaded());
        assert!(shared.current().is_none());
    }

    #[test]
    fn readers_keep_the_session_they_took() {
        let shared = SharedSession::new(DatasetSession::build(dataset(500.0)).unwrap());
        let before = shared.current().unwrap();
        shared.reload(dataset(400.0), VillageDirectory::new()).unwrap();
        let after = shared.current().unwrap();

        assert_eq!(before.index().rank("A", "2022", MetricKey::Mid), Some(1));
        assert_eq!(after.index().rank("A", "2022", MetricKey::Mid), Some(2));
    }

    #[test]
    fn failed_reload_keeps_current_session() {
        let shared = SharedSession::new(DatasetSession::build(dataset(500.0)).unwrap());
        let err = shared.reload(dataset(f64::INFINITY), VillageDirectory::new());
        assert!(err.is_err());
        let current = shared.current().unwrap();
        assert_eq!(current.raw().value("A", "2022", MetricKey::Mid), Some(500.0));
    }
}
