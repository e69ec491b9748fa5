use crate::types::{VillageCode, VillageInfo};
use std::collections::HashMap;

/// Village names keyed by code, supplied by whoever decodes the boundary data.
#[derive(Debug, Clone, Default)]
pub struct VillageDirectory {
    by_code: HashMap<VillageCode, VillageInfo>,
}

impl VillageDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: VillageInfo) {
        self.by_code.insert(info.village_code.clone(), info);
    }

    pub fn get(&self, code: &str) -> Option<&VillageInfo> {
        self.by_code.get(code)
    }

    /// Full name when known, otherwise the code itself.
    pub fn display_name(&self, code: &str) -> String {
        self.get(code)
            .map(VillageInfo::display_name)
            .unwrap_or_else(|| code.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl FromIterator<VillageInfo> for VillageDirectory {
    fn from_iter<I: IntoIterator<Item = VillageInfo>>(iter: I) -> Self {
        let mut directory = VillageDirectory::new();
        for info in iter {
            directory.insert(info);
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(code: &str, village: &str) -> VillageInfo {
        VillageInfo {
            village_code: code.into(),
            county_name: "臺北市".into(),
            town_name: "大安區".into(),
            village_name: village.into(),
        }
    }

    #[test]
    fn known_codes_resolve_to_full_names() {
        let directory: VillageDirectory = vec![info("63000020001", "建安里")].into_iter().collect();
        assert_eq!(directory.display_name("63000020001"), "臺北市大安區建安里");
    }

    #[test]
    fn unknown_codes_fall_back_to_the_code() {
        let directory = VillageDirectory::new();
        assert_eq!(directory.display_name("63000020001"), "63000020001");
    }

    #[test]
    fn later_rows_replace_earlier_ones() {
        let mut directory = VillageDirectory::new();
        directory.insert(info("X", "舊里"));
        directory.insert(info("X", "新里"));
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get("X").unwrap().village_name, "新里");
    }
}
