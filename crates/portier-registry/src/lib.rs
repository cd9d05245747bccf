//! Package registry
//!
//! In-memory catalogue of package records, queryable by exact name,
//! keyword, or full listing. The registry is immutable after load; a
//! refresh (see [`source`]) constructs a new `Registry` value which the
//! caller swaps in, so concurrent readers never observe a partial update.

pub mod source;

use portier_core::{Error, PackageRecord, Result};
use std::collections::HashMap;
use tracing::debug;

pub use source::RegistrySource;

/// Immutable in-memory package catalogue
#[derive(Debug)]
pub struct Registry {
    /// Records in insertion order
    records: Vec<PackageRecord>,

    /// Case-normalized name -> index into `records`
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry from an ordered list of records.
    ///
    /// Validates every record: trust scores must lie in [0.0, 1.0] and
    /// case-normalized names must be unique.
    pub fn from_records(records: Vec<PackageRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if !(0.0..=1.0).contains(&record.trust_score) {
                return Err(Error::invalid_record(
                    &record.name,
                    format!("trust score {} outside [0.0, 1.0]", record.trust_score),
                ));
            }
            if record.name.trim().is_empty() {
                return Err(Error::invalid_record(&record.name, "empty package name"));
            }
            if index.insert(record.key(), i).is_some() {
                return Err(Error::duplicate_name(record.key()));
            }
        }
        debug!("Registry loaded with {} packages", records.len());
        Ok(Self { records, index })
    }

    /// Look up a package by exact name (case-insensitive)
    pub fn lookup(&self, name: &str) -> Result<&PackageRecord> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.records[i])
            .ok_or_else(|| Error::package_not_found(name))
    }

    /// Search packages by keyword against name and description,
    /// case-insensitive. Results keep registry insertion order; no match
    /// yields an empty list, never an error.
    pub fn search(&self, keyword: &str) -> Vec<&PackageRecord> {
        let needle = keyword.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// All records in insertion order
    pub fn list_all(&self) -> &[PackageRecord] {
        &self.records
    }

    /// Number of packages in the registry
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no packages
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, description: &str, trust: f64) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: description.to_string(),
            author: "Unknown".to_string(),
            ecosystem: "pip".to_string(),
            target: name.to_string(),
            compliant: true,
            verified: true,
            trust_score: trust,
            dependencies: vec![],
        }
    }

    fn registry() -> Registry {
        Registry::from_records(vec![
            record("rabel", "Protocol bridge server", 0.95),
            record("ainternet", "Agent network client", 0.8),
            record("shady", "Unreviewed scraper", 0.9),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_exact() {
        let reg = registry();
        assert_eq!(reg.lookup("rabel").unwrap().name, "rabel");
    }

    #[test]
    fn test_lookup_is_case_normalized() {
        let reg = registry();
        assert_eq!(reg.lookup("RaBeL").unwrap().name, "rabel");
    }

    #[test]
    fn test_lookup_missing_is_not_found() {
        let reg = registry();
        let err = reg.lookup("nonexistent").unwrap_err();
        assert!(matches!(err, Error::PackageNotFound { .. }));
    }

    #[test]
    fn test_lookup_idempotent() {
        let reg = registry();
        let first = reg.lookup("rabel").unwrap().clone();
        let second = reg.lookup("rabel").unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_matches_name_and_description() {
        let reg = registry();
        let by_name = reg.search("rab");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "rabel");

        let by_description = reg.search("network");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].name, "ainternet");
    }

    #[test]
    fn test_search_preserves_insertion_order() {
        let reg = registry();
        let all: Vec<_> = reg.search("e").iter().map(|r| r.name.clone()).collect();
        assert_eq!(all, vec!["rabel", "ainternet", "shady"]);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let reg = registry();
        assert!(reg.search("zzz-no-such-thing").is_empty());
    }

    #[test]
    fn test_trust_score_out_of_range_rejected() {
        let err = Registry::from_records(vec![record("bad", "", 1.5)]).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_duplicate_normalized_names_rejected() {
        let err = Registry::from_records(vec![
            record("rabel", "", 0.9),
            record("Rabel", "", 0.8),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
    }

    #[test]
    fn test_list_all_order() {
        let reg = registry();
        let names: Vec<_> = reg.list_all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["rabel", "ainternet", "shady"]);
    }
}
