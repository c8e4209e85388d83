//! Remembered beer resolutions, consulted before scoring.
//!
//! Only perfect matches are ever stored, so a replayed entry always stands
//! for a score of +inf.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::types::RecordId;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid mapping file: {0}")]
    InvalidFormat(String),
}

/// Old beer id -> new beer id lookups shared across runs
pub trait ResolutionCache {
    fn get(&self, old_beer: &RecordId) -> Option<RecordId>;

    fn put(&mut self, old_beer: &RecordId, new_beer: &RecordId);
}

/// Cache that lives for a single run
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    entries: HashMap<RecordId, RecordId>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolutionCache for MemoryCache {
    fn get(&self, old_beer: &RecordId) -> Option<RecordId> {
        self.entries.get(old_beer).cloned()
    }

    fn put(&mut self, old_beer: &RecordId, new_beer: &RecordId) {
        self.entries.insert(old_beer.clone(), new_beer.clone());
    }
}

/// Cache persisted as a headerless CSV of `old_id,new_id` rows
#[derive(Debug)]
pub struct MappingFile {
    path: PathBuf,
    entries: BTreeMap<RecordId, RecordId>,
}

impl MappingFile {
    /// Load a mapping file. A file that does not exist yet is an empty mapping.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let mut entries = BTreeMap::new();

        if path.exists() {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_path(path)?;

            for (line_idx, result) in reader.records().enumerate() {
                let record = result?;
                let (Some(old_id), Some(new_id)) = (record.get(0), record.get(1)) else {
                    return Err(CacheError::InvalidFormat(format!(
                        "line {}: expected old_id,new_id",
                        line_idx + 1
                    )));
                };
                if old_id.is_empty() || new_id.is_empty() {
                    return Err(CacheError::InvalidFormat(format!(
                        "line {}: empty id",
                        line_idx + 1
                    )));
                }
                entries.insert(RecordId::new(old_id), RecordId::new(new_id));
            }
        }

        debug!(path = %path.display(), entries = entries.len(), "Loaded mapping file");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Write all entries back to the file, sorted by old id
    pub fn save(&self) -> Result<(), CacheError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        for (old_id, new_id) in &self.entries {
            writer.write_record([old_id.as_str(), new_id.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolutionCache for MappingFile {
    fn get(&self, old_beer: &RecordId) -> Option<RecordId> {
        self.entries.get(old_beer).cloned()
    }

    fn put(&mut self, old_beer: &RecordId, new_beer: &RecordId) {
        self.entries.insert(old_beer.clone(), new_beer.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_cache() {
        let mut cache = MemoryCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&RecordId::new("10")), None);

        cache.put(&RecordId::new("10"), &RecordId::new("a1"));
        assert_eq!(cache.get(&RecordId::new("10")), Some(RecordId::new("a1")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_mapping_file_is_empty() {
        let dir = tempdir().unwrap();
        let mapping = MappingFile::open(&dir.path().join("perfect_matches.csv")).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_mapping_file_save_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("perfect_matches.csv");

        let mut mapping = MappingFile::open(&path).unwrap();
        mapping.put(&RecordId::new("11"), &RecordId::new("a2"));
        mapping.put(&RecordId::new("10"), &RecordId::new("a1"));
        mapping.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "10,a1\n11,a2\n");

        let reopened = MappingFile::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&RecordId::new("11")), Some(RecordId::new("a2")));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_mapping_file_rejects_short_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "10,a1\n11\n").unwrap();

        let result = MappingFile::open(&path);
        assert!(matches!(result, Err(CacheError::InvalidFormat(msg)) if msg.starts_with("line 2")));
    }
}
