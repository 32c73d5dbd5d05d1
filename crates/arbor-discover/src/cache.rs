//! On-disk course cache, one JSON file per catalog source.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogCourse;
use crate::Result;

/// What a cached source looks like on disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheFile {
    pub fetched_at: DateTime<Utc>,
    pub courses: Vec<CatalogCourse>,
}

/// Directory of cached catalog fetches, keyed by source name.
#[derive(Debug, Clone)]
pub struct CourseCache {
    dir: PathBuf,
}

impl CourseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, source: &str) -> PathBuf {
        self.dir.join(format!("{source}.json"))
    }

    /// Returns the cached courses for `source`, or `None` when no cache file
    /// exists yet. A present-but-unreadable file is a hard error.
    pub fn load(&self, source: &str) -> Result<Option<CacheFile>> {
        let path = self.path_for(source);
        if !path.exists() {
            debug!(source, path = %path.display(), "no cache file");
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let file: CacheFile = serde_json::from_str(&text)?;
        debug!(source, courses = file.courses.len(), "cache hit");
        Ok(Some(file))
    }

    /// Writes `courses` for `source`, stamping the current time.
    pub fn store(&self, source: &str, courses: &[CatalogCourse]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file = CacheFile {
            fetched_at: Utc::now(),
            courses: courses.to_vec(),
        };
        let text = serde_json::to_string_pretty(&file)?;
        fs::write(self.path_for(source), text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CourseCache::new(dir.path());
        let courses = vec![CatalogCourse::new("18.01", "Calculus I", "https://x/18.01")];

        cache.store("mit-ocw", &courses).unwrap();
        let loaded = cache.load("mit-ocw").unwrap().unwrap();
        assert_eq!(loaded.courses.len(), 1);
        assert_eq!(loaded.courses[0].course_id, "18.01");
        assert!(loaded.fetched_at <= Utc::now());
    }

    #[test]
    fn missing_source_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CourseCache::new(dir.path());
        assert!(cache.load("khan-academy").unwrap().is_none());
    }

    #[test]
    fn corrupt_cache_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CourseCache::new(dir.path());
        fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        assert!(cache.load("bad").is_err());
    }
}
