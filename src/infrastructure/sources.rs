//! Entry source implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ingest::parse_entries;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::RelationEntry;
use crate::infrastructure::traits::{EntrySource, FileSystem};

/// Reads a JSON relation export from disk.
pub struct JsonFileSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntrySource for JsonFileSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> ApplicationResult<Vec<RelationEntry>> {
        if !self.fs.is_file(&self.path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("relation file not found: {}", self.path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read relation file", &self.path)?;
        let entries = parse_entries(&content)?;
        debug!("loaded {} entries", entries.len());
        Ok(entries)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<RelationEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<RelationEntry>) -> Self {
        Self { entries }
    }
}

impl EntrySource for StaticSource {
    fn load(&self) -> ApplicationResult<Vec<RelationEntry>> {
        Ok(self.entries.clone())
    }

    fn describe(&self) -> String {
        format!("<{} in-memory entries>", self.entries.len())
    }
}
