//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::NetworkService;
use crate::config::Settings;
use crate::infrastructure::sources::JsonFileSource;
use crate::infrastructure::traits::{EntrySource, FileSystem, RealFileSystem};

/// Container holding application settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Network service reading a JSON relation file.
    pub fn network_service(&self, relations: &Path) -> NetworkService {
        let source: Arc<dyn EntrySource> =
            Arc::new(JsonFileSource::new(Arc::clone(&self.fs), relations));
        NetworkService::new(source, &self.settings)
    }

    /// Network service over an arbitrary source.
    pub fn network_service_for(&self, source: Arc<dyn EntrySource>) -> NetworkService {
        NetworkService::new(source, &self.settings)
    }
}
