//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{BannerService, CatalogService, CohortService, ContentService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, JsonFileStore, KeyValueStore, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Persistent key-value state
    pub store: Arc<dyn KeyValueStore>,

    pub content: ContentService,
    pub catalog: CatalogService,
    pub cohorts: CohortService,
    pub banners: BannerService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(JsonFileStore::new(settings.state_path(), fs.clone()));
        Self::with_deps(settings, fs, store)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            content: ContentService::new(fs.clone()),
            catalog: CatalogService::new(fs.clone()),
            cohorts: CohortService::new(fs.clone()),
            banners: BannerService::new(store.clone()),
            settings,
            fs,
            store,
        }
    }
}
