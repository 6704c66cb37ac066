//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::SelectionService;
use crate::config::Settings;
use crate::domain::{demo_root, IdGenerator};
use crate::infrastructure::traits::{FileSystem, InMemoryStore, RealFileSystem, SnapshotStore};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Holder of the current snapshot
    pub store: Arc<dyn SnapshotStore>,

    /// Id source shared by seeding and add operations
    pub ids: Arc<dyn IdGenerator>,

    pub selection: SelectionService,
}

impl ServiceContainer {
    /// Create a container seeded with the demo tree.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let ids = settings.id_strategy.generator();
        let root = demo_root(ids.as_ref(), &settings.labels)?;
        debug!("seeded demo tree with {} customers", root.customers().len());
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(InMemoryStore::new(root)),
            ids,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn SnapshotStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let settings = Arc::new(settings);
        let selection =
            SelectionService::new(Arc::clone(&store), Arc::clone(&ids), settings.labels.clone());

        Self {
            settings,
            fs,
            store,
            ids,
            selection,
        }
    }
}
