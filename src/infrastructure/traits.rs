//! I/O boundary traits for testability
//!
//! These traits abstract the collaborators the engine is hosted by, allowing
//! services to be tested with in-memory implementations.

use std::io;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::application::ApplicationResult;
use crate::domain::Root;

/// Holder of the single "current" snapshot.
///
/// Readers get an `Arc<Root>` that never changes underneath them. Writers go
/// through `update`, which serialises the read-apply-replace step.
pub trait SnapshotStore: Send + Sync {
    /// Current snapshot.
    fn current(&self) -> Arc<Root>;

    /// Install `root` as the current snapshot unconditionally.
    fn replace(&self, root: Root) -> Arc<Root>;

    /// Apply `f` to the current snapshot and install its result.
    ///
    /// On error the current snapshot is left as it was.
    fn update(
        &self,
        f: &mut dyn FnMut(&Root) -> ApplicationResult<Root>,
    ) -> ApplicationResult<Arc<Root>>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Process-local snapshot store.
#[derive(Debug)]
pub struct InMemoryStore {
    current: RwLock<Arc<Root>>,
}

impl InMemoryStore {
    pub fn new(root: Root) -> Self {
        Self {
            current: RwLock::new(Arc::new(root)),
        }
    }
}

impl SnapshotStore for InMemoryStore {
    fn current(&self) -> Arc<Root> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn replace(&self, root: Root) -> Arc<Root> {
        let next = Arc::new(root);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }

    fn update(
        &self,
        f: &mut dyn FnMut(&Root) -> ApplicationResult<Root>,
    ) -> ApplicationResult<Arc<Root>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let current: &Root = &guard;
        let next = Arc::new(f(current)?);
        *guard = Arc::clone(&next);
        Ok(next)
    }
}

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{demo_root, Labels, SequentialIds};

    fn store() -> InMemoryStore {
        let ids = SequentialIds::new();
        InMemoryStore::new(demo_root(&ids, &Labels::default()).unwrap())
    }

    #[test]
    fn given_failing_update_when_applied_then_snapshot_unchanged() {
        let store = store();
        let before = store.current();

        let result = store.update(&mut |_| {
            Err(ApplicationError::Config {
                message: "boom".into(),
            })
        });

        assert!(result.is_err());
        assert!(Arc::ptr_eq(&before, &store.current()));
    }

    #[test]
    fn given_update_when_applied_then_old_reader_keeps_its_snapshot() {
        let store = store();
        let before = store.current();

        let after = store
            .update(&mut |root| Ok(root.check_all_customers(true)))
            .unwrap();

        assert!(before.checked_companies().is_empty());
        assert!(!after.checked_companies().is_empty());
        assert!(Arc::ptr_eq(&after, &store.current()));
    }
}
