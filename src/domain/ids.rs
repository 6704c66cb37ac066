//! Identifier generation capability
//!
//! The engine never invents ids itself; every add operation asks an
//! `IdGenerator` for a process-unique id and display name.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::domain::entities::EntityId;

/// Source of ids guaranteed distinct from all previously generated ones.
pub trait IdGenerator: Send + Sync {
    /// Fresh entity id.
    fn next_id(&self) -> EntityId;

    /// Fresh display name, `prefix` followed by a unique counter value.
    fn next_name(&self, prefix: &str) -> String;
}

/// Counter-backed ids: `"1"`, `"2"`, ... Names draw from the same counter.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> EntityId {
        EntityId::new(self.bump().to_string())
    }

    fn next_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.bump())
    }
}

/// Random v4 UUID ids; names use a counter to stay readable.
///
/// Every minted id advances the name counter too, so names given to added
/// entities never repeat the numbers of entities seeded before them.
#[derive(Debug, Default)]
pub struct UuidIds {
    counter: AtomicU64,
}

impl UuidIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for UuidIds {
    fn next_id(&self) -> EntityId {
        self.bump();
        EntityId::new(Uuid::new_v4().to_string())
    }

    fn next_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.bump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_sequential_ids_when_generating_then_ids_and_names_share_counter() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id().as_str(), "1");
        assert_eq!(ids.next_name("Company "), "Company 2");
        assert_eq!(ids.next_id().as_str(), "3");
    }

    #[test]
    fn given_uuid_ids_when_generating_many_then_all_distinct() {
        let ids = UuidIds::new();
        let seen: HashSet<EntityId> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 100);
        assert_eq!(ids.next_name("Customer "), "Customer 101");
    }
}
