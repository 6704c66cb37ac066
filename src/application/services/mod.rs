//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (SnapshotStore, IdGenerator)
//! but are themselves concrete structs, not traits.

mod selection;

pub use selection::SelectionService;
