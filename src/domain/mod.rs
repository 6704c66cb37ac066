//! Domain layer: the selection tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod check;
pub mod entities;
pub mod error;
pub mod ids;
pub mod mint;
pub mod root;
pub mod seed;

pub use check::{CheckState, Tally};
pub use entities::{Company, Customer, EntityId, Environment, Subscription};
pub use error::{DomainError, DomainResult, Level};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use mint::{Labels, Minter};
pub use root::Root;
pub use seed::demo_root;
