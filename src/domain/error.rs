//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Tree level a future placeholder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Customer,
    Subscription,
    Company,
    Environment,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Customer => "customer",
            Level::Subscription => "subscription",
            Level::Company => "company",
            Level::Environment => "environment",
        };
        f.write_str(name)
    }
}

/// Domain errors represent structural invariant violations.
///
/// These are raised only while constructing a `Subscription`, `Customer` or
/// `Root` from caller-supplied parts. Snapshots produced by the engine's own
/// operations never violate them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("future {level} placeholder must be present")]
    MissingFutureEntity { level: Level },

    #[error("expected exactly one future {level} placeholder, found {count}")]
    DuplicateFutureEntity { level: Level, count: usize },
}

/// Result type for domain construction.
pub type DomainResult<T> = Result<T, DomainError>;
