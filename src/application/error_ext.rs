//! Error conversion helpers
//!
//! Provides extension traits for turning soft engine absences into errors.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{EntityId, Level};

/// Extension trait for converting an engine `Option` into `ApplicationResult`.
pub trait OptionExt<T> {
    /// Map `None` to `ApplicationError::NotFound` for the given entity.
    ///
    /// # Example
    /// ```ignore
    /// root.subscription_by_id(&id).or_not_found(Level::Subscription, &id)?;
    /// ```
    fn or_not_found(self, level: Level, id: &EntityId) -> ApplicationResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, level: Level, id: &EntityId) -> ApplicationResult<T> {
        self.ok_or_else(|| ApplicationError::not_found(level, id))
    }
}
