//! Application layer: services and use cases
//!
//! This layer orchestrates the pure engine and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod render;
pub mod script;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::OptionExt;
pub use render::TreeView;
pub use script::{Command, EntityPath, Script, Step, Switch};
