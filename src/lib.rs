//! seltree: immutable tri-state selection trees
//!
//! Customers own subscriptions, subscriptions own companies and environments.
//! Every operation on a [`domain::Root`] returns a new snapshot that shares
//! unchanged subtrees with its predecessor.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
