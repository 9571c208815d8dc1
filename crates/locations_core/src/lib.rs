//! Shared location domain primitives.
//!
//! This crate owns the `Location` record, exact decimal coordinates, request
//! validation, and update merge rules. It intentionally excludes AWS SDK and
//! Lambda runtime concerns so every rule here is testable without a table.

pub mod contract;
pub mod coordinate;
pub mod timestamp;
