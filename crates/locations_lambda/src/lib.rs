//! AWS-oriented adapters and handlers for the locations API.
//!
//! This crate owns runtime integration details (API Gateway events, the
//! DynamoDB adapter, logging, and configuration). Validation and merge rules
//! live in `locations_core`; handlers here only orchestrate a single
//! validate-then-store-or-retrieve step against a `LocationStore`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod runtime;
pub mod telemetry;
