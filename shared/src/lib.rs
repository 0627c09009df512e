//! Shared types and models for the fish ledger
//!
//! Domain models, input validation and pure report aggregation used by the
//! backend and its storage engines.

pub mod models;
pub mod reporting;
pub mod validation;

pub use models::*;
pub use validation::*;
