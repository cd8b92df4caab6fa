//! Core domain types and logic.

pub mod instrument;
pub mod instrument_table;
pub mod risk_policy;
pub mod sizing;
pub mod conversion;
pub mod config_validation;
pub mod error;
