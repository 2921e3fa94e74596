//! # Domain Module
//!
//! Business rules for migrating medication schedules.
//!
//! ## Module Organization
//!
//! - **day_codes**: Pure normalization of raw `days` entries
//! - **migration_service**: Fetch, diff, and report or apply the migration
//! - **commands**: Command and result types passed between layers
//! - **errors**: Configuration and fatal error taxonomy with exit codes
//! - **models**: The `Weekday` model with its legacy codes and labels
//!
//! ## Business Rules
//!
//! - Legacy single-letter codes become 3-letter Spanish labels
//! - Output is deduplicated and ordered Monday first
//! - Records with nothing recognizable keep their (trimmed) entries
//! - Nothing is written unless the run is in apply mode

pub mod commands;
pub mod day_codes;
pub mod errors;
pub mod migration_service;
pub mod models;

pub use commands::*;
pub use errors::*;
pub use migration_service::DayMigrationService;
