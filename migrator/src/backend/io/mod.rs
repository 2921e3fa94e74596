//! # IO Module
//!
//! The operator-facing edge: argument and environment parsing on the way in,
//! the run report on the way out.

pub mod cli;
pub mod report;

pub use cli::{Cli, MigratorConfig, USAGE};
pub use report::render;
