//! Migrates legacy single-letter weekday codes (`L M X J V S D`) stored in the
//! mediscan `medications` collection to 3-letter Spanish labels
//! (`Lun Mar Mié Jue Vie Sab Dom`).

pub mod backend;

pub use backend::{connect, run_migration};
