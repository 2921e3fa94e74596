//! Command-line arguments and the run configuration derived from them.

use clap::Parser;
use std::path::PathBuf;

use crate::backend::domain::errors::ConfigurationError;
use crate::backend::storage::firestore::connection::DEFAULT_DATABASE_ID;
use crate::backend::storage::firestore::DEFAULT_COLLECTION;
use shared::MigrationMode;

pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

pub const USAGE: &str = "Usage: migrate-days /path/to/service-account.json [--dry-run] [--apply]";

/// Migrate legacy single-letter day codes in the medications collection to 3-letter Spanish labels
#[derive(Debug, Clone, Parser)]
#[command(name = "migrate-days", version)]
pub struct Cli {
    /// Service account JSON key; GOOGLE_APPLICATION_CREDENTIALS takes precedence when set
    pub credentials: Option<PathBuf>,

    /// Only report the changes (the default unless --apply is given)
    #[arg(long)]
    pub dry_run: bool,

    /// Write the changes
    #[arg(long)]
    pub apply: bool,

    /// Collection holding the medication documents
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Firestore database ID
    #[arg(long, default_value = DEFAULT_DATABASE_ID)]
    pub database: String,
}

/// Everything a migration run needs, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct MigratorConfig {
    pub credentials_path: PathBuf,
    pub mode: MigrationMode,
    pub collection: String,
    pub database_id: String,
    /// `host:port` of a Firestore emulator, when one is configured
    pub emulator_host: Option<String>,
}

impl MigratorConfig {
    /// Resolve against the process environment
    pub fn from_env(cli: Cli) -> Result<Self, ConfigurationError> {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve(
        cli: Cli,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let credentials_path = non_empty(CREDENTIALS_ENV)
            .map(PathBuf::from)
            .or(cli.credentials)
            .ok_or(ConfigurationError::MissingCredentials)?;

        Ok(Self {
            credentials_path,
            mode: resolve_mode(cli.dry_run, cli.apply),
            collection: cli.collection,
            database_id: cli.database,
            emulator_host: non_empty(EMULATOR_HOST_ENV),
        })
    }
}

/// Writes happen only with `--apply`, and `--dry-run` overrides it
pub fn resolve_mode(dry_run: bool, apply: bool) -> MigrationMode {
    if apply && !dry_run {
        MigrationMode::Apply
    } else {
        MigrationMode::DryRun
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("migrate-days").chain(args.iter().copied()))
            .expect("Failed to parse arguments")
    }

    fn env_with(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_mode_defaults_to_dry_run() {
        assert_eq!(resolve_mode(false, false), MigrationMode::DryRun);
        assert_eq!(resolve_mode(true, false), MigrationMode::DryRun);
        assert_eq!(resolve_mode(true, true), MigrationMode::DryRun);
        assert_eq!(resolve_mode(false, true), MigrationMode::Apply);
    }

    #[test]
    fn test_positional_credentials_and_flags() {
        let config = MigratorConfig::resolve(parse(&["--apply", "/keys/sa.json"]), env_with(&[]))
            .expect("Failed to resolve config");

        assert_eq!(config.credentials_path, PathBuf::from("/keys/sa.json"));
        assert_eq!(config.mode, MigrationMode::Apply);
        assert_eq!(config.collection, "medications");
        assert_eq!(config.database_id, "(default)");
        assert_eq!(config.emulator_host, None);
    }

    #[test]
    fn test_environment_credentials_take_precedence() {
        let config = MigratorConfig::resolve(
            parse(&["/keys/arg.json"]),
            env_with(&[(CREDENTIALS_ENV, "/keys/env.json")]),
        )
        .expect("Failed to resolve config");

        assert_eq!(config.credentials_path, PathBuf::from("/keys/env.json"));
        assert_eq!(config.mode, MigrationMode::DryRun);
    }

    #[test]
    fn test_empty_environment_value_is_ignored() {
        let config = MigratorConfig::resolve(
            parse(&["/keys/arg.json"]),
            env_with(&[(CREDENTIALS_ENV, ""), (EMULATOR_HOST_ENV, " ")]),
        )
        .expect("Failed to resolve config");

        assert_eq!(config.credentials_path, PathBuf::from("/keys/arg.json"));
        assert_eq!(config.emulator_host, None);
    }

    #[test]
    fn test_missing_credentials() {
        let err = MigratorConfig::resolve(parse(&["--apply"]), env_with(&[])).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingCredentials));
    }

    #[test]
    fn test_emulator_and_collection_overrides() {
        let config = MigratorConfig::resolve(
            parse(&["sa.json", "--collection", "meds_staging", "--database", "staging"]),
            env_with(&[(EMULATOR_HOST_ENV, "localhost:8080")]),
        )
        .expect("Failed to resolve config");

        assert_eq!(config.collection, "meds_staging");
        assert_eq!(config.database_id, "staging");
        assert_eq!(config.emulator_host.as_deref(), Some("localhost:8080"));
    }
}
