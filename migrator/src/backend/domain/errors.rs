//! Error taxonomy for a migration run and its mapping to process exit codes.
use std::path::PathBuf;

/// Problems with how the migrator was invoked. Raised before any store access.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no service account credentials: pass the JSON path as the first non-flag argument or set GOOGLE_APPLICATION_CREDENTIALS")]
    MissingCredentials,
    #[error("cannot read service account file {}: {source}", .path.display())]
    UnreadableCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("service account file {} is not valid JSON: {source}", .path.display())]
    InvalidCredentials {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("service account file {} has no `{field}`", .path.display())]
    MissingCredentialField { path: PathBuf, field: &'static str },
    #[error("service account private key is not a valid RSA PEM key: {0}")]
    InvalidPrivateKey(#[source] jsonwebtoken::errors::Error),
}

/// Top-level failure of a migration run.
#[derive(Debug, thiserror::Error)]
pub enum MigratorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Anything escaping the run itself, e.g. auth or network failure while fetching
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

impl MigratorError {
    pub const CONFIGURATION_EXIT_CODE: u8 = 1;
    pub const FATAL_EXIT_CODE: u8 = 2;

    pub fn exit_code(&self) -> u8 {
        match self {
            MigratorError::Configuration(_) => Self::CONFIGURATION_EXIT_CODE,
            MigratorError::Fatal(_) => Self::FATAL_EXIT_CODE,
        }
    }
}
