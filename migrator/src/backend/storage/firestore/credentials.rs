//! Google service account key files.

use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::backend::domain::errors::ConfigurationError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service account JSON key the migrator uses
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// Keep the private key out of logs
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Read and validate a key file
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            ConfigurationError::UnreadableCredentials {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigurationError> {
        let key: ServiceAccountKey = serde_json::from_str(contents).map_err(|source| {
            ConfigurationError::InvalidCredentials {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let missing = |field: &'static str| ConfigurationError::MissingCredentialField {
            path: PathBuf::from(path),
            field,
        };
        if key.project_id.trim().is_empty() {
            return Err(missing("project_id"));
        }
        if key.client_email.trim().is_empty() {
            return Err(missing("client_email"));
        }
        if key.private_key.trim().is_empty() {
            return Err(missing("private_key"));
        }

        Ok(key)
    }

    /// RSA key used to sign token requests
    pub fn signing_key(&self) -> Result<EncodingKey, ConfigurationError> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(ConfigurationError::InvalidPrivateKey)
    }
}
