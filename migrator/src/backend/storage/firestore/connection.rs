//! Authenticated HTTP access to the Firestore REST API.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::credentials::ServiceAccountKey;
use crate::backend::domain::errors::ConfigurationError;

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
pub const DEFAULT_DATABASE_ID: &str = "(default)";

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, Serialize)]
struct TokenClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

enum Auth {
    ServiceAccount {
        key: ServiceAccountKey,
        signing_key: EncodingKey,
        cached: Mutex<Option<AccessToken>>,
    },
    /// The local emulator accepts a fixed bearer token
    Emulator,
}

/// Connection to one Firestore database
pub struct FirestoreConnection {
    client: Client,
    base_url: String,
    project_id: String,
    database_id: String,
    auth: Auth,
}

impl FirestoreConnection {
    /// Connect to production Firestore with a service account key
    pub fn new(key: ServiceAccountKey, database_id: &str) -> Result<Self, ConfigurationError> {
        let signing_key = key.signing_key()?;
        Ok(Self {
            client: build_client(),
            base_url: FIRESTORE_BASE_URL.to_string(),
            project_id: key.project_id.clone(),
            database_id: database_id.to_string(),
            auth: Auth::ServiceAccount {
                key,
                signing_key,
                cached: Mutex::new(None),
            },
        })
    }

    /// Connect to a Firestore emulator at `host` (`localhost:8080`)
    pub fn emulator(host: &str, project_id: &str, database_id: &str) -> Self {
        Self {
            client: build_client(),
            base_url: format!("http://{}/v1", host.trim_end_matches('/')),
            project_id: project_id.to_string(),
            database_id: database_id.to_string(),
            auth: Auth::Emulator,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `projects/{project}/databases/{database}/documents`
    pub fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    /// Absolute URL for a path relative to the API root
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bearer_token().await?;
        Ok(self.client.get(self.url(path)).bearer_auth(token))
    }

    pub async fn post(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.bearer_token().await?;
        Ok(self.client.post(self.url(path)).bearer_auth(token))
    }

    /// Current access token, exchanging a fresh one when the cached token is near expiry
    async fn bearer_token(&self) -> Result<String> {
        let (key, signing_key, cached) = match &self.auth {
            Auth::Emulator => return Ok(EMULATOR_TOKEN.to_string()),
            Auth::ServiceAccount {
                key,
                signing_key,
                cached,
            } => (key, signing_key, cached),
        };

        let mut cached = cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        debug!("Requesting access token for {}", key.client_email);
        let token = self.exchange_token(key, signing_key, now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn exchange_token(
        &self,
        key: &ServiceAccountKey,
        signing_key: &EncodingKey,
        now: DateTime<Utc>,
    ) -> Result<AccessToken> {
        let claims = TokenClaims {
            iss: &key.client_email,
            scope: DATASTORE_SCOPE,
            aud: &key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();
        let assertion = jsonwebtoken::encode(&header, &claims, signing_key)
            .context("Failed to sign token request")?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to reach token endpoint {}", key.token_uri))?;
        let body: TokenResponse = read_json(response)
            .await
            .context("Token exchange rejected")?;

        info!("Authenticated as {}", key.client_email);
        Ok(AccessToken {
            value: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in.unwrap_or(TOKEN_LIFETIME_SECS)),
        })
    }
}

fn build_client() -> Client {
    Client::builder()
        .user_agent(concat!("mediscan-migrator/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Decode a JSON body, turning non-2xx responses into errors that carry the body text
pub async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.context("Failed to read response body")?;
    if !status.is_success() {
        return Err(anyhow!("HTTP {}: {}", status, body.trim()));
    }
    serde_json::from_str(&body).with_context(|| format!("Unexpected response body: {}", body))
}
