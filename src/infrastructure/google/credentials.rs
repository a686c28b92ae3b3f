use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("cannot read credentials file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials file: {0}")]
    Invalid(String),

    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),
}

/// Google application credentials, as written by the Cloud console or gcloud
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsFile {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CredentialsFile {
    pub fn from_path(path: &Path) -> Result<Self, CredentialsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CredentialsError> {
        serde_json::from_str(raw).map_err(|e| CredentialsError::Invalid(e.to_string()))
    }

    pub fn token_uri(&self) -> &str {
        match self {
            CredentialsFile::ServiceAccount(key) => &key.token_uri,
            CredentialsFile::AuthorizedUser(user) => &user.token_uri,
        }
    }
}

impl ServiceAccountKey {
    /// Build the RS256-signed JWT exchanged for an access token
    pub fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, CredentialsError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }
}

/// OAuth2 access tokens for Google APIs, fetched lazily and reused until
/// shortly before they expire
pub struct GoogleAuth {
    credentials: CredentialsFile,
    http_client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleAuth {
    pub fn new(credentials: CredentialsFile) -> Self {
        Self {
            credentials,
            http_client: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CredentialsError> {
        Ok(Self::new(CredentialsFile::from_path(path)?))
    }

    pub async fn access_token(&self) -> Result<String, CredentialsError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let response = match &self.credentials {
            CredentialsFile::ServiceAccount(key) => {
                let assertion = key.signed_assertion(now)?;
                self.exchange(
                    &key.token_uri,
                    &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
                )
                .await?
            }
            CredentialsFile::AuthorizedUser(user) => {
                self.exchange(
                    &user.token_uri,
                    &[
                        ("grant_type", "refresh_token"),
                        ("client_id", user.client_id.as_str()),
                        ("client_secret", user.client_secret.as_str()),
                        ("refresh_token", user.refresh_token.as_str()),
                    ],
                )
                .await?
            }
        };

        tracing::debug!(
            token_uri = self.credentials.token_uri(),
            expires_in = response.expires_in,
            "Google access token obtained"
        );

        let token = CachedToken {
            value: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        };
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    async fn exchange(
        &self,
        token_uri: &str,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, CredentialsError> {
        let response = self
            .http_client
            .post(token_uri)
            .header("Accept", "application/json")
            .form(params)
            .send()
            .await
            .map_err(|e| CredentialsError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CredentialsError::TokenExchange(format!(
                "{}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| CredentialsError::TokenExchange(format!("Failed to parse token: {}", e)))
    }
}
