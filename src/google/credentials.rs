use chrono::{DateTime, Duration, Utc};
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, Result};

/// OAuth scopes requested by the client.
///
/// Changing them invalidates cached tokens: delete the token file.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens are treated as expired this long before their real expiry.
const CLOCK_SKEW_SECS: i64 = 10;

/// Authorized user credentials, as stored in the token cache file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Current access token
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Access token expiry; unknown expiry never counts as expired
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

impl Credentials {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string(self)?)?;
        debug!("Saved credentials to {}", path.display());
        Ok(())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now >= expiry - Duration::seconds(CLOCK_SKEW_SECS),
            None => false,
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.is_expired(now)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// A rejected grant is reported as [`CatalogError::Refresh`]; transport
    /// failures are reported as [`CatalogError::Http`].
    pub fn refresh(&self, http: &Client) -> Result<Credentials> {
        let refresh_token = self
            .refresh_token
            .as_deref()
            .ok_or_else(|| CatalogError::Refresh("no refresh token available".to_string()))?;

        let grant = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        let token = request_token(http, &self.token_uri, &grant).map_err(|e| match e {
            TokenEndpointError::Rejected(msg) => CatalogError::Refresh(msg),
            TokenEndpointError::Other(e) => e,
        })?;

        let mut refreshed = self.clone();
        token.apply(&mut refreshed, Utc::now());
        Ok(refreshed)
    }
}

/// OAuth client registration, read from the client secrets file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Read a secrets file holding either an `installed` or a `web` client.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: ClientSecretsFile = serde_json::from_str(&content)?;
        file.installed.or(file.web).ok_or_else(|| {
            CatalogError::Authorization(format!(
                "{} does not contain an 'installed' or 'web' client",
                path.display()
            ))
        })
    }
}

/// Successful token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

impl TokenResponse {
    pub(crate) fn apply(self, credentials: &mut Credentials, now: DateTime<Utc>) {
        credentials.token = Some(self.access_token);
        credentials.expiry = self.expires_in.map(|secs| now + Duration::seconds(secs));
        if let Some(refresh_token) = self.refresh_token {
            credentials.refresh_token = Some(refresh_token);
        }
        if let Some(scope) = self.scope {
            credentials.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }
}

pub(crate) enum TokenEndpointError {
    /// The endpoint answered with an OAuth error
    Rejected(String),
    Other(CatalogError),
}

impl From<reqwest::Error> for TokenEndpointError {
    fn from(e: reqwest::Error) -> Self {
        TokenEndpointError::Other(e.into())
    }
}

/// POST a grant to the token endpoint.
pub(crate) fn request_token(
    http: &Client,
    token_uri: &str,
    grant: &[(&str, &str)],
) -> std::result::Result<TokenResponse, TokenEndpointError> {
    debug!("POST {}", token_uri);
    let response = http.post(token_uri).form(grant).send()?;
    let status = response.status();
    let body: Value = response.json().unwrap_or(Value::Null);

    if !status.is_success() {
        let error = body["error"].as_str().unwrap_or("unknown_error");
        let message = match body["error_description"].as_str() {
            Some(description) => format!("{} ({}): {}", error, status.as_u16(), description),
            None => format!("{} ({})", error, status.as_u16()),
        };
        return Err(TokenEndpointError::Rejected(message));
    }

    serde_json::from_value(body).map_err(|e| TokenEndpointError::Other(e.into()))
}
