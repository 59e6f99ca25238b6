#![allow(dead_code)]

use chrono::{Duration, Utc};
use recipe_sheets::google::{Credentials, GoogleSheetsApi};
use recipe_sheets::GoogleConfig;
use std::path::Path;

pub fn credentials(token_uri: &str, expires_in: Duration) -> Credentials {
    Credentials {
        token: Some("cached-token".to_string()),
        refresh_token: Some("refresh-token".to_string()),
        token_uri: token_uri.to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        scopes: vec![
            "https://www.googleapis.com/auth/spreadsheets".to_string(),
            "https://www.googleapis.com/auth/drive".to_string(),
        ],
        expiry: Some(Utc::now() + expires_in),
    }
}

/// Configuration pointing both services at a mock server, with token and
/// secrets files inside `dir`.
pub fn config_for(server_url: &str, dir: &Path) -> GoogleConfig {
    GoogleConfig {
        token_path: dir.join("token.json").to_string_lossy().into_owned(),
        credentials_path: dir.join("credentials.json").to_string_lossy().into_owned(),
        sheets_base_url: server_url.to_string(),
        drive_base_url: server_url.to_string(),
        ..GoogleConfig::default()
    }
}

/// Connect through a valid cached token.
pub fn connect(server_url: &str, dir: &Path) -> GoogleSheetsApi {
    let config = config_for(server_url, dir);
    credentials("http://127.0.0.1:1/token", Duration::hours(1))
        .save(Path::new(&config.token_path))
        .unwrap();
    GoogleSheetsApi::connect(&config).unwrap()
}
