use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main catalog configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Google API access settings
    #[serde(default)]
    pub google: GoogleConfig,
    /// Drive folder settings used by the command line tool
    #[serde(default)]
    pub drive: DriveConfig,
}

/// Configuration for the Google Sheets and Drive client
#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    /// Cached OAuth token, rewritten after every refresh or authorization
    #[serde(default = "default_token_path")]
    pub token_path: String,
    /// OAuth client secrets downloaded from the Google Cloud console
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    /// Base URL for the Sheets v4 API (override for proxies or tests)
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,
    /// Base URL for the Drive v3 API
    #[serde(default = "default_drive_base_url")]
    pub drive_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of files requested per Drive listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Size in bytes of each ranged request when downloading a file
    #[serde(default = "default_download_chunk_size")]
    pub download_chunk_size: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
            credentials_path: default_credentials_path(),
            sheets_base_url: default_sheets_base_url(),
            drive_base_url: default_drive_base_url(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            download_chunk_size: default_download_chunk_size(),
        }
    }
}

/// Drive folder settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DriveConfig {
    /// Folder listed by the command line tool when none is given
    pub folder_id: Option<String>,
}

// Default value functions
fn default_token_path() -> String {
    "token.json".to_string()
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_drive_base_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

fn default_download_chunk_size() -> u64 {
    100 * 1024 * 1024
}

impl CatalogConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the lookup order.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPE_SHEETS__ prefix
/// 2. recipe-sheets.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_SHEETS__GOOGLE__TOKEN_PATH
pub fn load_config() -> Result<CatalogConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-sheets").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_SHEETS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
