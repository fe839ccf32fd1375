use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Endpoints and OAuth application credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the REST API (e.g., "https://api.unsplash.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Token exchange endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Authorization page the user logs in on.
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    /// Application access key (OAuth `client_id`).
    #[serde(default)]
    pub access_key: String,
    /// Application secret key (OAuth `client_secret`).
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Scopes requested during authorization, `+`-separated.
    #[serde(default = "default_access_scope")]
    pub access_scope: String,
}

/// Default request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Photos per page (default: 10).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Where the bearer token lives on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the default token file location.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_token_url() -> String {
    "https://unsplash.com/oauth/token".to_string()
}

fn default_authorize_url() -> String {
    "https://unsplash.com/oauth/authorize".to_string()
}

fn default_redirect_uri() -> String {
    "urn:ietf:wg:oauth:2.0:oob".to_string()
}

fn default_access_scope() -> String {
    "public+read_user+write_likes".to_string()
}

fn default_per_page() -> u32 {
    10
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_url: default_token_url(),
            authorize_url: default_authorize_url(),
            access_key: String::new(),
            secret_key: None,
            redirect_uri: default_redirect_uri(),
            access_scope: default_access_scope(),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}
