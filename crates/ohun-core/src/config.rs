//! Configuration types for the Ohun services

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder left in unconfigured builds of the mobile app
pub const BASE_URL_PLACEHOLDER: &str = "BACKEND_BASE_URL";

/// Remote service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the content backend; relative API paths resolve against it
    #[serde(default)]
    pub backend_base_url: Option<String>,

    /// Translation endpoint (absolute URL or path on the backend)
    #[serde(default = "default_translate_endpoint")]
    pub translate_endpoint: String,

    /// Text-to-speech endpoint (absolute URL or path on the backend)
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    /// Speech-to-text endpoint
    #[serde(default)]
    pub stt_endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend_base_url: None,
            translate_endpoint: default_translate_endpoint(),
            tts_endpoint: default_tts_endpoint(),
            stt_endpoint: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            backend_base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// The configured base URL, unless it is blank or still the placeholder
    pub fn base_url(&self) -> Option<&str> {
        self.backend_base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty() && *url != BASE_URL_PLACEHOLDER)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_translate_endpoint() -> String {
    "/api/translate".to_string()
}

fn default_tts_endpoint() -> String {
    "/api/tts".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_cors_enabled(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
