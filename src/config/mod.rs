use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Default backend origin for local development, matching the dev server.
const LOCAL_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base origin of the FlipDocs backend, no trailing slash.
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Claim key namespace for per-team role grants
    /// (`<namespace>.<team>.<admin|read|write>`).
    pub claim_namespace: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("FLIPDOCS_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("FLIPDOCS_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("FLIPDOCS_CLAIM_NAMESPACE") {
            if !v.trim().is_empty() {
                self.auth.claim_namespace = v;
            }
        }
        self
    }

    fn defaults() -> Self {
        Self {
            api: ApiConfig {
                base_url: LOCAL_API_URL.to_string(),
                request_timeout_secs: 30,
            },
            auth: AuthConfig {
                claim_namespace: "flipdocs".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
