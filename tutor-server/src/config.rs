//! Server configuration, loaded from environment variables at startup.

/// Default chat-completion endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Runtime configuration for tutor-server.
///
/// Every field has a default so the server starts without any environment
/// variables set. A missing `OPENAI_API_KEY` is not fatal: the AI routes
/// answer with an upstream error until one is configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host part of the bind address (default: `"0.0.0.0"`).
    pub host: String,

    /// API port (default: `3001`).
    pub port: u16,

    /// sqlx SQLite URL (default: `"sqlite://database.sqlite"`).
    pub database_url: String,

    /// Bearer credential for the completion API.
    pub openai_api_key: Option<String>,

    /// Model name sent with every completion request (default: `"gpt-4o-mini"`).
    pub openai_model: String,

    /// Chat-completion endpoint.
    pub openai_api_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| non_empty(key).unwrap_or_else(|| default.to_owned());

        Self {
            host: or("TUTOR_HOST", "0.0.0.0"),
            port: non_empty("PORT").and_then(|v| v.parse().ok()).unwrap_or(3001),
            database_url: or("TUTOR_DATABASE_URL", "sqlite://database.sqlite"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: or("OPENAI_MODEL", "gpt-4o-mini"),
            openai_api_url: or("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            log_level: or("TUTOR_LOG", "info"),
            log_json: non_empty("TUTOR_LOG_JSON").is_some_and(|v| parse_flag(&v).unwrap_or(false)),
            cors_allowed_origins: non_empty("TUTOR_CORS_ORIGINS"),
            enable_swagger: non_empty("TUTOR_ENABLE_SWAGGER")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
