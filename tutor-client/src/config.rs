//! Client configuration.

/// Default base URL of the tutor API.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every route is appended to, e.g. `http://localhost:3001/api`.
    pub api_base_url: String,
}

impl ClientConfig {
    /// Read `TUTOR_API_URL`, falling back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: lookup("TUTOR_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
        }
    }
}
