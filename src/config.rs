/// Default Powderlines API endpoint.
pub const DEFAULT_BASE_URL: &str = "http://api.powderlin.es";

/// Environment variable that overrides the API endpoint.
const ENV_BASE_URL: &str = "POWDERLINES_URL";

/// Connection settings for [`Client`](crate::Client).
///
/// The base URL is injected rather than hard-coded so tests and mirrors can
/// point the client elsewhere; the public API needs no credentials.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, typically `http://api.powderlin.es`.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Creates a configuration from the environment.
    ///
    /// Honors `POWDERLINES_URL` when set and non-empty, otherwise falls
    /// back to the public endpoint.
    pub fn from_env() -> Self {
        match std::env::var(ENV_BASE_URL) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_endpoint() {
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn explicit_url_wins() {
        let config = ClientConfig::new("http://127.0.0.1:8080");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }
}
