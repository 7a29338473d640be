use std::time::Duration;

/// Public Hetzner DNS API endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://dns.hetzner.com/api/v1";

#[derive(Clone)]
pub struct ClientConfig {
    pub api_token: String,
    pub base_url: Option<String>, // e.g. "http://127.0.0.1:9000/api/v1" in tests
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// API root without trailing slash, falling back to [`DEFAULT_BASE_URL`].
    pub fn base_url(&self) -> &str {
        match self.base_url.as_deref().map(|u| u.trim_end_matches('/')) {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_BASE_URL,
        }
    }

    /// User agent sent by the bundled reqwest transport.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("hetzner-dns/{}", env!("CARGO_PKG_VERSION")))
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
