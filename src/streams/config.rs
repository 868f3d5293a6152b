use std::time::Duration;

/// Tunables for [`SeekableHttpStream`](super::SeekableHttpStream).
#[derive(Debug, Clone)]
pub struct HttpStreamConfig {
    /// Timeout for establishing each connection.
    pub connect_timeout: Duration,
    /// Total timeout for a single range request, body included. A stream keeps
    /// one response open for as long as reads continue sequentially, so this is
    /// unset by default.
    pub timeout: Option<Duration>,
    /// Forward seeks shorter than this are served by discarding bytes from the
    /// open response instead of issuing a new range request.
    pub small_jump_threshold: u64,
    pub user_agent: Option<String>,
}

impl HttpStreamConfig {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_SMALL_JUMP_THRESHOLD: u64 = 1000;

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_small_jump_threshold(mut self, threshold: u64) -> Self {
        self.small_jump_threshold = threshold;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Default for HttpStreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            small_jump_threshold: Self::DEFAULT_SMALL_JUMP_THRESHOLD,
            user_agent: None,
        }
    }
}
