//! Client configuration parameters
//!
//! Endpoint, multiplexing and retry settings for the platform manager
//! client. The defaults describe the daemon as it ships: `localhost:9090`,
//! service `pltfm_mgr_rpc`, 35 attempts one second apart.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest service name the multiplexed protocol will carry.
pub const MAX_SERVICE_NAME: usize = 32;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_SERVICE: &str = "pltfm_mgr_rpc";
pub const DEFAULT_ATTEMPTS: u32 = 35;
pub const DEFAULT_BACKOFF_MS: u64 = 1000;

/// Core client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    // --- Endpoint ---
    /// Daemon host name or address
    pub host: String,
    /// Daemon TCP port
    pub port: u16,
    /// Multiplexed service name
    pub service_name: heapless::String<MAX_SERVICE_NAME>,

    // --- Retry ---
    /// Connection attempts per call (>= 1)
    pub attempts: u32,
    /// Pause between failed attempts (milliseconds)
    pub backoff_ms: u64,

    // --- Socket ---
    /// TCP connect timeout; `None` blocks until the OS gives up
    pub connect_timeout_ms: Option<u64>,
    /// Socket read timeout; `None` blocks indefinitely
    pub read_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            // An overlong default leaves the name empty, which `validate` rejects.
            service_name: heapless::String::try_from(DEFAULT_SERVICE).unwrap_or_default(),

            attempts: DEFAULT_ATTEMPTS,
            backoff_ms: DEFAULT_BACKOFF_MS,

            connect_timeout_ms: None,
            read_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Check field ranges. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationFailed("host must not be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::ValidationFailed("port must be non-zero"));
        }
        if self.service_name.is_empty() || self.service_name.contains(':') {
            return Err(ConfigError::ValidationFailed(
                "service_name must be non-empty and contain no ':'",
            ));
        }
        if self.attempts == 0 {
            return Err(ConfigError::ValidationFailed("attempts must be >= 1"));
        }
        if self.connect_timeout_ms == Some(0) || self.read_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed("timeouts must be non-zero"));
        }
        Ok(())
    }

    /// Replace the service name, rejecting names that do not fit.
    pub fn set_service_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.service_name = heapless::String::try_from(name)
            .map_err(|()| ConfigError::ValidationFailed("service_name too long"))?;
        Ok(())
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

/// Errors from [`ClientConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
