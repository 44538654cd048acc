//! Configuration for aigov-daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Longest accepted expiring-soon window
pub const MAX_EXPIRY_LOOKAHEAD_DAYS: i64 = 365;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-client rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Risk exception scanning
    #[serde(default)]
    pub exceptions: ExceptionConfig,

    /// Intake scoring
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Fixed-window rate limit keyed by client address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests allowed per client per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

/// Risk exception expiry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionConfig {
    /// Approved exceptions expiring within this many days are reported as expiring soon
    #[serde(default = "default_lookahead_days")]
    pub expiry_lookahead_days: i64,

    /// Background scan interval in seconds
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

impl ExceptionConfig {
    /// Look-ahead window, clamped to the accepted range
    pub fn lookahead(&self) -> chrono::Duration {
        chrono::Duration::days(
            self.expiry_lookahead_days
                .clamp(0, MAX_EXPIRY_LOOKAHEAD_DAYS),
        )
    }
}

impl Default for ExceptionConfig {
    fn default() -> Self {
        Self {
            expiry_lookahead_days: default_lookahead_days(),
            scan_interval_secs: default_scan_interval(),
        }
    }
}

/// Intake scoring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Recompute each answer's score from the question bank instead of
    /// trusting the submitted score
    #[serde(default)]
    pub rederive_scores: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    60
}

fn default_lookahead_days() -> i64 {
    aigov_rules::exception::DEFAULT_EXPIRY_LOOKAHEAD_DAYS
}

fn default_scan_interval() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file and `AIGOV_` env vars
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // e.g. AIGOV_RATE_LIMIT__MAX_REQUESTS=50
        builder = builder.add_source(
            config::Environment::with_prefix("AIGOV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let days = self.exceptions.expiry_lookahead_days;
        if !(0..=MAX_EXPIRY_LOOKAHEAD_DAYS).contains(&days) {
            return Err(config::ConfigError::Message(format!(
                "exceptions.expiry_lookahead_days must be between 0 and {}, got {}",
                MAX_EXPIRY_LOOKAHEAD_DAYS, days
            )));
        }
        Ok(())
    }

    /// Look-ahead window for expiring-soon exceptions
    pub fn expiry_lookahead(&self) -> chrono::Duration {
        self.exceptions.lookahead()
    }
}
