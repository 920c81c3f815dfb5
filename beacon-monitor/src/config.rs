//! Monitor configuration
//!
//! Defines the server connection settings and the three polling cadences
//! the monitor runs on: instance probing, active polling and idle polling.

use std::time::Duration;

/// Delay used while fast mode is engaged
pub const FAST_POLL_INTERVAL: Duration = Duration::from_millis(800);

/// Monitor configuration
///
/// All intervals are configurable so deployments can trade freshness for
/// server load.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub server_url: String,

    /// Bearer token for the server API
    pub api_token: Option<String>,

    /// How often the set of accessible instances is rebuilt
    pub instance_probe_interval: Duration,

    /// Delay between passes while at least one job is running
    pub active_poll_interval: Duration,

    /// Delay between passes while no job is running
    pub idle_poll_interval: Duration,

    /// Delay between passes while fast mode is engaged
    pub fast_poll_interval: Duration,
}

impl MonitorConfig {
    /// Creates a new configuration with defaults
    pub fn new(server_url: String) -> Self {
        Self {
            server_url,
            api_token: None,
            instance_probe_interval: Duration::from_secs(60),
            active_poll_interval: Duration::from_secs(5),
            idle_poll_interval: Duration::from_secs(30),
            fast_poll_interval: FAST_POLL_INTERVAL,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BEACON_SERVER_URL (required)
    /// - BEACON_API_TOKEN (optional)
    /// - BEACON_INSTANCE_PROBE_INTERVAL (optional, seconds, default: 60)
    /// - BEACON_ACTIVE_POLL_INTERVAL (optional, seconds, default: 5)
    /// - BEACON_IDLE_POLL_INTERVAL (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        let server_url = std::env::var("BEACON_SERVER_URL")
            .map_err(|_| anyhow::anyhow!("BEACON_SERVER_URL environment variable not set"))?;

        let defaults = Self::new(server_url);

        Ok(Self {
            api_token: std::env::var("BEACON_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            instance_probe_interval: secs_from_env(
                "BEACON_INSTANCE_PROBE_INTERVAL",
                defaults.instance_probe_interval,
            ),
            active_poll_interval: secs_from_env(
                "BEACON_ACTIVE_POLL_INTERVAL",
                defaults.active_poll_interval,
            ),
            idle_poll_interval: secs_from_env(
                "BEACON_IDLE_POLL_INTERVAL",
                defaults.idle_poll_interval,
            ),
            ..defaults
        })
    }

    /// Sets the bearer token
    pub fn with_token(mut self, token: String) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server_url.is_empty() {
            anyhow::bail!("server_url cannot be empty");
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            anyhow::bail!("server_url must start with http:// or https://");
        }

        if self.instance_probe_interval.is_zero() {
            anyhow::bail!("instance_probe_interval must be greater than 0");
        }

        if self.active_poll_interval.is_zero() {
            anyhow::bail!("active_poll_interval must be greater than 0");
        }

        if self.idle_poll_interval < self.active_poll_interval {
            anyhow::bail!("idle_poll_interval must not be shorter than active_poll_interval");
        }

        if self.fast_poll_interval.is_zero() {
            anyhow::bail!("fast_poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000".to_string())
    }
}

fn secs_from_env(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
