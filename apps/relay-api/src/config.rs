use std::str::FromStr;

/// Relay API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Lifetime of a login session token, in seconds.
    pub session_ttl_secs: u64,
    /// Frames that may wait in one connection's outbound queue before the
    /// connection is dropped from its channel.
    pub outbound_queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; missing or unparseable values use the
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or(std::env::var("PORT").ok(), defaults.port),
            session_ttl_secs: parse_or(
                std::env::var("SESSION_TTL_SECS").ok(),
                defaults.session_ttl_secs,
            ),
            outbound_queue_capacity: parse_or(
                std::env::var("OUTBOUND_QUEUE_CAPACITY").ok(),
                defaults.outbound_queue_capacity,
            )
            .max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            session_ttl_secs: 24 * 3600,
            outbound_queue_capacity: 256,
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
