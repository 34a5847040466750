//! Protocol configuration

use std::fmt;
use std::time::Duration;

/// Default bound on put retries
pub const PUT_RETRIES: u32 = 3;

/// Default wait for liveness probe responses (milliseconds)
pub const CONTACT_PEERS_AWAIT_MS: u64 = 10_000;

/// Configuration for the verification and liveness cores
///
/// The defaults match the process-wide constants; tests shrink them through
/// the builder.
#[derive(Clone)]
pub struct ProtocolConfig {
    /// How many times a failed put is retried before giving up
    ///
    /// The first attempt is not a retry, so a put is issued at most
    /// `put_retries + 1` times.
    pub put_retries: u32,

    /// How long the reconciler waits for liveness probe responses
    pub contact_peers_await: Duration,
}

impl fmt::Debug for ProtocolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolConfig")
            .field("put_retries", &self.put_retries)
            .field("contact_peers_await", &self.contact_peers_await)
            .finish()
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            put_retries: PUT_RETRIES,
            contact_peers_await: Duration::from_millis(CONTACT_PEERS_AWAIT_MS),
        }
    }
}

impl ProtocolConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the put retry bound
    pub fn with_put_retries(mut self, retries: u32) -> Self {
        self.put_retries = retries;
        self
    }

    /// Set the liveness probe wait
    pub fn with_contact_peers_await(mut self, await_for: Duration) -> Self {
        self.contact_peers_await = await_for;
        self
    }

    /// Configuration for testing (short waits)
    pub fn for_testing() -> Self {
        Self {
            put_retries: PUT_RETRIES,
            contact_peers_await: Duration::from_millis(200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProtocolConfig::default();
        assert_eq!(config.put_retries, 3);
        assert_eq!(config.contact_peers_await, Duration::from_secs(10));
    }

    #[test]
    fn test_new_equals_default() {
        let config1 = ProtocolConfig::new();
        let config2 = ProtocolConfig::default();

        assert_eq!(config1.put_retries, config2.put_retries);
        assert_eq!(config1.contact_peers_await, config2.contact_peers_await);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ProtocolConfig::new()
            .with_put_retries(1)
            .with_contact_peers_await(Duration::from_millis(50));

        assert_eq!(config.put_retries, 1);
        assert_eq!(config.contact_peers_await, Duration::from_millis(50));
    }

    #[test]
    fn test_testing_config_is_fast() {
        let config = ProtocolConfig::for_testing();
        // Testing config must not stall the suite for the full default wait
        assert!(config.contact_peers_await < Duration::from_secs(1));
    }
}
