use std::time::Duration;

use rusty_gnap_jose::prelude::KeyAlgorithm;

use crate::prelude::*;

/// Client settings. Every field has a default so that a partial JSON document deserializes.
///
/// ```json
/// { "timeout_secs": 30, "key_algorithm": "ES256", "honor_continue_wait": true }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GnapConfig {
    /// Overall timeout of every HTTP exchange, in seconds
    pub timeout_secs: u64,
    /// Connection establishment timeout, in seconds
    pub connect_timeout_secs: u64,
    /// Algorithm used when a key pair has to be created lazily
    pub key_algorithm: KeyAlgorithm,
    /// Sleep for the `continue.wait` seconds advertised by the server before continuing a grant
    pub honor_continue_wait: bool,
    /// Upper bound of that sleep, in seconds
    pub max_continue_wait_secs: u64,
}

impl Default for GnapConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: Self::DEFAULT_CONNECT_TIMEOUT_SECS,
            key_algorithm: KeyAlgorithm::default(),
            honor_continue_wait: false,
            max_continue_wait_secs: Self::DEFAULT_MAX_CONTINUE_WAIT_SECS,
        }
    }
}

impl GnapConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_MAX_CONTINUE_WAIT_SECS: u64 = 60;

    /// Checks timeouts are within bounds: `timeout_secs` in 1-300, `connect_timeout_secs` in 1-60,
    /// `max_continue_wait_secs` in 0-600
    pub fn validate(&self) -> RustyGnapResult<()> {
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(RustyGnapError::InvalidConfig(
                "timeout_secs must be between 1 and 300".to_string(),
            ));
        }
        if !(1..=60).contains(&self.connect_timeout_secs) {
            return Err(RustyGnapError::InvalidConfig(
                "connect_timeout_secs must be between 1 and 60".to_string(),
            ));
        }
        if self.max_continue_wait_secs > 600 {
            return Err(RustyGnapError::InvalidConfig(
                "max_continue_wait_secs must be at most 600".to_string(),
            ));
        }
        Ok(())
    }

    /// How long to sleep before continuing a grant whose server asked to wait `wait` seconds
    pub fn continue_wait(&self, wait: u64) -> Duration {
        if self.honor_continue_wait {
            Duration::from_secs(wait.min(self.max_continue_wait_secs))
        } else {
            Duration::ZERO
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
