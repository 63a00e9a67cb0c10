//! Live verification of a Memcached endpoint
//!
//! Reachability alone is not enough: the probe stores a known value and
//! reads it back over the text protocol, and only an exact byte match
//! counts as working. All I/O failures are absorbed into [`ProbeResult`].

use crate::backend::endpoint::Endpoint;
use crate::config::schema::BackendConfig;
use async_memcached::{AsciiProtocol, Client};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Key written by the probe
pub const TEST_KEY: &str = "SGCP_Memcached_Test";

/// Value written by the probe and expected back
pub const TEST_VALUE: &[u8] = b"Test!1";

/// Expiry of the probe key, in seconds
pub const TEST_EXPIRY_SECS: i64 = 50;

/// Outcome of one probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// TCP connection was established
    pub reachable: bool,
    /// The value read back matched the value written
    pub round_trip_correct: bool,
}

impl ProbeResult {
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Backend can be wired into the dropin
    pub fn is_working(&self) -> bool {
        self.reachable && self.round_trip_correct
    }
}

/// Checks whether a candidate endpoint is a live, correctly addressed backend
#[async_trait]
pub trait BackendProbe: Send + Sync {
    /// Probe `endpoint`. Never fails; problems show up in the result.
    async fn verify(&self, endpoint: &Endpoint) -> ProbeResult;
}

/// Probe using an `async_memcached` client over TCP
#[derive(Debug, Clone)]
pub struct MemcachedProbe {
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl MemcachedProbe {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_timeouts(
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.io_timeout_ms),
        )
    }

    pub fn with_timeouts(connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            io_timeout,
        }
    }
}

#[async_trait]
impl BackendProbe for MemcachedProbe {
    async fn verify(&self, endpoint: &Endpoint) -> ProbeResult {
        let dsn = format!("tcp://{}", endpoint);
        let mut client = match timeout(self.connect_timeout, Client::new(&dsn)).await {
            Ok(Ok(client)) => client,
            Ok(Err(e)) => {
                debug!("Memcached at {} not reachable: {}", endpoint, e);
                return ProbeResult::unreachable();
            }
            Err(_) => {
                debug!(
                    "Memcached at {} did not accept within {:?}",
                    endpoint, self.connect_timeout
                );
                return ProbeResult::unreachable();
            }
        };

        let round_trip_correct = match self.round_trip(&mut client).await {
            Ok(matched) => matched,
            Err(e) => {
                debug!("Memcached round trip against {} failed: {}", endpoint, e);
                false
            }
        };

        if round_trip_correct {
            // Leave nothing behind from the probe
            match timeout(self.io_timeout, client.flush_all()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to flush Memcached at {} after probe: {}", endpoint, e),
                Err(_) => warn!("Flush of Memcached at {} timed out", endpoint),
            }
        } else {
            debug!("Memcached at {} did not return the probe value", endpoint);
        }

        ProbeResult {
            reachable: true,
            round_trip_correct,
        }
    }
}

impl MemcachedProbe {
    /// Store the test value, read it back, compare byte for byte
    async fn round_trip(&self, client: &mut Client) -> Result<bool, String> {
        timeout(
            self.io_timeout,
            client.set(TEST_KEY, TEST_VALUE, Some(TEST_EXPIRY_SECS), None),
        )
        .await
        .map_err(|_| "set timed out".to_string())?
        .map_err(|e| format!("set failed: {}", e))?;

        let value = timeout(self.io_timeout, client.get(TEST_KEY))
            .await
            .map_err(|_| "get timed out".to_string())?
            .map_err(|e| format!("get failed: {}", e))?;

        Ok(value.is_some_and(|v| v.data.as_deref() == Some(TEST_VALUE)))
    }
}
