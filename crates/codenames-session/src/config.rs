//! Session timing and queue limits.

use std::time::Duration;

/// Configuration for every connection session.
///
/// `ping_interval` must stay below `idle_timeout`: pings are what make a
/// quiet but healthy client answer with a pong, and every pong renews the
/// idle deadline. [`validated`](Self::validated) enforces that.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long the inbound loop waits for any frame before treating the
    /// connection as dead.
    ///
    /// Default: 60 seconds.
    pub idle_timeout: Duration,

    /// How often the outbound loop pings the peer.
    ///
    /// Default: 54 seconds (nine tenths of the idle timeout).
    pub ping_interval: Duration,

    /// Deadline for each individual write.
    ///
    /// Default: 10 seconds.
    pub write_timeout: Duration,

    /// Bound on frames waiting in a connection's outbound queue. A room
    /// that finds the queue full drops the connection.
    ///
    /// Default: 512.
    pub outbound_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(60),
            ping_interval: Duration::from_secs(54),
            write_timeout: Duration::from_secs(10),
            outbound_capacity: 512,
        }
    }
}

impl SessionConfig {
    /// Returns a copy with out-of-range values pulled back into range.
    ///
    /// - A ping interval that is zero or not below the idle timeout
    ///   becomes nine tenths of the idle timeout.
    /// - An outbound capacity of zero becomes one.
    pub fn validated(mut self) -> Self {
        if self.ping_interval.is_zero() || self.ping_interval >= self.idle_timeout {
            let clamped = (self.idle_timeout * 9 / 10).max(Duration::from_millis(1));
            tracing::warn!(
                ping_interval = ?self.ping_interval,
                idle_timeout = ?self.idle_timeout,
                clamped = ?clamped,
                "ping interval must be below idle timeout, clamping"
            );
            self.ping_interval = clamped;
        }
        if self.outbound_capacity == 0 {
            tracing::warn!("outbound capacity must be non-zero, using 1");
            self.outbound_capacity = 1;
        }
        self
    }
}
