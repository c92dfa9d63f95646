//! Push channel metrics.
//!
//! Provides atomic counters for monitoring one connection manager.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics for a connection manager.
#[derive(Debug)]
pub struct SyncMetrics {
    /// Handshakes started.
    connection_attempts: AtomicU64,

    /// Handshakes that completed.
    connections_opened: AtomicU64,

    /// Closures observed, including failed handshakes.
    connections_closed: AtomicU64,

    /// Reconnects scheduled.
    reconnects_scheduled: AtomicU64,

    /// Heartbeat frames written.
    heartbeats_sent: AtomicU64,

    /// Text frames received.
    frames_received: AtomicU64,

    /// Frames dropped by the normalizer.
    frames_discarded: AtomicU64,

    /// Events handed to subscribers.
    events_delivered: AtomicU64,

    /// Outbound messages dropped because the connection was not open.
    messages_dropped: AtomicU64,

    /// Start time for rate calculation.
    start_time: Instant,
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncMetrics {
    /// Creates a new metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_attempts: AtomicU64::new(0),
            connections_opened: AtomicU64::new(0),
            connections_closed: AtomicU64::new(0),
            reconnects_scheduled: AtomicU64::new(0),
            heartbeats_sent: AtomicU64::new(0),
            frames_received: AtomicU64::new(0),
            frames_discarded: AtomicU64::new(0),
            events_delivered: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a handshake start.
    pub fn record_attempt(&self) {
        self.connection_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a completed handshake.
    pub fn record_open(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a closure.
    pub fn record_close(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a scheduled reconnect.
    pub fn record_reconnect(&self) {
        self.reconnects_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a heartbeat frame.
    pub fn record_heartbeat(&self) {
        self.heartbeats_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a received frame.
    pub fn record_frame(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a discarded frame.
    pub fn record_discarded(&self) {
        self.frames_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an event delivered to subscribers.
    pub fn record_delivered(&self) {
        self.events_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a dropped outbound message.
    pub fn record_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns handshakes started.
    #[must_use]
    pub fn connection_attempts(&self) -> u64 {
        self.connection_attempts.load(Ordering::Relaxed)
    }

    /// Returns completed handshakes.
    #[must_use]
    pub fn connections_opened(&self) -> u64 {
        self.connections_opened.load(Ordering::Relaxed)
    }

    /// Returns closures observed.
    #[must_use]
    pub fn connections_closed(&self) -> u64 {
        self.connections_closed.load(Ordering::Relaxed)
    }

    /// Returns reconnects scheduled.
    #[must_use]
    pub fn reconnects_scheduled(&self) -> u64 {
        self.reconnects_scheduled.load(Ordering::Relaxed)
    }

    /// Returns heartbeat frames written.
    #[must_use]
    pub fn heartbeats_sent(&self) -> u64 {
        self.heartbeats_sent.load(Ordering::Relaxed)
    }

    /// Returns text frames received.
    #[must_use]
    pub fn frames_received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }

    /// Returns frames dropped by the normalizer.
    #[must_use]
    pub fn frames_discarded(&self) -> u64 {
        self.frames_discarded.load(Ordering::Relaxed)
    }

    /// Returns events delivered to subscribers.
    #[must_use]
    pub fn events_delivered(&self) -> u64 {
        self.events_delivered.load(Ordering::Relaxed)
    }

    /// Returns outbound messages dropped.
    #[must_use]
    pub fn messages_dropped(&self) -> u64 {
        self.messages_dropped.load(Ordering::Relaxed)
    }

    /// Returns uptime.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns received frames per second.
    #[must_use]
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.uptime().as_secs_f64();
        if secs > 0.0 {
            self.frames_received() as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns a snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        SyncMetricsSnapshot {
            connection_attempts: self.connection_attempts(),
            connections_opened: self.connections_opened(),
            connections_closed: self.connections_closed(),
            reconnects_scheduled: self.reconnects_scheduled(),
            heartbeats_sent: self.heartbeats_sent(),
            frames_received: self.frames_received(),
            frames_discarded: self.frames_discarded(),
            events_delivered: self.events_delivered(),
            messages_dropped: self.messages_dropped(),
            uptime_secs: self.uptime().as_secs(),
        }
    }
}

/// Point-in-time copy of [`SyncMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMetricsSnapshot {
    /// Handshakes started.
    pub connection_attempts: u64,
    /// Handshakes completed.
    pub connections_opened: u64,
    /// Closures observed.
    pub connections_closed: u64,
    /// Reconnects scheduled.
    pub reconnects_scheduled: u64,
    /// Heartbeat frames written.
    pub heartbeats_sent: u64,
    /// Text frames received.
    pub frames_received: u64,
    /// Frames dropped by the normalizer.
    pub frames_discarded: u64,
    /// Events delivered to subscribers.
    pub events_delivered: u64,
    /// Outbound messages dropped.
    pub messages_dropped: u64,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}
