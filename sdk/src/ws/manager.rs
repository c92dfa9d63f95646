//! Connection manager for the push channel.
//!
//! [`ConnectionManager`] owns one logical connection for as long as it is
//! mounted. A single driver task runs the lifecycle: the authenticated
//! handshake, heartbeats while open, capped exponential backoff after any
//! unintended closure, and teardown on unmount or logout. Decoded events are
//! handed to subscribers in delivery order.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickbite_sdk::auth::AuthState;
//! use quickbite_sdk::ws::{ConnectionManager, WsConfig, WsTransport};
//!
//! let auth = AuthState::authenticated("token");
//! let manager = ConnectionManager::open(WsConfig::default(), auth, WsTransport)?;
//! let _subscription = manager.subscribe(|frame| println!("{}", frame.kind));
//! // ...
//! manager.shutdown().await;
//! ```

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, error, info, warn};

use super::config::WsConfig;
use super::error::WsError;
use super::messages::EventFrame;
use super::metrics::SyncMetrics;
use super::normalizer::{normalize, Normalized};
use super::session::{ConnectionState, Session};
use super::subscription::{SubscriptionHandle, Subscribers};
use super::transport::{Link, Transport, TransportEvent};
use crate::auth::AuthState;

/// Requests from the handle to the driver.
#[derive(Debug)]
enum Command {
    Send(EventFrame),
    Teardown,
}

/// Whether the driver keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Handle to a mounted push connection.
///
/// Dropping the handle tears the connection down.
pub struct ConnectionManager {
    state: watch::Receiver<ConnectionState>,
    commands: mpsc::UnboundedSender<Command>,
    disposed: Arc<AtomicBool>,
    subscribers: Subscribers,
    metrics: Arc<SyncMetrics>,
    driver: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Mounts the push connection and starts connecting.
    ///
    /// Nothing is attempted while `auth` holds no credential; the returned
    /// manager then stays `Closed`. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn open<T: Transport>(
        config: WsConfig,
        auth: AuthState,
        transport: T,
    ) -> Result<Self, WsError> {
        config.validate()?;

        let initial = if auth.is_authenticated() {
            ConnectionState::Connecting
        } else {
            ConnectionState::Closed
        };
        let (state_tx, state_rx) = watch::channel(initial);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let disposed = Arc::new(AtomicBool::new(false));
        let subscribers = Subscribers::default();
        let metrics = Arc::new(SyncMetrics::new());

        let driver = Driver {
            auth: auth.watch(),
            session: Session::new(config.url.clone(), auth),
            config,
            transport: Arc::new(transport),
            commands: commands_rx,
            state: state_tx,
            disposed: Arc::clone(&disposed),
            subscribers: subscribers.clone(),
            metrics: Arc::clone(&metrics),
            link: None,
            heartbeat: None,
            reconnect: None,
        };
        let handle = tokio::spawn(driver.run());

        Ok(Self {
            state: state_rx,
            commands: commands_tx,
            disposed,
            subscribers,
            metrics,
            driver: Some(handle),
        })
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Returns a receiver that observes state changes.
    #[must_use]
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Returns true if the connection is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Returns true once the manager has been torn down.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Registers an event handler.
    ///
    /// Handlers run on the driver task, one frame at a time, and should
    /// return quickly.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(&EventFrame) + Send + Sync + 'static,
    {
        self.subscribers.add(Arc::new(handler))
    }

    /// Writes a frame if the connection is open, otherwise drops it.
    pub fn send(&self, frame: EventFrame) {
        if self.is_disposed() || !self.is_open() {
            debug!(kind = %frame.kind, state = %self.state(), "dropping message, connection not open");
            self.metrics.record_dropped();
            return;
        }
        if self.commands.send(Command::Send(frame)).is_err() {
            self.metrics.record_dropped();
        }
    }

    /// Tears the connection down. Idempotent.
    ///
    /// Timers become inert immediately; the driver closes the socket and
    /// cancels any pending retry when it observes the request.
    pub fn close(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.commands.send(Command::Teardown);
    }

    /// Tears the connection down and waits for the driver to finish.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.await {
                warn!(error = %e, "connection driver failed");
            }
        }
    }

    /// Returns the connection metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<SyncMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

/// Lifecycle task behind a [`ConnectionManager`].
struct Driver<T> {
    config: WsConfig,
    session: Session,
    auth: watch::Receiver<Option<String>>,
    transport: Arc<T>,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ConnectionState>,
    disposed: Arc<AtomicBool>,
    subscribers: Subscribers,
    metrics: Arc<SyncMetrics>,
    link: Option<Link>,
    heartbeat: Option<Interval>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

impl<T: Transport> Driver<T> {
    async fn run(mut self) {
        let mut flow = self.connect().await;

        while flow == Flow::Continue {
            flow = tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(Command::Send(frame)) => {
                        self.write(&frame);
                        Flow::Continue
                    }
                    Some(Command::Teardown) | None => {
                        self.teardown("unmounted");
                        Flow::Stop
                    }
                },
                changed = self.auth.changed() => {
                    if changed.is_err() || self.auth.borrow().is_none() {
                        self.teardown("logged out");
                        Flow::Stop
                    } else {
                        debug!("credential changed, used on next handshake");
                        Flow::Continue
                    }
                }
                event = next_event(&mut self.link) => self.on_transport_event(event),
                () = next_tick(&mut self.heartbeat) => self.on_heartbeat(),
                () = next_retry(&mut self.reconnect) => {
                    self.reconnect = None;
                    self.connect().await
                }
            };
        }

        self.heartbeat = None;
        self.reconnect = None;
        if let Some(link) = self.link.take() {
            link.close();
        }
        self.set_state(ConnectionState::Closed);
        debug!(endpoint = %self.session.endpoint(), "connection driver stopped");
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "connection state changed");
        }
    }

    /// Runs one handshake. Teardown requested meanwhile is honoured once it
    /// completes: a link that opens late is closed straight away.
    async fn connect(&mut self) -> Flow {
        if self.is_disposed() {
            return Flow::Stop;
        }
        let Some(token) = self.session.credential() else {
            debug!("no credential, not connecting");
            return Flow::Stop;
        };

        let url = self.config.connection_url(&token);
        self.set_state(ConnectionState::Connecting);
        self.metrics.record_attempt();
        debug!(
            endpoint = %self.session.endpoint(),
            attempt = self.session.attempt(),
            "connecting"
        );

        let transport = Arc::clone(&self.transport);
        let handshake = transport.connect(&url);
        tokio::pin!(handshake);

        let mut torn_down = false;
        let result = loop {
            tokio::select! {
                biased;

                result = &mut handshake => break result,
                command = self.commands.recv(), if !torn_down => match command {
                    Some(Command::Send(frame)) => {
                        debug!(kind = %frame.kind, "dropping message sent while connecting");
                        self.metrics.record_dropped();
                    }
                    Some(Command::Teardown) | None => {
                        self.begin_teardown("unmounted during handshake");
                        torn_down = true;
                    }
                },
                changed = self.auth.changed(), if !torn_down => {
                    if changed.is_err() || self.auth.borrow().is_none() {
                        self.begin_teardown("logged out during handshake");
                        torn_down = true;
                    }
                }
            }
        };

        match result {
            Ok(link) if torn_down || self.is_disposed() => {
                debug!("handshake completed after teardown, closing");
                link.close();
                Flow::Stop
            }
            Ok(link) => {
                self.on_open(link);
                Flow::Continue
            }
            Err(e) if torn_down || self.is_disposed() => {
                debug!(error = %e, "handshake failed after teardown");
                Flow::Stop
            }
            Err(e) => {
                warn!(endpoint = %self.session.endpoint(), error = %e, "handshake failed");
                self.on_closed(None)
            }
        }
    }

    fn on_open(&mut self, link: Link) {
        self.reconnect = None;
        self.session.mark_open();

        let period = self.config.heartbeat_interval;
        let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.heartbeat = Some(heartbeat);
        self.link = Some(link);

        self.metrics.record_open();
        self.set_state(ConnectionState::Open);
        info!(endpoint = %self.session.endpoint(), "push channel open");
    }

    fn on_transport_event(&mut self, event: TransportEvent) -> Flow {
        if self.is_disposed() {
            self.teardown("disposed");
            return Flow::Stop;
        }

        match event {
            TransportEvent::Message(text) => {
                self.on_message(&text);
                Flow::Continue
            }
            // Closure always follows; reconnect is driven from there.
            TransportEvent::Error(message) => {
                warn!(endpoint = %self.session.endpoint(), error = %message, "transport error");
                Flow::Continue
            }
            TransportEvent::Closed { code } => {
                self.link = None;
                self.on_closed(code)
            }
        }
    }

    fn on_message(&self, text: &str) {
        self.metrics.record_frame();
        match normalize(text) {
            Normalized::Event(frame) => {
                self.subscribers.dispatch(&frame);
                self.metrics.record_delivered();
            }
            Normalized::Discarded(reason) => {
                self.metrics.record_discarded();
                debug!(?reason, "frame discarded");
            }
        }
    }

    fn on_heartbeat(&mut self) -> Flow {
        if self.is_disposed() {
            self.teardown("disposed");
            return Flow::Stop;
        }
        let Some(link) = &self.link else {
            return Flow::Continue;
        };

        match EventFrame::ping().to_text() {
            Ok(text) => {
                if link.send_text(text) {
                    self.metrics.record_heartbeat();
                } else {
                    debug!("heartbeat skipped, socket gone");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode heartbeat"),
        }
        Flow::Continue
    }

    /// Decides what follows a closure or failed handshake.
    fn on_closed(&mut self, code: Option<u16>) -> Flow {
        self.heartbeat = None;
        self.link = None;
        self.metrics.record_close();
        self.set_state(ConnectionState::Closed);

        if self.is_disposed() {
            return Flow::Stop;
        }
        if code == Some(self.config.normal_close_code) {
            info!(endpoint = %self.session.endpoint(), "push channel closed normally");
            return Flow::Stop;
        }
        if self.session.credential().is_none() {
            debug!("session no longer authenticated, not reconnecting");
            return Flow::Stop;
        }
        if let Some(max) = self.config.max_reconnect_attempts {
            if self.session.attempt() >= max {
                error!(
                    endpoint = %self.session.endpoint(),
                    attempts = max,
                    "giving up on push channel"
                );
                return Flow::Stop;
            }
        }

        let delay = self.session.next_retry(&self.config.backoff());
        let attempt = self.session.attempt();
        if attempt > self.config.warn_after_attempts {
            warn!(attempt, ?code, ?delay, "push channel keeps failing, retrying");
        } else {
            info!(attempt, ?code, ?delay, "push channel closed, retrying");
        }
        self.reconnect = Some(Box::pin(tokio::time::sleep(delay)));
        self.metrics.record_reconnect();
        Flow::Continue
    }

    fn write(&self, frame: &EventFrame) {
        let Some(link) = self.link.as_ref().filter(|_| !self.is_disposed()) else {
            self.metrics.record_dropped();
            return;
        };
        match frame.to_text() {
            Ok(text) => {
                if !link.send_text(text) {
                    self.metrics.record_dropped();
                }
            }
            Err(e) => {
                warn!(kind = %frame.kind, error = %e, "failed to encode frame");
                self.metrics.record_dropped();
            }
        }
    }

    fn begin_teardown(&mut self, reason: &str) {
        self.disposed.store(true, Ordering::SeqCst);
        self.heartbeat = None;
        self.reconnect = None;
        self.set_state(ConnectionState::Closing);
        info!(endpoint = %self.session.endpoint(), reason, "tearing down push channel");
    }

    fn teardown(&mut self, reason: &str) {
        self.begin_teardown(reason);
        if let Some(link) = self.link.take() {
            link.close();
        }
    }
}

async fn next_event(link: &mut Option<Link>) -> TransportEvent {
    match link {
        Some(link) => link
            .inbound
            .recv()
            .await
            .unwrap_or(TransportEvent::Closed { code: None }),
        None => std::future::pending().await,
    }
}

async fn next_tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn next_retry(reconnect: &mut Option<Pin<Box<Sleep>>>) {
    match reconnect {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::ws::memory::{Handshake, MemoryTransport};
    use crate::ws::transport::Outbound;

    const URL: &str = "ws://memory/ws";

    fn config() -> WsConfig {
        WsConfig::new(URL)
    }

    fn gaps(times: &[Instant]) -> Vec<u128> {
        times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).as_millis())
            .collect()
    }

    async fn wait_for(manager: &ConnectionManager, state: ConnectionState) {
        manager
            .state_changes()
            .wait_for(|s| *s == state)
            .await
            .expect("state channel open");
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_config() {
        let result = ConnectionManager::open(
            WsConfig::new("http://memory/ws"),
            AuthState::authenticated("tok"),
            MemoryTransport::accepting(),
        );
        assert!(matches!(result, Err(WsError::InvalidConfig(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthenticated_does_not_connect() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(config(), AuthState::new(), transport.clone())
            .expect("open");

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(transport.attempt_count(), 0);
        assert_eq!(manager.state(), ConnectionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connects_with_credential_in_url() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok-1"),
            transport.clone(),
        )
        .expect("open");

        wait_for(&manager, ConnectionState::Open).await;

        assert!(manager.is_open());
        assert_eq!(
            transport.attempt_urls(),
            vec!["ws://memory/ws?token=tok-1".to_string()]
        );
        assert_eq!(manager.metrics().connections_opened(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sequence_is_capped() {
        let transport = MemoryTransport::rejecting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");

        tokio::time::sleep(Duration::from_millis(91_500)).await;

        assert_eq!(
            gaps(&transport.attempt_times()),
            vec![1000, 2000, 4000, 8000, 16000, 30000, 30000]
        );
        assert_eq!(manager.state(), ConnectionState::Closed);
        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_open_resets_backoff() {
        let transport = MemoryTransport::rejecting();
        transport.push_handshake(Handshake::Reject);
        transport.push_handshake(Handshake::Reject);
        transport.push_handshake(Handshake::Accept);
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");

        let peer = transport.next_peer().await.expect("peer");
        peer.close(Some(1006));
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        assert_eq!(
            gaps(&transport.attempt_times()),
            vec![1000, 2000, 1000, 2000]
        );
        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_while_open_and_stops_after_teardown() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let mut peer = transport.next_peer().await.expect("peer");

        tokio::time::sleep(Duration::from_secs(95)).await;

        let ping = Outbound::Text(r#"{"type":"ping"}"#.to_string());
        assert_eq!(peer.drain_sent(), vec![ping.clone(), ping.clone(), ping]);
        assert_eq!(manager.metrics().heartbeats_sent(), 3);

        manager.shutdown().await;
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(peer.drain_sent(), vec![Outbound::Close]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_handshake_closes_late_link() {
        let transport = MemoryTransport::rejecting();
        let release = transport.defer_handshake();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let states = manager.state_changes();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(manager.state(), ConnectionState::Connecting);

        manager.close();
        let _ = release.send(true);
        manager.shutdown().await;

        let mut peer = transport.next_peer().await.expect("peer");
        assert_eq!(peer.drain_sent(), vec![Outbound::Close]);
        assert_eq!(*states.borrow(), ConnectionState::Closed);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.attempt_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_failed_handshake_does_not_retry() {
        let transport = MemoryTransport::rejecting();
        let release = transport.defer_handshake();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");

        tokio::time::sleep(Duration::from_millis(10)).await;
        manager.close();
        let _ = release.send(false);
        manager.shutdown().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.attempt_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_normal_close_does_not_reconnect() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let peer = transport.next_peer().await.expect("peer");

        peer.close(Some(1000));
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(transport.attempt_count(), 1);
        assert_eq!(manager.state(), ConnectionState::Closed);
        assert_eq!(manager.metrics().reconnects_scheduled(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abnormal_close_reconnects_after_base_delay() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let peer = transport.next_peer().await.expect("peer");

        peer.close(Some(1006));
        let _second = transport.next_peer().await.expect("second peer");

        assert_eq!(gaps(&transport.attempt_times()), vec![1000]);
        wait_for(&manager, ConnectionState::Open).await;
        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_alone_does_not_reconnect() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let peer = transport.next_peer().await.expect("peer");

        peer.fail("connection reset");
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.attempt_count(), 1);
        assert!(manager.is_open());

        peer.close(None);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(transport.attempt_count(), 2);
        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_tears_down() {
        let transport = MemoryTransport::accepting();
        let auth = AuthState::authenticated("tok");
        let manager =
            ConnectionManager::open(config(), auth.clone(), transport.clone()).expect("open");
        let mut peer = transport.next_peer().await.expect("peer");
        wait_for(&manager, ConnectionState::Open).await;

        auth.logout();
        wait_for(&manager, ConnectionState::Closed).await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(manager.is_disposed());
        assert_eq!(peer.drain_sent(), vec![Outbound::Close]);
        assert_eq!(transport.attempt_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_credential_reread_on_each_attempt() {
        let transport = MemoryTransport::rejecting();
        let auth = AuthState::authenticated("tok-1");
        let manager =
            ConnectionManager::open(config(), auth.clone(), transport.clone()).expect("open");

        tokio::time::sleep(Duration::from_millis(500)).await;
        auth.login("tok-2");
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(
            transport.attempt_urls(),
            vec![
                "ws://memory/ws?token=tok-1".to_string(),
                "ws://memory/ws?token=tok-2".to_string(),
            ]
        );
        manager.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_delivered_in_order_and_noise_dropped() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let _subscription = {
            let kinds = Arc::clone(&kinds);
            manager.subscribe(move |frame| {
                kinds.lock().expect("lock").push(frame.kind.clone());
            })
        };
        let peer = transport.next_peer().await.expect("peer");

        peer.push_text("not json");
        peer.push_text(r#"{"type":"pong"}"#);
        peer.push_text(r#"{"type":"order_update","data":{"_id":"o1"}}"#);
        peer.push_text(r#"{"type":"menu_changed"}"#);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(
            *kinds.lock().expect("lock"),
            vec!["order_update".to_string(), "menu_changed".to_string()]
        );
        let metrics = manager.metrics();
        assert_eq!(metrics.frames_received(), 4);
        assert_eq!(metrics.frames_discarded(), 2);
        assert_eq!(metrics.events_delivered(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_stops_delivery() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let count = Arc::new(Mutex::new(0_u32));
        let subscription = {
            let count = Arc::clone(&count);
            manager.subscribe(move |_| *count.lock().expect("lock") += 1)
        };
        let peer = transport.next_peer().await.expect("peer");

        peer.push_text(r#"{"type":"order_update"}"#);
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(subscription);
        peer.push_text(r#"{"type":"order_update"}"#);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(*count.lock().expect("lock"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_dropped_unless_open() {
        let transport = MemoryTransport::rejecting();
        transport.push_handshake(Handshake::Reject);
        transport.push_handshake(Handshake::Accept);
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");

        tokio::time::sleep(Duration::from_millis(10)).await;
        manager.send(EventFrame::new("hello", serde_json::Value::Null));
        assert_eq!(manager.metrics().messages_dropped(), 1);

        let mut peer = transport.next_peer().await.expect("peer");
        wait_for(&manager, ConnectionState::Open).await;
        manager.send(EventFrame::new("hello", serde_json::Value::Null));

        assert_eq!(
            peer.next_sent().await,
            Some(Outbound::Text(r#"{"type":"hello"}"#.to_string()))
        );
        assert_eq!(manager.metrics().messages_dropped(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_reconnect_attempts_gives_up() {
        let transport = MemoryTransport::rejecting();
        let manager = ConnectionManager::open(
            config().with_max_reconnect_attempts(2),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");

        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(gaps(&transport.attempt_times()), vec![1000, 2000]);
        assert_eq!(manager.state(), ConnectionState::Closed);
        assert_eq!(manager.metrics().reconnects_scheduled(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_idempotent() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let mut peer = transport.next_peer().await.expect("peer");

        manager.close();
        manager.close();
        manager.shutdown().await;

        assert_eq!(peer.drain_sent(), vec![Outbound::Close]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_tears_down() {
        let transport = MemoryTransport::accepting();
        let manager = ConnectionManager::open(
            config(),
            AuthState::authenticated("tok"),
            transport.clone(),
        )
        .expect("open");
        let mut peer = transport.next_peer().await.expect("peer");

        drop(manager);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(peer.drain_sent(), vec![Outbound::Close]);
        assert_eq!(transport.attempt_count(), 1);
    }
}
