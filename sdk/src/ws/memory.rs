//! In-process transport.
//!
//! [`MemoryTransport`] plays the server side of the push channel without a
//! network: every accepted handshake yields a [`MemoryPeer`] through which
//! frames can be pushed to the client and the client's writes inspected.
//! Handshake outcomes can be scripted, including handshakes that stay
//! pending until released.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::error::WsError;
use super::messages::EventFrame;
use super::transport::{Link, Outbound, Transport, TransportEvent};

/// Scripted result of one handshake.
#[derive(Debug)]
pub enum Handshake {
    /// Complete the handshake.
    Accept,
    /// Fail the handshake.
    Reject,
    /// Wait for the sender: `true` accepts, `false` or a dropped sender rejects.
    Deferred(oneshot::Receiver<bool>),
}

#[derive(Debug)]
struct MemoryInner {
    script: VecDeque<Handshake>,
    accept_by_default: bool,
    attempts: Vec<(String, Instant)>,
}

/// Transport that connects to in-process peers.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    inner: Arc<Mutex<MemoryInner>>,
    peers_tx: mpsc::UnboundedSender<MemoryPeer>,
    peers_rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<MemoryPeer>>>,
}

impl MemoryTransport {
    fn with_default(accept_by_default: bool) -> Self {
        let (peers_tx, peers_rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                script: VecDeque::new(),
                accept_by_default,
                attempts: Vec::new(),
            })),
            peers_tx,
            peers_rx: Arc::new(tokio::sync::Mutex::new(peers_rx)),
        }
    }

    /// Creates a transport that accepts unscripted handshakes.
    #[must_use]
    pub fn accepting() -> Self {
        Self::with_default(true)
    }

    /// Creates a transport that rejects unscripted handshakes.
    #[must_use]
    pub fn rejecting() -> Self {
        Self::with_default(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues the outcome of the next handshake.
    pub fn push_handshake(&self, handshake: Handshake) {
        self.lock().script.push_back(handshake);
    }

    /// Queues a handshake that completes only when the returned sender fires.
    #[must_use]
    pub fn defer_handshake(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        self.push_handshake(Handshake::Deferred(rx));
        tx
    }

    /// Returns the number of handshakes attempted so far.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.lock().attempts.len()
    }

    /// Returns the instants at which handshakes started.
    #[must_use]
    pub fn attempt_times(&self) -> Vec<Instant> {
        self.lock().attempts.iter().map(|(_, at)| *at).collect()
    }

    /// Returns the URLs handshakes were attempted against.
    #[must_use]
    pub fn attempt_urls(&self) -> Vec<String> {
        self.lock().attempts.iter().map(|(url, _)| url.clone()).collect()
    }

    /// Waits for the next accepted connection.
    pub async fn next_peer(&self) -> Option<MemoryPeer> {
        self.peers_rx.lock().await.recv().await
    }

    fn accept(&self) -> Link {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let _ = self.peers_tx.send(MemoryPeer {
            sent: outbound_rx,
            events: inbound_tx,
        });
        Link {
            outbound: outbound_tx,
            inbound: inbound_rx,
        }
    }
}

impl Transport for MemoryTransport {
    async fn connect(&self, url: &str) -> Result<Link, WsError> {
        let handshake = {
            let mut inner = self.lock();
            inner.attempts.push((url.to_string(), Instant::now()));
            match inner.script.pop_front() {
                Some(handshake) => handshake,
                None if inner.accept_by_default => Handshake::Accept,
                None => Handshake::Reject,
            }
        };

        let accepted = match handshake {
            Handshake::Accept => true,
            Handshake::Reject => false,
            Handshake::Deferred(rx) => rx.await.unwrap_or(false),
        };

        if accepted {
            Ok(self.accept())
        } else {
            Err(WsError::Connection("handshake rejected".to_string()))
        }
    }
}

/// Server side of an in-process connection.
#[derive(Debug)]
pub struct MemoryPeer {
    sent: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl MemoryPeer {
    /// Delivers a raw text frame to the client.
    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Message(text.into()));
    }

    /// Delivers a frame to the client.
    pub fn push_frame(&self, frame: &EventFrame) {
        if let Ok(text) = frame.to_text() {
            self.push_text(text);
        }
    }

    /// Reports a transport error to the client.
    pub fn fail(&self, message: impl Into<String>) {
        let _ = self.events.send(TransportEvent::Error(message.into()));
    }

    /// Closes the connection from the server side.
    pub fn close(&self, code: Option<u16>) {
        let _ = self.events.send(TransportEvent::Closed { code });
    }

    /// Waits for the next frame written by the client.
    pub async fn next_sent(&mut self) -> Option<Outbound> {
        self.sent.recv().await
    }

    /// Returns every frame the client has written so far.
    pub fn drain_sent(&mut self) -> Vec<Outbound> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.sent.try_recv() {
            frames.push(frame);
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_accepting_yields_peer() {
        let transport = MemoryTransport::accepting();
        let link = transport.connect("ws://memory/ws").await.expect("accept");
        let mut peer = transport.next_peer().await.expect("peer");

        assert!(link.send_text("hi".to_string()));
        assert_eq!(peer.next_sent().await, Some(Outbound::Text("hi".to_string())));
        assert_eq!(transport.attempt_count(), 1);
        assert_eq!(transport.attempt_urls(), vec!["ws://memory/ws".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_rejecting() {
        let transport = MemoryTransport::rejecting();
        assert!(transport.connect("ws://memory/ws").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_script_overrides_default() {
        let transport = MemoryTransport::accepting();
        transport.push_handshake(Handshake::Reject);
        assert!(transport.connect("ws://memory/ws").await.is_err());
        assert!(transport.connect("ws://memory/ws").await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_deferred_handshake() {
        let transport = MemoryTransport::rejecting();
        let release = transport.defer_handshake();
        let pending = {
            let transport = transport.clone();
            tokio::spawn(async move { transport.connect("ws://memory/ws").await })
        };
        let _ = release.send(true);
        let result = pending.await.expect("join");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_memory_peer_events_reach_link() {
        let transport = MemoryTransport::accepting();
        let mut link = transport.connect("ws://memory/ws").await.expect("accept");
        let peer = transport.next_peer().await.expect("peer");

        peer.push_text("{}");
        peer.close(Some(1000));

        assert_eq!(
            link.inbound.recv().await,
            Some(TransportEvent::Message("{}".to_string()))
        );
        assert_eq!(
            link.inbound.recv().await,
            Some(TransportEvent::Closed { code: Some(1000) })
        );
    }
}
