//! Transport seam between the connection manager and the socket.
//!
//! A [`Transport`] performs the handshake and hands back a [`Link`]: two
//! queues, one for frames the client writes and one for everything the
//! socket reports. The manager never touches the socket directly, which keeps
//! the lifecycle logic independent of the WebSocket library.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use super::error::WsError;

/// A frame written by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Text frame.
    Text(String),
    /// Request an orderly close.
    Close,
}

/// Something the socket reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Text frame received.
    Message(String),
    /// Transport-level error. A `Closed` event always follows.
    Error(String),
    /// Socket closed, with the peer's close code when one was sent.
    Closed {
        /// Close code, `None` for an abnormal drop.
        code: Option<u16>,
    },
}

/// An established connection.
#[derive(Debug)]
pub struct Link {
    /// Frames to write.
    pub outbound: mpsc::UnboundedSender<Outbound>,
    /// Events read from the socket.
    pub inbound: mpsc::UnboundedReceiver<TransportEvent>,
}

impl Link {
    /// Queues a text frame. Returns false if the socket is gone.
    pub fn send_text(&self, text: String) -> bool {
        self.outbound.send(Outbound::Text(text)).is_ok()
    }

    /// Requests an orderly close.
    pub fn close(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}

/// Opens connections.
pub trait Transport: Send + Sync + 'static {
    /// Performs the handshake against `url`.
    fn connect(&self, url: &str) -> impl Future<Output = Result<Link, WsError>> + Send;
}

/// WebSocket transport backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl Transport for WsTransport {
    async fn connect(&self, url: &str) -> Result<Link, WsError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| WsError::Connection(e.to_string()))?;

        let (mut sink, mut source) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => match outbound {
                        Some(Outbound::Text(text)) => {
                            if let Err(e) = sink.send(Message::Text(text.into())).await {
                                let _ = inbound_tx.send(TransportEvent::Error(e.to_string()));
                            }
                        }
                        Some(Outbound::Close) | None => {
                            let _ = sink.send(Message::Close(None)).await;
                            let _ = sink.close().await;
                            debug!("socket closed by client");
                            break;
                        }
                    },
                    inbound = source.next() => match inbound {
                        Some(Ok(Message::Text(text))) => {
                            let _ = inbound_tx.send(TransportEvent::Message(text.as_str().to_owned()));
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let code = frame.map(|f| u16::from(f.code));
                            let _ = inbound_tx.send(TransportEvent::Closed { code });
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            let _ = inbound_tx.send(TransportEvent::Error(e.to_string()));
                            let _ = inbound_tx.send(TransportEvent::Closed { code: None });
                            break;
                        }
                        None => {
                            let _ = inbound_tx.send(TransportEvent::Closed { code: None });
                            break;
                        }
                    },
                }
            }
        });

        Ok(Link {
            outbound: outbound_tx,
            inbound: inbound_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_send_after_peer_dropped() {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (_inbound_tx, inbound) = mpsc::unbounded_channel();
        let link = Link { outbound, inbound };

        assert!(link.send_text("hello".to_string()));
        drop(outbound_rx);
        assert!(!link.send_text("again".to_string()));
        link.close();
    }

    #[tokio::test]
    async fn test_ws_transport_unreachable_host() {
        let result = WsTransport.connect("ws://127.0.0.1:1/ws").await;
        assert!(matches!(result, Err(WsError::Connection(_))));
    }
}
