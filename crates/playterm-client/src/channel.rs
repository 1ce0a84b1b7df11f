//! Control channel plumbing
//!
//! A `ControlChannel` is an outbound handle plus an inbound queue. The
//! websocket implementation runs one writer and one reader task; both
//! directions stay in order because each is a single FIFO queue.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use playterm_types::{ClientMessage, ServerMessage};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::error::ChannelError;

/// Fire-and-forget handle for outward messages
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl Outbound {
    /// Queue a message for the remote side
    ///
    /// Sends never block and are never acknowledged. Once the channel is
    /// closed, messages are dropped with a warning.
    pub fn send(&self, msg: ClientMessage) {
        if self.tx.send(msg).is_err() {
            log::warn!("Control channel closed; dropping outbound message");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Bidirectional message channel to the remote service
pub struct ControlChannel {
    outbound: Outbound,
    inbound: mpsc::UnboundedReceiver<ServerMessage>,
    shutdown: Option<oneshot::Sender<()>>,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for ControlChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlChannel")
            .field("outbound_closed", &self.outbound.is_closed())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl ControlChannel {
    /// Build a channel from raw queue ends
    pub fn from_parts(
        outbound: mpsc::UnboundedSender<ClientMessage>,
        inbound: mpsc::UnboundedReceiver<ServerMessage>,
    ) -> Self {
        Self {
            outbound: Outbound { tx: outbound },
            inbound,
            shutdown: None,
            tasks: Vec::new(),
        }
    }

    /// In-process channel whose other end is returned as a [`RemoteEnd`]
    pub fn loopback() -> (Self, RemoteEnd) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        let channel = Self::from_parts(out_tx, in_rx);
        let remote = RemoteEnd {
            to_client: in_tx,
            from_client: out_rx,
        };
        (channel, remote)
    }

    /// Open a websocket control channel
    pub async fn connect(url: &Url) -> Result<Self, ChannelError> {
        log::info!("Connecting control channel: {}", url);
        let (ws_stream, _) = connect_async(url.as_str()).await?;
        let (mut sink, mut stream) = ws_stream.split();

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<ServerMessage>();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let writer = tokio::spawn(async move {
            loop {
                tokio::select! {
                    msg = out_rx.recv() => {
                        let Some(msg) = msg else { break };
                        let json = match serde_json::to_string(&msg) {
                            Ok(json) => json,
                            Err(e) => {
                                log::error!("Failed to serialize {:?}: {}", msg, e);
                                continue;
                            }
                        };
                        log::debug!("Sending frame: {}", json);
                        if let Err(e) = sink.send(Message::Text(json)).await {
                            log::error!("Control channel write failed: {}", e);
                            break;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        });

        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        log::debug!("Received frame: {}", text);
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(msg) => {
                                if in_tx.send(msg).is_err() {
                                    break;
                                }
                            }
                            Err(e) => log::warn!("Skipping unrecognized frame {}: {}", text, e),
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        log::warn!("Received unexpected binary frame");
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("Control channel closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("Control channel error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            outbound: Outbound { tx: out_tx },
            inbound: in_rx,
            shutdown: Some(shutdown_tx),
            tasks: vec![writer, reader],
        })
    }

    /// Clone of the outbound handle
    pub fn outbound(&self) -> Outbound {
        self.outbound.clone()
    }

    /// Wait for the next inbound message; `None` once the remote side is gone
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        self.inbound.recv().await
    }

    /// Take an inbound message if one is already queued
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        self.inbound.try_recv().ok()
    }

    /// Close both directions and wait for the transport tasks to finish
    pub async fn close(mut self) {
        self.inbound.close();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let mut tasks = std::mem::take(&mut self.tasks).into_iter();
        // Writer gets to flush its close frame; the reader may be parked on the socket
        if let Some(writer) = tasks.next() {
            let _ = writer.await;
        }
        for task in tasks {
            task.abort();
        }
        log::info!("Control channel closed");
    }
}

/// Remote side of a loopback channel
///
/// Embedders bridging their own transport, and tests, push server messages
/// in and read client messages out here.
#[derive(Debug)]
pub struct RemoteEnd {
    to_client: mpsc::UnboundedSender<ServerMessage>,
    from_client: mpsc::UnboundedReceiver<ClientMessage>,
}

impl RemoteEnd {
    /// Deliver a message to the client; false if the client side is gone
    pub fn send(&self, msg: ServerMessage) -> bool {
        self.to_client.send(msg).is_ok()
    }

    pub async fn recv(&mut self) -> Option<ClientMessage> {
        self.from_client.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ClientMessage> {
        self.from_client.try_recv().ok()
    }

    /// Everything the client has sent so far
    pub fn drain(&mut self) -> Vec<ClientMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.from_client.try_recv() {
            messages.push(msg);
        }
        messages
    }
}

/// Opens control channels; injected so sessions can run over any transport
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &Url) -> Result<ControlChannel, ChannelError>;
}

/// Websocket connector
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &Url) -> Result<ControlChannel, ChannelError> {
        ControlChannel::connect(url).await
    }
}
