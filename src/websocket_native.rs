//! Native WebSocket client for connecting to the simulation server
//!
//! Uses tokio-tungstenite in a background thread, with channel-based message
//! passing in both directions: inbound state frames come out of `rx`,
//! outbound control commands go in through `send`.

use crate::core::Command;
use crate::ws_state::WsState;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Native WebSocket client that runs in a background thread
pub struct NativeWsClient {
    /// Receiver for incoming messages
    pub rx: Receiver<String>,
    /// Sender for outgoing command frames
    tx_out: UnboundedSender<String>,
    /// Shared connection state
    pub state: Arc<Mutex<WsState>>,
}

impl NativeWsClient {
    /// Connect to a WebSocket endpoint
    ///
    /// Spawns a background thread with a tokio runtime to handle the
    /// connection. Inbound messages arrive through `rx`.
    pub fn connect(url: &str) -> Self {
        let (tx, rx): (Sender<String>, Receiver<String>) = mpsc::channel();
        let (tx_out, rx_out) = unbounded_channel();
        let state = Arc::new(Mutex::new(WsState::Connecting));

        let url = url.to_string();
        let state_clone = state.clone();

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!(error = %e, "Failed to create tokio runtime");
                    *state_clone.lock().unwrap() = WsState::Error(e.to_string());
                    return;
                }
            };
            rt.block_on(async move {
                Self::run_websocket(&url, tx, rx_out, state_clone).await;
            });
        });

        Self { rx, tx_out, state }
    }

    /// Queue a control command for the server.
    pub fn send(&self, command: &Command) {
        let frame = command.to_frame();
        debug!(%frame, "queueing command");
        if self.tx_out.send(frame).is_err() {
            warn!("socket task gone, command dropped");
        }
    }

    async fn run_websocket(
        url: &str,
        tx: Sender<String>,
        mut rx_out: UnboundedReceiver<String>,
        state: Arc<Mutex<WsState>>,
    ) {
        use futures_util::{SinkExt, StreamExt};
        use tokio_tungstenite::{connect_async, tungstenite::Message};

        info!(url, "Connecting to WebSocket");

        let ws_stream = match connect_async(url).await {
            Ok((stream, _)) => {
                info!("WebSocket connected");
                *state.lock().unwrap() = WsState::Connected;
                stream
            }
            Err(e) => {
                error!(error = %e, "Failed to connect");
                *state.lock().unwrap() = WsState::Error(e.to_string());
                return;
            }
        };

        // The server pushes the full state on connect and on every step;
        // no subscribe handshake is needed.
        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if tx.send(text.to_string()).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            warn!("WebSocket closed by server");
                            *state.lock().unwrap() = WsState::Disconnected;
                            break;
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            *state.lock().unwrap() = WsState::Error(e.to_string());
                            break;
                        }
                        _ => {}
                    }
                }
                frame = rx_out.recv() => {
                    match frame {
                        Some(frame) => {
                            if let Err(e) = write.send(Message::Text(frame.into())).await {
                                error!(error = %e, "Failed to send command");
                                *state.lock().unwrap() = WsState::Error(e.to_string());
                                break;
                            }
                        }
                        None => break, // client dropped
                    }
                }
            }
        }

        warn!("WebSocket stream ended");
        *state.lock().unwrap() = WsState::Disconnected;
    }
}
