// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay-to-relay transports over plain TCP.
//!
//! The input binds lazily on first use and fans every accepted connection
//! into one channel; the output connects lazily and reconnects after a
//! failed write.

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tapline_core::{Plugin, Readable, RelayError, TransportKind, Writable};

use crate::codec::{encode, read_frame};

/// Payloads buffered between connection readers and `read_payload`.
const CHANNEL_CAPACITY: usize = 1024;

/// Accepts payloads relayed from other instances.
pub struct TcpInput {
    address: String,
    name: String,
    state: Mutex<ListenState>,
    inbound: Mutex<Option<mpsc::Receiver<Vec<u8>>>>,
    shutdown: CancellationToken,
}

enum ListenState {
    Pending,
    Bound {
        local_addr: SocketAddr,
        acceptor: JoinHandle<()>,
    },
    Closed,
}

impl TcpInput {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            name: format!("tcp-input:{address}"),
            state: Mutex::new(ListenState::Pending),
            inbound: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    fn closed(&self) -> RelayError {
        RelayError::Closed {
            name: self.name.clone(),
        }
    }

    /// Bind if not yet bound and return the listening address.
    pub async fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        let mut state = self.state.lock().await;
        if matches!(*state, ListenState::Pending) {
            let listener = TcpListener::bind(&self.address).await?;
            let local_addr = listener.local_addr()?;
            info!(address = %local_addr, "tcp input listening");

            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            *self.inbound.lock().await = Some(rx);
            let acceptor = tokio::spawn(accept_loop(listener, tx, self.shutdown.clone()));
            *state = ListenState::Bound {
                local_addr,
                acceptor,
            };
        }
        match &*state {
            ListenState::Bound { local_addr, .. } => Ok(*local_addr),
            _ => Err(self.closed()),
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    tx: mpsc::Sender<Vec<u8>>,
    shutdown: CancellationToken,
) {
    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            () = shutdown.cancelled() => return,
        };
        match accepted {
            Ok((stream, peer)) => {
                debug!(%peer, "tcp input accepted connection");
                tokio::spawn(read_connection(stream, peer, tx.clone(), shutdown.clone()));
            }
            Err(e) => warn!(error = %e, "tcp input accept failed"),
        }
    }
}

async fn read_connection(
    stream: TcpStream,
    peer: SocketAddr,
    tx: mpsc::Sender<Vec<u8>>,
    shutdown: CancellationToken,
) {
    let mut reader = BufReader::new(stream);
    loop {
        let frame = tokio::select! {
            frame = read_frame(&mut reader) => frame,
            () = shutdown.cancelled() => return,
        };
        match frame {
            Ok(Some(payload)) => {
                if tx.send(payload).await.is_err() {
                    return;
                }
            }
            Ok(None) => {
                debug!(%peer, "tcp input connection closed");
                return;
            }
            Err(e) => {
                warn!(%peer, error = %e, "tcp input read failed");
                return;
            }
        }
    }
}

#[async_trait]
impl Plugin for TcpInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::TcpInput
    }

    /// Stops accepting, ends every connection reader, and wakes pending reads.
    async fn close(&self) -> Result<(), RelayError> {
        self.shutdown.cancel();
        let mut state = self.state.lock().await;
        if let ListenState::Bound { acceptor, .. } = &*state {
            acceptor.abort();
        }
        *state = ListenState::Closed;
        Ok(())
    }
}

#[async_trait]
impl Readable for TcpInput {
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
        self.local_addr().await?;
        let mut inbound = self.inbound.lock().await;
        let Some(rx) = inbound.as_mut() else {
            return Err(self.closed());
        };
        tokio::select! {
            payload = rx.recv() => payload.ok_or_else(|| self.closed()),
            () = self.shutdown.cancelled() => Err(self.closed()),
        }
    }
}

/// Relays payloads to another instance.
pub struct TcpOutput {
    address: String,
    name: String,
    state: Mutex<ConnectState>,
}

enum ConnectState {
    Disconnected,
    Connected(TcpStream),
    Closed,
}

impl TcpOutput {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            name: format!("tcp-output:{address}"),
            state: Mutex::new(ConnectState::Disconnected),
        }
    }
}

#[async_trait]
impl Plugin for TcpOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::TcpOutput
    }

    async fn close(&self) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        if let ConnectState::Connected(stream) = &mut *state {
            stream.shutdown().await?;
        }
        *state = ConnectState::Closed;
        Ok(())
    }
}

#[async_trait]
impl Writable for TcpOutput {
    /// A failed write drops the connection; the next write reconnects.
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
        let mut state = self.state.lock().await;
        match &*state {
            ConnectState::Closed => {
                return Err(RelayError::Closed {
                    name: self.name.clone(),
                });
            }
            ConnectState::Disconnected => {
                let stream = TcpStream::connect(&self.address).await?;
                debug!(address = %self.address, "tcp output connected");
                *state = ConnectState::Connected(stream);
            }
            ConnectState::Connected(_) => {}
        }

        let ConnectState::Connected(stream) = &mut *state else {
            return Err(RelayError::Internal("tcp output lost its connection state".into()));
        };
        if let Err(e) = stream.write_all(&encode(payload)).await {
            warn!(
                address = %self.address,
                error = %e,
                "tcp output write failed, dropping connection"
            );
            *state = ConnectState::Disconnected;
            return Err(e.into());
        }
        Ok(payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn output_relays_into_input() {
        let input = TcpInput::new("127.0.0.1:0");
        let addr = input.local_addr().await.unwrap();

        let output = TcpOutput::new(&addr.to_string());
        output.write_payload(b"GET /one HTTP/1.1\r\n\r\n").await.unwrap();
        output.write_payload(b"GET /two HTTP/1.1\r\n\r\n").await.unwrap();

        assert_eq!(input.read_payload().await.unwrap(), b"GET /one HTTP/1.1\r\n\r\n");
        assert_eq!(input.read_payload().await.unwrap(), b"GET /two HTTP/1.1\r\n\r\n");

        output.close().await.unwrap();
        input.close().await.unwrap();
        assert!(input.read_payload().await.is_err());
        assert!(output.write_payload(b"late").await.is_err());
    }

    #[tokio::test]
    async fn close_wakes_a_blocked_reader() {
        let input = std::sync::Arc::new(TcpInput::new("127.0.0.1:0"));
        input.local_addr().await.unwrap();

        let reader = {
            let input = std::sync::Arc::clone(&input);
            tokio::spawn(async move { input.read_payload().await })
        };
        tokio::task::yield_now().await;
        input.close().await.unwrap();

        let result = reader.await.unwrap();
        assert!(matches!(result, Err(RelayError::Closed { .. })));
    }

    #[tokio::test]
    async fn unreachable_output_reports_io_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let output = TcpOutput::new(&addr.to_string());
        assert!(matches!(
            output.write_payload(b"x").await,
            Err(RelayError::Io { .. })
        ));
    }

    #[test]
    fn construction_does_not_bind() {
        // No runtime here: building must not touch the network.
        let input = TcpInput::new("127.0.0.1:0");
        assert_eq!(input.name(), "tcp-input:127.0.0.1:0");
        let output = TcpOutput::new("relay:28020");
        assert_eq!(output.kind(), TransportKind::TcpOutput);
    }
}
