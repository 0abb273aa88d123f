// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transports with no external resources: dummy input, stdout, null.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use tapline_core::{Plugin, Readable, RelayError, TransportKind, Writable};

/// Pause between generated requests.
pub const DUMMY_INTERVAL: Duration = Duration::from_secs(1);

/// Generates a numbered `GET` request per read.
pub struct DummyInput {
    name: String,
    host: String,
    interval: Duration,
    seq: AtomicU64,
    closed: AtomicBool,
}

impl DummyInput {
    /// `address` becomes the `Host` header; empty means `localhost`.
    pub fn new(address: &str, interval: Duration) -> Self {
        let host = if address.is_empty() { "localhost" } else { address };
        Self {
            name: format!("dummy-input:{host}"),
            host: host.to_string(),
            interval,
            seq: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Plugin for DummyInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        TransportKind::DummyInput
    }

    async fn close(&self) -> Result<(), RelayError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Readable for DummyInput {
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RelayError::Closed {
                name: self.name.clone(),
            });
        }
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        // First request goes out immediately.
        if seq > 0 {
            tokio::time::sleep(self.interval).await;
        }
        Ok(format!("GET /?seq={seq} HTTP/1.1\r\nHost: {}\r\n\r\n", self.host).into_bytes())
    }
}

/// Prints every payload to standard output.
pub struct StdoutOutput {
    closed: AtomicBool,
}

impl StdoutOutput {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for StdoutOutput {
    fn name(&self) -> &str {
        "stdout"
    }

    fn kind(&self) -> TransportKind {
        TransportKind::DummyOutput
    }

    async fn close(&self) -> Result<(), RelayError> {
        self.closed.store(true, Ordering::SeqCst);
        tokio::io::stdout().flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Writable for StdoutOutput {
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RelayError::Closed {
                name: "stdout".to_string(),
            });
        }
        let mut stdout = tokio::io::stdout();
        stdout.write_all(payload).await?;
        stdout.write_all(b"\n").await?;
        Ok(payload.len())
    }
}

/// Accepts and discards every payload.
#[derive(Debug, Default)]
pub struct NullOutput;

#[async_trait]
impl Plugin for NullOutput {
    fn name(&self) -> &str {
        "null"
    }

    fn kind(&self) -> TransportKind {
        TransportKind::NullOutput
    }

    async fn close(&self) -> Result<(), RelayError> {
        Ok(())
    }
}

#[async_trait]
impl Writable for NullOutput {
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
        Ok(payload.len())
    }
}
