// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockPlugin` implements `Readable` and `Writable` with injectable inbound
//! payloads and captured writes. Clones share state, so a test can keep one
//! copy while the other is moved into a `PluginHandle`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use tapline_core::{Plugin, Readable, RelayError, TransportKind, Writable};

/// A mock transport for testing.
///
/// Provides two queues:
/// - **inbound**: payloads injected via `inject()` are returned by `read_payload()`
/// - **written**: payloads passed to `write_payload()` are captured for assertions
#[derive(Clone)]
pub struct MockPlugin {
    name: String,
    kind: TransportKind,
    inbound: Arc<Mutex<VecDeque<Vec<u8>>>>,
    written: Arc<Mutex<Vec<Vec<u8>>>>,
    closed: Arc<AtomicBool>,
    fail_close: bool,
}

impl MockPlugin {
    pub fn new(kind: TransportKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            written: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
            fail_close: false,
        }
    }

    /// Make `close()` return an error (after still marking the plugin closed).
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Queue a payload for the next `read_payload()`.
    pub fn inject(&self, payload: impl Into<Vec<u8>>) {
        self.inbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(payload.into());
    }

    /// Every payload written so far.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.written.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn written_count(&self) -> usize {
        self.written.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Plugin for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn close(&self) -> Result<(), RelayError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(RelayError::Closed {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Readable for MockPlugin {
    /// Pops the next injected payload; an empty queue reads as closed.
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
        if self.is_closed() {
            return Err(RelayError::Closed {
                name: self.name.clone(),
            });
        }
        self.inbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| RelayError::Closed {
                name: self.name.clone(),
            })
    }
}

#[async_trait]
impl Writable for MockPlugin {
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError> {
        if self.is_closed() {
            return Err(RelayError::Closed {
                name: self.name.clone(),
            });
        }
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.to_vec());
        Ok(payload.len())
    }
}
