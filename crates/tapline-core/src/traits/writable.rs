// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sink capability: a transport that traffic is forwarded to.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::traits::plugin::Plugin;

/// A plugin the forwarding loop writes payloads to.
#[async_trait]
pub trait Writable: Plugin {
    /// Forwards one payload, returning the number of bytes accepted.
    async fn write_payload(&self, payload: &[u8]) -> Result<usize, RelayError>;
}
