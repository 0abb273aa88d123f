// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source capability: a transport that can be polled for captured traffic.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::traits::plugin::Plugin;

/// A plugin the forwarding loop reads captured payloads from.
#[async_trait]
pub trait Readable: Plugin {
    /// Waits for and returns the next captured payload.
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError>;
}
