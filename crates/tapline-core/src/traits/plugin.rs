// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that all transport plugins must implement.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::TransportKind;

/// The base trait for every Tapline transport plugin.
///
/// Provides identity and lifecycle. Lifecycle operations always reach the
/// undecorated instance, never a rate-limited wrapper.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    /// Human-readable name of this instance, usually including its address.
    fn name(&self) -> &str;

    /// The transport family this instance belongs to.
    fn kind(&self) -> TransportKind;

    /// Releases sockets, files, and background tasks held by the plugin.
    async fn close(&self) -> Result<(), RelayError>;
}
