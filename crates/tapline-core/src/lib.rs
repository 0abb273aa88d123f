// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tapline traffic relay.
//!
//! This crate provides the plugin traits every transport implements, the
//! capability roles handles carry, and the error type shared across the
//! workspace.

pub mod error;
pub mod handle;
pub mod limit;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RelayError;
pub use handle::{PluginHandle, Role};
pub use limit::RateLimit;
pub use traits::{Plugin, Readable, Writable};
pub use types::{Capabilities, TransportKind};
