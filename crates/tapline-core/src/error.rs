// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tapline relay.

use thiserror::Error;

use crate::types::TransportKind;

/// The primary error type used across plugin traits, construction, and registry operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors detected after settings were loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A transport builder failed. Fatal at startup.
    #[error("failed to construct {kind} plugin for `{address}`: {source}")]
    Construction {
        kind: TransportKind,
        address: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A rate limit specification could not be parsed.
    #[error("invalid rate limit `{spec}`: {reason}")]
    InvalidLimit { spec: String, reason: String },

    /// Underlying socket or file errors.
    #[error("i/o error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The plugin was closed and no longer accepts reads or writes.
    #[error("plugin {name} is closed")]
    Closed { name: String },

    /// The transport needs an engine that is not linked into this build.
    #[error("{kind} transport unavailable: {reason}")]
    Unsupported { kind: TransportKind, reason: String },

    /// Internal or unexpected errors (poisoned locks and the like).
    #[error("internal error: {0}")]
    Internal(String),
}
