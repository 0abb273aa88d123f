// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tapline integration tests.
//!
//! Provides mock transports and a recording builder set for fast,
//! deterministic tests without sockets, files, or capture devices.
//!
//! # Components
//!
//! - [`MockPlugin`] - Mock transport with payload injection and write capture
//! - [`RecordingBuilders`] - `TransportBuilders` that records every call

pub mod mock_plugin;
pub mod recording;

pub use mock_plugin::MockPlugin;
pub use recording::{BuildArgs, BuildCall, MockRole, RecordingBuilders};
