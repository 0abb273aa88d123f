// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in transports for the Tapline relay.
//!
//! [`BuiltinBuilders`] is the `TransportBuilders` implementation the binary
//! uses. Dummy, stdout, null, file and plain TCP transports are native; raw
//! capture, HTTP, S3, binary and Kafka resolve to [`EngineBoundPlugin`]s.

pub mod builders;
pub mod codec;
pub mod engine;
pub mod file;
pub mod simple;
pub mod tcp;

pub use builders::BuiltinBuilders;
pub use codec::PAYLOAD_SEPARATOR;
pub use engine::{EngineBoundPlugin, EngineSettings};
pub use file::{FileInput, FileOutput};
pub use simple::{DummyInput, NullOutput, StdoutOutput};
pub use tcp::{TcpInput, TcpOutput};
