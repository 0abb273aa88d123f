// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the plugin traits, the registry, and the catalog.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifies a transport family.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    DummyInput,
    DummyOutput,
    NullOutput,
    RawInput,
    TcpInput,
    TcpOutput,
    FileInput,
    FileOutput,
    S3Output,
    HttpInput,
    HttpOutput,
    BinaryOutput,
    KafkaInput,
    KafkaOutput,
}

impl TransportKind {
    /// Whether the configuration string for this kind may carry an `address|limit` suffix.
    ///
    /// Zero-argument kinds and Kafka (whose address is always empty) never do.
    pub fn limit_eligible(self) -> bool {
        !matches!(
            self,
            TransportKind::DummyOutput
                | TransportKind::NullOutput
                | TransportKind::KafkaInput
                | TransportKind::KafkaOutput
        )
    }
}

/// Capabilities a constructed plugin exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub readable: bool,
    pub writable: bool,
}

impl Capabilities {
    /// Source-only capability set.
    pub const SOURCE: Capabilities = Capabilities {
        readable: true,
        writable: false,
    };
    /// Sink-only capability set.
    pub const SINK: Capabilities = Capabilities {
        readable: false,
        writable: true,
    };
    /// Both directions.
    pub const DUPLEX: Capabilities = Capabilities {
        readable: true,
        writable: true,
    };
    /// No I/O capability at all.
    pub const INERT: Capabilities = Capabilities {
        readable: false,
        writable: false,
    };
}
