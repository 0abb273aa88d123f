// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholders for transports whose engines are not linked into this build.
//!
//! An [`EngineBoundPlugin`] keeps the typed settings it was built with and
//! occupies its slot in the plugin set with the right role, so the set's
//! shape matches the configuration. Every I/O call reports
//! [`RelayError::Unsupported`].

use std::sync::Arc;

use async_trait::async_trait;

use tapline_config::model::{BinaryOutputConfig, FileOutputConfig, HttpOutputConfig, KafkaConfig};
use tapline_core::{Plugin, Readable, RelayError, TransportKind, Writable};
use tapline_plugin::RawInputOptions;

/// Settings an engine-bound transport was built with.
#[derive(Debug, Clone)]
pub enum EngineSettings {
    Raw(Arc<RawInputOptions>),
    Http,
    HttpOutput(Arc<HttpOutputConfig>),
    ObjectStore(Arc<FileOutputConfig>),
    Binary(Arc<BinaryOutputConfig>),
    Kafka(Arc<KafkaConfig>),
}

impl EngineSettings {
    /// The engine a build would need to link for this transport.
    pub fn engine(&self) -> String {
        match self {
            EngineSettings::Raw(options) => format!("{} capture", options.engine),
            EngineSettings::Http | EngineSettings::HttpOutput(_) => "http".to_string(),
            EngineSettings::ObjectStore(_) => "s3".to_string(),
            EngineSettings::Binary(_) => "binary protocol".to_string(),
            EngineSettings::Kafka(_) => "kafka".to_string(),
        }
    }

    /// Whether the transport would also yield upstream responses.
    pub fn tracks_responses(&self) -> bool {
        match self {
            EngineSettings::HttpOutput(config) => config.track_responses,
            EngineSettings::Binary(config) => config.track_responses,
            _ => false,
        }
    }
}

/// A configured transport whose engine is unavailable.
#[derive(Debug)]
pub struct EngineBoundPlugin {
    kind: TransportKind,
    name: String,
    settings: EngineSettings,
}

impl EngineBoundPlugin {
    pub fn new(kind: TransportKind, address: &str, settings: EngineSettings) -> Self {
        let name = if address.is_empty() {
            kind.to_string()
        } else {
            format!("{kind}:{address}")
        };
        Self {
            kind,
            name,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn unsupported(&self) -> RelayError {
        RelayError::Unsupported {
            kind: self.kind,
            reason: format!("the {} engine is not linked into this build", self.settings.engine()),
        }
    }
}

#[async_trait]
impl Plugin for EngineBoundPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn close(&self) -> Result<(), RelayError> {
        Ok(())
    }
}

#[async_trait]
impl Readable for EngineBoundPlugin {
    async fn read_payload(&self) -> Result<Vec<u8>, RelayError> {
        Err(self.unsupported())
    }
}

#[async_trait]
impl Writable for EngineBoundPlugin {
    async fn write_payload(&self, _payload: &[u8]) -> Result<usize, RelayError> {
        Err(self.unsupported())
    }
}
