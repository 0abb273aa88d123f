// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The builder set shipped with the relay binary.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use tapline_config::model::{
    BinaryOutputConfig, FileOutputConfig, HttpOutputConfig, KafkaConfig, TcpConfig,
};
use tapline_core::{PluginHandle, RelayError, TransportKind};
use tapline_plugin::{RawInputOptions, TransportBuilders};

use crate::engine::{EngineBoundPlugin, EngineSettings};
use crate::file::{FileInput, FileOutput};
use crate::simple::{DummyInput, NullOutput, StdoutOutput, DUMMY_INTERVAL};
use crate::tcp::{TcpInput, TcpOutput};

/// Builds dummy, stdout, null, file and TCP transports natively and
/// engine-bound placeholders for everything else.
///
/// Construction never opens files or sockets; that happens on first I/O.
#[derive(Debug, Clone)]
pub struct BuiltinBuilders {
    dummy_interval: Duration,
}

impl BuiltinBuilders {
    pub fn new() -> Self {
        Self {
            dummy_interval: DUMMY_INTERVAL,
        }
    }

    /// Override the pause between generated dummy requests.
    pub fn with_dummy_interval(mut self, interval: Duration) -> Self {
        self.dummy_interval = interval;
        self
    }

    fn engine_bound(
        kind: TransportKind,
        address: &str,
        settings: EngineSettings,
    ) -> PluginHandle {
        let duplex = settings.tracks_responses();
        let plugin = EngineBoundPlugin::new(kind, address, settings);
        match kind {
            TransportKind::RawInput | TransportKind::HttpInput | TransportKind::KafkaInput => {
                PluginHandle::source(plugin)
            }
            _ if duplex => PluginHandle::duplex(plugin),
            _ => PluginHandle::sink(plugin),
        }
    }

    fn reject_secure(kind: TransportKind, config: &TcpConfig) -> Result<(), RelayError> {
        if config.secure {
            return Err(RelayError::Unsupported {
                kind,
                reason: "TLS is not linked into this build".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for BuiltinBuilders {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportBuilders for BuiltinBuilders {
    fn dummy_input(&self, address: &str) -> Result<PluginHandle, RelayError> {
        Ok(PluginHandle::source(DummyInput::new(address, self.dummy_interval)))
    }

    fn dummy_output(&self) -> Result<PluginHandle, RelayError> {
        Ok(PluginHandle::sink(StdoutOutput::new()))
    }

    fn null_output(&self) -> Result<PluginHandle, RelayError> {
        Ok(PluginHandle::sink(NullOutput))
    }

    fn raw_input(
        &self,
        address: &str,
        options: &Arc<RawInputOptions>,
    ) -> Result<PluginHandle, RelayError> {
        debug!(address, engine = %options.engine, "raw capture requested");
        Ok(Self::engine_bound(
            TransportKind::RawInput,
            address,
            EngineSettings::Raw(Arc::clone(options)),
        ))
    }

    fn tcp_input(
        &self,
        address: &str,
        config: &Arc<TcpConfig>,
    ) -> Result<PluginHandle, RelayError> {
        Self::reject_secure(TransportKind::TcpInput, config)?;
        Ok(PluginHandle::source(TcpInput::new(address)))
    }

    fn tcp_output(
        &self,
        address: &str,
        config: &Arc<TcpConfig>,
    ) -> Result<PluginHandle, RelayError> {
        Self::reject_secure(TransportKind::TcpOutput, config)?;
        Ok(PluginHandle::sink(TcpOutput::new(address)))
    }

    fn file_input(&self, address: &str, looped: bool) -> Result<PluginHandle, RelayError> {
        Ok(PluginHandle::source(FileInput::new(address, looped)))
    }

    fn file_output(
        &self,
        address: &str,
        config: &Arc<FileOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        Ok(PluginHandle::sink(FileOutput::new(address, Arc::clone(config))))
    }

    fn s3_output(
        &self,
        address: &str,
        config: &Arc<FileOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        Ok(Self::engine_bound(
            TransportKind::S3Output,
            address,
            EngineSettings::ObjectStore(Arc::clone(config)),
        ))
    }

    fn http_input(&self, address: &str) -> Result<PluginHandle, RelayError> {
        Ok(Self::engine_bound(
            TransportKind::HttpInput,
            address,
            EngineSettings::Http,
        ))
    }

    fn http_output(
        &self,
        address: &str,
        config: &Arc<HttpOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        Ok(Self::engine_bound(
            TransportKind::HttpOutput,
            address,
            EngineSettings::HttpOutput(Arc::clone(config)),
        ))
    }

    fn binary_output(
        &self,
        address: &str,
        config: &Arc<BinaryOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        Ok(Self::engine_bound(
            TransportKind::BinaryOutput,
            address,
            EngineSettings::Binary(Arc::clone(config)),
        ))
    }

    fn kafka_input(&self, config: &Arc<KafkaConfig>) -> Result<PluginHandle, RelayError> {
        Ok(Self::engine_bound(
            TransportKind::KafkaInput,
            "",
            EngineSettings::Kafka(Arc::clone(config)),
        ))
    }

    fn kafka_output(&self, config: &Arc<KafkaConfig>) -> Result<PluginHandle, RelayError> {
        Ok(Self::engine_bound(
            TransportKind::KafkaOutput,
            "",
            EngineSettings::Kafka(Arc::clone(config)),
        ))
    }
}
