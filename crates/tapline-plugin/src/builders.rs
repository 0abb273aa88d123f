// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The constructor contract every transport backend set implements.
//!
//! One typed method per transport kind, so argument shape mismatches are
//! compile errors instead of startup failures. Addresses arrive with any
//! `|limit` suffix already stripped.

use std::sync::Arc;

use tapline_config::model::{
    BinaryOutputConfig, FileOutputConfig, HttpOutputConfig, KafkaConfig, TcpConfig,
};
use tapline_core::{PluginHandle, RelayError};

use crate::spec::{RawInputOptions, TransportSpec};

/// Builds plugin instances for each transport kind.
pub trait TransportBuilders: Send + Sync {
    fn dummy_input(&self, address: &str) -> Result<PluginHandle, RelayError>;

    fn dummy_output(&self) -> Result<PluginHandle, RelayError>;

    fn null_output(&self) -> Result<PluginHandle, RelayError>;

    fn raw_input(
        &self,
        address: &str,
        options: &Arc<RawInputOptions>,
    ) -> Result<PluginHandle, RelayError>;

    fn tcp_input(&self, address: &str, config: &Arc<TcpConfig>) -> Result<PluginHandle, RelayError>;

    fn tcp_output(
        &self,
        address: &str,
        config: &Arc<TcpConfig>,
    ) -> Result<PluginHandle, RelayError>;

    fn file_input(&self, address: &str, looped: bool) -> Result<PluginHandle, RelayError>;

    fn file_output(
        &self,
        address: &str,
        config: &Arc<FileOutputConfig>,
    ) -> Result<PluginHandle, RelayError>;

    fn s3_output(
        &self,
        address: &str,
        config: &Arc<FileOutputConfig>,
    ) -> Result<PluginHandle, RelayError>;

    fn http_input(&self, address: &str) -> Result<PluginHandle, RelayError>;

    fn http_output(
        &self,
        address: &str,
        config: &Arc<HttpOutputConfig>,
    ) -> Result<PluginHandle, RelayError>;

    fn binary_output(
        &self,
        address: &str,
        config: &Arc<BinaryOutputConfig>,
    ) -> Result<PluginHandle, RelayError>;

    fn kafka_input(&self, config: &Arc<KafkaConfig>) -> Result<PluginHandle, RelayError>;

    fn kafka_output(&self, config: &Arc<KafkaConfig>) -> Result<PluginHandle, RelayError>;
}

/// Call the builder method matching `spec`.
pub fn dispatch(
    builders: &dyn TransportBuilders,
    spec: &TransportSpec,
) -> Result<PluginHandle, RelayError> {
    match spec {
        TransportSpec::DummyInput { address } => builders.dummy_input(address),
        TransportSpec::DummyOutput => builders.dummy_output(),
        TransportSpec::NullOutput => builders.null_output(),
        TransportSpec::RawInput { address, options } => builders.raw_input(address, options),
        TransportSpec::TcpInput { address, config } => builders.tcp_input(address, config),
        TransportSpec::TcpOutput { address, config } => builders.tcp_output(address, config),
        TransportSpec::FileInput { address, looped } => builders.file_input(address, *looped),
        TransportSpec::FileOutput { address, config } => builders.file_output(address, config),
        TransportSpec::S3Output { address, config } => builders.s3_output(address, config),
        TransportSpec::HttpInput { address } => builders.http_input(address),
        TransportSpec::HttpOutput { address, config } => builders.http_output(address, config),
        TransportSpec::BinaryOutput { address, config } => builders.binary_output(address, config),
        TransportSpec::KafkaInput { config } => builders.kafka_input(config),
        TransportSpec::KafkaOutput { config } => builders.kafka_output(config),
    }
}
