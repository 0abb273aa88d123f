// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed registration descriptors, one variant per transport kind.

use std::sync::Arc;
use std::time::Duration;

use strum::Display;

use tapline_config::model::{
    BinaryOutputConfig, FileOutputConfig, HttpOutputConfig, KafkaConfig, RawCaptureConfig,
    TcpConfig,
};
use tapline_core::TransportKind;

/// Address prefix that routes a file output to object storage.
pub const S3_PREFIX: &str = "s3://";

/// Packet capture engine used by every raw input in one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CaptureEngine {
    /// Live capture through libpcap.
    Libpcap,
    /// AF_PACKET / raw socket capture.
    RawSocket,
    /// Offline replay of a `.pcap` file.
    PcapFile,
}

impl CaptureEngine {
    /// `"raw_socket"` and `"pcap_file"` select those engines; anything else is libpcap.
    pub fn from_setting(setting: &str) -> Self {
        match setting {
            "raw_socket" => CaptureEngine::RawSocket,
            "pcap_file" => CaptureEngine::PcapFile,
            _ => CaptureEngine::Libpcap,
        }
    }
}

/// The fixed arguments every raw capture input receives after its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputOptions {
    pub engine: CaptureEngine,
    pub track_response: bool,
    pub expire: Duration,
    pub real_ip_header: String,
    pub protocol: String,
    pub bpf_filter: String,
    pub timestamp_type: String,
    pub buffer_size: u64,
}

impl RawInputOptions {
    pub fn from_config(config: &RawCaptureConfig) -> Self {
        Self {
            engine: CaptureEngine::from_setting(&config.engine),
            track_response: config.track_response,
            expire: Duration::from_secs(config.expire_secs),
            real_ip_header: config.real_ip_header.clone(),
            protocol: config.protocol.clone(),
            bpf_filter: config.bpf_filter.clone(),
            timestamp_type: config.timestamp_type.clone(),
            buffer_size: config.buffer_size,
        }
    }
}

/// One pending registration: which builder to call and with what.
///
/// Shared settings travel as `Arc`s so every entry of a kind sees the same
/// configuration value.
#[derive(Debug, Clone)]
pub enum TransportSpec {
    DummyInput {
        address: String,
    },
    DummyOutput,
    NullOutput,
    RawInput {
        address: String,
        options: Arc<RawInputOptions>,
    },
    TcpInput {
        address: String,
        config: Arc<TcpConfig>,
    },
    TcpOutput {
        address: String,
        config: Arc<TcpConfig>,
    },
    FileInput {
        address: String,
        looped: bool,
    },
    FileOutput {
        address: String,
        config: Arc<FileOutputConfig>,
    },
    S3Output {
        address: String,
        config: Arc<FileOutputConfig>,
    },
    HttpInput {
        address: String,
    },
    HttpOutput {
        address: String,
        config: Arc<HttpOutputConfig>,
    },
    BinaryOutput {
        address: String,
        config: Arc<BinaryOutputConfig>,
    },
    KafkaInput {
        config: Arc<KafkaConfig>,
    },
    KafkaOutput {
        config: Arc<KafkaConfig>,
    },
}

impl TransportSpec {
    /// Route a file output by address: `s3://` goes to object storage,
    /// everything else to the local filesystem.
    pub fn file_output(address: String, config: Arc<FileOutputConfig>) -> Self {
        if address.starts_with(S3_PREFIX) {
            TransportSpec::S3Output { address, config }
        } else {
            TransportSpec::FileOutput { address, config }
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            TransportSpec::DummyInput { .. } => TransportKind::DummyInput,
            TransportSpec::DummyOutput => TransportKind::DummyOutput,
            TransportSpec::NullOutput => TransportKind::NullOutput,
            TransportSpec::RawInput { .. } => TransportKind::RawInput,
            TransportSpec::TcpInput { .. } => TransportKind::TcpInput,
            TransportSpec::TcpOutput { .. } => TransportKind::TcpOutput,
            TransportSpec::FileInput { .. } => TransportKind::FileInput,
            TransportSpec::FileOutput { .. } => TransportKind::FileOutput,
            TransportSpec::S3Output { .. } => TransportKind::S3Output,
            TransportSpec::HttpInput { .. } => TransportKind::HttpInput,
            TransportSpec::HttpOutput { .. } => TransportKind::HttpOutput,
            TransportSpec::BinaryOutput { .. } => TransportKind::BinaryOutput,
            TransportSpec::KafkaInput { .. } => TransportKind::KafkaInput,
            TransportSpec::KafkaOutput { .. } => TransportKind::KafkaOutput,
        }
    }

    /// The address argument, for kinds that take one.
    pub fn address(&self) -> Option<&str> {
        match self {
            TransportSpec::DummyInput { address }
            | TransportSpec::RawInput { address, .. }
            | TransportSpec::TcpInput { address, .. }
            | TransportSpec::TcpOutput { address, .. }
            | TransportSpec::FileInput { address, .. }
            | TransportSpec::FileOutput { address, .. }
            | TransportSpec::S3Output { address, .. }
            | TransportSpec::HttpInput { address }
            | TransportSpec::HttpOutput { address, .. }
            | TransportSpec::BinaryOutput { address, .. } => Some(address.as_str()),
            TransportSpec::DummyOutput
            | TransportSpec::NullOutput
            | TransportSpec::KafkaInput { .. }
            | TransportSpec::KafkaOutput { .. } => None,
        }
    }

    pub(crate) fn address_mut(&mut self) -> Option<&mut String> {
        match self {
            TransportSpec::DummyInput { address }
            | TransportSpec::RawInput { address, .. }
            | TransportSpec::TcpInput { address, .. }
            | TransportSpec::TcpOutput { address, .. }
            | TransportSpec::FileInput { address, .. }
            | TransportSpec::FileOutput { address, .. }
            | TransportSpec::S3Output { address, .. }
            | TransportSpec::HttpInput { address }
            | TransportSpec::HttpOutput { address, .. }
            | TransportSpec::BinaryOutput { address, .. } => Some(address),
            TransportSpec::DummyOutput
            | TransportSpec::NullOutput
            | TransportSpec::KafkaInput { .. }
            | TransportSpec::KafkaOutput { .. } => None,
        }
    }
}
