// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tapline relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! Address lists (`input.tcp`, `output.http`, ...) hold plain strings. Any
//! entry may append `|<limit>` to rate limit that one plugin, e.g.
//! `"127.0.0.1:8080|50%"`.

use serde::{Deserialize, Serialize};

/// Top-level Tapline configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaplineConfig {
    /// Process-level settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Traffic sources.
    #[serde(default)]
    pub input: InputConfig,

    /// Traffic sinks.
    #[serde(default)]
    pub output: OutputConfig,

    /// Request rewrite rules applied by HTTP outputs.
    #[serde(default)]
    pub modifier: ModifierConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configured traffic sources.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Synthetic request generators, one per entry.
    #[serde(default)]
    pub dummy: Vec<String>,

    /// Interfaces or ports to capture from, e.g. `":80"` or `"eth0:8080"`.
    #[serde(default)]
    pub raw: Vec<String>,

    /// Settings shared by every raw capture input.
    #[serde(default)]
    pub raw_options: RawCaptureConfig,

    /// Addresses to accept relayed traffic on from other relays.
    #[serde(default)]
    pub tcp: Vec<String>,

    /// Settings shared by every TCP input.
    #[serde(default)]
    pub tcp_config: TcpConfig,

    /// Recorded traffic files to replay.
    #[serde(default)]
    pub file: Vec<String>,

    /// Restart file inputs from the beginning once exhausted.
    #[serde(default)]
    pub file_loop: bool,

    /// Addresses to accept plain HTTP requests on.
    #[serde(default)]
    pub http: Vec<String>,

    /// Kafka consumer. Registered only when both host and topic are set.
    #[serde(default)]
    pub kafka: KafkaConfig,
}

/// Settings shared by every raw capture input.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawCaptureConfig {
    /// Capture engine: `libpcap`, `raw_socket`, or `pcap_file`.
    /// Unrecognized values fall back to `libpcap`.
    #[serde(default = "default_raw_engine")]
    pub engine: String,

    /// Also capture responses for tracked requests.
    #[serde(default)]
    pub track_response: bool,

    /// Seconds after which an incomplete message is flushed.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,

    /// Header to inject with the client's real IP, empty to disable.
    #[serde(default)]
    pub real_ip_header: String,

    /// Application protocol to reassemble (`http` or `binary`).
    #[serde(default = "default_raw_protocol")]
    pub protocol: String,

    /// Custom BPF filter, empty to derive one from the address.
    #[serde(default)]
    pub bpf_filter: String,

    /// Packet timestamp source, empty for the engine default.
    #[serde(default)]
    pub timestamp_type: String,

    /// Capture buffer size in bytes, zero for the engine default.
    #[serde(default)]
    pub buffer_size: u64,
}

impl Default for RawCaptureConfig {
    fn default() -> Self {
        Self {
            engine: default_raw_engine(),
            track_response: false,
            expire_secs: default_expire_secs(),
            real_ip_header: String::new(),
            protocol: default_raw_protocol(),
            bpf_filter: String::new(),
            timestamp_type: String::new(),
            buffer_size: 0,
        }
    }
}

fn default_raw_engine() -> String {
    "libpcap".to_string()
}

fn default_expire_secs() -> u64 {
    2
}

fn default_raw_protocol() -> String {
    "http".to_string()
}

/// TCP transport settings, shared by reference across all entries of one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TcpConfig {
    /// Wrap connections in TLS.
    #[serde(default)]
    pub secure: bool,

    /// PEM certificate path (inputs with `secure = true`).
    #[serde(default)]
    pub certificate_path: Option<String>,

    /// PEM private key path (inputs with `secure = true`).
    #[serde(default)]
    pub key_path: Option<String>,

    /// Hold messages with the same connection id on one upstream connection.
    #[serde(default)]
    pub sticky: bool,
}

/// Configured traffic sinks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Number of stdout debug sinks.
    #[serde(default)]
    pub dummy: usize,

    /// Add one more stdout sink.
    #[serde(default)]
    pub stdout: bool,

    /// Add a sink that discards everything.
    #[serde(default)]
    pub null: bool,

    /// Relays to forward traffic to over TCP.
    #[serde(default)]
    pub tcp: Vec<String>,

    /// Settings shared by every TCP output.
    #[serde(default)]
    pub tcp_config: TcpConfig,

    /// Local paths or `s3://bucket/key` locations to record traffic to.
    #[serde(default)]
    pub file: Vec<String>,

    /// Settings shared by every file and S3 output.
    #[serde(default)]
    pub file_config: FileOutputConfig,

    /// Upstream HTTP servers to replay requests against.
    #[serde(default)]
    pub http: Vec<String>,

    /// Settings shared by every HTTP output.
    #[serde(default)]
    pub http_config: HttpOutputConfig,

    /// Upstream servers to replay raw binary payloads against.
    #[serde(default)]
    pub binary: Vec<String>,

    /// Settings shared by every binary output.
    #[serde(default)]
    pub binary_config: BinaryOutputConfig,

    /// Kafka producer. Registered only when both host and topic are set.
    #[serde(default)]
    pub kafka: KafkaConfig,
}

/// Settings shared by file and S3 outputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    /// Milliseconds between buffer flushes.
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Rotate once a chunk reaches this many bytes.
    #[serde(default)]
    pub size_limit: Option<u64>,

    /// Rotate once a chunk holds this many messages.
    #[serde(default = "default_queue_limit")]
    pub queue_limit: usize,

    /// Append to existing files instead of truncating them.
    #[serde(default)]
    pub append: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: default_flush_interval_ms(),
            size_limit: None,
            queue_limit: default_queue_limit(),
            append: false,
        }
    }
}

fn default_flush_interval_ms() -> u64 {
    1000
}

fn default_queue_limit() -> usize {
    256
}

/// Settings shared by every HTTP output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpOutputConfig {
    /// Concurrent upstream workers per output.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Upstream request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Capture upstream responses so the output can be read as a source.
    #[serde(default)]
    pub track_responses: bool,

    /// Keep the captured Host header instead of rewriting it to the upstream.
    /// Forced on when a `Host` header rewrite rule is configured.
    #[serde(default)]
    pub original_host: bool,

    /// Redirects to follow, zero to disable.
    #[serde(default)]
    pub redirect_limit: u32,
}

impl Default for HttpOutputConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout_ms: default_timeout_ms(),
            track_responses: false,
            original_host: false,
            redirect_limit: 0,
        }
    }
}

/// Settings shared by every binary output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BinaryOutputConfig {
    /// Concurrent upstream workers per output.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Upstream write timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Read buffer for upstream responses, in bytes.
    #[serde(default = "default_binary_buffer_size")]
    pub buffer_size: usize,

    /// Capture upstream responses so the output can be read as a source.
    #[serde(default)]
    pub track_responses: bool,
}

impl Default for BinaryOutputConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout_ms: default_timeout_ms(),
            buffer_size: default_binary_buffer_size(),
            track_responses: false,
        }
    }
}

fn default_workers() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_binary_buffer_size() -> usize {
    64 * 1024
}

/// Kafka connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaConfig {
    /// Comma separated broker list.
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub topic: String,

    /// Encode messages as JSON documents instead of raw payloads.
    #[serde(default)]
    pub use_json: bool,
}

impl KafkaConfig {
    /// Kafka transports are registered only when both host and topic are set.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.topic.is_empty()
    }
}

/// Request rewrite rules.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierConfig {
    /// Headers to set on every replayed HTTP request.
    #[serde(default)]
    pub headers: Vec<HeaderRule>,
}

/// A single header rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderRule {
    pub name: String,
    pub value: String,
}

impl ModifierConfig {
    /// Whether any rule is named exactly `Host`.
    pub fn overrides_host(&self) -> bool {
        self.headers.iter().any(|h| h.name == "Host")
    }
}
