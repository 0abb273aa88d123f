// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording builder set for orchestrator tests.
//!
//! `RecordingBuilders` implements `TransportBuilders` without touching the
//! network or filesystem. Every call is recorded with its arguments and
//! answered with a `MockPlugin` in a configurable role.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use tapline_config::model::{
    BinaryOutputConfig, FileOutputConfig, HttpOutputConfig, KafkaConfig, TcpConfig,
};
use tapline_core::{PluginHandle, RelayError, TransportKind};
use tapline_plugin::{RawInputOptions, TransportBuilders};

use crate::mock_plugin::MockPlugin;

/// How a recorded build should be wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRole {
    Source,
    Sink,
    Duplex,
    Inert,
}

/// The non-address arguments a builder received.
#[derive(Debug, Clone)]
pub enum BuildArgs {
    None,
    Raw(Arc<RawInputOptions>),
    Tcp(Arc<TcpConfig>),
    Looped(bool),
    File(Arc<FileOutputConfig>),
    Http(Arc<HttpOutputConfig>),
    Binary(Arc<BinaryOutputConfig>),
    Kafka(Arc<KafkaConfig>),
}

/// One recorded builder invocation.
#[derive(Debug, Clone)]
pub struct BuildCall {
    pub kind: TransportKind,
    /// Empty for zero-argument and Kafka builders.
    pub address: String,
    pub args: BuildArgs,
}

/// A `TransportBuilders` implementation that records instead of connecting.
///
/// Input kinds default to [`MockRole::Source`], output kinds to
/// [`MockRole::Sink`]; override per kind with [`RecordingBuilders::with_role`].
#[derive(Default)]
pub struct RecordingBuilders {
    calls: Mutex<Vec<BuildCall>>,
    plugins: Mutex<Vec<MockPlugin>>,
    roles: HashMap<TransportKind, MockRole>,
    failing: HashSet<TransportKind>,
}

impl RecordingBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer builds of `kind` with `role`.
    pub fn with_role(mut self, kind: TransportKind, role: MockRole) -> Self {
        self.roles.insert(kind, role);
        self
    }

    /// Make builds of `kind` fail.
    pub fn failing_on(mut self, kind: TransportKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Kinds of every call so far, in order.
    pub fn kinds(&self) -> Vec<TransportKind> {
        self.calls().into_iter().map(|call| call.kind).collect()
    }

    /// Addresses of every call so far, in order.
    pub fn addresses(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.address).collect()
    }

    /// Shared-state copies of every plugin handed out, in order.
    pub fn plugins(&self) -> Vec<MockPlugin> {
        self.plugins.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn default_role(kind: TransportKind) -> MockRole {
        match kind {
            TransportKind::DummyInput
            | TransportKind::RawInput
            | TransportKind::TcpInput
            | TransportKind::FileInput
            | TransportKind::HttpInput
            | TransportKind::KafkaInput => MockRole::Source,
            _ => MockRole::Sink,
        }
    }

    fn build(
        &self,
        kind: TransportKind,
        address: &str,
        args: BuildArgs,
    ) -> Result<PluginHandle, RelayError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(BuildCall {
                kind,
                address: address.to_string(),
                args,
            });

        if self.failing.contains(&kind) {
            return Err(RelayError::Io {
                source: std::io::Error::other(format!("mock {kind} refused to build")),
            });
        }

        let name = if address.is_empty() {
            kind.to_string()
        } else {
            address.to_string()
        };
        let plugin = MockPlugin::new(kind, name);
        self.plugins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(plugin.clone());

        let role = self
            .roles
            .get(&kind)
            .copied()
            .unwrap_or_else(|| Self::default_role(kind));
        tracing::trace!(kind = %kind, address, ?role, "mock transport built");
        Ok(match role {
            MockRole::Source => PluginHandle::source(plugin),
            MockRole::Sink => PluginHandle::sink(plugin),
            MockRole::Duplex => PluginHandle::duplex(plugin),
            MockRole::Inert => PluginHandle::inert(plugin),
        })
    }
}

impl TransportBuilders for RecordingBuilders {
    fn dummy_input(&self, address: &str) -> Result<PluginHandle, RelayError> {
        self.build(TransportKind::DummyInput, address, BuildArgs::None)
    }

    fn dummy_output(&self) -> Result<PluginHandle, RelayError> {
        self.build(TransportKind::DummyOutput, "", BuildArgs::None)
    }

    fn null_output(&self) -> Result<PluginHandle, RelayError> {
        self.build(TransportKind::NullOutput, "", BuildArgs::None)
    }

    fn raw_input(
        &self,
        address: &str,
        options: &Arc<RawInputOptions>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::RawInput,
            address,
            BuildArgs::Raw(Arc::clone(options)),
        )
    }

    fn tcp_input(
        &self,
        address: &str,
        config: &Arc<TcpConfig>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::TcpInput,
            address,
            BuildArgs::Tcp(Arc::clone(config)),
        )
    }

    fn tcp_output(
        &self,
        address: &str,
        config: &Arc<TcpConfig>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::TcpOutput,
            address,
            BuildArgs::Tcp(Arc::clone(config)),
        )
    }

    fn file_input(&self, address: &str, looped: bool) -> Result<PluginHandle, RelayError> {
        self.build(TransportKind::FileInput, address, BuildArgs::Looped(looped))
    }

    fn file_output(
        &self,
        address: &str,
        config: &Arc<FileOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::FileOutput,
            address,
            BuildArgs::File(Arc::clone(config)),
        )
    }

    fn s3_output(
        &self,
        address: &str,
        config: &Arc<FileOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::S3Output,
            address,
            BuildArgs::File(Arc::clone(config)),
        )
    }

    fn http_input(&self, address: &str) -> Result<PluginHandle, RelayError> {
        self.build(TransportKind::HttpInput, address, BuildArgs::None)
    }

    fn http_output(
        &self,
        address: &str,
        config: &Arc<HttpOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::HttpOutput,
            address,
            BuildArgs::Http(Arc::clone(config)),
        )
    }

    fn binary_output(
        &self,
        address: &str,
        config: &Arc<BinaryOutputConfig>,
    ) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::BinaryOutput,
            address,
            BuildArgs::Binary(Arc::clone(config)),
        )
    }

    fn kafka_input(&self, config: &Arc<KafkaConfig>) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::KafkaInput,
            "",
            BuildArgs::Kafka(Arc::clone(config)),
        )
    }

    fn kafka_output(&self, config: &Arc<KafkaConfig>) -> Result<PluginHandle, RelayError> {
        self.build(
            TransportKind::KafkaOutput,
            "",
            BuildArgs::Kafka(Arc::clone(config)),
        )
    }
}
