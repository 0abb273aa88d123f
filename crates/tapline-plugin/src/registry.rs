// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry for the relay's constructed transports.
//!
//! A [`PluginSet`] holds three ordered collections:
//! - **readable**: views the forwarding loop reads traffic from
//! - **writable**: views it fans traffic out to
//! - **all**: every undecorated instance, for lifecycle and introspection
//!
//! [`PluginRegistry`] guards one set behind a mutex so registration can be
//! shared across threads.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use tapline_config::model::TaplineConfig;
use tapline_core::{Plugin, PluginHandle, Readable, RelayError, Role, TransportKind, Writable};

use crate::builders::TransportBuilders;
use crate::orchestrator;

/// The relay's constructed plugins, in registration order.
#[derive(Clone, Default)]
pub struct PluginSet {
    readable: Vec<Arc<dyn Readable>>,
    writable: Vec<Arc<dyn Writable>>,
    all: Vec<Arc<dyn Plugin>>,
}

impl PluginSet {
    pub fn readable(&self) -> &[Arc<dyn Readable>] {
        &self.readable
    }

    pub fn writable(&self) -> &[Arc<dyn Writable>] {
        &self.writable
    }

    pub fn all(&self) -> &[Arc<dyn Plugin>] {
        &self.all
    }

    /// Number of constructed plugins (the length of `all`).
    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Route `wrapped` by its role and record `original` in `all`.
    ///
    /// A duplex plugin lands in `writable` only. Inert plugins only reach `all`.
    pub(crate) fn insert(&mut self, wrapped: &PluginHandle, original: Arc<dyn Plugin>) {
        match wrapped.role() {
            Role::Source(reader) => self.readable.push(Arc::clone(reader)),
            Role::Sink(writer) | Role::Duplex { writer, .. } => {
                self.writable.push(Arc::clone(writer))
            }
            Role::Inert => {}
        }
        self.all.push(original);
    }

    /// Append every entry of `other`, keeping its order.
    pub fn extend(&mut self, other: PluginSet) {
        self.readable.extend(other.readable);
        self.writable.extend(other.writable);
        self.all.extend(other.all);
    }

    /// Per-kind counts over `all`, in first-registration order.
    pub fn summary(&self) -> Vec<(TransportKind, usize)> {
        let mut counts: Vec<(TransportKind, usize)> = Vec::new();
        for plugin in &self.all {
            let kind = plugin.kind();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
    }

    /// Close every plugin in `all`.
    ///
    /// Keeps going past failures; each one is logged and returned with the
    /// plugin's name.
    pub async fn close_all(&self) -> Vec<(String, RelayError)> {
        let mut failures = Vec::new();
        for plugin in &self.all {
            if let Err(e) = plugin.close().await {
                warn!(
                    plugin = plugin.name(),
                    kind = %plugin.kind(),
                    error = %e,
                    "plugin close failed"
                );
                failures.push((plugin.name().to_string(), e));
            }
        }
        failures
    }
}

impl fmt::Debug for PluginSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginSet")
            .field("readable", &self.readable.len())
            .field("writable", &self.writable.len())
            .field("all", &self.all.len())
            .finish()
    }
}

/// Thread-safe owner of a [`PluginSet`].
///
/// Entries are only ever appended. Nothing is deduplicated, so populating
/// twice from the same settings registers every transport twice.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    inner: Mutex<PluginSet>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, PluginSet>, RelayError> {
        self.inner
            .lock()
            .map_err(|_| RelayError::Internal("plugin registry lock poisoned".to_string()))
    }

    /// Register one constructed plugin.
    pub fn register(
        &self,
        wrapped: &PluginHandle,
        original: Arc<dyn Plugin>,
    ) -> Result<(), RelayError> {
        self.lock()?.insert(wrapped, original);
        Ok(())
    }

    /// Construct and register every transport named by `config`.
    ///
    /// The lock is held for the whole pass. On failure nothing from this
    /// pass is kept.
    pub fn populate(
        &self,
        config: &TaplineConfig,
        builders: &dyn TransportBuilders,
    ) -> Result<(), RelayError> {
        let mut guard = self.lock()?;
        let mut staged = PluginSet::default();
        orchestrator::register_all(&mut staged, config, builders)?;
        info!(
            readable = staged.readable.len(),
            writable = staged.writable.len(),
            all = staged.all.len(),
            "plugin registry populated"
        );
        guard.extend(staged);
        Ok(())
    }

    /// A copy of the current set.
    pub fn snapshot(&self) -> Result<PluginSet, RelayError> {
        Ok(self.lock()?.clone())
    }

    /// Consume the registry and return its set.
    pub fn into_set(self) -> Result<PluginSet, RelayError> {
        self.inner
            .into_inner()
            .map_err(|_| RelayError::Internal("plugin registry lock poisoned".to_string()))
    }

    pub fn len(&self) -> Result<usize, RelayError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RelayError> {
        Ok(self.lock()?.is_empty())
    }
}
