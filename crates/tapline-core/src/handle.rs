// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constructed plugin handles with their capability role fixed at build time.
//!
//! Builders pick the constructor matching what the concrete type implements
//! (`source`, `sink`, `duplex`, `inert`), so capability probing happens once
//! and the forwarding loop never has to re-check it.

use std::fmt;
use std::sync::Arc;

use crate::traits::{Plugin, Readable, Writable};
use crate::types::Capabilities;

/// The I/O views a constructed plugin exposes.
#[derive(Clone)]
pub enum Role {
    /// Readable only.
    Source(Arc<dyn Readable>),
    /// Writable only.
    Sink(Arc<dyn Writable>),
    /// Both; e.g. an HTTP output that also yields upstream responses.
    Duplex {
        reader: Arc<dyn Readable>,
        writer: Arc<dyn Writable>,
    },
    /// Neither capability.
    Inert,
}

impl Role {
    /// The capability set this role carries.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Role::Source(_) => Capabilities::SOURCE,
            Role::Sink(_) => Capabilities::SINK,
            Role::Duplex { .. } => Capabilities::DUPLEX,
            Role::Inert => Capabilities::INERT,
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Source(_) => "source",
            Role::Sink(_) => "sink",
            Role::Duplex { .. } => "duplex",
            Role::Inert => "inert",
        }
    }
}

/// A constructed plugin: the lifecycle view plus its I/O role.
///
/// `plugin` and the role's views point at the same instance unless the role
/// has been replaced by a decorator (see [`PluginHandle::with_role`]).
#[derive(Clone)]
pub struct PluginHandle {
    plugin: Arc<dyn Plugin>,
    role: Role,
}

impl PluginHandle {
    /// Wrap a Readable-only plugin.
    pub fn source<T: Readable>(plugin: T) -> Self {
        let plugin = Arc::new(plugin);
        let base: Arc<dyn Plugin> = plugin.clone();
        Self {
            plugin: base,
            role: Role::Source(plugin),
        }
    }

    /// Wrap a Writable-only plugin.
    pub fn sink<T: Writable>(plugin: T) -> Self {
        let plugin = Arc::new(plugin);
        let base: Arc<dyn Plugin> = plugin.clone();
        Self {
            plugin: base,
            role: Role::Sink(plugin),
        }
    }

    /// Wrap a plugin that is both Readable and Writable.
    pub fn duplex<T: Readable + Writable>(plugin: T) -> Self {
        let plugin = Arc::new(plugin);
        let base: Arc<dyn Plugin> = plugin.clone();
        let reader: Arc<dyn Readable> = plugin.clone();
        let writer: Arc<dyn Writable> = plugin;
        Self {
            plugin: base,
            role: Role::Duplex { reader, writer },
        }
    }

    /// Wrap a plugin with no I/O capability.
    pub fn inert<T: Plugin>(plugin: T) -> Self {
        Self {
            plugin: Arc::new(plugin),
            role: Role::Inert,
        }
    }

    /// Keep the same underlying plugin but expose a different role.
    ///
    /// Decorators use this to swap in wrapped views while lifecycle
    /// operations continue to see the raw instance.
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            plugin: Arc::clone(&self.plugin),
            role,
        }
    }

    /// The undecorated instance.
    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn capabilities(&self) -> Capabilities {
        self.role.capabilities()
    }
}

impl fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.plugin.name())
            .field("kind", &self.plugin.kind())
            .field("role", &self.role.label())
            .finish()
    }
}
