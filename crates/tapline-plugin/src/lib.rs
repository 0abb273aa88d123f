// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin assembly for the Tapline relay.
//!
//! Turns validated settings into a [`PluginSet`]: every configured address
//! goes through the option codec, a typed builder, the optional rate
//! limiter, and finally into the readable/writable/all collections the
//! forwarding loop consumes.

pub mod builders;
pub mod catalog;
pub mod invoker;
pub mod limiter;
pub mod option;
pub mod orchestrator;
pub mod registry;
pub mod spec;

pub use builders::TransportBuilders;
pub use catalog::{builtin_catalog, search_catalog, Direction, TransportDescriptor};
pub use invoker::{construct, Constructed};
pub use limiter::RateGate;
pub use option::{split_option, ParsedOption};
pub use orchestrator::{build_all, plan};
pub use registry::{PluginRegistry, PluginSet};
pub use spec::{CaptureEngine, RawInputOptions, TransportSpec};
