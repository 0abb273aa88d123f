// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin trait definitions.
//!
//! Every transport implements the [`Plugin`] base trait plus zero, one, or
//! both of [`Readable`] and [`Writable`]. All traits use `#[async_trait]` so
//! they stay object safe.

pub mod plugin;
pub mod readable;
pub mod writable;

pub use plugin::Plugin;
pub use readable::Readable;
pub use writable::Writable;
