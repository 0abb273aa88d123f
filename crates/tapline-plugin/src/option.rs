// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Address option codec.
//!
//! A configured address may carry a rate limit after the reserved `|`
//! delimiter: `"127.0.0.1:8080|10"`. Only the first two segments are
//! meaningful; anything after a second `|` is ignored.

/// Reserved delimiter between an address and its rate limit.
pub const LIMIT_DELIMITER: char = '|';

/// An address split from its optional rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedOption<'a> {
    pub address: &'a str,
    /// `None` unless a non-empty segment followed the first delimiter.
    pub limit: Option<&'a str>,
}

/// Split a raw option string into address and limit. Never fails.
pub fn split_option(raw: &str) -> ParsedOption<'_> {
    let mut segments = raw.split(LIMIT_DELIMITER);
    let address = segments.next().unwrap_or(raw);
    let limit = segments.next().filter(|limit| !limit.is_empty());
    ParsedOption { address, limit }
}
