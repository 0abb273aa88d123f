// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsed rate limit specifications (the part after `|` in an address).

use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

/// A throughput ceiling attached to a single plugin.
///
/// `"10"` allows ten messages per second; `"25%"` passes roughly a quarter
/// of all messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    PerSecond(u64),
    Percent(u8),
}

impl RateLimit {
    /// Parse a limit that must not fail.
    ///
    /// Anything [`FromStr`] rejects still yields a gate: an unreadable count
    /// becomes zero, which passes nothing, and a percentage is clamped to
    /// `0..=100`. The parse error comes back alongside for reporting.
    pub fn parse_lenient(raw: &str) -> (RateLimit, Option<RelayError>) {
        match raw.parse() {
            Ok(limit) => (limit, None),
            Err(e) => (Self::fallback(raw), Some(e)),
        }
    }

    fn fallback(raw: &str) -> RateLimit {
        match raw.trim().strip_suffix('%') {
            Some(pct) => {
                let pct = pct.trim().parse::<u64>().map_or(0, |p| p.min(100));
                RateLimit::Percent(u8::try_from(pct).unwrap_or(100))
            }
            None => RateLimit::PerSecond(0),
        }
    }
}

impl FromStr for RateLimit {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RelayError::InvalidLimit {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if let Some(pct) = trimmed.strip_suffix('%') {
            let value: u8 = pct
                .trim()
                .parse()
                .map_err(|_| invalid("percentage must be an integer between 1 and 100"))?;
            if value == 0 || value > 100 {
                return Err(invalid("percentage must be an integer between 1 and 100"));
            }
            return Ok(RateLimit::Percent(value));
        }

        let value: u64 = trimmed
            .parse()
            .map_err(|_| invalid("expected a message count per second or a percentage"))?;
        if value == 0 {
            return Err(invalid("per-second limit must be greater than zero"));
        }
        Ok(RateLimit::PerSecond(value))
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimit::PerSecond(n) => write!(f, "{n}/s"),
            RateLimit::Percent(p) => write!(f, "{p}%"),
        }
    }
}
