// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in transport catalog.
//!
//! Describes every transport kind the relay can register: its direction,
//! the config section that enables it, and whether it accepts a `|limit`.

use serde::Serialize;
use strum::{Display, IntoEnumIterator};

use tapline_core::TransportKind;

/// Which side of the relay a transport sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportDescriptor {
    pub kind: TransportKind,
    pub description: &'static str,
    pub direction: Direction,
    /// Config key holding this transport's address list or switch.
    pub config_section: &'static str,
    pub limit_eligible: bool,
}

fn describe(kind: TransportKind) -> TransportDescriptor {
    let (direction, config_section, description) = match kind {
        TransportKind::DummyInput => {
            (Direction::Input, "input.dummy", "Synthetic request generator")
        }
        TransportKind::DummyOutput => (
            Direction::Output,
            "output.dummy / output.stdout",
            "Prints payloads to standard output",
        ),
        TransportKind::NullOutput => (Direction::Output, "output.null", "Discards every payload"),
        TransportKind::RawInput => (
            Direction::Input,
            "input.raw",
            "Packet capture via libpcap, raw socket, or pcap file replay",
        ),
        TransportKind::TcpInput => (
            Direction::Input,
            "input.tcp",
            "Accepts payloads relayed from another instance over TCP",
        ),
        TransportKind::TcpOutput => (
            Direction::Output,
            "output.tcp",
            "Relays payloads to another instance over TCP",
        ),
        TransportKind::FileInput => (
            Direction::Input,
            "input.file",
            "Replays payloads from a recorded file, optionally looping",
        ),
        TransportKind::FileOutput => (
            Direction::Output,
            "output.file",
            "Records payloads to a local file",
        ),
        TransportKind::S3Output => (
            Direction::Output,
            "output.file (s3://)",
            "Records payloads to S3-compatible object storage",
        ),
        TransportKind::HttpInput => (
            Direction::Input,
            "input.http",
            "HTTP endpoint that accepts requests to replay",
        ),
        TransportKind::HttpOutput => (
            Direction::Output,
            "output.http",
            "Replays requests against an HTTP upstream, optionally tracking responses",
        ),
        TransportKind::BinaryOutput => (
            Direction::Output,
            "output.binary",
            "Replays binary protocol payloads over TCP",
        ),
        TransportKind::KafkaInput => (
            Direction::Input,
            "input.kafka",
            "Consumes payloads from a Kafka topic",
        ),
        TransportKind::KafkaOutput => (
            Direction::Output,
            "output.kafka",
            "Publishes payloads to a Kafka topic",
        ),
    };
    TransportDescriptor {
        kind,
        description,
        direction,
        config_section,
        limit_eligible: kind.limit_eligible(),
    }
}

/// Returns descriptors for every transport kind, in declaration order.
pub fn builtin_catalog() -> Vec<TransportDescriptor> {
    TransportKind::iter().map(describe).collect()
}

/// Search the catalog by kind name, description, or config section.
///
/// Case-insensitive. An empty query returns everything.
pub fn search_catalog(query: &str) -> Vec<TransportDescriptor> {
    if query.is_empty() {
        return builtin_catalog();
    }
    let query_lower = query.to_lowercase();
    builtin_catalog()
        .into_iter()
        .filter(|d| {
            d.kind.to_string().contains(&query_lower)
                || d.description.to_lowercase().contains(&query_lower)
                || d.config_section.contains(&query_lower)
        })
        .collect()
}
