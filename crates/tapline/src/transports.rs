// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tapline transports` command implementation.

use tapline_plugin::{search_catalog, TransportDescriptor};

/// Print catalog entries matching `query` (all of them when `None`).
pub fn run_transports(query: Option<&str>) {
    let entries = search_catalog(query.unwrap_or_default());
    if entries.is_empty() {
        println!("No transports match `{}`.", query.unwrap_or_default());
        return;
    }
    for entry in &entries {
        println!("{}", format_row(entry));
    }
}

fn format_row(entry: &TransportDescriptor) -> String {
    let suffix = if entry.limit_eligible { " (accepts |limit)" } else { "" };
    format!(
        "{:<14} {:<6} {:<28} {}{suffix}",
        entry.kind.to_string(),
        entry.direction.to_string(),
        entry.config_section,
        entry.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapline_plugin::builtin_catalog;

    #[test]
    fn rows_mark_limit_eligibility() {
        let catalog = builtin_catalog();
        let tcp = catalog
            .iter()
            .find(|d| d.config_section == "output.tcp")
            .unwrap();
        let row = format_row(tcp);
        assert!(row.starts_with("tcp-output"));
        assert!(row.ends_with("(accepts |limit)"));

        let kafka = catalog
            .iter()
            .find(|d| d.config_section == "output.kafka")
            .unwrap();
        assert!(!format_row(kafka).contains("accepts"));
    }
}
