// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tapline check` command implementation.
//!
//! Builds the full plugin set from validated configuration, reports what
//! was assembled, then closes everything again. Nothing is opened, since
//! the built-in transports connect lazily.

use std::io::IsTerminal;

use serde::Serialize;

use tapline_config::model::TaplineConfig;
use tapline_core::{RelayError, TransportKind};
use tapline_plugin::{build_all, PluginSet, TransportBuilders};
use tapline_transport::BuiltinBuilders;

/// Structured check output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub readable: usize,
    pub writable: usize,
    pub total: usize,
    pub transports: Vec<KindCount>,
    pub close_failures: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct KindCount {
    pub kind: TransportKind,
    pub count: usize,
}

impl CheckReport {
    fn new(set: &PluginSet, failures: &[(String, RelayError)]) -> Self {
        Self {
            readable: set.readable().len(),
            writable: set.writable().len(),
            total: set.all().len(),
            transports: set
                .summary()
                .into_iter()
                .map(|(kind, count)| KindCount { kind, count })
                .collect(),
            close_failures: failures
                .iter()
                .map(|(name, e)| format!("{name}: {e}"))
                .collect(),
        }
    }
}

/// Assemble, report, and close the plugin set described by `config`.
pub async fn run_check(config: &TaplineConfig, json: bool) -> Result<(), RelayError> {
    let report = assemble(config, &BuiltinBuilders::new()).await?;
    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| RelayError::Internal(format!("failed to render report: {e}")))?;
        println!("{rendered}");
    } else {
        print_report(&report, std::io::stdout().is_terminal());
    }
    Ok(())
}

async fn assemble(
    config: &TaplineConfig,
    builders: &dyn TransportBuilders,
) -> Result<CheckReport, RelayError> {
    let set = build_all(config, builders)?;
    let failures = set.close_all().await;
    Ok(CheckReport::new(&set, &failures))
}

fn print_report(report: &CheckReport, use_color: bool) {
    println!();
    println!("  tapline check");
    println!("  {}", "-".repeat(35));

    if report.total == 0 {
        println!("    No transports configured.");
        println!();
        return;
    }

    for entry in &report.transports {
        println!("    {:<16} {}", entry.kind.to_string(), entry.count);
    }
    println!("  {}", "-".repeat(35));
    println!(
        "    readable: {}  writable: {}  total: {}",
        report.readable, report.writable, report.total
    );

    if use_color {
        use colored::Colorize;
        if report.close_failures.is_empty() {
            println!("    State:    {} {}", "✓".green(), "ok".green());
        } else {
            println!("    State:    {} {}", "✗".red(), "close failures".red());
        }
    } else if report.close_failures.is_empty() {
        println!("    State:    [OK]");
    } else {
        println!("    State:    [FAIL] close failures");
    }
    for failure in &report.close_failures {
        println!("      {failure}");
    }
    println!();
}
