// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup assembly: turn settings into an ordered plan and build it.

use std::sync::Arc;

use tracing::debug;

use tapline_config::model::TaplineConfig;
use tapline_core::RelayError;

use crate::builders::TransportBuilders;
use crate::invoker::construct;
use crate::registry::{PluginRegistry, PluginSet};
use crate::spec::{RawInputOptions, TransportSpec};

/// Every registration `config` asks for, in the fixed startup order.
///
/// Inputs and outputs interleave the way the relay has always registered
/// them; downstream code relies on `readable`/`writable` following it.
pub fn plan(config: &TaplineConfig) -> Vec<TransportSpec> {
    let input = &config.input;
    let output = &config.output;
    let mut specs = Vec::new();

    specs.extend(
        input
            .dummy
            .iter()
            .map(|address| TransportSpec::DummyInput { address: address.clone() }),
    );

    let dummy_outputs = output.dummy + usize::from(output.stdout);
    specs.extend((0..dummy_outputs).map(|_| TransportSpec::DummyOutput));

    if output.null {
        specs.push(TransportSpec::NullOutput);
    }

    let raw_options = Arc::new(RawInputOptions::from_config(&input.raw_options));
    specs.extend(input.raw.iter().map(|address| TransportSpec::RawInput {
        address: address.clone(),
        options: Arc::clone(&raw_options),
    }));

    let tcp_in = Arc::new(input.tcp_config.clone());
    specs.extend(input.tcp.iter().map(|address| TransportSpec::TcpInput {
        address: address.clone(),
        config: Arc::clone(&tcp_in),
    }));

    let tcp_out = Arc::new(output.tcp_config.clone());
    specs.extend(output.tcp.iter().map(|address| TransportSpec::TcpOutput {
        address: address.clone(),
        config: Arc::clone(&tcp_out),
    }));

    specs.extend(input.file.iter().map(|address| TransportSpec::FileInput {
        address: address.clone(),
        looped: input.file_loop,
    }));

    let file_config = Arc::new(output.file_config.clone());
    specs.extend(
        output
            .file
            .iter()
            .map(|address| TransportSpec::file_output(address.clone(), Arc::clone(&file_config))),
    );

    specs.extend(
        input
            .http
            .iter()
            .map(|address| TransportSpec::HttpInput { address: address.clone() }),
    );

    // Settled before the first HTTP output so every one shares the same value.
    let mut http_config = output.http_config.clone();
    if config.modifier.overrides_host() {
        debug!("Host header rewrite configured, keeping original Host on HTTP outputs");
        http_config.original_host = true;
    }
    let http_config = Arc::new(http_config);
    specs.extend(output.http.iter().map(|address| TransportSpec::HttpOutput {
        address: address.clone(),
        config: Arc::clone(&http_config),
    }));

    let binary_config = Arc::new(output.binary_config.clone());
    specs.extend(output.binary.iter().map(|address| TransportSpec::BinaryOutput {
        address: address.clone(),
        config: Arc::clone(&binary_config),
    }));

    if output.kafka.is_configured() {
        specs.push(TransportSpec::KafkaOutput {
            config: Arc::new(output.kafka.clone()),
        });
    }

    if input.kafka.is_configured() {
        specs.push(TransportSpec::KafkaInput {
            config: Arc::new(input.kafka.clone()),
        });
    }

    specs
}

/// Construct every planned transport into `set`, stopping at the first failure.
pub(crate) fn register_all(
    set: &mut PluginSet,
    config: &TaplineConfig,
    builders: &dyn TransportBuilders,
) -> Result<(), RelayError> {
    for spec in plan(config) {
        let constructed = construct(builders, spec)?;
        set.insert(&constructed.wrapped, constructed.original());
    }
    Ok(())
}

/// Build the relay's plugin set from `config`.
///
/// Runs one [`PluginRegistry::populate`] pass on a fresh registry. Any
/// builder failure aborts the whole pass; no partial set is returned.
pub fn build_all(
    config: &TaplineConfig,
    builders: &dyn TransportBuilders,
) -> Result<PluginSet, RelayError> {
    let registry = PluginRegistry::new();
    registry.populate(config, builders)?;
    registry.into_set()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapline_config::model::HeaderRule;
    use tapline_core::TransportKind;
    use tracing_test::traced_test;

    fn kinds(config: &TaplineConfig) -> Vec<TransportKind> {
        plan(config).iter().map(TransportSpec::kind).collect()
    }

    #[test]
    fn empty_config_plans_nothing() {
        assert!(plan(&TaplineConfig::default()).is_empty());
    }

    #[test]
    #[traced_test]
    fn host_rule_is_logged() {
        let mut config = TaplineConfig::default();
        config.modifier.headers = vec![HeaderRule { name: "Host".into(), value: "b".into() }];
        plan(&config);
        assert!(logs_contain("keeping original Host"));
    }

    #[test]
    fn registration_order_is_fixed() {
        let mut config = TaplineConfig::default();
        config.input.kafka.host = "broker:9092".into();
        config.input.kafka.topic = "in".into();
        config.output.kafka.host = "broker:9092".into();
        config.output.kafka.topic = "out".into();
        config.output.binary = vec![":9000".into()];
        config.output.http = vec!["http://a".into()];
        config.input.http = vec![":8081".into()];
        config.output.file = vec!["out.gor".into()];
        config.input.file = vec!["in.gor".into()];
        config.output.tcp = vec!["relay:28020".into()];
        config.input.tcp = vec![":28020".into()];
        config.input.raw = vec![":80".into()];
        config.output.null = true;
        config.output.stdout = true;
        config.input.dummy = vec!["gen".into()];

        assert_eq!(
            kinds(&config),
            vec![
                TransportKind::DummyInput,
                TransportKind::DummyOutput,
                TransportKind::NullOutput,
                TransportKind::RawInput,
                TransportKind::TcpInput,
                TransportKind::TcpOutput,
                TransportKind::FileInput,
                TransportKind::FileOutput,
                TransportKind::HttpInput,
                TransportKind::HttpOutput,
                TransportKind::BinaryOutput,
                TransportKind::KafkaOutput,
                TransportKind::KafkaInput,
            ]
        );
    }

    #[test]
    fn stdout_adds_one_dummy_output() {
        let mut config = TaplineConfig::default();
        config.output.dummy = 2;
        config.output.stdout = true;
        assert_eq!(kinds(&config), vec![TransportKind::DummyOutput; 3]);
    }

    #[test]
    fn host_rule_sets_original_host_for_every_http_output() {
        let mut config = TaplineConfig::default();
        config.output.http = vec!["http://a".into(), "http://b".into()];
        config.modifier.headers = vec![
            HeaderRule { name: "X-Test".into(), value: "1".into() },
            HeaderRule { name: "Host".into(), value: "staging".into() },
        ];

        let flags: Vec<bool> = plan(&config)
            .into_iter()
            .filter_map(|spec| match spec {
                TransportSpec::HttpOutput { config, .. } => Some(config.original_host),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![true, true]);
        // The loaded settings themselves are left untouched.
        assert!(!config.output.http_config.original_host);
    }

    #[test]
    fn lowercase_host_rule_is_not_a_host_rewrite() {
        let mut config = TaplineConfig::default();
        config.output.http = vec!["http://a".into()];
        config.modifier.headers = vec![HeaderRule { name: "host".into(), value: "staging".into() }];

        let flags: Vec<bool> = plan(&config)
            .into_iter()
            .filter_map(|spec| match spec {
                TransportSpec::HttpOutput { config, .. } => Some(config.original_host),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![false]);
    }

    #[test]
    fn half_configured_kafka_is_skipped() {
        let mut config = TaplineConfig::default();
        config.output.kafka.host = "broker:9092".into();
        config.input.kafka.topic = "orphan".into();
        assert!(plan(&config).is_empty());
    }
}
