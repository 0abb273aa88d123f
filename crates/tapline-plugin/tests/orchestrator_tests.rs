// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for plugin set assembly against recording builders.

use std::sync::Arc;

use tapline_config::model::{HeaderRule, TaplineConfig};
use tapline_core::{RelayError, TransportKind};
use tapline_plugin::{build_all, CaptureEngine, PluginRegistry};
use tapline_test_utils::{BuildArgs, MockRole, RecordingBuilders};
use tracing_test::traced_test;

fn data_ptr<T: ?Sized>(arc: &Arc<T>) -> *const () {
    Arc::as_ptr(arc) as *const ()
}

/// The builder only ever sees the bare address.
#[test]
fn limit_suffix_is_stripped_before_building() {
    let mut config = TaplineConfig::default();
    config.output.tcp = vec!["relay-b:28020|10".into(), "relay-c:28020|5|junk".into()];
    config.input.raw = vec![":80|50%".into()];

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    assert_eq!(builders.addresses(), vec![":80", "relay-b:28020", "relay-c:28020"]);
    assert_eq!(set.readable().len(), 1);
    assert_eq!(set.writable().len(), 2);
}

/// A limited plugin is decorated for I/O; `all` keeps the raw instance.
#[test]
fn all_holds_the_undecorated_instance() {
    let mut config = TaplineConfig::default();
    config.output.tcp = vec!["limited:1|3".into(), "plain:2".into()];

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    assert_ne!(data_ptr(&set.all()[0]), data_ptr(&set.writable()[0]));
    assert_eq!(data_ptr(&set.all()[1]), data_ptr(&set.writable()[1]));
    assert_eq!(set.all()[0].name(), "limited:1");
    assert_eq!(set.writable()[0].name(), "limited:1");
}

/// Writes beyond the limit are acknowledged but never reach the transport.
#[tokio::test(start_paused = true)]
async fn limited_output_drops_excess_writes() {
    let mut config = TaplineConfig::default();
    config.output.tcp = vec!["relay-b:28020|2".into()];

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();
    let writer = &set.writable()[0];

    for _ in 0..5 {
        assert_eq!(writer.write_payload(b"payload").await.unwrap(), 7);
    }
    assert_eq!(builders.plugins()[0].written_count(), 2);
}

/// Limit text that does not parse still builds and is decorated.
#[test]
#[traced_test]
fn unparsable_limit_still_builds_decorated() {
    let mut config = TaplineConfig::default();
    config.input.dummy = vec!["gen|fast".into()];

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    assert_eq!(builders.addresses(), vec!["gen"]);
    assert_eq!(set.readable().len(), 1);
    assert_ne!(data_ptr(&set.all()[0]), data_ptr(&set.readable()[0]));
    assert!(logs_contain("unparsable rate limit"));
}

/// The fallback for an unreadable count passes nothing.
#[tokio::test(start_paused = true)]
async fn unparsable_limit_drops_every_write() {
    let mut config = TaplineConfig::default();
    config.output.http = vec!["http://staging|often".into()];

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    for _ in 0..3 {
        assert_eq!(set.writable()[0].write_payload(b"GET /").await.unwrap(), 5);
    }
    assert_eq!(builders.plugins()[0].written_count(), 0);
}

#[test]
fn s3_addresses_route_to_object_storage() {
    let mut config = TaplineConfig::default();
    config.output.file = vec!["s3://bucket/traffic.gor|10".into(), "/var/log/traffic.gor".into()];

    let builders = RecordingBuilders::new();
    build_all(&config, &builders).unwrap();

    assert_eq!(
        builders.kinds(),
        vec![TransportKind::S3Output, TransportKind::FileOutput]
    );
    assert_eq!(builders.addresses()[0], "s3://bucket/traffic.gor");
}

/// A Host rewrite anywhere in the rule list reaches every HTTP output.
#[test]
fn host_rule_reaches_every_http_output() {
    let mut config = TaplineConfig::default();
    config.output.http = vec!["http://a".into(), "http://b|10".into()];
    config.modifier.headers = vec![
        HeaderRule { name: "User-Agent".into(), value: "replay".into() },
        HeaderRule { name: "Host".into(), value: "staging.example.com".into() },
    ];

    let builders = RecordingBuilders::new();
    build_all(&config, &builders).unwrap();

    let configs: Vec<_> = builders
        .calls()
        .into_iter()
        .filter_map(|call| match call.args {
            BuildArgs::Http(config) => Some(config),
            _ => None,
        })
        .collect();
    assert_eq!(configs.len(), 2);
    assert!(configs.iter().all(|c| c.original_host));
    assert!(Arc::ptr_eq(&configs[0], &configs[1]));
}

#[test]
fn no_host_rule_leaves_original_host_unset() {
    let mut config = TaplineConfig::default();
    config.output.http = vec!["http://a".into()];
    config.modifier.headers = vec![HeaderRule { name: "X-Host".into(), value: "x".into() }];

    let builders = RecordingBuilders::new();
    build_all(&config, &builders).unwrap();

    match &builders.calls()[0].args {
        BuildArgs::Http(config) => assert!(!config.original_host),
        other => panic!("expected http args, got {other:?}"),
    }
}

#[test]
fn kafka_needs_both_host_and_topic() {
    let mut config = TaplineConfig::default();
    config.output.kafka.host = "broker:9092".into();
    config.input.kafka.host = "broker:9092".into();
    config.input.kafka.topic = "captured".into();

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    assert_eq!(builders.kinds(), vec![TransportKind::KafkaInput]);
    assert_eq!(builders.addresses(), vec![""]);
    assert_eq!(set.readable().len(), 1);
}

/// Duplex plugins are registered as writable only.
#[test]
fn duplex_plugins_land_in_writable_only() {
    let mut config = TaplineConfig::default();
    config.output.http = vec!["http://staging".into()];
    config.input.file = vec!["requests.gor".into()];

    let builders = RecordingBuilders::new().with_role(TransportKind::HttpOutput, MockRole::Duplex);
    let set = build_all(&config, &builders).unwrap();

    assert_eq!(set.readable().len(), 1);
    assert_eq!(set.readable()[0].kind(), TransportKind::FileInput);
    assert_eq!(set.writable().len(), 1);
    assert_eq!(set.writable()[0].kind(), TransportKind::HttpOutput);
    assert_eq!(set.all().len(), 2);
}

#[test]
fn inert_plugins_only_reach_all() {
    let mut config = TaplineConfig::default();
    config.output.null = true;

    let builders = RecordingBuilders::new().with_role(TransportKind::NullOutput, MockRole::Inert);
    let set = build_all(&config, &builders).unwrap();

    assert!(set.readable().is_empty());
    assert!(set.writable().is_empty());
    assert_eq!(set.all().len(), 1);
}

#[test]
fn stdout_and_dummy_count_add_up() {
    let mut config = TaplineConfig::default();
    config.output.dummy = 2;
    config.output.stdout = true;

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    assert_eq!(set.summary(), vec![(TransportKind::DummyOutput, 3)]);
    assert_eq!(set.writable().len(), 3);
}

#[test]
fn raw_engine_is_chosen_once_for_every_capture() {
    let mut config = TaplineConfig::default();
    config.input.raw = vec![":80".into(), ":8080".into()];
    config.input.raw_options.engine = "pcap_file".into();

    let builders = RecordingBuilders::new();
    build_all(&config, &builders).unwrap();

    let options: Vec<_> = builders
        .calls()
        .into_iter()
        .filter_map(|call| match call.args {
            BuildArgs::Raw(options) => Some(options),
            _ => None,
        })
        .collect();
    assert_eq!(options.len(), 2);
    assert!(options.iter().all(|o| o.engine == CaptureEngine::PcapFile));

    config.input.raw_options.engine = "af_xdp".into();
    let builders = RecordingBuilders::new();
    build_all(&config, &builders).unwrap();
    match &builders.calls()[0].args {
        BuildArgs::Raw(options) => assert_eq!(options.engine, CaptureEngine::Libpcap),
        other => panic!("expected raw args, got {other:?}"),
    }
}

#[test]
fn file_input_receives_loop_flag() {
    let mut config = TaplineConfig::default();
    config.input.file = vec!["requests.gor|20%".into()];
    config.input.file_loop = true;

    let builders = RecordingBuilders::new();
    build_all(&config, &builders).unwrap();

    assert!(matches!(builders.calls()[0].args, BuildArgs::Looped(true)));
    assert_eq!(builders.addresses(), vec!["requests.gor"]);
}

/// The first builder failure stops the pass.
#[test]
fn builder_failure_aborts_the_pass() {
    let mut config = TaplineConfig::default();
    config.output.file = vec!["out.gor".into()];
    config.output.http = vec!["http://never-built".into()];

    let builders = RecordingBuilders::new().failing_on(TransportKind::FileOutput);
    let err = build_all(&config, &builders).unwrap_err();

    assert!(matches!(
        err,
        RelayError::Construction { kind: TransportKind::FileOutput, .. }
    ));
    assert_eq!(builders.kinds(), vec![TransportKind::FileOutput]);
    assert!(err.to_string().contains("out.gor"));
}

/// A failed populate leaves the registry as it was.
#[test]
fn failed_populate_keeps_nothing() {
    let mut config = TaplineConfig::default();
    config.output.tcp = vec!["ok:1".into()];
    config.output.http = vec!["http://broken".into()];

    let registry = PluginRegistry::new();
    let builders = RecordingBuilders::new().failing_on(TransportKind::HttpOutput);
    assert!(registry.populate(&config, &builders).is_err());
    assert!(registry.is_empty().unwrap());

    let builders = RecordingBuilders::new();
    registry.populate(&config, &builders).unwrap();
    registry.populate(&config, &builders).unwrap();
    // Populating twice duplicates every entry.
    assert_eq!(registry.len().unwrap(), 4);
}

/// `build_all` assembles through a registry populate pass.
#[test]
#[traced_test]
fn build_all_goes_through_the_registry() {
    let mut config = TaplineConfig::default();
    config.output.null = true;

    let set = build_all(&config, &RecordingBuilders::new()).unwrap();
    assert_eq!(set.len(), 1);
    assert!(logs_contain("plugin registry populated"));
}

/// Concurrent populate passes serialize on the registry lock; none is lost.
#[test]
fn concurrent_populate_loses_nothing() {
    const PASSES: usize = 8;

    let mut config = TaplineConfig::default();
    config.input.dummy = vec!["gen|5".into()];
    config.output.tcp = vec!["relay-b:28020".into()];
    config.output.http = vec!["http://staging".into()];

    let registry = PluginRegistry::new();
    let builders = RecordingBuilders::new();
    std::thread::scope(|scope| {
        for _ in 0..PASSES {
            scope.spawn(|| registry.populate(&config, &builders).unwrap());
        }
    });

    let set = registry.into_set().unwrap();
    assert_eq!(set.all().len(), PASSES * 3);
    assert_eq!(set.readable().len(), PASSES);
    assert_eq!(set.writable().len(), PASSES * 2);
    assert_eq!(builders.calls().len(), PASSES * 3);

    // Each pass lands as one contiguous block in plan order.
    for (pass, block) in set.all().chunks(3).enumerate() {
        let kinds: Vec<_> = block.iter().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            vec![TransportKind::DummyInput, TransportKind::TcpOutput, TransportKind::HttpOutput]
        );
        assert_ne!(data_ptr(&block[0]), data_ptr(&set.readable()[pass]));
    }
}

#[tokio::test]
async fn close_all_reaches_every_original() {
    let mut config = TaplineConfig::default();
    config.input.tcp = vec![":28020|5".into()];
    config.output.stdout = true;

    let builders = RecordingBuilders::new();
    let set = build_all(&config, &builders).unwrap();

    assert!(set.close_all().await.is_empty());
    assert!(builders.plugins().iter().all(|p| p.is_closed()));
}
