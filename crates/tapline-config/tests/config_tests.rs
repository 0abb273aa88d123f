// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Tapline configuration system.

use tapline_config::diagnostic::ConfigError;
use tapline_config::model::TaplineConfig;
use tapline_config::{load_and_validate_str, load_config_from_str};

/// A full relay topology deserializes into the expected structure.
#[test]
fn valid_toml_deserializes_into_tapline_config() {
    let toml = r#"
[relay]
log_level = "debug"

[input]
raw = [":80", ":8080|10"]
file = ["requests.gor"]
file_loop = true

[input.raw_options]
engine = "raw_socket"
track_response = true
expire_secs = 5
bpf_filter = "tcp port 80"
buffer_size = 33554432

[input.kafka]
host = "broker:9092"
topic = "captured"

[output]
stdout = true
dummy = 2
http = ["http://staging:8080|50%"]
file = ["s3://bucket/traffic.gor", "/var/log/traffic.gor"]

[output.http_config]
workers = 4
track_responses = true

[[modifier.headers]]
name = "Host"
value = "staging.example.com"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.relay.log_level, "debug");
    assert_eq!(config.input.raw, vec![":80", ":8080|10"]);
    assert!(config.input.file_loop);
    assert_eq!(config.input.raw_options.engine, "raw_socket");
    assert!(config.input.raw_options.track_response);
    assert_eq!(config.input.raw_options.expire_secs, 5);
    assert_eq!(config.input.raw_options.bpf_filter, "tcp port 80");
    assert_eq!(config.input.raw_options.buffer_size, 33_554_432);
    assert!(config.input.kafka.is_configured());
    assert!(config.output.stdout);
    assert_eq!(config.output.dummy, 2);
    assert_eq!(config.output.http_config.workers, 4);
    assert!(config.output.http_config.track_responses);
    assert_eq!(config.output.file.len(), 2);
    assert_eq!(config.modifier.headers[0].name, "Host");
    assert!(config.modifier.overrides_host());
}

/// Unknown field in a nested section is rejected.
#[test]
fn unknown_field_in_http_config_produces_error() {
    let toml = r#"
[output.http_config]
wokers = 4
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("wokers"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Diagnostics carry the qualified key and a suggestion.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[output]
nul = true
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => key.ends_with("nul") && suggestion.as_deref() == Some("null"),
        _ => false,
    });
    assert!(found, "expected unknown key diagnostic, got: {errors:?}");
}

/// Wrong value types become InvalidType diagnostics.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[output]
dummy = "two"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("dummy"))));
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.relay.log_level, "info");
    assert!(config.input.dummy.is_empty());
    assert!(config.input.raw.is_empty());
    assert!(!config.input.file_loop);
    assert!(!config.input.kafka.is_configured());
    assert_eq!(config.output.dummy, 0);
    assert!(!config.output.stdout);
    assert!(!config.output.null);
    assert_eq!(config.output.http_config.timeout_ms, 5000);
    assert_eq!(config.output.binary_config.buffer_size, 64 * 1024);
    assert!(config.modifier.headers.is_empty());
}

/// Limit text is left to construction; only a missing address fails validation.
#[test]
fn validation_ignores_limit_text_after_load() {
    let toml = r#"
[output]
tcp = ["relay-b:28020|often", "|10"]
"#;

    let errors = load_and_validate_str(toml).expect_err("missing address should fail validation");
    assert_eq!(errors.len(), 1);
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("output.tcp[1]"))
    ));
}

/// Dotted overrides (what `TAPLINE_*` env vars map to) merge over TOML.
#[test]
fn dotted_override_sets_nested_key() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[output.http_config]
workers = 2
"#;

    let config: TaplineConfig = Figment::new()
        .merge(Serialized::defaults(TaplineConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("output.http_config.original_host", true))
        .extract()
        .expect("should merge override");

    assert_eq!(config.output.http_config.workers, 2);
    assert!(config.output.http_config.original_host);
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: TaplineConfig = Figment::new()
        .merge(Serialized::defaults(TaplineConfig::default()))
        .merge(Toml::file("/nonexistent/path/tapline.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.relay.log_level, "info");
}

/// Config errors render through miette without panicking.
#[test]
fn config_errors_render() {
    use miette::Diagnostic;

    let err = ConfigError::Validation {
        message: "output.http_config.workers must be at least 1".into(),
    };
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("tapline::config::validation"));
    tapline_config::render_errors(&[err]);
}
