// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Later layers win: `/etc/tapline/tapline.toml`, then
//! `~/.config/tapline/tapline.toml`, then `./tapline.toml`, then `TAPLINE_*`
//! environment variables.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TaplineConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tapline/tapline.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tapline.toml";

/// Env var key prefixes (lowercased, `TAPLINE_` stripped) and the dotted
/// section they map to. Longer prefixes come first so nested sections win
/// over their parents.
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("input_raw_options_", "input.raw_options."),
    ("input_tcp_config_", "input.tcp_config."),
    ("input_kafka_", "input.kafka."),
    ("output_tcp_config_", "output.tcp_config."),
    ("output_file_config_", "output.file_config."),
    ("output_http_config_", "output.http_config."),
    ("output_binary_config_", "output.binary_config."),
    ("output_kafka_", "output.kafka."),
    ("relay_", "relay."),
    ("input_", "input."),
    ("output_", "output."),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tapline/tapline.toml` (system-wide)
/// 3. `~/.config/tapline/tapline.toml` (user XDG config)
/// 4. `./tapline.toml` (local directory)
/// 5. `TAPLINE_*` environment variables
pub fn load_config() -> Result<TaplineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TaplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaplineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TaplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaplineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TaplineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/tapline/tapline.toml`, when the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("tapline").join(LOCAL_CONFIG_FILE))
}

/// Map a lowercased, prefix-stripped env var name to its dotted config key.
///
/// Uses an explicit section table rather than `Env::split("_")`, since key
/// names contain underscores: `TAPLINE_OUTPUT_HTTP_CONFIG_ORIGINAL_HOST` must
/// become `output.http_config.original_host`.
pub fn map_env_key(key: &str) -> String {
    for (prefix, section) in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(prefix) {
            return format!("{section}{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("TAPLINE_").map(|key| map_env_key(key.as_str()).into())
}
