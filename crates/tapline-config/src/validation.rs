// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: address entries must
//! name something before any `|`, and worker counts must be positive. Limit
//! text after `|` is never rejected here; construction falls back for
//! anything that does not parse. Duplicate addresses are legal; they express
//! fan-out to identical endpoints.

use crate::diagnostic::ConfigError;
use crate::model::TaplineConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TaplineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.relay.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "relay.log_level `{}` must be one of: {}",
                config.relay.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let address_lists: [(&str, &[String]); 9] = [
        ("input.dummy", config.input.dummy.as_slice()),
        ("input.raw", config.input.raw.as_slice()),
        ("input.tcp", config.input.tcp.as_slice()),
        ("input.file", config.input.file.as_slice()),
        ("input.http", config.input.http.as_slice()),
        ("output.tcp", config.output.tcp.as_slice()),
        ("output.file", config.output.file.as_slice()),
        ("output.http", config.output.http.as_slice()),
        ("output.binary", config.output.binary.as_slice()),
    ];
    for (key, entries) in address_lists {
        for (i, entry) in entries.iter().enumerate() {
            validate_address_entry(&format!("{key}[{i}]"), entry, &mut errors);
        }
    }

    if config.output.http_config.workers == 0 {
        errors.push(ConfigError::Validation {
            message: "output.http_config.workers must be at least 1".to_string(),
        });
    }

    if config.output.binary_config.workers == 0 {
        errors.push(ConfigError::Validation {
            message: "output.binary_config.workers must be at least 1".to_string(),
        });
    }

    if config.output.binary_config.buffer_size == 0 {
        errors.push(ConfigError::Validation {
            message: "output.binary_config.buffer_size must be greater than zero".to_string(),
        });
    }

    if config.output.file_config.queue_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "output.file_config.queue_limit must be at least 1".to_string(),
        });
    }

    if config.input.tcp_config.secure
        && (config.input.tcp_config.certificate_path.is_none()
            || config.input.tcp_config.key_path.is_none())
    {
        errors.push(ConfigError::Validation {
            message: "input.tcp_config.secure requires certificate_path and key_path".to_string(),
        });
    }

    for (i, rule) in config.modifier.headers.iter().enumerate() {
        if rule.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("modifier.headers[{i}].name must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An entry is `address` or `address|limit`; segments after a second `|` are ignored.
fn validate_address_entry(key: &str, entry: &str, errors: &mut Vec<ConfigError>) {
    let address = entry.split('|').next().unwrap_or_default();
    if address.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{entry}` has no address"),
        });
    }
}
