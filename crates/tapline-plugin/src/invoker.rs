// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constructor invocation: strip the limit, build, decorate.

use std::sync::Arc;

use tracing::{debug, warn};

use tapline_core::{Plugin, PluginHandle, RateLimit, RelayError};

use crate::builders::{dispatch, TransportBuilders};
use crate::limiter;
use crate::option::split_option;
use crate::spec::TransportSpec;

/// The result of one constructor invocation.
#[derive(Debug, Clone)]
pub struct Constructed {
    /// What the I/O paths see: rate limited when a limit was parsed.
    pub wrapped: PluginHandle,
    /// The limit applied to `wrapped`, if any.
    pub limit: Option<RateLimit>,
}

impl Constructed {
    /// The undecorated instance, for lifecycle and introspection.
    pub fn original(&self) -> Arc<dyn Plugin> {
        Arc::clone(self.wrapped.plugin())
    }
}

/// Build one plugin from its spec.
///
/// For limit-eligible kinds the address is split on `|`; the builder only
/// ever sees the bare address. A limit that does not parse is logged and
/// replaced by its lenient fallback, so limit text never fails a build.
pub fn construct(
    builders: &dyn TransportBuilders,
    mut spec: TransportSpec,
) -> Result<Constructed, RelayError> {
    let kind = spec.kind();
    let mut limit = None;

    if kind.limit_eligible()
        && let Some(address) = spec.address_mut()
    {
        let parsed = split_option(address);
        let bare = parsed.address.to_string();

        if let Some(raw_limit) = parsed.limit {
            let (parsed_limit, problem) = RateLimit::parse_lenient(raw_limit);
            if let Some(e) = problem {
                warn!(
                    kind = %kind,
                    address = %bare,
                    error = %e,
                    fallback = %parsed_limit,
                    "unparsable rate limit, using fallback"
                );
            }
            limit = Some(parsed_limit);
        }
        *address = bare;
    }

    let address = spec.address().unwrap_or_default().to_string();
    let handle = dispatch(builders, &spec).map_err(|e| RelayError::Construction {
        kind,
        address: address.clone(),
        source: Box::new(e),
    })?;

    let wrapped = match limit {
        Some(limit) => limiter::decorate(&handle, limit),
        None => handle,
    };

    debug!(
        kind = %kind,
        address = %address,
        limited = limit.is_some(),
        role = wrapped.role().label(),
        "plugin constructed"
    );

    Ok(Constructed { wrapped, limit })
}

