//! Host name resolution.

use std::net::IpAddr;

use crate::error::{P4Error, Result};

/// Resolve `host` to an address, preferring IPv4.
///
/// An address literal is returned as-is without a lookup.
///
/// # Errors
///
/// Returns `P4Error::Resolve` if the lookup fails or yields no address.
pub async fn resolve_host(host: &str) -> Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolve_err = |source| P4Error::Resolve {
        host: host.to_string(),
        source,
    };

    let addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
        .await
        .map_err(resolve_err)?
        .map(|addr| addr.ip())
        .collect();

    tracing::debug!(host, count = addrs.len(), "Resolved host");

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            resolve_err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses returned",
            ))
        })
}
