use answer_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: target.clone(),
        })?
        .map_err(|e| DomainError::TransportIo {
            server: target.clone(),
            reason: format!("address resolution failed: {}", e),
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::TransportIo {
            server: target,
            reason: "no addresses found".to_string(),
        });
    }

    Ok(addrs)
}

/// Socket address to dial for `upstream`; hostnames use their first address.
pub async fn resolve_upstream(
    upstream: &UpstreamAddr,
    timeout: Duration,
) -> Result<SocketAddr, DomainError> {
    match upstream {
        UpstreamAddr::Resolved(addr) => Ok(*addr),
        UpstreamAddr::Unresolved { hostname, port } => {
            let addrs = resolve_all(hostname, *port, timeout).await?;
            Ok(addrs[0])
        }
    }
}
