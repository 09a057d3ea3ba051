use answer_application::ports::HostResolver;
use answer_domain::{DomainError, MailExchanger};
use async_trait::async_trait;
use hickory_proto::rr::{Name, RData, RecordType};
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::lookup::Lookup;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::Resolver;
use std::net::IpAddr;
use tracing::debug;

/// Host name resolution backed by the operating system's configuration.
///
/// Addresses go through the platform resolver so `/etc/hosts` and NSS apply;
/// the other record kinds are queried through a stub resolver configured from
/// the system's nameserver settings.
pub struct SystemResolver {
    resolver: Resolver<TokioConnectionProvider>,
}

impl SystemResolver {
    pub fn from_system_conf() -> Result<Self, DomainError> {
        let resolver = Resolver::builder_tokio()
            .map_err(|e| DomainError::ResolutionFailed {
                name: "system configuration".to_string(),
                reason: e.to_string(),
            })?
            .build();

        Ok(Self { resolver })
    }

    /// Stub resolver pointed at public nameservers, for hosts without a usable
    /// resolver configuration.
    pub fn with_default_config() -> Self {
        let resolver =
            Resolver::builder_with_config(ResolverConfig::default(), TokioConnectionProvider::default())
                .build();
        Self { resolver }
    }

    async fn lookup(&self, name: Name, record_type: RecordType) -> Result<Lookup, DomainError> {
        debug!(name = %name, record_type = %record_type, "System lookup");
        self.resolver
            .lookup(name.clone(), record_type)
            .await
            .map_err(|e| DomainError::ResolutionFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

fn parse_name(host: &str) -> Result<Name, DomainError> {
    Name::from_ascii(host).map_err(|e| DomainError::ResolutionFailed {
        name: host.to_string(),
        reason: e.to_string(),
    })
}

/// A literal address is looked up through its reverse-mapping name.
fn reverse_name(name: &str) -> Result<Name, DomainError> {
    match name.parse::<IpAddr>() {
        Ok(ip) => Ok(Name::from(ip)),
        Err(_) => parse_name(name),
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| DomainError::ResolutionFailed {
                name: host.to_string(),
                reason: e.to_string(),
            })?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }

    async fn lookup_cname(&self, host: &str) -> Result<String, DomainError> {
        let lookup = self.lookup(parse_name(host)?, RecordType::CNAME).await?;
        lookup
            .iter()
            .find_map(|rdata| match rdata {
                RData::CNAME(cname) => Some(cname.0.to_ascii()),
                _ => None,
            })
            .ok_or_else(|| DomainError::NoRecords(host.to_string()))
    }

    async fn lookup_ns(&self, host: &str) -> Result<Vec<String>, DomainError> {
        let lookup = self.lookup(parse_name(host)?, RecordType::NS).await?;
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::NS(ns) => Some(ns.0.to_ascii()),
                _ => None,
            })
            .collect())
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MailExchanger>, DomainError> {
        let lookup = self.lookup(parse_name(host)?, RecordType::MX).await?;
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::MX(mx) => Some(MailExchanger::new(
                    mx.preference(),
                    mx.exchange().to_ascii(),
                )),
                _ => None,
            })
            .collect())
    }

    async fn lookup_txt(&self, host: &str) -> Result<Vec<Vec<u8>>, DomainError> {
        let lookup = self.lookup(parse_name(host)?, RecordType::TXT).await?;
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::TXT(txt) => Some(txt.txt_data()),
                _ => None,
            })
            .flatten()
            .map(|chunk| chunk.to_vec())
            .collect())
    }

    async fn lookup_ptr(&self, name: &str) -> Result<Vec<String>, DomainError> {
        let lookup = self.lookup(reverse_name(name)?, RecordType::PTR).await?;
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::PTR(ptr) => Some(ptr.0.to_ascii()),
                _ => None,
            })
            .collect())
    }
}
