use answer_application::ports::HostResolver;
use answer_domain::{DomainError, MailExchanger};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;

/// Answers address lookups from a fixed table and fails everything else.
#[derive(Default)]
pub struct StaticResolver {
    addresses: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, host: &str, ip: &str) -> Self {
        self.addresses
            .entry(host.to_string())
            .or_default()
            .push(ip.parse().unwrap());
        self
    }
}

fn missing(host: &str) -> DomainError {
    DomainError::NoRecords(host.to_string())
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.addresses.get(host).cloned().ok_or_else(|| missing(host))
    }

    async fn lookup_cname(&self, host: &str) -> Result<String, DomainError> {
        Err(missing(host))
    }

    async fn lookup_ns(&self, host: &str) -> Result<Vec<String>, DomainError> {
        Err(missing(host))
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MailExchanger>, DomainError> {
        Err(missing(host))
    }

    async fn lookup_txt(&self, host: &str) -> Result<Vec<Vec<u8>>, DomainError> {
        Err(missing(host))
    }

    async fn lookup_ptr(&self, name: &str) -> Result<Vec<String>, DomainError> {
        Err(missing(name))
    }
}
