use answer_application::ports::HostResolver;
use answer_domain::{DomainError, MailExchanger};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Records {
    addresses: HashMap<String, Vec<IpAddr>>,
    cnames: HashMap<String, String>,
    name_servers: HashMap<String, Vec<String>>,
    mail_exchangers: HashMap<String, Vec<MailExchanger>>,
    texts: HashMap<String, Vec<Vec<u8>>>,
    pointers: HashMap<String, Vec<String>>,
}

#[derive(Clone, Default)]
pub struct MockHostResolver {
    records: Arc<RwLock<Records>>,
    should_fail: Arc<RwLock<bool>>,
    lookups: Arc<RwLock<Vec<String>>>,
}

fn found<T: Clone>(map: &HashMap<String, T>, host: &str) -> Result<T, DomainError> {
    map.get(host)
        .cloned()
        .ok_or_else(|| DomainError::NoRecords(host.to_string()))
}

impl MockHostResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_addresses(&self, host: &str, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.records.write().await.addresses.insert(host.to_string(), ips);
    }

    pub async fn set_cname(&self, host: &str, target: &str) {
        self.records
            .write()
            .await
            .cnames
            .insert(host.to_string(), target.to_string());
    }

    pub async fn set_name_servers(&self, host: &str, servers: &[&str]) {
        self.records
            .write()
            .await
            .name_servers
            .insert(host.to_string(), servers.iter().map(|s| s.to_string()).collect());
    }

    pub async fn set_mail_exchangers(&self, host: &str, entries: &[(u16, &str)]) {
        let entries = entries
            .iter()
            .map(|(pref, mx)| MailExchanger::new(*pref, *mx))
            .collect();
        self.records
            .write()
            .await
            .mail_exchangers
            .insert(host.to_string(), entries);
    }

    pub async fn set_texts<T: AsRef<[u8]>>(&self, host: &str, texts: &[T]) {
        self.records
            .write()
            .await
            .texts
            .insert(host.to_string(), texts.iter().map(|s| s.as_ref().to_vec()).collect());
    }

    pub async fn set_pointers(&self, name: &str, targets: &[&str]) {
        self.records
            .write()
            .await
            .pointers
            .insert(name.to_string(), targets.iter().map(|s| s.to_string()).collect());
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    /// Hosts passed to the resolver, in call order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    async fn record_lookup(&self, host: &str) -> Result<(), DomainError> {
        self.lookups.write().await.push(host.to_string());
        if *self.should_fail.read().await {
            return Err(DomainError::ResolutionFailed {
                name: host.to_string(),
                reason: "mock resolver failed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HostResolver for MockHostResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.record_lookup(host).await?;
        found(&self.records.read().await.addresses, host)
    }

    async fn lookup_cname(&self, host: &str) -> Result<String, DomainError> {
        self.record_lookup(host).await?;
        found(&self.records.read().await.cnames, host)
    }

    async fn lookup_ns(&self, host: &str) -> Result<Vec<String>, DomainError> {
        self.record_lookup(host).await?;
        found(&self.records.read().await.name_servers, host)
    }

    async fn lookup_mx(&self, host: &str) -> Result<Vec<MailExchanger>, DomainError> {
        self.record_lookup(host).await?;
        found(&self.records.read().await.mail_exchangers, host)
    }

    async fn lookup_txt(&self, host: &str) -> Result<Vec<Vec<u8>>, DomainError> {
        self.record_lookup(host).await?;
        found(&self.records.read().await.texts, host)
    }

    async fn lookup_ptr(&self, name: &str) -> Result<Vec<String>, DomainError> {
        self.record_lookup(name).await?;
        found(&self.records.read().await.pointers, name)
    }
}
