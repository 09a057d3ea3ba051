use answer_domain::{DomainError, MailExchanger};
use async_trait::async_trait;
use std::net::IpAddr;

/// The host's own name-resolution facilities.
///
/// Names are passed without a trailing root separator.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Addresses of both families, in resolver order.
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DomainError>;

    async fn lookup_cname(&self, host: &str) -> Result<String, DomainError>;

    async fn lookup_ns(&self, host: &str) -> Result<Vec<String>, DomainError>;

    /// Preference order as returned by the resolver.
    async fn lookup_mx(&self, host: &str) -> Result<Vec<MailExchanger>, DomainError>;

    /// Every character-string of every TXT record, in order. Bytes are kept
    /// as received; TXT data need not be UTF-8.
    async fn lookup_txt(&self, host: &str) -> Result<Vec<Vec<u8>>, DomainError>;

    /// `name` is either a reverse-lookup name or a literal address.
    async fn lookup_ptr(&self, name: &str) -> Result<Vec<String>, DomainError>;
}
