use super::reply::{error_reply, reply_to};
use crate::ports::HostResolver;
use answer_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, PTR, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Owner name, class and TTL shared by every answer produced for one question.
struct AnswerHeader {
    name: Name,
    class: DNSClass,
    ttl: u32,
}

impl AnswerHeader {
    fn record(&self, rdata: RData) -> Record {
        let mut record = Record::from_rdata(self.name.clone(), self.ttl, rdata);
        record.set_dns_class(self.class);
        record
    }
}

/// Answers a question from the host's resolver, without touching upstreams.
pub struct ResolveQueryUseCase {
    resolver: Arc<dyn HostResolver>,
    answer_ttl: u32,
}

impl ResolveQueryUseCase {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            resolver,
            answer_ttl: 0,
        }
    }

    pub fn with_answer_ttl(mut self, ttl: u32) -> Self {
        self.answer_ttl = ttl;
        self
    }

    /// Builds the local reply for `request`.
    ///
    /// Resolver failures never surface as a response code: they leave the answer
    /// section empty so the dispatcher can fall back to forwarding.
    pub async fn execute(&self, request: &Message) -> Message {
        let Some(question) = request.queries().first() else {
            return error_reply(request, ResponseCode::ServFail);
        };

        info!(
            name = %question.name(),
            qtype = %question.query_type(),
            class = %question.query_class(),
            "Question received"
        );

        if question.query_class() != DNSClass::IN {
            return error_reply(request, ResponseCode::NotImp);
        }

        let mut reply = reply_to(request);

        let Some(record_type) = RecordType::from_u16(u16::from(question.query_type())) else {
            debug!(qtype = %question.query_type(), "No local handler for record type");
            return reply;
        };

        let name = question.name().to_ascii();
        let host = name.strip_suffix('.').unwrap_or(&name);
        let header = AnswerHeader {
            name: question.name().clone(),
            class: question.query_class(),
            ttl: self.answer_ttl,
        };

        match self.resolve(record_type, host, &header).await {
            Ok(answers) => {
                debug!(name = %host, qtype = %record_type, count = answers.len(), "Resolved locally");
                reply.add_answers(answers);
            }
            Err(e) => {
                notice!(name = %host, qtype = %record_type, error = %e, "Local resolution failed");
            }
        }

        reply
    }

    async fn resolve(
        &self,
        record_type: RecordType,
        host: &str,
        header: &AnswerHeader,
    ) -> Result<Vec<Record>, DomainError> {
        match record_type {
            RecordType::A | RecordType::AAAA => {
                self.resolve_addresses(record_type, host, header).await
            }
            RecordType::CNAME => self.resolve_cname(host, header).await,
            RecordType::NS => self.resolve_ns(host, header).await,
            RecordType::MX => self.resolve_mx(host, header).await,
            RecordType::TXT => self.resolve_txt(host, header).await,
            RecordType::PTR => self.resolve_ptr(host, header).await,
        }
    }

    async fn resolve_addresses(
        &self,
        record_type: RecordType,
        host: &str,
        header: &AnswerHeader,
    ) -> Result<Vec<Record>, DomainError> {
        let addresses = self.resolver.lookup_ip(host).await?;

        Ok(addresses
            .into_iter()
            .filter_map(|ip| match (record_type, ip) {
                (RecordType::A, IpAddr::V4(v4)) => Some(RData::A(A::from(v4))),
                (RecordType::AAAA, IpAddr::V6(v6)) => Some(RData::AAAA(AAAA::from(v6))),
                _ => None,
            })
            .map(|rdata| header.record(rdata))
            .collect())
    }

    async fn resolve_cname(
        &self,
        host: &str,
        header: &AnswerHeader,
    ) -> Result<Vec<Record>, DomainError> {
        let target = self.resolver.lookup_cname(host).await?;
        Ok(vec![header.record(RData::CNAME(CNAME(to_name(&target)?)))])
    }

    async fn resolve_ns(&self, host: &str, header: &AnswerHeader) -> Result<Vec<Record>, DomainError> {
        self.resolver
            .lookup_ns(host)
            .await?
            .iter()
            .map(|server| Ok(header.record(RData::NS(NS(to_name(server)?)))))
            .collect()
    }

    async fn resolve_mx(&self, host: &str, header: &AnswerHeader) -> Result<Vec<Record>, DomainError> {
        self.resolver
            .lookup_mx(host)
            .await?
            .iter()
            .map(|mx| {
                let exchange = to_name(&mx.host)?;
                Ok(header.record(RData::MX(MX::new(mx.preference, exchange))))
            })
            .collect()
    }

    async fn resolve_txt(&self, host: &str, header: &AnswerHeader) -> Result<Vec<Record>, DomainError> {
        let strings = self.resolver.lookup_txt(host).await?;
        if strings.is_empty() {
            return Ok(Vec::new());
        }
        let chunks = strings.iter().map(Vec::as_slice).collect();
        Ok(vec![header.record(RData::TXT(TXT::from_bytes(chunks)))])
    }

    async fn resolve_ptr(&self, host: &str, header: &AnswerHeader) -> Result<Vec<Record>, DomainError> {
        self.resolver
            .lookup_ptr(host)
            .await?
            .iter()
            .map(|target| Ok(header.record(RData::PTR(PTR(to_name(target)?)))))
            .collect()
    }
}

/// Parses a resolver-provided host as a fully-qualified name.
fn to_name(host: &str) -> Result<Name, DomainError> {
    let fqdn = if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{}.", host)
    };
    Name::from_str(&fqdn).map_err(|e| DomainError::Codec(format!("{}: {}", host, e)))
}
