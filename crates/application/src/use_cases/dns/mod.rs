mod forward_query;
mod handle_dns_query;
pub mod reply;
mod resolve_query;

pub use forward_query::ForwardQueryUseCase;
pub use handle_dns_query::{HandleDnsQueryUseCase, UDP_PAYLOAD_SIZE};
pub use resolve_query::ResolveQueryUseCase;
