#![allow(dead_code, unused_imports)]

mod dns_server_mock;
mod static_resolver;

pub use dns_server_mock::{Behavior, MockDnsServer};
pub use static_resolver::StaticResolver;

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;

pub fn query(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut request = Message::new();
    request
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    request.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    request
}

pub fn a_answers(message: &Message) -> Vec<Ipv4Addr> {
    message
        .answers()
        .iter()
        .filter_map(|r| match r.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}
