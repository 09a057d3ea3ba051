use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

pub const PEER: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100)),
    53000,
);

pub fn query(name: &str, record_type: RecordType) -> Message {
    query_with_class(name, record_type, DNSClass::IN)
}

pub fn query_with_class(name: &str, record_type: RecordType, class: DNSClass) -> Message {
    let mut question = Query::query(Name::from_str(name).unwrap(), record_type);
    question.set_query_class(class);

    let mut request = empty_request();
    request.add_query(question);
    request
}

pub fn empty_request() -> Message {
    let mut request = Message::new();
    request
        .set_id(4242)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    request
}

/// `request` with a client OPT record advertising `payload` bytes.
pub fn with_edns(mut request: Message, payload: u16) -> Message {
    let mut edns = Edns::new();
    edns.set_max_payload(payload);
    request.set_edns(edns);
    request
}

/// A response an upstream server might send for `request`.
pub fn upstream_response(request: &Message, code: ResponseCode, ips: &[Ipv4Addr]) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_available(true)
        .set_response_code(code);
    response.add_queries(request.queries().to_vec());

    let name = request.queries()[0].name().clone();
    for ip in ips {
        response.add_answer(Record::from_rdata(name.clone(), 300, RData::A(A::from(*ip))));
    }
    response
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
