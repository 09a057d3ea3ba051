use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};

/// Fresh success reply linked to `request`: same id and opcode, first question echoed,
/// no records.
pub fn reply_to(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError);

    if request.op_code() == OpCode::Query {
        reply
            .set_recursion_desired(request.recursion_desired())
            .set_checking_disabled(request.checking_disabled());
    }
    if let Some(question) = request.queries().first() {
        reply.add_query(question.clone());
    }

    reply
}

pub fn error_reply(request: &Message, code: ResponseCode) -> Message {
    let mut reply = reply_to(request);
    reply.set_response_code(code);
    reply
}
