use answer_application::use_cases::HandleDnsQueryUseCase;
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::Record;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::sync::Arc;
use tracing::{debug, error};

/// Bridges one listener to the dispatcher. Each listener owns its own handler so
/// forwarding follows the transport the query arrived on.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }
}

/// Rebuilds the decoded request as a plain message.
pub(crate) fn request_message(request: &Request) -> Message {
    let header = request.header();
    let mut message = Message::new();
    message
        .set_id(header.id())
        .set_message_type(MessageType::Query)
        .set_op_code(header.op_code())
        .set_recursion_desired(header.recursion_desired())
        .set_checking_disabled(header.checking_disabled())
        .set_authentic_data(header.authentic_data());

    message.add_queries(request.queries().iter().map(|q| q.original().clone()));
    message.add_additionals(request.additionals().iter().cloned());
    if let Some(edns) = request.edns() {
        message.set_edns(edns.clone());
    }

    message
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let reply = self
            .use_case
            .execute(request_message(request), request.src())
            .await;

        let mut builder = MessageResponseBuilder::from_message_request(request);
        if let Some(edns) = reply.extensions() {
            builder.edns(edns.clone());
        }

        let mut header = *reply.header();
        header.set_id(request.id());

        debug!(
            peer = %request.src(),
            rcode = %reply.response_code(),
            answers = reply.answers().len(),
            "Sending reply"
        );

        let response = builder.build(
            header,
            reply.answers().iter(),
            reply.name_servers().iter(),
            &[] as &[Record],
            reply.additionals().iter(),
        );

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(peer = %request.src(), error = %e, "Failed to write reply");
                ResponseInfo::from(*request.header())
            }
        }
    }
}
