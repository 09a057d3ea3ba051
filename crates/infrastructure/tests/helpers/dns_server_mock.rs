use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How a mock upstream reacts to every query it receives.
#[derive(Clone)]
pub enum Behavior {
    Answer(Vec<Ipv4Addr>),
    Rcode(ResponseCode),
    WrongId,
    Silent,
}

/// Upstream DNS server on an ephemeral loopback port, over UDP or TCP.
pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Message>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start_udp(behavior: Behavior) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 65535];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        if let Some(response) = Self::respond(&buf[..len], &behavior, &log) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub async fn start_tcp(behavior: Behavior) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        let Ok((mut stream, _)) = result else { continue };
                        let behavior = behavior.clone();
                        let log = Arc::clone(&log);
                        tokio::spawn(async move {
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_err() {
                                return;
                            }
                            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                            if stream.read_exact(&mut query).await.is_err() {
                                return;
                            }
                            match Self::respond(&query, &behavior, &log) {
                                Some(response) => {
                                    let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                                    let _ = stream.write_all(&response).await;
                                }
                                None => {
                                    // hold the connection open until the client gives up
                                    let mut sink = [0u8; 1];
                                    let _ = stream.read(&mut sink).await;
                                }
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    fn respond(
        query: &[u8],
        behavior: &Behavior,
        log: &Mutex<Vec<Message>>,
    ) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;
        log.lock().unwrap().push(request.clone());

        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true);
        response.add_queries(request.queries().to_vec());

        match behavior {
            Behavior::Silent => return None,
            Behavior::WrongId => {
                response.set_id(request.id().wrapping_add(1));
            }
            Behavior::Rcode(code) => {
                response.set_response_code(*code);
            }
            Behavior::Answer(ips) => {
                let name = request.queries().first()?.name().clone();
                for ip in ips {
                    response.add_answer(Record::from_rdata(name.clone(), 60, RData::A(A::from(*ip))));
                }
            }
        }

        response.to_vec().ok()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queries received so far, decoded.
    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
