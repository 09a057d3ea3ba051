use answer_domain::ListenerTransport;
use answer_infrastructure::dns::DnsServerHandler;
use hickory_server::ServerFuture;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::di::DnsServices;

/// Receive buffer requested for the UDP listener.
const UDP_RECV_BUFFER_SIZE: usize = 65535;

const TCP_BACKLOG: i32 = 1024;

/// The TCP and UDP listeners, bound to the same address.
pub struct DnsServers {
    addr: SocketAddr,
    udp_socket: UdpSocket,
    tcp_listener: TcpListener,
    tcp_timeout: Duration,
}

impl DnsServers {
    /// Binds both listeners. Either failing aborts the pair.
    pub fn bind(bind_addr: &str, tcp_timeout: Duration) -> anyhow::Result<Self> {
        let socket_addr = resolve_bind_addr(bind_addr)?;
        let domain = if socket_addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let udp_socket = create_udp_socket(domain, socket_addr)
            .map_err(|e| anyhow::anyhow!("failed to bind UDP {}: {}", socket_addr, e))?;
        // port 0 picks an ephemeral port; the TCP side must follow the UDP one
        let addr = udp_socket.local_addr()?;
        let tcp_listener = create_tcp_listener(domain, addr)
            .map_err(|e| anyhow::anyhow!("failed to bind TCP {}: {}", addr, e))?;

        Ok(Self {
            addr,
            udp_socket,
            tcp_listener,
            tcp_timeout,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves both listeners until `shutdown` fires or one of them fails.
    pub async fn run(
        self,
        services: &DnsServices,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        let mut udp_server = ServerFuture::new(DnsServerHandler::new(services.udp_handler.clone()));
        udp_server.register_socket(self.udp_socket);

        let mut tcp_server = ServerFuture::new(DnsServerHandler::new(services.tcp_handler.clone()));
        tcp_server.register_listener(self.tcp_listener, self.tcp_timeout);

        info!(
            bind_address = %self.addr,
            forwarding = services.udp_handler.forwards(),
            "DNS servers ready (TCP + UDP)"
        );

        let mut join_set: JoinSet<(ListenerTransport, anyhow::Result<()>)> = JoinSet::new();
        join_set.spawn(serve(services.udp_handler.transport(), udp_server, shutdown.clone()));
        join_set.spawn(serve(services.tcp_handler.transport(), tcp_server, shutdown.clone()));

        let mut outcome = Ok(());
        while let Some(joined) = join_set.join_next().await {
            let (transport, result) = match joined {
                Ok(finished) => finished,
                Err(e) => {
                    error!(error = %e, "DNS server task panicked");
                    shutdown.cancel();
                    outcome = Err(anyhow::anyhow!("server task failed: {}", e));
                    continue;
                }
            };
            if let Err(e) = result {
                error!(transport = %transport, error = %e, "DNS server stopped with error");
                shutdown.cancel();
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }

        outcome
    }
}

async fn serve(
    transport: ListenerTransport,
    mut server: ServerFuture<DnsServerHandler>,
    shutdown: CancellationToken,
) -> (ListenerTransport, anyhow::Result<()>) {
    let stopped = tokio::select! {
        _ = shutdown.cancelled() => None,
        result = server.block_until_done() => Some(result),
    };

    let result = match stopped {
        None => {
            info!(transport = %transport, "Stopping DNS server");
            server
                .shutdown_gracefully()
                .await
                .map_err(anyhow::Error::from)
        }
        // a listener that stops without a shutdown request is an error
        Some(Ok(())) => Err(anyhow::anyhow!("{} listener closed unexpectedly", transport)),
        Some(Err(e)) => Err(e.into()),
    };

    (transport, result)
}

fn resolve_bind_addr(bind_addr: &str) -> anyhow::Result<SocketAddr> {
    bind_addr
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("no address for {}", bind_addr))
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(UDP_RECV_BUFFER_SIZE)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(TCP_BACKLOG)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
