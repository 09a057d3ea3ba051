use answer_application::use_cases::{
    ForwardQueryUseCase, HandleDnsQueryUseCase, ResolveQueryUseCase,
};
use answer_domain::{Config, ListenerTransport, UpstreamAddr};
use answer_infrastructure::dns::{SystemResolver, TransportExchanger};
use std::sync::Arc;
use tracing::{info, warn};

/// One dispatcher per listener. Both share the resolution engine and the
/// upstream list; each forwards over its own transport.
pub struct DnsServices {
    pub udp_handler: Arc<HandleDnsQueryUseCase>,
    pub tcp_handler: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver = match SystemResolver::from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!(error = %e, "System resolver configuration unavailable, using defaults");
                SystemResolver::with_default_config()
            }
        };

        let resolve = Arc::new(
            ResolveQueryUseCase::new(Arc::new(resolver)).with_answer_ttl(config.dns.answer_ttl),
        );

        let upstreams: Arc<[UpstreamAddr]> = config.upstreams()?.into();
        if upstreams.is_empty() {
            info!("No upstream servers configured, forwarding disabled");
        } else {
            let list: Vec<String> = upstreams.iter().map(|u| u.to_string()).collect();
            info!(servers = %list.join(", "), "Forwarding enabled");
        }

        Ok(Self {
            udp_handler: Self::build_dispatcher(
                ListenerTransport::Udp,
                config,
                &resolve,
                &upstreams,
            ),
            tcp_handler: Self::build_dispatcher(
                ListenerTransport::Tcp,
                config,
                &resolve,
                &upstreams,
            ),
        })
    }

    fn build_dispatcher(
        transport: ListenerTransport,
        config: &Config,
        resolve: &Arc<ResolveQueryUseCase>,
        upstreams: &Arc<[UpstreamAddr]>,
    ) -> Arc<HandleDnsQueryUseCase> {
        let exchanger = TransportExchanger::new(
            transport,
            config.server.read_timeout(),
            config.server.write_timeout(),
        );
        let forward = ForwardQueryUseCase::new(Arc::new(exchanger), Arc::clone(upstreams));

        Arc::new(
            HandleDnsQueryUseCase::new(transport, Arc::clone(resolve)).with_forwarding(forward),
        )
    }
}
