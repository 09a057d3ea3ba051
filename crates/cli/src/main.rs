use answer_domain::{CliOverrides, Config, LogLevel};
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser, Debug)]
#[command(name = "answer")]
#[command(version)]
#[command(about = "Tiny DNS proxy: answers from the host resolver, falls back to upstream servers")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log file path (default stdout)
    #[arg(long = "log", value_name = "FILE")]
    log_file: Option<String>,

    /// Log level (debug, info, notice, warn, error)
    #[arg(long = "level", value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Host name or address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port number (TCP and UDP)
    #[arg(long)]
    port: Option<u16>,

    #[arg(long, value_name = "SECONDS", hide = true)]
    read_timeout: Option<u64>,

    #[arg(long, value_name = "SECONDS", hide = true)]
    write_timeout: Option<u64>,

    /// Upstream DNS server, tried in the order given (repeatable)
    #[arg(short = 'n', long = "upstream", value_name = "HOST[:PORT]")]
    upstreams: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            host: self.host.clone(),
            port: self.port,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            upstream_servers: self.upstreams.clone(),
            log_level: self.log_level,
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let config = match bootstrap::load_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("answer: configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_sink = match bootstrap::init_logging(&config.logging) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("answer: logging error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli.config.as_deref(), &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed to run servers");
            ExitCode::FAILURE
        }
    };

    if !log_sink.drain(bootstrap::LOG_DRAIN_TIMEOUT) {
        eprintln!("answer: timed out flushing logs");
    }
    code
}

async fn run(config_path: Option<&str>, config: &Config) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Boot up");
    match bootstrap::config_source(config_path) {
        Some(path) => info!(path = %path, "Configuration loaded"),
        None => info!("No configuration file found, using defaults"),
    }

    let services = di::DnsServices::new(config)?;
    let servers =
        server::DnsServers::bind(&config.server.bind_address(), config.server.read_timeout())?;

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    info!(bind_address = %servers.local_addr(), "Start servers");
    servers.run(&services, shutdown).await?;

    info!("Servers stopped");
    Ok(())
}

async fn watch_signals(shutdown: CancellationToken) {
    tokio::select! {
        _ = wait_for_signal() => info!("Shutdown servers"),
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "Cannot listen for SIGTERM, only Ctrl-C stops the server");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
