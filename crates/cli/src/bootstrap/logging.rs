use answer_domain::{LogLevel, LoggingConfig};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Entries buffered ahead of the writer thread before producers block.
const LOG_QUEUE_CAPACITY: usize = 64;

/// How long shutdown waits for queued entries to reach the output.
pub const LOG_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

const LIBRARY_TARGETS: [&str; 3] = ["hickory_server", "hickory_proto", "hickory_resolver"];

enum LogCommand {
    Line(Vec<u8>),
    Flush(mpsc::Sender<()>),
}

/// Bounded queue in front of a single writer thread that owns the output.
pub struct LogSink {
    tx: SyncSender<LogCommand>,
}

impl LogSink {
    pub fn stdout() -> io::Result<Self> {
        Self::spawn(Box::new(io::stdout()))
    }

    /// Appends to `path`, creating it when missing.
    pub fn file(path: &str) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Self::spawn(Box::new(file))
    }

    fn spawn(out: Box<dyn Write + Send>) -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel(LOG_QUEUE_CAPACITY);
        thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || write_loop(rx, out))?;
        Ok(Self { tx })
    }

    pub fn make_writer(&self) -> QueueMakeWriter {
        QueueMakeWriter {
            tx: self.tx.clone(),
        }
    }

    /// Waits until every entry queued before the call has been written.
    /// Returns `false` if the writer did not catch up within `timeout`.
    pub fn drain(&self, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.tx.send(LogCommand::Flush(ack_tx)).is_err() {
            return false;
        }
        ack_rx.recv_timeout(timeout).is_ok()
    }
}

fn write_loop(rx: Receiver<LogCommand>, mut out: Box<dyn Write + Send>) {
    for command in rx {
        match command {
            LogCommand::Line(bytes) => {
                let _ = out.write_all(&bytes);
            }
            LogCommand::Flush(ack) => {
                let _ = out.flush();
                let _ = ack.send(());
            }
        }
    }
    let _ = out.flush();
}

#[derive(Clone)]
pub struct QueueMakeWriter {
    tx: SyncSender<LogCommand>,
}

/// Hands each formatted event to the queue as a single entry.
pub struct QueueWriter<'a> {
    tx: &'a SyncSender<LogCommand>,
}

impl Write for QueueWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .send(LogCommand::Line(buf.to_vec()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "log writer stopped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for QueueMakeWriter {
    type Writer = QueueWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        QueueWriter { tx: &self.tx }
    }
}

/// Filter admitting `level` and above. Library chatter stays at warn or quieter.
fn filter_directives(level: LogLevel) -> String {
    let mut directives = level.filter_directive();
    if level < LogLevel::Warn {
        for target in LIBRARY_TARGETS {
            directives.push_str(&format!(",{}=warn", target));
        }
    }
    directives
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LogSink> {
    let sink = match &config.file {
        Some(path) => LogSink::file(path)
            .map_err(|e| anyhow::anyhow!("cannot open log file {}: {}", path, e))?,
        None => LogSink::stdout()?,
    };

    let filter = EnvFilter::try_new(filter_directives(config.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(sink.make_writer())
                .with_ansi(config.file.is_none())
                .with_target(true),
        )
        .try_init()?;

    Ok(sink)
}
