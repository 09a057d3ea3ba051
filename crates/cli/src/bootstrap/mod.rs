mod config;
mod logging;

pub use config::{config_source, load_config};
pub use logging::{init_logging, LOG_DRAIN_TIMEOUT};
