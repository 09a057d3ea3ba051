//! Answer Application Layer
#[macro_use]
mod logging;

pub mod ports;
pub mod use_cases;
