//! Answer Infrastructure Layer
pub mod dns;
