//! Driven adapters wiring the domain ports to the platform.

pub mod log_sink;
pub mod nvs;
pub mod time;
