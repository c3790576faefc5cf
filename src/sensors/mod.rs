//! Sensor reading modules.

pub mod temperature;
