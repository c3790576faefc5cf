//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the decision policy of the ESC node: the
//! safe-start command gate, command routing, and dual-rate telemetry
//! emission. All interaction with hardware and the bus happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod frames;
pub mod gate;
pub mod ports;
pub mod service;
pub mod telemetry;
