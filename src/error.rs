//! Unified error types for the ESC node firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level wiring's error handling uniform. All variants are `Copy` so
//! they pass through the event loop without allocation.
//!
//! Note that a command frame too short to address this node is *not* an
//! error anywhere in this file — the router degrades it to a fail-safe
//! stop (see `app::service`).

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Inbound bus plumbing failed (queue overflow, overlong frame).
    Bus(BusError),
    /// Peripheral or timer initialisation failed. Fatal at start-up.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Inbound event queue is full; the frame was dropped. Not fatal —
    /// every fresh frame re-decides, so the next delivery self-heals.
    QueueFull,
    /// A command frame carried more channels than the bus allows.
    FrameTooLong,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "event queue full"),
            Self::FrameTooLong => write!(f, "command frame too long"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
