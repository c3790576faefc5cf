//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EscService (domain)
//! ```
//!
//! Driven adapters (motor driver, temperature sensor, telemetry publisher,
//! config storage) implement these traits. The
//! [`EscService`](super::service::EscService) consumes them via generics,
//! so the domain core never touches hardware or the bus directly.

use crate::app::telemetry::{EscStatus, RpmFeedback};
use crate::config::NodeConfig;

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → power stage)
// ───────────────────────────────────────────────────────────────

/// Actuator-side port: the domain issues directives and observes the
/// motor's state through this trait. Directive methods are infallible by
/// design — the gate never produces a call the driver can refuse; at
/// worst the driver clamps and carries on.
pub trait MotorPort {
    /// Cut drive immediately and coast to a stop.
    fn stop(&mut self);

    /// Apply an open-loop duty cycle (0.0-1.0). Expires after `ttl_ms`
    /// unless refreshed by a newer directive.
    fn set_duty_cycle(&mut self, duty: f32, ttl_ms: u32);

    /// Enter closed-loop speed control at `rpm`. Same TTL contract.
    fn set_rpm(&mut self, rpm: u32, ttl_ms: u32);

    /// True while the rotor is stationary (no commutation running).
    fn is_idle(&self) -> bool;

    /// Latest measured rotor speed.
    fn rpm(&self) -> i32;

    /// Duty cycle currently applied to the bridge (0.0-1.0).
    fn duty_cycle(&self) -> f32;

    /// DC link voltage (V) and current draw (A).
    fn input_voltage_current(&self) -> (f32, f32);

    /// Zero-crossing detection failures since start — the node's error
    /// counter in status telemetry.
    fn fault_count(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Temperature port (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the bridge temperature sensor.
pub trait TemperaturePort {
    /// Temperature in kelvin. A negative value means the reading is
    /// invalid (open/shorted divider); callers substitute a sentinel.
    fn read_kelvin(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Telemetry sink port (driven adapter: domain → bus / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits telemetry through this port. Adapters decide where
/// it goes (CAN broadcast, serial log, blackbox).
pub trait TelemetrySink {
    /// High-rate feedback, published on every base tick.
    fn publish_feedback(&mut self, msg: &RpmFeedback);

    /// Low-rate status, published at most ~1 Hz.
    fn publish_status(&mut self, msg: &EscStatus);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists node configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped —
/// a corrupted blob must never be able to widen the safe-start gate.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`NodeConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<NodeConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &NodeConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
