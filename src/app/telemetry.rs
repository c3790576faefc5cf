//! Outbound telemetry messages.
//!
//! The [`EscService`](super::service::EscService) emits these through the
//! [`TelemetrySink`](super::ports::TelemetrySink) port. Adapters on the
//! other side decide what to do with them — broadcast on the bus, log to
//! serial, record to a blackbox.

/// High-rate feedback for closed-loop consumers. Cheap to produce, so it
/// goes out on every base tick, unthrottled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpmFeedback {
    pub esc_index: u8,
    pub rpm: i32,
}

/// Slow-changing node status, rate-limited to ~1 Hz regardless of the
/// base tick period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscStatus {
    pub esc_index: u8,
    /// DC link voltage, volts.
    pub voltage: f32,
    /// DC link current, amps.
    pub current: f32,
    /// Applied duty cycle as a percentage (0-100).
    pub power_rating_pct: u8,
    /// Zero-crossing failures since start.
    pub error_count: u32,
    /// Bridge temperature in kelvin; NaN when the sensor reading is
    /// invalid.
    pub temperature_k: f32,
}
