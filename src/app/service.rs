//! ESC service — the hexagonal core.
//!
//! [`EscService`] owns the command-arbitration policy and the dual-rate
//! telemetry emitter. It exposes a clean, hardware-agnostic API; all I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  RawCommandFrame ──▶ ┌──────────────────────┐ ──▶ MotorPort
//!  RpmCommandFrame ──▶ │      EscService      │
//!  publish tick    ──▶ │  gate · throttle     │ ──▶ TelemetrySink
//!  TemperaturePort ──▶ └──────────────────────┘
//! ```
//!
//! The host dispatcher invokes the three entry points one at a time,
//! never nested; the service holds no locks and never blocks.

use log::info;

use crate::app::frames::{RAW_COMMAND_MAX, RawCommandFrame, RpmCommandFrame};
use crate::app::gate::{self, CommandDirective};
use crate::app::ports::{MotorPort, TelemetrySink, TemperaturePort};
use crate::app::telemetry::{EscStatus, RpmFeedback};
use crate::config::NodeConfig;

/// Minimum spacing between status publications, approximating 1 Hz
/// against the faster base tick. Deliberately 990 and not 1000: a tick
/// landing a few microseconds short of a full second must still publish.
const STATUS_INTERVAL_MIN_MS: u64 = 990;

/// Command router and telemetry emitter for one ESC channel.
pub struct EscService {
    esc_index: u8,
    command_ttl_ms: u32,
    max_duty_to_start: f32,
    /// Monotonic time of the last status publication. `None` until the
    /// first tick, which therefore always publishes.
    last_status_pub_ms: Option<u64>,
}

impl EscService {
    pub fn new(config: &NodeConfig) -> Self {
        info!(
            "EscService: index={} ttl={}ms start_ceiling={:.2}",
            config.esc_index, config.command_ttl_ms, config.max_duty_to_start
        );
        Self {
            esc_index: config.esc_index,
            command_ttl_ms: config.command_ttl_ms,
            max_duty_to_start: config.max_duty_to_start,
            last_status_pub_ms: None,
        }
    }

    // ── Command routing ───────────────────────────────────────

    /// Handle one inbound raw duty-cycle frame. Issues exactly one motor
    /// directive; a frame too short to address this node fails safe to
    /// stop. No buffering — every frame independently re-decides.
    pub fn on_raw_command(&mut self, frame: &RawCommandFrame, motor: &mut impl MotorPort) {
        let Some(raw) = frame.channel(self.esc_index) else {
            motor.stop();
            return;
        };

        let scaled_dc = f32::from(raw) / f32::from(RAW_COMMAND_MAX);
        let directive = gate::evaluate_duty_cycle(
            scaled_dc,
            motor.is_idle(),
            self.max_duty_to_start,
            self.command_ttl_ms,
        );
        Self::apply(directive, motor);
    }

    /// Handle one inbound RPM frame. Same short-frame fail-safe; no
    /// precedence over the raw stream — whichever frame arrives last
    /// wins.
    pub fn on_rpm_command(&mut self, frame: &RpmCommandFrame, motor: &mut impl MotorPort) {
        let Some(rpm) = frame.channel(self.esc_index) else {
            motor.stop();
            return;
        };

        let directive = gate::evaluate_rpm(rpm, self.command_ttl_ms);
        Self::apply(directive, motor);
    }

    // ── Telemetry emission ────────────────────────────────────

    /// Run one base tick: publish RPM feedback unconditionally, then
    /// status if at least [`STATUS_INTERVAL_MIN_MS`] has elapsed since
    /// the previous status went out.
    pub fn on_tick(
        &mut self,
        now_ms: u64,
        motor: &impl MotorPort,
        temperature: &mut impl TemperaturePort,
        sink: &mut impl TelemetrySink,
    ) {
        sink.publish_feedback(&RpmFeedback {
            esc_index: self.esc_index,
            rpm: motor.rpm(),
        });

        let status = self.build_status(motor, temperature);
        let due = self
            .last_status_pub_ms
            .is_none_or(|prev| now_ms.saturating_sub(prev) >= STATUS_INTERVAL_MIN_MS);
        if due {
            self.last_status_pub_ms = Some(now_ms);
            sink.publish_status(&status);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Channel position this node answers to.
    pub fn esc_index(&self) -> u8 {
        self.esc_index
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate a gate directive into motor port calls.
    fn apply(directive: CommandDirective, motor: &mut impl MotorPort) {
        match directive {
            CommandDirective::SetDutyCycle { duty, ttl_ms } => motor.set_duty_cycle(duty, ttl_ms),
            CommandDirective::SetRpm { rpm, ttl_ms } => motor.set_rpm(rpm, ttl_ms),
            CommandDirective::Stop => motor.stop(),
        }
    }

    /// Snapshot the motor and sensor into a status message. Invalid
    /// (negative) temperature readings become NaN on the wire rather
    /// than being dropped.
    fn build_status(
        &self,
        motor: &impl MotorPort,
        temperature: &mut impl TemperaturePort,
    ) -> EscStatus {
        let (voltage, current) = motor.input_voltage_current();

        let mut temperature_k = temperature.read_kelvin();
        if temperature_k < 0.0 {
            temperature_k = f32::NAN;
        }

        EscStatus {
            esc_index: self.esc_index,
            voltage,
            current,
            power_rating_pct: (motor.duty_cycle() * 100.0 + 0.5) as u8,
            error_count: motor.fault_count(),
            temperature_k,
        }
    }
}
