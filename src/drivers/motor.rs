//! BLDC motor driver facade.
//!
//! Commutation runs in a dedicated control block below this module; the
//! facade tracks the commanded state, scales open-loop duty onto the
//! gate-driver PWM, and enforces the per-command TTL deadman: every
//! directive carries a lifetime, and if no newer directive lands before
//! it runs out the motor is cut.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the bridge via LEDC (initialised by hw_init) and
//! reads DC link voltage/current from ADC1.
//! On host/test: pure state tracking with a simple simulated rotor, so
//! the whole arbitration path is testable without hardware.

use log::{debug, warn};

use crate::app::ports::MotorPort;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Rotor speed at full duty in the host simulation.
#[cfg(not(target_os = "espidf"))]
const SIM_MAX_RPM: f32 = 12_000.0;

/// DC link divider ratio (100k : 10k).
#[cfg(target_os = "espidf")]
const VBUS_DIVIDER: f32 = 11.0;
/// Shunt amplifier transfer, amps per volt at the ADC pin.
#[cfg(target_os = "espidf")]
const CURRENT_A_PER_V: f32 = 10.0;
#[cfg(target_os = "espidf")]
const ADC_MAX: f32 = 4095.0;
#[cfg(target_os = "espidf")]
const V_REF: f32 = 3.3;

/// Commanded drive state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorState {
    /// Bridge disabled, rotor coasting or stationary.
    Idle,
    /// Open-loop PWM at a fixed duty cycle.
    OpenLoop { duty: f32 },
    /// Closed-loop speed control.
    ClosedLoop { target_rpm: u32 },
}

pub struct MotorDriver {
    state: MotorState,
    duty: f32,
    rpm: i32,
    /// TTL of the latest directive, armed into `deadline_ms` on the next
    /// `update()` so the deadline is always measured on the consumer's
    /// clock, not the producer's.
    pending_ttl_ms: Option<u32>,
    deadline_ms: Option<u64>,
    zc_failures: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_voltage: f32,
    #[cfg(not(target_os = "espidf"))]
    sim_current: f32,
}

impl MotorDriver {
    pub fn new() -> Self {
        Self {
            state: MotorState::Idle,
            duty: 0.0,
            rpm: 0,
            pending_ttl_ms: None,
            deadline_ms: None,
            zc_failures: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_voltage: 14.8,
            #[cfg(not(target_os = "espidf"))]
            sim_current: 0.0,
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    /// TTL deadman. Called once per main-loop iteration: arms the
    /// deadline for the latest directive, then cuts drive if the armed
    /// deadline has passed without a refresh.
    pub fn update(&mut self, now_ms: u64) {
        if let Some(ttl) = self.pending_ttl_ms.take() {
            self.deadline_ms = Some(now_ms + u64::from(ttl));
        }
        if self.state == MotorState::Idle {
            return;
        }
        if self.deadline_ms.is_some_and(|deadline| now_ms >= deadline) {
            warn!("motor: command TTL expired, cutting drive");
            self.stop();
        }
    }

    /// Record a zero-crossing detection failure from the commutation
    /// layer. Feeds the error counter in status telemetry.
    pub fn note_zc_failure(&mut self) {
        self.zc_failures = self.zc_failures.saturating_add(1);
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_supply(&mut self, voltage: f32, current: f32) {
        self.sim_voltage = voltage;
        self.sim_current = current;
    }

    fn apply_hw(&self) {
        #[cfg(target_os = "espidf")]
        {
            hw_init::gpio_write(pins::BRIDGE_ENABLE_GPIO, self.state != MotorState::Idle);
            let duty_8bit = (self.duty * 255.0 + 0.5) as u8;
            hw_init::ledc_set(hw_init::LEDC_CH_BRIDGE, duty_8bit);
        }
    }
}

impl Default for MotorDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorPort for MotorDriver {
    fn stop(&mut self) {
        self.state = MotorState::Idle;
        self.duty = 0.0;
        self.rpm = 0;
        self.pending_ttl_ms = None;
        self.deadline_ms = None;
        self.apply_hw();
        debug!("motor: stopped");
    }

    fn set_duty_cycle(&mut self, duty: f32, ttl_ms: u32) {
        let duty = duty.clamp(0.0, 1.0);
        self.state = MotorState::OpenLoop { duty };
        self.duty = duty;
        self.pending_ttl_ms = Some(ttl_ms);
        self.deadline_ms = None;
        #[cfg(not(target_os = "espidf"))]
        {
            self.rpm = (duty * SIM_MAX_RPM) as i32;
        }
        self.apply_hw();
    }

    fn set_rpm(&mut self, rpm: u32, ttl_ms: u32) {
        self.state = MotorState::ClosedLoop { target_rpm: rpm };
        self.pending_ttl_ms = Some(ttl_ms);
        self.deadline_ms = None;
        #[cfg(not(target_os = "espidf"))]
        {
            self.rpm = rpm.min(i32::MAX as u32) as i32;
            self.duty = (self.rpm as f32 / SIM_MAX_RPM).clamp(0.0, 1.0);
        }
        self.apply_hw();
    }

    fn is_idle(&self) -> bool {
        self.state == MotorState::Idle
    }

    fn rpm(&self) -> i32 {
        self.rpm
    }

    fn duty_cycle(&self) -> f32 {
        self.duty
    }

    #[cfg(target_os = "espidf")]
    fn input_voltage_current(&self) -> (f32, f32) {
        let to_volts = |raw: u16| (f32::from(raw) / ADC_MAX) * V_REF;
        let vbus = to_volts(hw_init::adc1_read(hw_init::ADC1_CH_VBUS)) * VBUS_DIVIDER;
        let amps = to_volts(hw_init::adc1_read(hw_init::ADC1_CH_CURRENT)) * CURRENT_A_PER_V;
        (vbus, amps)
    }

    #[cfg(not(target_os = "espidf"))]
    fn input_voltage_current(&self) -> (f32, f32) {
        (self.sim_voltage, self.sim_current)
    }

    fn fault_count(&self) -> u32 {
        self.zc_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_expiry_cuts_drive() {
        let mut m = MotorDriver::new();
        m.set_duty_cycle(0.3, 200);
        m.update(1_000); // arms deadline at 1200
        assert!(!m.is_idle());
        m.update(1_199);
        assert!(!m.is_idle());
        m.update(1_200);
        assert!(m.is_idle());
        assert_eq!(m.rpm(), 0);
        assert_eq!(m.duty_cycle(), 0.0);
    }

    #[test]
    fn refresh_rearms_deadline() {
        let mut m = MotorDriver::new();
        m.set_duty_cycle(0.3, 200);
        m.update(1_000);
        m.set_duty_cycle(0.4, 200); // refresh just before expiry
        m.update(1_199); // re-arms at 1399
        m.update(1_250);
        assert!(!m.is_idle());
        m.update(1_399);
        assert!(m.is_idle());
    }

    #[test]
    fn closed_loop_has_same_ttl_contract() {
        let mut m = MotorDriver::new();
        m.set_rpm(4_500, 100);
        m.update(0);
        assert_eq!(
            m.state(),
            MotorState::ClosedLoop { target_rpm: 4_500 }
        );
        assert_eq!(m.rpm(), 4_500);
        m.update(100);
        assert!(m.is_idle());
    }

    #[test]
    fn stop_clears_pending_deadline() {
        let mut m = MotorDriver::new();
        m.set_duty_cycle(0.5, 100);
        m.stop();
        m.update(10_000);
        assert!(m.is_idle());
    }

    #[test]
    fn duty_is_clamped_to_unit_range() {
        let mut m = MotorDriver::new();
        m.set_duty_cycle(1.5, 100);
        assert_eq!(m.duty_cycle(), 1.0);
    }

    #[test]
    fn fault_counter_accumulates() {
        let mut m = MotorDriver::new();
        assert_eq!(m.fault_count(), 0);
        m.note_zc_failure();
        m.note_zc_failure();
        assert_eq!(m.fault_count(), 2);
    }
}
