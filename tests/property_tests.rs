//! Property-based tests for the command gate and frame routing.
//!
//! The gate is the safety-critical core, so instead of hand-picked
//! values these drive randomized inputs through it and assert the
//! invariants that must hold for every input.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use escnode::app::frames::{MAX_ESC_CHANNELS, RawCommandFrame};
use escnode::app::gate::{CommandDirective, evaluate_duty_cycle, evaluate_rpm};
use escnode::app::ports::MotorPort;
use escnode::app::service::EscService;
use escnode::config::NodeConfig;

const TTL: u32 = 200;

/// Records only the last directive, which is all the routing properties
/// need.
#[derive(Default)]
struct LastCallMotor {
    stopped: bool,
    duty: Option<f32>,
}

impl MotorPort for LastCallMotor {
    fn stop(&mut self) {
        self.stopped = true;
        self.duty = None;
    }
    fn set_duty_cycle(&mut self, duty: f32, _ttl_ms: u32) {
        self.stopped = false;
        self.duty = Some(duty);
    }
    fn set_rpm(&mut self, _rpm: u32, _ttl_ms: u32) {
        self.stopped = false;
    }
    fn is_idle(&self) -> bool {
        false
    }
    fn rpm(&self) -> i32 {
        0
    }
    fn duty_cycle(&self) -> f32 {
        self.duty.unwrap_or(0.0)
    }
    fn input_voltage_current(&self) -> (f32, f32) {
        (0.0, 0.0)
    }
    fn fault_count(&self) -> u32 {
        0
    }
}

proptest! {
    /// A stationary motor is never started by a request above the
    /// ceiling, no matter the values involved.
    #[test]
    fn idle_motor_never_started_above_ceiling(
        requested in -1.5f32..=1.5,
        ceiling in 0.01f32..=1.0,
    ) {
        let directive = evaluate_duty_cycle(requested, true, ceiling, TTL);
        if requested <= 0.0 || requested > ceiling {
            prop_assert_eq!(directive, CommandDirective::Stop);
        } else {
            prop_assert_eq!(
                directive,
                CommandDirective::SetDutyCycle { duty: requested, ttl_ms: TTL }
            );
        }
    }

    /// A spinning motor is never stopped by a positive request; the
    /// ceiling only guards spin-up.
    #[test]
    fn running_motor_accepts_any_positive_duty(
        requested in 1e-4f32..=1.0,
        ceiling in 0.01f32..=1.0,
    ) {
        prop_assert_eq!(
            evaluate_duty_cycle(requested, false, ceiling, TTL),
            CommandDirective::SetDutyCycle { duty: requested, ttl_ms: TTL }
        );
    }

    /// Non-positive setpoints always map to Stop, positive ones always
    /// to closed-loop control with the TTL attached.
    #[test]
    fn rpm_sign_decides_directive(setpoint in proptest::num::i32::ANY) {
        let directive = evaluate_rpm(setpoint, TTL);
        if setpoint > 0 {
            prop_assert_eq!(
                directive,
                CommandDirective::SetRpm { rpm: setpoint as u32, ttl_ms: TTL }
            );
        } else {
            prop_assert_eq!(directive, CommandDirective::Stop);
        }
    }

    /// For every frame length and node index: a frame without this
    /// node's channel fails safe to stop, one with it issues a drive
    /// directive (running motor, command well under any ceiling).
    #[test]
    fn frame_length_vs_index_routing(
        len in 1usize..=MAX_ESC_CHANNELS,
        esc_index in 0u8..=15,
    ) {
        let config = NodeConfig { esc_index, ..Default::default() };
        let mut svc = EscService::new(&config);
        let mut motor = LastCallMotor::default();

        let values = vec![1_000i16; len];
        let frame = RawCommandFrame::from_slice(&values).unwrap();
        svc.on_raw_command(&frame, &mut motor);

        if usize::from(esc_index) >= len {
            prop_assert!(motor.stopped, "channel absent must stop");
        } else {
            prop_assert!(motor.duty.is_some(), "channel present must drive");
        }
    }
}
