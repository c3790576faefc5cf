//! Command gate — the safe-start decision policy.
//!
//! Pure functions mapping one normalized command value plus the motor's
//! idle/running state to a directive. No internal state, no failure
//! paths: every input produces exactly one directive.

/// What the router tells the motor driver to do for one inbound command.
/// Created per frame, consumed immediately, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandDirective {
    /// Apply an open-loop duty cycle, auto-expiring after `ttl_ms`.
    SetDutyCycle { duty: f32, ttl_ms: u32 },
    /// Enter closed-loop speed control, auto-expiring after `ttl_ms`.
    SetRpm { rpm: u32, ttl_ms: u32 },
    /// Cut drive now.
    Stop,
}

/// Decide whether a normalized duty-cycle request may be applied.
///
/// The safe-start gate: while the motor is stationary, requests above
/// `max_duty_to_start` are refused outright rather than clamped, so a
/// large step command can never be the one that spins up a stopped
/// motor. Once running, the ceiling no longer applies.
pub fn evaluate_duty_cycle(
    requested: f32,
    motor_idle: bool,
    max_duty_to_start: f32,
    ttl_ms: u32,
) -> CommandDirective {
    if requested <= 0.0 {
        return CommandDirective::Stop;
    }
    if motor_idle && requested > max_duty_to_start {
        return CommandDirective::Stop;
    }
    CommandDirective::SetDutyCycle {
        duty: requested,
        ttl_ms,
    }
}

/// Decide whether an RPM request may be applied. Zero and negative
/// setpoints mean stop; there is no safe-start ceiling for closed-loop
/// control, the speed loop owns its own ramp.
pub fn evaluate_rpm(requested: i32, ttl_ms: u32) -> CommandDirective {
    if requested > 0 {
        CommandDirective::SetRpm {
            rpm: requested as u32,
            ttl_ms,
        }
    } else {
        CommandDirective::Stop
    }
}
