//! End-to-end tests over the real host-simulation drivers.
//!
//! These exercise the full path a frame takes in production: service
//! routing, the safe-start gate, the motor driver's TTL deadman, and the
//! dual-rate telemetry emitter. Only the telemetry sink is a mock, so
//! the emitted messages can be inspected.

use escnode::adapters::nvs::NvsAdapter;
use escnode::app::frames::{RAW_COMMAND_MAX, RawCommandFrame, RpmCommandFrame};
use escnode::app::ports::{ConfigPort, MotorPort, TelemetrySink};
use escnode::app::service::EscService;
use escnode::app::telemetry::{EscStatus, RpmFeedback};
use escnode::config::NodeConfig;
use escnode::drivers::motor::MotorDriver;
use escnode::sensors::temperature::{TemperatureSensor, sim_set_temp_adc};

#[derive(Default)]
struct RecordingSink {
    feedback: Vec<RpmFeedback>,
    status: Vec<EscStatus>,
}

impl TelemetrySink for RecordingSink {
    fn publish_feedback(&mut self, msg: &RpmFeedback) {
        self.feedback.push(*msg);
    }
    fn publish_status(&mut self, msg: &EscStatus) {
        self.status.push(*msg);
    }
}

fn raw_frame_for(value_normalized: f32, channel: u8) -> RawCommandFrame {
    let raw = (value_normalized * f32::from(RAW_COMMAND_MAX)) as i16;
    let mut values = vec![0i16; channel as usize];
    values.push(raw);
    RawCommandFrame::from_slice(&values).unwrap()
}

#[test]
fn safe_start_sequence_with_real_driver() {
    let config = NodeConfig {
        max_duty_to_start: 0.5,
        ..Default::default()
    };
    let mut svc = EscService::new(&config);
    let mut motor = MotorDriver::new();

    // Stationary motor refuses a 70% step.
    svc.on_raw_command(&raw_frame_for(0.7, 0), &mut motor);
    assert!(motor.is_idle());

    // A gentle 30% start is accepted.
    svc.on_raw_command(&raw_frame_for(0.3, 0), &mut motor);
    assert!(!motor.is_idle());
    assert!((motor.duty_cycle() - 0.3).abs() < 1e-3);

    // Once spinning, the same 70% request passes the gate.
    svc.on_raw_command(&raw_frame_for(0.7, 0), &mut motor);
    assert!((motor.duty_cycle() - 0.7).abs() < 1e-3);
}

#[test]
fn ttl_deadman_cuts_drive_when_commands_stop() {
    let config = NodeConfig {
        command_ttl_ms: 200,
        ..Default::default()
    };
    let mut svc = EscService::new(&config);
    let mut motor = MotorDriver::new();

    svc.on_raw_command(&raw_frame_for(0.3, 0), &mut motor);
    motor.update(0); // deadline armed at 200
    motor.update(150);
    assert!(!motor.is_idle(), "still within TTL");

    motor.update(250);
    assert!(motor.is_idle(), "no refresh: drive cut");
}

#[test]
fn ttl_refresh_keeps_motor_alive() {
    let config = NodeConfig {
        command_ttl_ms: 200,
        ..Default::default()
    };
    let mut svc = EscService::new(&config);
    let mut motor = MotorDriver::new();

    svc.on_raw_command(&raw_frame_for(0.3, 0), &mut motor);
    motor.update(0);
    for t in (100..=1_000).step_by(100) {
        svc.on_raw_command(&raw_frame_for(0.3, 0), &mut motor);
        motor.update(t);
        assert!(!motor.is_idle(), "refreshed at t={t}");
    }
}

#[test]
fn rpm_command_reaches_feedback_stream() {
    let mut svc = EscService::new(&NodeConfig::default());
    let mut motor = MotorDriver::new();
    let mut temp = TemperatureSensor::new(escnode::pins::TEMP_ADC_GPIO);
    let mut sink = RecordingSink::default();

    let frame = RpmCommandFrame::from_slice(&[4_500]).unwrap();
    svc.on_rpm_command(&frame, &mut motor);
    svc.on_tick(0, &motor, &mut temp, &mut sink);

    assert_eq!(sink.feedback[0].rpm, 4_500);
}

#[test]
fn short_frame_stops_a_running_motor() {
    let config = NodeConfig {
        esc_index: 3,
        ..Default::default()
    };
    let mut svc = EscService::new(&config);
    let mut motor = MotorDriver::new();

    svc.on_raw_command(&raw_frame_for(0.3, 3), &mut motor);
    assert!(!motor.is_idle());

    // One-channel frame cannot address channel 3.
    let short = RawCommandFrame::from_slice(&[2_000]).unwrap();
    svc.on_raw_command(&short, &mut motor);
    assert!(motor.is_idle());
}

#[test]
fn telemetry_cadence_over_two_seconds() {
    let mut svc = EscService::new(&NodeConfig::default());
    let motor = MotorDriver::new();
    let mut temp = TemperatureSensor::new(escnode::pins::TEMP_ADC_GPIO);
    let mut sink = RecordingSink::default();

    // 25 Hz ticks for a bit over two seconds.
    for n in 0..55u64 {
        svc.on_tick(n * 40, &motor, &mut temp, &mut sink);
    }

    assert_eq!(sink.feedback.len(), 55);
    // t=0, t=1000, t=2000.
    assert_eq!(sink.status.len(), 3);
}

#[test]
fn rail_clipped_temperature_published_as_nan() {
    let mut svc = EscService::new(&NodeConfig::default());
    let motor = MotorDriver::new();
    let mut temp = TemperatureSensor::new(escnode::pins::TEMP_ADC_GPIO);
    let mut sink = RecordingSink::default();

    sim_set_temp_adc(4_095);
    svc.on_tick(0, &motor, &mut temp, &mut sink);
    assert!(sink.status[0].temperature_k.is_nan());

    sim_set_temp_adc(2_048);
    let mut svc = EscService::new(&NodeConfig::default());
    svc.on_tick(0, &motor, &mut temp, &mut sink);
    let k = sink.status[1].temperature_k;
    assert!((k - 298.15).abs() < 1.0, "got {k} K");
}

#[test]
fn persisted_config_drives_the_service() {
    let nvs = NvsAdapter::new().unwrap();
    let stored = NodeConfig {
        esc_index: 3,
        command_ttl_ms: 500,
        ..Default::default()
    };
    nvs.save(&stored).unwrap();

    let loaded = nvs.load().unwrap();
    loaded.validate().unwrap();
    let mut svc = EscService::new(&loaded);
    assert_eq!(svc.esc_index(), 3);

    // The loaded TTL flows through to directives.
    let mut motor = MotorDriver::new();
    svc.on_raw_command(&raw_frame_for(0.3, 3), &mut motor);
    motor.update(0);
    motor.update(499);
    assert!(!motor.is_idle());
    motor.update(500);
    assert!(motor.is_idle());
}
