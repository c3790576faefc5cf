//! NTC thermistor on the bridge heatsink (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via
//! the ESP32-S3 ADC. The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature in kelvin, which is what goes out
//! in status telemetry.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH8 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::app::ports::TemperaturePort;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// Sentinel for a reading that cannot be trusted (divider open or
/// shorted, voltage pinned at a rail). Negative by contract of
/// [`TemperaturePort::read_kelvin`].
pub const INVALID_READING_K: f32 = -1.0;

pub struct TemperatureSensor {
    _adc_gpio: i32,
}

impl TemperatureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self { _adc_gpio: adc_gpio }
    }

    pub fn read(&self) -> f32 {
        self.adc_to_kelvin(self.read_adc())
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_TEMP)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed)
    }

    fn adc_to_kelvin(&self, raw: u16) -> f32 {
        let voltage = (f32::from(raw) / ADC_MAX) * V_REF;
        // A voltage pinned at either rail means the divider is open or
        // shorted; no temperature can be recovered from it.
        if voltage <= 0.05 || voltage >= (V_REF - 0.05) {
            return INVALID_READING_K;
        }
        let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
        let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
        if inv_t <= 0.0 {
            return INVALID_READING_K;
        }
        1.0 / inv_t
    }
}

impl TemperaturePort for TemperatureSensor {
    fn read_kelvin(&mut self) -> f32 {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor() -> TemperatureSensor {
        TemperatureSensor::new(crate::pins::TEMP_ADC_GPIO)
    }

    #[test]
    fn midscale_reads_room_temperature() {
        // 2048/4095 with matched 10k/10k divider is R25, i.e. 25 C.
        let k = sensor().adc_to_kelvin(2048);
        assert!((k - T25_K).abs() < 1.0, "got {k} K");
    }

    #[test]
    fn lower_voltage_means_hotter() {
        let s = sensor();
        let warm = s.adc_to_kelvin(1500);
        let room = s.adc_to_kelvin(2048);
        assert!(warm > room, "warm={warm} room={room}");
    }

    #[test]
    fn rail_clipped_reading_is_invalid() {
        let s = sensor();
        assert!(s.adc_to_kelvin(0) < 0.0);
        assert!(s.adc_to_kelvin(4095) < 0.0);
    }

    #[test]
    fn port_reads_injected_sim_value() {
        sim_set_temp_adc(2048);
        let mut s = sensor();
        let k = TemperaturePort::read_kelvin(&mut s);
        assert!((k - T25_K).abs() < 1.0);
    }
}
