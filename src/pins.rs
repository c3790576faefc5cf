//! GPIO / peripheral pin assignments for the ESC node board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Power stage (three-phase bridge gate driver)
// ---------------------------------------------------------------------------

/// LEDC PWM input of the gate driver.
pub const BRIDGE_PWM_GPIO: i32 = 1;
/// Digital output: gate driver enable (active HIGH). Held LOW whenever
/// the motor is commanded idle.
pub const BRIDGE_ENABLE_GPIO: i32 = 2;
/// Bridge PWM carrier frequency.
pub const BRIDGE_PWM_FREQ_HZ: u32 = 24_000;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// DC link voltage divider. ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const VBUS_ADC_GPIO: i32 = 5;
/// Shunt current amplifier output. ADC1 channel 5 (GPIO 6).
pub const CURRENT_ADC_GPIO: i32 = 6;
/// NTC thermistor on the bridge heatsink — 10 kΩ @ 25 °C,
/// voltage-divider to ADC1 channel 8 (GPIO 9).
pub const TEMP_ADC_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Bus transport (TWAI controller)
// ---------------------------------------------------------------------------

/// TWAI (CAN) transceiver TX.
pub const TWAI_TX_GPIO: i32 = 43;
/// TWAI (CAN) transceiver RX.
pub const TWAI_RX_GPIO: i32 = 44;
