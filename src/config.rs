//! Node configuration parameters.
//!
//! All tunable parameters for the ESC node. Values can be overridden via
//! NVS (non-volatile storage) at boot; ranges mirror the bus parameter
//! registry so a value accepted over the bus is a value the node can run.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core node configuration, read once at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Telemetry ---
    /// Base publish tick period (milliseconds). Drives RPM feedback
    /// directly; status is throttled to ~1 Hz independently.
    pub publish_period_ms: u32,

    // --- Addressing ---
    /// This node's channel position in multi-ESC command frames (0-15).
    pub esc_index: u8,

    // --- Command handling ---
    /// Time-to-live attached to every accepted command (milliseconds).
    /// The motor driver auto-stops when it expires without a refresh.
    pub command_ttl_ms: u32,
    /// Highest duty cycle a command may carry and still start a stopped
    /// motor (0.01-1.0). Commands above it are honoured only while the
    /// motor is already spinning.
    pub max_duty_to_start: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            publish_period_ms: 40, // 25 Hz feedback
            esc_index: 0,
            command_ttl_ms: 200,
            max_duty_to_start: 1.0, // gate disabled unless tuned down
        }
    }
}

impl NodeConfig {
    /// Range-check every field. Invalid values are rejected, not clamped,
    /// so a bad blob from storage or the bus can never loosen the
    /// safe-start gate or starve the TTL watchdog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.publish_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "publish_period_ms must be 1-100",
            ));
        }
        if self.esc_index > 15 {
            return Err(ConfigError::ValidationFailed("esc_index must be 0-15"));
        }
        if !(100..=5000).contains(&self.command_ttl_ms) {
            return Err(ConfigError::ValidationFailed(
                "command_ttl_ms must be 100-5000",
            ));
        }
        if !(0.01..=1.0).contains(&self.max_duty_to_start) {
            return Err(ConfigError::ValidationFailed(
                "max_duty_to_start must be 0.01-1.0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = NodeConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.publish_period_ms > 0 && c.publish_period_ms <= 100);
        assert!(c.esc_index <= 15);
        assert!(c.command_ttl_ms >= 100);
        assert!(c.max_duty_to_start > 0.0 && c.max_duty_to_start <= 1.0);
    }

    #[test]
    fn serde_roundtrip() {
        let c = NodeConfig {
            esc_index: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        let c2: NodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c2.esc_index, 3);
        assert_eq!(c2.publish_period_ms, c.publish_period_ms);
        assert!((c2.max_duty_to_start - c.max_duty_to_start).abs() < 0.001);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = NodeConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: NodeConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.command_ttl_ms, c2.command_ttl_ms);
        assert!((c.max_duty_to_start - c2.max_duty_to_start).abs() < 0.001);
    }

    #[test]
    fn rejects_period_out_of_range() {
        let c = NodeConfig {
            publish_period_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
        let c = NodeConfig {
            publish_period_ms: 101,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_index_over_15() {
        let c = NodeConfig {
            esc_index: 16,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_short_ttl() {
        let c = NodeConfig {
            command_ttl_ms: 99,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_start_ceiling() {
        let c = NodeConfig {
            max_duty_to_start: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ValidationFailed(msg)) if msg.contains("max_duty_to_start")
        ));
    }
}
