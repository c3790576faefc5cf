//! Logging telemetry sink.
//!
//! Stand-in for the bus broadcaster: renders the service's outbound
//! messages onto the `log` facade instead of the wire. Feedback goes out
//! at debug so the base-rate stream does not swamp the serial console;
//! status is info, it fires at most once a second.

use log::{debug, info};

use crate::app::ports::TelemetrySink;
use crate::app::telemetry::{EscStatus, RpmFeedback};

pub struct LogTelemetrySink;

impl LogTelemetrySink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogTelemetrySink {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for LogTelemetrySink {
    fn publish_feedback(&mut self, msg: &RpmFeedback) {
        debug!("FB | esc={} rpm={}", msg.esc_index, msg.rpm);
    }

    fn publish_status(&mut self, msg: &EscStatus) {
        info!(
            "STATUS | esc={} vbus={:.2}V current={:.2}A power={}% errors={} temp={:.1}K",
            msg.esc_index,
            msg.voltage,
            msg.current,
            msg.power_rating_pct,
            msg.error_count,
            msg.temperature_k,
        );
    }
}
