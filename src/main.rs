//! ESC node firmware entry point.
//!
//! ```text
//! ┌─────────────┐   frames   ┌─────────────┐  directives  ┌─────────────┐
//! │  bus / sim  │──────────▶ │  EscService │────────────▶ │ MotorDriver │
//! └─────────────┘   queue    │  (domain)   │              └─────────────┘
//!       ▲                    └──────┬──────┘
//!       │ publish tick              │ feedback + status
//!       │                          ▼
//!   esp_timer              TelemetrySink
//! ```
//!
//! Single-threaded main loop: drain the event queue, run the TTL
//! deadman, repeat. All command handling is serialized through the
//! queue, so the service never races itself.

use anyhow::Result;
use log::{info, warn};

use escnode::adapters::log_sink::LogTelemetrySink;
use escnode::adapters::nvs::NvsAdapter;
use escnode::adapters::time::Esp32TimeAdapter;
use escnode::app::ports::ConfigPort;
use escnode::app::service::EscService;
use escnode::config::NodeConfig;
use escnode::drivers::{hw_init, hw_timer, motor::MotorDriver};
use escnode::events::{self, BusEvent};
use escnode::pins;
use escnode::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("ESC node starting (v{})", env!("CARGO_PKG_VERSION"));

    // Peripheral setup is all-or-nothing: a node with a half-configured
    // power stage must not join the bus.
    hw_init::init_peripherals().map_err(|e| anyhow::anyhow!("peripheral init failed: {}", e))?;

    let nvs = match NvsAdapter::new() {
        Ok(nvs) => nvs,
        Err(e) => {
            warn!("NVS unavailable ({}), running on defaults", e);
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("config load failed ({}), using defaults", e);
            NodeConfig::default()
        }
    };
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("stored config invalid ({}), using defaults", e);
            NodeConfig::default()
        }
    };

    let clock = Esp32TimeAdapter::new();
    let mut motor = MotorDriver::new();
    let mut temperature = TemperatureSensor::new(pins::TEMP_ADC_GPIO);
    let mut sink = LogTelemetrySink::new();
    let mut service = EscService::new(&config);

    hw_timer::start_publish_timer(config.publish_period_ms)
        .map_err(|e| anyhow::anyhow!("publish timer start failed: {}", e))?;

    info!(
        "node ready: esc_index={} period={}ms ttl={}ms start_ceiling={:.2}",
        service.esc_index(),
        config.publish_period_ms,
        config.command_ttl_ms,
        config.max_duty_to_start,
    );

    // The bus transport task is the inbound producer: decoded command
    // frames and the publish timer land in the event queue. On host
    // targets the loop synthesizes its own ticks.
    loop {
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.publish_period_ms,
            )));
            if events::push_bus_event(BusEvent::PublishTick).is_err() {
                warn!("publish tick dropped: queue full");
            }
        }

        #[cfg(target_os = "espidf")]
        std::thread::sleep(std::time::Duration::from_millis(1));

        let now_ms = clock.uptime_ms();
        events::drain_bus_events(|event| match event {
            BusEvent::RawCommand(frame) => service.on_raw_command(&frame, &mut motor),
            BusEvent::RpmCommand(frame) => service.on_rpm_command(&frame, &mut motor),
            BusEvent::PublishTick => {
                service.on_tick(now_ms, &motor, &mut temperature, &mut sink);
            }
        });

        motor.update(now_ms);
    }
}
