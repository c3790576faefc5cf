//! Publish timer using ESP-IDF's esp_timer API.
//!
//! Creates the periodic base-rate timer that pushes a
//! [`BusEvent::PublishTick`] into the event queue. The callback executes
//! in the ESP timer task context (not ISR), so it can safely go through
//! the critical-section channel.
//!
//! On simulation targets the main loop drives ticks itself via
//! thread::sleep, so there is nothing to start here.

#[cfg(target_os = "espidf")]
use crate::error::Error;
use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::events::{BusEvent, push_bus_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut PUBLISH_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: PUBLISH_TIMER is written once in `start_publish_timer()`
/// before any timer callbacks fire. Only called from the single main
/// task.
#[cfg(target_os = "espidf")]
unsafe fn publish_timer() -> esp_timer_handle_t {
    unsafe { PUBLISH_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn publish_tick_cb(_arg: *mut core::ffi::c_void) {
    // Queue overflow means the main loop is stalled; an extra tick is
    // worthless then, so the drop is deliberate.
    let _ = push_bus_event(BusEvent::PublishTick);
}

/// Start the periodic publish timer at `period_ms`. Telemetry cannot
/// flow without it, so failure here is fatal to node startup.
#[cfg(target_os = "espidf")]
pub fn start_publish_timer(period_ms: u32) -> Result<()> {
    // SAFETY: PUBLISH_TIMER is written here once at boot from the single
    // main-task context before any timer callbacks fire. The callback
    // itself only pushes to the bounded event queue.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(publish_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"publish\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut PUBLISH_TIMER);
        if ret != ESP_OK {
            return Err(Error::Init("publish timer create failed"));
        }
        let ret = esp_timer_start_periodic(PUBLISH_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            return Err(Error::Init("publish timer start failed"));
        }
    }
    info!("hw_timer: publish tick every {} ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_publish_timer(period_ms: u32) -> Result<()> {
    log::info!(
        "hw_timer(sim): no timer started, ticks driven by sleep loop ({} ms)",
        period_ms
    );
    Ok(())
}

/// Stop the publish timer.
#[cfg(target_os = "espidf")]
pub fn stop_publish_timer() {
    // SAFETY: publish_timer() is a valid handle if start_publish_timer()
    // succeeded; null-check prevents stopping an uncreated timer.
    unsafe {
        let pt = publish_timer();
        if !pt.is_null() {
            esp_timer_stop(pt);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_publish_timer() {}
