//! Inbound event dispatch between transport context and the main loop.
//!
//! Events are produced by:
//! - the bus transport task (decoded command frames)
//! - the publish timer callback (periodic telemetry tick)
//!
//! and consumed by the main loop, one at a time — the service is never
//! re-entered while it is handling an event.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ CAN RX task  │────▶│               │     │              │
//! │ Timer task   │────▶│  Event Queue  │────▶│  Main Loop   │
//! └──────────────┘     │  (bounded)    │     │  (consumer)  │
//!                      └───────────────┘     └──────────────┘
//! ```
//!
//! The queue is a bounded `embassy-sync` channel behind a critical
//! section; `push` never blocks, and a full queue drops the event. A
//! dropped command frame is harmless: the next frame re-decides from
//! scratch, and the TTL deadman covers the gap.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::frames::{RawCommandFrame, RpmCommandFrame};
use crate::error::{BusError, Result};

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 16;

/// Events the main loop dispatches to the ESC service.
#[derive(Debug, Clone)]
pub enum BusEvent {
    /// A raw duty-cycle command frame arrived.
    RawCommand(RawCommandFrame),
    /// An RPM command frame arrived.
    RpmCommand(RpmCommandFrame),
    /// The base publish timer fired.
    PublishTick,
}

/// Bounded MPSC queue of [`BusEvent`]s.
pub struct EventQueue {
    ch: Channel<CriticalSectionRawMutex, BusEvent, EVENT_QUEUE_CAP>,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self { ch: Channel::new() }
    }

    /// Enqueue an event without blocking. Safe to call from the timer
    /// task or the transport task.
    pub fn push(&self, event: BusEvent) -> Result<()> {
        self.ch
            .try_send(event)
            .map_err(|_| BusError::QueueFull.into())
    }

    /// Pop the next event, `None` when empty. Main-loop side.
    pub fn pop(&self) -> Option<BusEvent> {
        self.ch.try_receive().ok()
    }

    /// Drain all pending events into a callback, FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(BusEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.ch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ch.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// The firmware-wide queue lives in a static so timer and transport
// callbacks can reach it without threading a handle through C callbacks.
static BUS_EVENTS: EventQueue = EventQueue::new();

/// Push onto the firmware-wide queue.
pub fn push_bus_event(event: BusEvent) -> Result<()> {
    BUS_EVENTS.push(event)
}

/// Drain the firmware-wide queue. Called from the main loop only.
pub fn drain_bus_events(handler: impl FnMut(BusEvent)) {
    BUS_EVENTS.drain(handler);
}
