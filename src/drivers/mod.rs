//! Hardware driver modules.

pub mod hw_init;
pub mod hw_timer;
pub mod motor;
