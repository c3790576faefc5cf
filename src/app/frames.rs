//! Inbound multi-ESC command frames.
//!
//! A command frame carries one value per ESC channel, addressed by
//! position; this node only ever reads `frame[esc_index]`. A frame
//! shorter than `esc_index + 1` simply does not address this node — that
//! is a normal "not-for-me at this size" case, not a decode error, and
//! the router turns it into a fail-safe stop.

use heapless::Vec;

use crate::error::{BusError, Error};

/// Maximum ESC channels one command frame can address.
pub const MAX_ESC_CHANNELS: usize = 20;

/// Full-scale raw duty value (14-bit signed command scale). A channel
/// value divided by this yields the normalized duty cycle in [0, 1].
pub const RAW_COMMAND_MAX: i16 = 8191;

/// Per-channel raw duty-cycle setpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCommandFrame {
    cmd: Vec<i16, MAX_ESC_CHANNELS>,
}

impl RawCommandFrame {
    /// Build a frame from decoded channel values. Rejects payloads that
    /// claim more channels than the bus allows.
    pub fn from_slice(values: &[i16]) -> Result<Self, Error> {
        let cmd = Vec::from_slice(values).map_err(|()| BusError::FrameTooLong)?;
        Ok(Self { cmd })
    }

    /// Value addressed to `index`, or `None` when the frame is too short.
    pub fn channel(&self, index: u8) -> Option<i16> {
        self.cmd.get(usize::from(index)).copied()
    }

    pub fn len(&self) -> usize {
        self.cmd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmd.is_empty()
    }
}

/// Per-channel RPM setpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpmCommandFrame {
    rpm: Vec<i32, MAX_ESC_CHANNELS>,
}

impl RpmCommandFrame {
    pub fn from_slice(values: &[i32]) -> Result<Self, Error> {
        let rpm = Vec::from_slice(values).map_err(|()| BusError::FrameTooLong)?;
        Ok(Self { rpm })
    }

    pub fn channel(&self, index: u8) -> Option<i32> {
        self.rpm.get(usize::from(index)).copied()
    }

    pub fn len(&self) -> usize {
        self.rpm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rpm.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_addressing() {
        let f = RawCommandFrame::from_slice(&[0, 100, 4096]).unwrap();
        assert_eq!(f.len(), 3);
        assert_eq!(f.channel(2), Some(4096));
        assert_eq!(f.channel(3), None);
    }

    #[test]
    fn short_frame_yields_no_channel() {
        let f = RpmCommandFrame::from_slice(&[0, 0]).unwrap();
        assert_eq!(f.channel(2), None);
        assert_eq!(f.channel(15), None);
    }

    #[test]
    fn empty_frame_is_valid_but_addresses_nobody() {
        let f = RawCommandFrame::from_slice(&[]).unwrap();
        assert!(f.is_empty());
        assert_eq!(f.channel(0), None);
    }

    #[test]
    fn overlong_frame_rejected() {
        let values = [0i16; MAX_ESC_CHANNELS + 1];
        assert_eq!(
            RawCommandFrame::from_slice(&values),
            Err(Error::Bus(BusError::FrameTooLong))
        );
    }

    #[test]
    fn full_capacity_frame_accepted() {
        let values = [1i32; MAX_ESC_CHANNELS];
        let f = RpmCommandFrame::from_slice(&values).unwrap();
        assert_eq!(f.channel(19), Some(1));
    }
}
