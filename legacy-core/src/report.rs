//! In-memory USB joystick report.

use crate::output::HidSink;
use crate::types::{Axis, AXIS_COUNT, MAX_BUTTONS};

/// Joystick report matching the firmware's HID report descriptor.
///
/// Layout (little-endian, 26 bytes): a 32-bit button field holding 30
/// buttons plus 2 padding bits, then 11 signed 16-bit axes in [`Axis`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    pub buttons: u32,
    pub axes: [i16; AXIS_COUNT],
}

impl JoystickReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 4 + 2 * AXIS_COUNT;

    /// Neutral report: no buttons, all axes centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: 0,
            axes: [0; AXIS_COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(&self, index: u8) -> bool {
        (index as usize) < MAX_BUTTONS && self.buttons & (1 << index) != 0
    }

    #[inline]
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> i16 {
        self.axes[axis.index()]
    }

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.buttons.to_le_bytes());
        for (chunk, value) in out[4..].chunks_exact_mut(2).zip(self.axes.iter()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }
}

impl Default for JoystickReport {
    fn default() -> Self {
        Self::neutral()
    }
}

impl HidSink for JoystickReport {
    fn set_button(&mut self, index: u8, pressed: bool) {
        if index as usize >= MAX_BUTTONS {
            return;
        }
        if pressed {
            self.buttons |= 1 << index;
        } else {
            self.buttons &= !(1 << index);
        }
    }

    fn set_axis(&mut self, axis: Axis, value: i16) {
        self.axes[axis.index()] = value;
    }
}
