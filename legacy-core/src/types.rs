//! Core value types: axes, button/axis updates, pin snapshots and port slots.

use core::ops::BitAnd;

/// Total button slots in the shared HID report (15 per port).
pub const MAX_BUTTONS: usize = 30;

/// Button slots reserved for each port.
pub const BUTTONS_PER_PORT: usize = 15;

/// Number of axis channels in the HID report.
pub const AXIS_COUNT: usize = 11;

/// Axis locations emitted by decoders use the 10-bit potentiometer domain.
pub mod pot {
    /// Full negative deflection.
    pub const NEGATIVE: i16 = 0;
    /// Half negative deflection.
    pub const HALF_NEGATIVE: i16 = 256;
    /// Centered.
    pub const CENTER: i16 = 512;
    /// Half positive deflection.
    pub const HALF_POSITIVE: i16 = 768;
    /// Full positive deflection.
    pub const POSITIVE: i16 = 1024;
}

/// Lowest value reported on a HID axis.
pub const AXIS_MIN: i16 = -32767;
/// Highest value reported on a HID axis.
pub const AXIS_MAX: i16 = 32767;

/// 65_535 HID steps over 1_024 potentiometer steps, rounded.
const POT_TO_AXIS_FACTOR: i32 = 64;

/// Convert a potentiometer-domain location into the HID axis range.
#[inline]
#[must_use]
pub fn pot_to_axis(raw: i16) -> i16 {
    let centered = raw as i32 - pot::CENTER as i32;
    (centered * POT_TO_AXIS_FACTOR).clamp(AXIS_MIN as i32, AXIS_MAX as i32) as i16
}

/// HID axis channels, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
    Rudder,
    Throttle,
    Accelerator,
    Brake,
    Steering,
}

impl Axis {
    /// Position of this axis in the report.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A button update produced by one decode cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Controller-local button index.
    pub button: u8,
    pub pressed: bool,
}

/// An axis update produced by one decode cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisState {
    pub axis: Axis,
    /// Location in the potentiometer domain (see [`pot`]).
    pub location: i16,
}

impl AxisState {
    #[must_use]
    pub const fn new(axis: Axis, location: i16) -> Self {
        Self { axis, location }
    }
}

/// Packed snapshot of 8 active-low digital inputs, MSB first.
///
/// A set bit means the line was pulled low (pressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinState(pub u8);

impl PinState {
    /// Pack samples in the order they were taken; the first sample is the MSB.
    #[must_use]
    pub fn from_pressed(pressed: [bool; 8]) -> Self {
        Self(pressed.iter().fold(0u8, |acc, &p| (acc << 1) | p as u8))
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl BitAnd<u8> for PinState {
    type Output = Self;

    #[inline]
    fn bitand(self, mask: u8) -> Self::Output {
        Self(self.0 & mask)
    }
}

/// One of the two controller slots handed out by the allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortSlot {
    First,
    Second,
}

impl PortSlot {
    /// First report button owned by this slot.
    #[inline]
    #[must_use]
    pub const fn button_origin(self) -> u8 {
        match self {
            PortSlot::First => 0,
            PortSlot::Second => BUTTONS_PER_PORT as u8,
        }
    }

    /// Report axis used for a controller axis. The second slot moves its
    /// stick to Rx/Ry so both controllers stay visible.
    #[inline]
    #[must_use]
    pub const fn map_axis(self, axis: Axis) -> Axis {
        match (self, axis) {
            (PortSlot::Second, Axis::X) => Axis::Rx,
            (PortSlot::Second, Axis::Y) => Axis::Ry,
            _ => axis,
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
