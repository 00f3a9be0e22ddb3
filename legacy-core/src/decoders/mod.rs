//! Protocol decoders, one per supported controller family.
//!
//! Every decoder implements [`Protocol`]: a static probe that recognizes the
//! controller on an unclaimed connector and a per-cycle decode that samples
//! the pins into a [`DecodeFrame`]. Probe and decode share the decoder's
//! `setup_pins` routine, so a failed probe leaves the connector in a mode
//! the next protocol can reconfigure.

mod atari_joystick;
mod atari_keypad;
mod atari_paddles;
mod flashback;
mod intellivision;
mod ti99;

pub use atari_joystick::{rotation, AtariJoystick, JoystickMode, Rotation};
pub use atari_keypad::{key_button, AtariKeypad};
pub use atari_paddles::AtariPaddles;
pub use flashback::FlashbackPad;
pub use intellivision::{
    classify, DiscInput, Intellivision, DIRECTIONS, FIRE_BUTTONS, FIRE_MASK, KEYPAD, MOVEMENT_MASK,
};
pub use ti99::{Ti99Joystick, Ti99Side};

use crate::pins::{PinError, PinIo, PinSet};
use crate::types::{Axis, AxisState, ButtonState, AXIS_COUNT, BUTTONS_PER_PORT};

/// Detection and decoding for one controller family.
pub trait Protocol: Sized {
    /// Human-readable controller name.
    const NAME: &'static str;

    /// Put the connector pins into the mode this protocol needs.
    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError>;

    /// Check whether this protocol's controller is attached.
    ///
    /// Absence is `Ok(None)`; `Err` is reserved for pin faults.
    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError>;

    /// Sample the controller once.
    fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError>;
}

/// Button and axis values sampled in one decode cycle.
///
/// Buttons use controller-local indices; axes hold potentiometer-domain
/// locations. Only the entries a decoder touched are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeFrame {
    buttons: [Option<bool>; BUTTONS_PER_PORT],
    axes: [Option<i16>; AXIS_COUNT],
}

impl DecodeFrame {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buttons: [None; BUTTONS_PER_PORT],
            axes: [None; AXIS_COUNT],
        }
    }

    /// Record a button sample. Indices past the per-port range are dropped.
    #[inline]
    pub fn button(&mut self, button: u8, pressed: bool) {
        if let Some(slot) = self.buttons.get_mut(button as usize) {
            *slot = Some(pressed);
        }
    }

    #[inline]
    pub fn axis(&mut self, axis: Axis, location: i16) {
        self.axes[axis.index()] = Some(location);
    }

    /// Record both stick axes at once.
    #[inline]
    pub fn stick(&mut self, x: i16, y: i16) {
        self.axis(Axis::X, x);
        self.axis(Axis::Y, y);
    }

    #[must_use]
    pub fn button_state(&self, button: u8) -> Option<bool> {
        self.buttons.get(button as usize).copied().flatten()
    }

    #[must_use]
    pub fn axis_location(&self, axis: Axis) -> Option<i16> {
        self.axes[axis.index()]
    }

    /// Buttons sampled this cycle.
    pub fn buttons(&self) -> impl Iterator<Item = ButtonState> + '_ {
        self.buttons.iter().enumerate().filter_map(|(i, s)| {
            s.map(|pressed| ButtonState {
                button: i as u8,
                pressed,
            })
        })
    }

    /// Axes sampled this cycle.
    pub fn axes(&self) -> impl Iterator<Item = AxisState> + '_ {
        const ORDER: [Axis; AXIS_COUNT] = [
            Axis::X,
            Axis::Y,
            Axis::Z,
            Axis::Rx,
            Axis::Ry,
            Axis::Rz,
            Axis::Rudder,
            Axis::Throttle,
            Axis::Accelerator,
            Axis::Brake,
            Axis::Steering,
        ];
        ORDER
            .iter()
            .zip(self.axes.iter())
            .filter_map(|(&axis, loc)| loc.map(|location| AxisState { axis, location }))
    }

    /// Local indices of every button sampled as pressed.
    pub fn pressed(&self) -> impl Iterator<Item = u8> + '_ {
        self.buttons().filter(|b| b.pressed).map(|b| b.button)
    }
}
