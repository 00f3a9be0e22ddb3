//! Atari 2600 compatible digital joystick, with the driving controller mode.
//!
//! The driving controller shares the joystick pinout but reports rotation
//! as a 2-bit Gray code on the up/down lines. It is recognized at run time
//! when both vertical lines read pressed together, which a real stick cannot
//! produce. The switch is permanent for the session.

use super::{DecodeFrame, Protocol};
use crate::pins::{Level, PinError, PinIo, PinMode, PinSet};
use crate::types::pot;

const UP_PIN: u8 = 1;
const DOWN_PIN: u8 = 2;
const LEFT_PIN: u8 = 3;
const RIGHT_PIN: u8 = 4;
const FIRE_PIN: u8 = 6;
const BUTTON_2_PIN: u8 = 7;
const GROUND_PIN: u8 = 8;

const FIRE_BUTTON: u8 = 0;
const BUTTON_2: u8 = 1;

#[derive(Clone, Copy)]
enum Direction {
    Horizontal(i16),
    Vertical(i16),
}

/// Scanned in this order; up before down decides which vertical wins.
const DIRECTIONS: [(u8, Direction); 4] = [
    (UP_PIN, Direction::Vertical(pot::POSITIVE)),
    (DOWN_PIN, Direction::Vertical(pot::NEGATIVE)),
    (LEFT_PIN, Direction::Horizontal(pot::NEGATIVE)),
    (RIGHT_PIN, Direction::Horizontal(pot::POSITIVE)),
];

/// Decoding mode of the digital joystick port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoystickMode {
    /// Four switches, fire and the second button.
    Digital,
    /// Driving controller; `last` is the previous (up, down) sample.
    DrivingPaddle { last: (bool, bool) },
}

/// Rotation inferred from one Gray-code step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Left,
    Right,
}

/// Direction of a step from `last` to `current`, or `None` when the
/// sample did not change.
#[must_use]
pub fn rotation(last: (bool, bool), current: (bool, bool)) -> Option<Rotation> {
    if last == current {
        return None;
    }
    let second_unchanged = current.1 == last.1;
    let rotation = match (last.0 == last.1, second_unchanged) {
        (true, true) | (false, false) => Rotation::Left,
        (true, false) | (false, true) => Rotation::Right,
    };
    Some(rotation)
}

/// Atari 2600 joystick decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AtariJoystick {
    mode: JoystickMode,
}

impl AtariJoystick {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: JoystickMode::Digital,
        }
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> JoystickMode {
        self.mode
    }

    fn decode_digital(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        frame.button(BUTTON_2, pins.is_pressed(io, BUTTON_2_PIN)?);

        let mut x = pot::CENTER;
        let mut y = pot::CENTER;

        for (pin, direction) in DIRECTIONS {
            if !pins.is_pressed(io, pin)? {
                continue;
            }
            match direction {
                Direction::Horizontal(value) => x = value,
                Direction::Vertical(value) if y == pot::CENTER => y = value,
                Direction::Vertical(_) => {
                    info!("both vertical lines active, switching to driving controller");
                    self.mode = JoystickMode::DrivingPaddle { last: (true, true) };
                }
            }
        }

        frame.stick(x, y);
        Ok(())
    }

    fn decode_driving(
        &mut self,
        last: (bool, bool),
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        let current = (pins.is_pressed(io, UP_PIN)?, pins.is_pressed(io, DOWN_PIN)?);

        let x = match rotation(last, current) {
            Some(Rotation::Left) => pot::NEGATIVE,
            Some(Rotation::Right) => pot::POSITIVE,
            None => pot::CENTER,
        };
        if x != pot::CENTER {
            trace!("driving controller step {:?} -> {:?}", last, current);
        }

        self.mode = JoystickMode::DrivingPaddle { last: current };
        frame.stick(x, pot::CENTER);
        Ok(())
    }
}

impl Default for AtariJoystick {
    fn default() -> Self {
        Self::new()
    }
}

impl Protocol for AtariJoystick {
    const NAME: &'static str = "Atari 2600 Compat";

    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        pins.configure_output(io, GROUND_PIN, Level::Low)?;
        for pin in [UP_PIN, DOWN_PIN, RIGHT_PIN, LEFT_PIN, FIRE_PIN, BUTTON_2_PIN] {
            pins.configure(io, pin, PinMode::InputPullUp)?;
        }
        Ok(())
    }

    /// Auto-detection needs the fire button held while probing.
    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError> {
        Self::setup_pins(pins, io)?;
        if pins.is_pressed(io, FIRE_PIN)? {
            Ok(Some(Self::new()))
        } else {
            Ok(None)
        }
    }

    fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        frame.button(FIRE_BUTTON, pins.is_pressed(io, FIRE_PIN)?);

        match self.mode {
            JoystickMode::Digital => self.decode_digital(pins, io, frame),
            JoystickMode::DrivingPaddle { last } => self.decode_driving(last, pins, io, frame),
        }
    }
}
