//! Atari 2600 paddle pair.
//!
//! Each paddle is a potentiometer between the power pin and its wiper, read
//! linearly onto one axis, plus a fire switch to ground.

use super::{DecodeFrame, Protocol};
use crate::pins::{Level, PinError, PinIo, PinMode, PinSet};
use crate::types::Axis;

const POWER_PIN: u8 = 7;
const GROUND_PIN: u8 = 8;

/// (fire pin, button) per paddle, left first.
const FIRE: [(u8, u8); 2] = [(3, 0), (4, 1)];

/// (wiper pin, axis) per paddle, left first.
const WIPERS: [(u8, Axis); 2] = [(9, Axis::X), (5, Axis::Y)];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AtariPaddles;

impl Protocol for AtariPaddles {
    const NAME: &'static str = "Atari 2600 Paddles";

    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        for (pin, _) in FIRE {
            pins.configure(io, pin, PinMode::InputPullUp)?;
        }
        for (pin, _) in WIPERS {
            pins.configure(io, pin, PinMode::Input)?;
        }
        pins.configure_output(io, GROUND_PIN, Level::Low)?;
        pins.configure_output(io, POWER_PIN, Level::High)
    }

    /// Either fire button held at attach.
    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError> {
        Self::setup_pins(pins, io)?;
        for (pin, _) in FIRE {
            if pins.is_pressed(io, pin)? {
                return Ok(Some(Self));
            }
        }
        Ok(None)
    }

    fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        for (pin, button) in FIRE {
            frame.button(button, pins.is_pressed(io, pin)?);
        }
        for (pin, axis) in WIPERS {
            let raw = pins.read_analog(io, pin)?;
            frame.axis(axis, raw.min(i16::MAX as u16) as i16);
        }
        Ok(())
    }
}
