//! Atari 2600 12-key membrane keypad.
//!
//! A 4x3 matrix: rows are driven low one at a time and the three pulled-up
//! columns are read back. Keys map to buttons 3..=14.

use super::{DecodeFrame, Protocol};
use crate::pins::{Level, PinError, PinIo, PinMode, PinSet};

const ROW_PINS: [u8; 4] = [1, 2, 3, 4];
const COLUMN_PINS: [u8; 3] = [5, 9, 6];
const POWER_PIN: u8 = 7;
const GROUND_PIN: u8 = 8;

/// Report button of the top-left key.
const FIRST_KEY_BUTTON: u8 = 3;

/// Row and column index of the `#` key.
const POUND_KEY: (usize, usize) = (3, 2);

/// Controller-local button for a key position.
#[inline]
#[must_use]
pub const fn key_button(row: usize, column: usize) -> u8 {
    FIRST_KEY_BUTTON + (row * COLUMN_PINS.len() + column) as u8
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AtariKeypad;

impl AtariKeypad {
    fn read_row(
        pins: &PinSet,
        io: &mut impl PinIo,
        row: usize,
        mut on_key: impl FnMut(usize, bool),
    ) -> Result<(), PinError> {
        let row_pin = ROW_PINS[row];
        pins.drive(io, row_pin, Level::Low)?;
        for (column, &column_pin) in COLUMN_PINS.iter().enumerate() {
            match pins.is_pressed(io, column_pin) {
                Ok(pressed) => on_key(column, pressed),
                Err(e) => {
                    // Leave the matrix idle even when a read fails.
                    pins.drive(io, row_pin, Level::High)?;
                    return Err(e);
                }
            }
        }
        pins.drive(io, row_pin, Level::High)
    }
}

impl Protocol for AtariKeypad {
    const NAME: &'static str = "Atari 2600 Keypad";

    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        for row in ROW_PINS {
            pins.configure_output(io, row, Level::High)?;
        }
        for column in COLUMN_PINS {
            pins.configure(io, column, PinMode::InputPullUp)?;
        }
        pins.configure_output(io, GROUND_PIN, Level::Low)?;
        pins.configure_output(io, POWER_PIN, Level::High)
    }

    /// The `#` key must be held while probing.
    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError> {
        Self::setup_pins(pins, io)?;

        let (pound_row, pound_column) = POUND_KEY;
        let mut pound = false;
        Self::read_row(pins, io, pound_row, |column, pressed| {
            if column == pound_column {
                pound = pressed;
            }
        })?;

        Ok(pound.then_some(Self))
    }

    fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        for row in 0..ROW_PINS.len() {
            Self::read_row(pins, io, row, |column, pressed| {
                frame.button(key_button(row, column), pressed);
            })?;
        }
        Ok(())
    }
}
