//! Mattel Intellivision hand controller: 16-direction disc, 12-key keypad
//! and three side buttons multiplexed onto eight lines.
//!
//! The eight lines are packed into a [`PinState`] (logical pin 1 is the
//! MSB). The side buttons occupy the top three bits, the disc the bottom
//! five, and each key closes one high and one low line at once.

use super::{DecodeFrame, Protocol};
use crate::pins::{Level, PinError, PinIo, PinMode, PinSet};
use crate::types::{pot, PinState};

/// Line shared by every switch in the controller.
const COMMON_PIN: u8 = 5;

/// Data lines, sampled MSB first.
const DATA_PINS: [u8; 8] = [1, 2, 3, 4, 6, 7, 8, 9];

/// Bits carrying the side buttons.
pub const FIRE_MASK: u8 = 0xE0;

/// Bits carrying the disc.
pub const MOVEMENT_MASK: u8 = 0x1F;

/// Side button patterns: top, lower left, lower right.
pub const FIRE_BUTTONS: [u8; 3] = [0xA0, 0x60, 0xC0];

/// Keypad codes indexed by key: digits 0..=9, then Clear and Enter.
pub const KEYPAD: [u8; 12] = [
    0x48, // 0
    0x81, // 1
    0x41, // 2
    0x21, // 3
    0x82, // 4
    0x42, // 5
    0x22, // 6
    0x84, // 7
    0x44, // 8
    0x24, // 9
    0x88, // Clear
    0x28, // Enter
];

const ENTER: u8 = KEYPAD[11];

/// Controller-local button of keypad key 0.
const FIRST_KEY_BUTTON: u8 = 3;

const N: i16 = pot::NEGATIVE;
const HN: i16 = pot::HALF_NEGATIVE;
const C: i16 = pot::CENTER;
const HP: i16 = pot::HALF_POSITIVE;
const P: i16 = pot::POSITIVE;

/// Disc codes and their (X, Y) locations, clockwise from north.
pub const DIRECTIONS: [(u8, (i16, i16)); 17] = [
    (0x00, (C, C)),
    (0x04, (C, P)),
    (0x14, (HP, P)),
    (0x16, (P, P)),
    (0x06, (P, HP)),
    (0x02, (P, C)),
    (0x12, (P, HN)),
    (0x13, (P, N)),
    (0x03, (HP, N)),
    (0x01, (C, N)),
    (0x11, (HN, N)),
    (0x19, (N, N)),
    (0x09, (N, HN)),
    (0x08, (N, C)),
    (0x18, (N, HP)),
    (0x1C, (N, P)),
    (0x0C, (HN, P)),
];

/// What one sample of the eight lines means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscInput {
    /// Side button, index into [`FIRE_BUTTONS`].
    Fire(usize),
    /// Keypad key, index into [`KEYPAD`].
    Key(usize),
    /// Disc position as (X, Y) locations; centered when unrecognized.
    Disc(i16, i16),
}

/// Classify a sample. Side buttons pre-empt the keypad, which pre-empts
/// the disc.
#[must_use]
pub fn classify(state: PinState) -> DiscInput {
    let fire = (state & FIRE_MASK).raw();
    if let Some(i) = FIRE_BUTTONS.iter().position(|&code| code == fire) {
        return DiscInput::Fire(i);
    }
    if let Some(key) = KEYPAD.iter().position(|&code| code == state.raw()) {
        return DiscInput::Key(key);
    }
    let movement = (state & MOVEMENT_MASK).raw();
    let (x, y) = DIRECTIONS
        .iter()
        .find(|(code, _)| *code == movement)
        .map_or((C, C), |&(_, location)| location);
    DiscInput::Disc(x, y)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Intellivision;

impl Intellivision {
    fn sample(pins: &PinSet, io: &mut impl PinIo) -> Result<PinState, PinError> {
        let mut pressed = [false; 8];
        for (slot, &pin) in pressed.iter_mut().zip(DATA_PINS.iter()) {
            *slot = pins.is_pressed(io, pin)?;
        }
        Ok(PinState::from_pressed(pressed))
    }
}

impl Protocol for Intellivision {
    const NAME: &'static str = "Intellivision";

    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        pins.configure_output(io, COMMON_PIN, Level::Low)?;
        for pin in DATA_PINS {
            pins.configure(io, pin, PinMode::InputPullUp)?;
        }
        Ok(())
    }

    /// Enter must be held at attach.
    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError> {
        Self::setup_pins(pins, io)?;
        let state = Self::sample(pins, io)?;
        Ok((state.raw() == ENTER).then_some(Self))
    }

    fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        let state = Self::sample(pins, io)?;
        let input = classify(state);

        for i in 0..FIRE_BUTTONS.len() {
            frame.button(i as u8, input == DiscInput::Fire(i));
        }
        for key in 0..KEYPAD.len() {
            frame.button(FIRST_KEY_BUTTON + key as u8, input == DiscInput::Key(key));
        }
        let (x, y) = match input {
            DiscInput::Disc(x, y) => (x, y),
            DiscInput::Fire(_) | DiscInput::Key(_) => (C, C),
        };
        frame.stick(x, y);
        Ok(())
    }
}
