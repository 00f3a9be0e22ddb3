//! Atari 7800 Flashback pad, read through its on-board shift register.

use super::{DecodeFrame, Protocol};
use crate::pins::{PinError, PinIo, PinSet};
use crate::shift_register::{ShiftRegister, ShiftRegisterPins};
use crate::types::pot;

const WIRING: ShiftRegisterPins = ShiftRegisterPins {
    power: 7,
    ground: 8,
    latch: 3,
    clock: 2,
    data: 1,
};

/// Register bits carrying buttons 0..=3.
const BUTTON_BITS: usize = 4;
const UP_BIT: usize = 4;
const DOWN_BIT: usize = 5;
const LEFT_BIT: usize = 6;
const RIGHT_BIT: usize = 7;

/// Primary fire, held at attach for detection.
const FIRE_BIT: usize = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashbackPad {
    register: ShiftRegister,
}

impl FlashbackPad {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            register: ShiftRegister::new(WIRING),
        }
    }
}

impl Default for FlashbackPad {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick between two opposing switches, the first one winning.
fn ternary(first: bool, second: bool, first_value: i16, second_value: i16) -> i16 {
    if first {
        first_value
    } else if second {
        second_value
    } else {
        pot::CENTER
    }
}

impl Protocol for FlashbackPad {
    const NAME: &'static str = "Atari 7800 Flashback";

    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        ShiftRegister::setup_pins(&WIRING, pins, io)
    }

    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError> {
        Self::setup_pins(pins, io)?;
        let pad = Self::new();
        let bits = pad.register.read(pins, io)?;
        Ok(bits[FIRE_BIT].then_some(pad))
    }

    fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        let bits = self.register.read(pins, io)?;

        for (button, &pressed) in bits.iter().take(BUTTON_BITS).enumerate() {
            frame.button(button as u8, pressed);
        }

        let x = ternary(bits[LEFT_BIT], bits[RIGHT_BIT], pot::NEGATIVE, pot::POSITIVE);
        let y = ternary(bits[UP_BIT], bits[DOWN_BIT], pot::POSITIVE, pot::NEGATIVE);
        frame.stick(x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mock::{MockBoard, PORT_A};
    use crate::types::Axis;
    use std::vec::Vec;

    fn bits(set: &[usize]) -> [bool; 8] {
        let mut out = [false; 8];
        for &i in set {
            out[i] = true;
        }
        out
    }

    fn decode_bits(set: &[usize]) -> DecodeFrame {
        let mut board = MockBoard::new();
        board.attach_shift_register(&PORT_A, WIRING.latch, WIRING.clock, WIRING.data, bits(set));
        let mut pad = FlashbackPad::new();
        FlashbackPad::setup_pins(&PORT_A, &mut board).unwrap();
        let mut frame = DecodeFrame::new();
        pad.decode(&PORT_A, &mut board, &mut frame).unwrap();
        frame
    }

    #[test]
    fn test_probe_requires_primary_fire() {
        let mut board = MockBoard::new();
        board.attach_shift_register(&PORT_A, 3, 2, 1, bits(&[1, 2]));
        assert_eq!(FlashbackPad::probe(&PORT_A, &mut board).unwrap(), None);

        board.attach_shift_register(&PORT_A, 3, 2, 1, bits(&[FIRE_BIT]));
        assert!(FlashbackPad::probe(&PORT_A, &mut board).unwrap().is_some());
    }

    #[test]
    fn test_probe_without_register_finds_nothing() {
        let mut board = MockBoard::new();
        assert_eq!(FlashbackPad::probe(&PORT_A, &mut board).unwrap(), None);
    }

    #[test]
    fn test_low_bits_are_buttons() {
        let frame = decode_bits(&[0, 3]);
        assert_eq!(frame.pressed().collect::<Vec<_>>(), [0, 3]);
        assert_eq!(frame.buttons().count(), 4);
        assert_eq!(frame.axis_location(Axis::X), Some(pot::CENTER));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::CENTER));
    }

    #[test]
    fn test_directions() {
        let frame = decode_bits(&[UP_BIT, RIGHT_BIT]);
        assert_eq!(frame.axis_location(Axis::X), Some(pot::POSITIVE));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::POSITIVE));
        assert_eq!(frame.pressed().count(), 0);

        let frame = decode_bits(&[DOWN_BIT, LEFT_BIT]);
        assert_eq!(frame.axis_location(Axis::X), Some(pot::NEGATIVE));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::NEGATIVE));
    }

    #[test]
    fn test_opposing_directions_prefer_up_and_left() {
        let frame = decode_bits(&[UP_BIT, DOWN_BIT, LEFT_BIT, RIGHT_BIT]);
        assert_eq!(frame.axis_location(Axis::X), Some(pot::NEGATIVE));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::POSITIVE));
    }
}
