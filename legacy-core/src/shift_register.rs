//! Bit-banged reader for a parallel-in/serial-out shift register pad.

use crate::pins::{Level, PinError, PinIo, PinMode, PinSet};

/// Number of parallel inputs captured per latch.
pub const SHIFT_REGISTER_BITS: usize = 8;

/// Logical connector pins used by a shift register pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftRegisterPins {
    pub power: u8,
    pub ground: u8,
    pub latch: u8,
    pub clock: u8,
    pub data: u8,
}

/// Samples the register: one latch pulse captures the inputs and presents
/// bit 0, then each clock pulse shifts the next bit onto the data line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftRegister {
    wiring: ShiftRegisterPins,
}

impl ShiftRegister {
    #[must_use]
    pub const fn new(wiring: ShiftRegisterPins) -> Self {
        Self { wiring }
    }

    /// Configure the register pins: data as input, latch and clock idling
    /// low, power high and ground low.
    pub fn setup_pins(
        wiring: &ShiftRegisterPins,
        pins: &PinSet,
        io: &mut impl PinIo,
    ) -> Result<(), PinError> {
        pins.configure(io, wiring.data, PinMode::InputPullUp)?;
        pins.configure_output(io, wiring.clock, Level::Low)?;
        pins.configure_output(io, wiring.latch, Level::Low)?;
        pins.configure_output(io, wiring.power, Level::High)?;
        pins.configure_output(io, wiring.ground, Level::Low)
    }

    /// Read all bits; `true` means the corresponding input is pressed.
    pub fn read(
        &self,
        pins: &PinSet,
        io: &mut impl PinIo,
    ) -> Result<[bool; SHIFT_REGISTER_BITS], PinError> {
        let mut pressed = [false; SHIFT_REGISTER_BITS];
        for (i, bit) in pressed.iter_mut().enumerate() {
            let strobe = if i == 0 { self.wiring.latch } else { self.wiring.clock };
            self.pulse(pins, io, strobe)?;
            *bit = pins.is_pressed(io, self.wiring.data)?;
        }
        Ok(pressed)
    }

    fn pulse(&self, pins: &PinSet, io: &mut impl PinIo, logical: u8) -> Result<(), PinError> {
        pins.drive(io, logical, Level::High)?;
        pins.drive(io, logical, Level::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBoard, PORT_A};

    const WIRING: ShiftRegisterPins = ShiftRegisterPins {
        power: 7,
        ground: 8,
        latch: 3,
        clock: 2,
        data: 1,
    };

    #[test]
    fn test_reads_bits_in_shift_order() {
        let mut board = MockBoard::new();
        let bits = [true, false, false, true, false, true, true, false];
        board.attach_shift_register(&PORT_A, 3, 2, 1, bits);

        ShiftRegister::setup_pins(&WIRING, &PORT_A, &mut board).unwrap();
        let reg = ShiftRegister::new(WIRING);
        assert_eq!(reg.read(&PORT_A, &mut board).unwrap(), bits);

        // Each read samples afresh.
        board.attach_shift_register(&PORT_A, 3, 2, 1, [false; SHIFT_REGISTER_BITS]);
        assert_eq!(
            reg.read(&PORT_A, &mut board).unwrap(),
            [false; SHIFT_REGISTER_BITS]
        );
    }

    #[test]
    fn test_one_latch_and_seven_clock_pulses() {
        let mut board = MockBoard::new();
        ShiftRegister::setup_pins(&WIRING, &PORT_A, &mut board).unwrap();
        board.clear_writes();

        let reg = ShiftRegister::new(WIRING);
        reg.read(&PORT_A, &mut board).unwrap();

        let latch = PORT_A.physical(3);
        let clock = PORT_A.physical(2);
        let rising = |pin| {
            board
                .writes()
                .iter()
                .filter(|&&(p, l)| p == pin && l == Level::High)
                .count()
        };
        assert_eq!(rising(latch), 1);
        assert_eq!(rising(clock), 7);
        assert_eq!(board.writes()[0], (latch, Level::High));
        assert_eq!(board.driven(latch), Level::Low);
        assert_eq!(board.driven(clock), Level::Low);
    }

    #[test]
    fn test_setup_powers_register() {
        let mut board = MockBoard::new();
        ShiftRegister::setup_pins(&WIRING, &PORT_A, &mut board).unwrap();
        assert_eq!(board.driven(PORT_A.physical(7)), Level::High);
        assert_eq!(board.driven(PORT_A.physical(8)), Level::Low);
        assert_eq!(board.mode(PORT_A.physical(1)), PinMode::InputPullUp);
    }
}
