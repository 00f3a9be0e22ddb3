//! TI-99/4A joysticks.
//!
//! Both sticks of the dual-joystick cable share the direction and fire
//! lines; each has its own enable line that must be grounded for its
//! switches to pull those lines low. One decoder instance serves one stick.

use super::{DecodeFrame, Protocol};
use crate::pins::{Level, PinError, PinIo, PinMode, PinSet};
use crate::types::pot;

const UP_PIN: u8 = 3;
const DOWN_PIN: u8 = 8;
const RIGHT_PIN: u8 = 9;
const LEFT_PIN: u8 = 5;
const FIRE_PIN: u8 = 4;

const ENABLE_ONE_PIN: u8 = 2;
const ENABLE_TWO_PIN: u8 = 7;

const FIRE_BUTTON: u8 = 0;

/// Which stick of the dual cable a decoder reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ti99Side {
    One,
    Two,
}

impl Ti99Side {
    /// Probe order.
    const ALL: [Ti99Side; 2] = [Ti99Side::One, Ti99Side::Two];

    #[inline]
    #[must_use]
    pub const fn enable_pin(self) -> u8 {
        match self {
            Ti99Side::One => ENABLE_ONE_PIN,
            Ti99Side::Two => ENABLE_TWO_PIN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ti99Joystick {
    side: Ti99Side,
}

impl Ti99Joystick {
    #[must_use]
    pub const fn new(side: Ti99Side) -> Self {
        Self { side }
    }

    #[inline]
    #[must_use]
    pub const fn side(&self) -> Ti99Side {
        self.side
    }
}

/// Run `read` with the stick's enable line grounded, releasing it afterwards
/// whether or not the read succeeded.
fn with_enabled<I: PinIo, T>(
    pins: &PinSet,
    io: &mut I,
    side: Ti99Side,
    read: impl FnOnce(&PinSet, &mut I) -> Result<T, PinError>,
) -> Result<T, PinError> {
    let enable = side.enable_pin();
    pins.drive(io, enable, Level::Low)?;
    let result = read(pins, io);
    pins.drive(io, enable, Level::High)?;
    result
}

impl Protocol for Ti99Joystick {
    const NAME: &'static str = "TI-99/4A";

    fn setup_pins(pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        for pin in [UP_PIN, DOWN_PIN, RIGHT_PIN, LEFT_PIN, FIRE_PIN] {
            pins.configure(io, pin, PinMode::InputPullUp)?;
        }
        for side in Ti99Side::ALL {
            pins.configure_output(io, side.enable_pin(), Level::High)?;
        }
        Ok(())
    }

    /// Fire held on either stick; stick one is tried first.
    fn probe(pins: &PinSet, io: &mut impl PinIo) -> Result<Option<Self>, PinError> {
        Self::setup_pins(pins, io)?;
        for side in Ti99Side::ALL {
            let fire = with_enabled(pins, io, side, |pins, io| pins.is_pressed(io, FIRE_PIN))?;
            if fire {
                return Ok(Some(Self::new(side)));
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
        let (fire, up, down, right, left) = with_enabled(pins, io, self.side, |pins, io| {
            Ok((
                pins.is_pressed(io, FIRE_PIN)?,
                pins.is_pressed(io, UP_PIN)?,
                pins.is_pressed(io, DOWN_PIN)?,
                pins.is_pressed(io, RIGHT_PIN)?,
                pins.is_pressed(io, LEFT_PIN)?,
            ))
        })?;

        let x = if right {
            pot::POSITIVE
        } else if left {
            pot::NEGATIVE
        } else {
            pot::CENTER
        };
        let y = if up {
            pot::POSITIVE
        } else if down {
            pot::NEGATIVE
        } else {
            pot::CENTER
        };

        frame.button(FIRE_BUTTON, fire);
        frame.stick(x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBoard, PORT_B};
    use crate::types::Axis;

    fn decode(js: &mut Ti99Joystick, board: &mut MockBoard) -> DecodeFrame {
        let mut frame = DecodeFrame::new();
        js.decode(&PORT_B, board, &mut frame).unwrap();
        frame
    }

    #[test]
    fn test_probe_finds_nothing_and_releases_enables() {
        let mut board = MockBoard::new();
        assert_eq!(Ti99Joystick::probe(&PORT_B, &mut board).unwrap(), None);
        assert_eq!(board.driven(PORT_B.physical(ENABLE_ONE_PIN)), Level::High);
        assert_eq!(board.driven(PORT_B.physical(ENABLE_TWO_PIN)), Level::High);
    }

    #[test]
    fn test_probe_picks_stick_with_fire_held() {
        let mut board = MockBoard::new();
        board.connect(&PORT_B, FIRE_PIN, ENABLE_TWO_PIN);
        let js = Ti99Joystick::probe(&PORT_B, &mut board).unwrap().unwrap();
        assert_eq!(js.side(), Ti99Side::Two);

        board.connect(&PORT_B, FIRE_PIN, ENABLE_ONE_PIN);
        let js = Ti99Joystick::probe(&PORT_B, &mut board).unwrap().unwrap();
        assert_eq!(js.side(), Ti99Side::One);
    }

    #[test]
    fn test_decode_reads_only_own_stick() {
        let mut board = MockBoard::new();
        let mut js = Ti99Joystick::new(Ti99Side::One);
        Ti99Joystick::setup_pins(&PORT_B, &mut board).unwrap();

        // Stick two pushes up and fires; stick one pushes right.
        board.connect(&PORT_B, UP_PIN, ENABLE_TWO_PIN);
        board.connect(&PORT_B, FIRE_PIN, ENABLE_TWO_PIN);
        board.connect(&PORT_B, RIGHT_PIN, ENABLE_ONE_PIN);

        let frame = decode(&mut js, &mut board);
        assert_eq!(frame.button_state(0), Some(false));
        assert_eq!(frame.axis_location(Axis::X), Some(pot::POSITIVE));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::CENTER));
        assert_eq!(board.driven(PORT_B.physical(ENABLE_ONE_PIN)), Level::High);

        let mut two = Ti99Joystick::new(Ti99Side::Two);
        let frame = decode(&mut two, &mut board);
        assert_eq!(frame.button_state(0), Some(true));
        assert_eq!(frame.axis_location(Axis::X), Some(pot::CENTER));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::POSITIVE));
    }

    #[test]
    fn test_right_beats_left_and_up_beats_down() {
        let mut board = MockBoard::new();
        let mut js = Ti99Joystick::new(Ti99Side::One);
        Ti99Joystick::setup_pins(&PORT_B, &mut board).unwrap();
        for pin in [UP_PIN, DOWN_PIN, LEFT_PIN, RIGHT_PIN] {
            board.connect(&PORT_B, pin, ENABLE_ONE_PIN);
        }

        let frame = decode(&mut js, &mut board);
        assert_eq!(frame.axis_location(Axis::X), Some(pot::POSITIVE));
        assert_eq!(frame.axis_location(Axis::Y), Some(pot::POSITIVE));
    }

    #[test]
    fn test_enable_pulse_wraps_each_decode() {
        let mut board = MockBoard::new();
        let mut js = Ti99Joystick::new(Ti99Side::Two);
        Ti99Joystick::setup_pins(&PORT_B, &mut board).unwrap();
        board.clear_writes();

        decode(&mut js, &mut board);
        let enable = PORT_B.physical(ENABLE_TWO_PIN);
        assert_eq!(
            board.writes(),
            [(enable, Level::Low), (enable, Level::High)]
        );
    }
}
