//! Simulated controller board for host tests.
//!
//! Models pull-up inputs, switches to ground, switches between two pins
//! (key matrices, shared enable lines), analog wipers and a 4021-style
//! parallel-in/serial-out shift register.

extern crate std;

use crate::pins::{Level, PhysicalPin, PinError, PinIo, PinMode, PinSet};
use std::vec::Vec;

const MAX_PINS: usize = 64;

/// Port A test wiring: logical pin `n` is physical pin `10 + n - 1`.
pub const PORT_A: PinSet = PinSet::from_raw([10, 11, 12, 13, 14, 15, 16, 17, 18]);
/// Port B test wiring: logical pin `n` is physical pin `30 + n - 1`.
pub const PORT_B: PinSet = PinSet::from_raw([30, 31, 32, 33, 34, 35, 36, 37, 38]);

struct MockShift {
    latch: PhysicalPin,
    clock: PhysicalPin,
    data: PhysicalPin,
    pressed: [bool; 8],
    index: usize,
}

pub struct MockBoard {
    modes: [PinMode; MAX_PINS],
    driven: [Level; MAX_PINS],
    held_low: [bool; MAX_PINS],
    analog: [u16; MAX_PINS],
    links: Vec<(PhysicalPin, PhysicalPin)>,
    shift: Option<MockShift>,
    writes: Vec<(PhysicalPin, Level)>,
    now: u64,
    accesses: usize,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            modes: [PinMode::Input; MAX_PINS],
            driven: [Level::High; MAX_PINS],
            held_low: [false; MAX_PINS],
            analog: [0; MAX_PINS],
            links: Vec::new(),
            shift: None,
            writes: Vec::new(),
            now: 0,
            accesses: 0,
        }
    }

    /// Close a switch between `pin` and ground.
    pub fn hold_low(&mut self, pin: PhysicalPin) {
        self.held_low[pin.0 as usize] = true;
    }

    /// Open the switch between `pin` and ground.
    pub fn release(&mut self, pin: PhysicalPin) {
        self.held_low[pin.0 as usize] = false;
    }

    /// Hold a logical pin of a connector low.
    pub fn press(&mut self, pins: &PinSet, logical: u8) {
        self.hold_low(pins.physical(logical));
    }

    /// Release a logical pin of a connector.
    pub fn unpress(&mut self, pins: &PinSet, logical: u8) {
        self.release(pins.physical(logical));
    }

    /// Close a switch between two logical pins of a connector.
    pub fn connect(&mut self, pins: &PinSet, a: u8, b: u8) {
        self.links.push((pins.physical(a), pins.physical(b)));
    }

    /// Open every pin-to-pin switch.
    pub fn disconnect_all(&mut self) {
        self.links.clear();
    }

    pub fn set_analog(&mut self, pins: &PinSet, logical: u8, value: u16) {
        self.analog[pins.physical(logical).0 as usize] = value;
    }

    /// Attach a shift register on the given logical pins with the given
    /// parallel inputs (`true` = pressed).
    pub fn attach_shift_register(
        &mut self,
        pins: &PinSet,
        latch: u8,
        clock: u8,
        data: u8,
        pressed: [bool; 8],
    ) {
        self.shift = Some(MockShift {
            latch: pins.physical(latch),
            clock: pins.physical(clock),
            data: pins.physical(data),
            pressed,
            index: 0,
        });
    }

    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    pub fn mode(&self, pin: PhysicalPin) -> PinMode {
        self.modes[pin.0 as usize]
    }

    pub fn driven(&self, pin: PhysicalPin) -> Level {
        self.driven[pin.0 as usize]
    }

    /// Every `write` issued so far, in order.
    pub fn writes(&self) -> &[(PhysicalPin, Level)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Number of pin operations performed so far.
    pub fn accesses(&self) -> usize {
        self.accesses
    }

    fn check(pin: PhysicalPin) -> Result<usize, PinError> {
        let idx = pin.0 as usize;
        if idx < MAX_PINS {
            Ok(idx)
        } else {
            Err(PinError::InvalidPin)
        }
    }

    fn pulled_low_by_link(&self, pin: PhysicalPin) -> bool {
        self.links.iter().any(|&(a, b)| {
            let other = if a == pin {
                b
            } else if b == pin {
                a
            } else {
                return false;
            };
            let o = other.0 as usize;
            self.modes[o] == PinMode::Output && self.driven[o] == Level::Low
        })
    }
}

impl PinIo for MockBoard {
    fn set_mode(&mut self, pin: PhysicalPin, mode: PinMode) -> Result<(), PinError> {
        self.accesses += 1;
        let idx = Self::check(pin)?;
        self.modes[idx] = mode;
        Ok(())
    }

    fn read(&mut self, pin: PhysicalPin) -> Result<Level, PinError> {
        self.accesses += 1;
        let idx = Self::check(pin)?;
        if self.modes[idx] == PinMode::Output {
            return Ok(self.driven[idx]);
        }
        if self.held_low[idx] || self.pulled_low_by_link(pin) {
            return Ok(Level::Low);
        }
        if let Some(shift) = &self.shift {
            if shift.data == pin && shift.index < 8 && shift.pressed[shift.index] {
                return Ok(Level::Low);
            }
        }
        Ok(Level::High)
    }

    fn write(&mut self, pin: PhysicalPin, level: Level) -> Result<(), PinError> {
        self.accesses += 1;
        let idx = Self::check(pin)?;
        let previous = self.driven[idx];
        self.driven[idx] = level;
        self.writes.push((pin, level));

        if let Some(shift) = &mut self.shift {
            let rising = previous == Level::Low && level == Level::High;
            if pin == shift.latch && rising {
                shift.index = 0;
            } else if pin == shift.clock && rising {
                shift.index += 1;
            }
        }
        Ok(())
    }

    fn read_analog(&mut self, pin: PhysicalPin) -> Result<u16, PinError> {
        self.accesses += 1;
        let idx = Self::check(pin)?;
        Ok(self.analog[idx])
    }

    fn millis(&self) -> u64 {
        self.now
    }
}
