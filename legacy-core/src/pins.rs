//! Connector pin numbering and the pin I/O provider trait.
//!
//! Every decoder speaks in *logical* DE-9 pin numbers (1..=9). A [`PinSet`]
//! maps those to the physical pins of one connector, and a [`PinIo`]
//! implementation performs the actual reads and writes.

/// Number of pins on a legacy joystick connector.
pub const PINS_PER_CONNECTOR: usize = 9;

/// Physical pin identifier understood by the [`PinIo`] provider
/// (a GPIO number on the firmware).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysicalPin(pub u8);

/// Electrical level of a digital pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Pin direction and bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input (analog wipers, externally driven lines).
    Input,
    /// Input with the internal pull-up enabled.
    InputPullUp,
    /// Push-pull output.
    Output,
}

/// Error type for pin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// The physical pin is not wired to this provider.
    InvalidPin,
    /// An analog read was requested on a pin without an ADC channel.
    NotAnalog,
    /// ADC conversion failed.
    Adc,
    /// Any other GPIO failure.
    Io,
}

/// Pin I/O provider consumed by the decoders.
///
/// Implementations must be `#![no_std]` compatible with no heap allocation.
/// Levels are electrical: with the active-low wiring of these controllers a
/// pressed switch reads [`Level::Low`].
pub trait PinIo {
    /// Reconfigure the direction/bias of a pin.
    fn set_mode(&mut self, pin: PhysicalPin, mode: PinMode) -> Result<(), PinError>;

    /// Sample a digital input.
    fn read(&mut self, pin: PhysicalPin) -> Result<Level, PinError>;

    /// Drive an output pin.
    fn write(&mut self, pin: PhysicalPin, level: Level) -> Result<(), PinError>;

    /// Sample an analog input, scaled to `0..=1023`.
    fn read_analog(&mut self, pin: PhysicalPin) -> Result<u16, PinError>;

    /// Monotonic time in milliseconds.
    fn millis(&self) -> u64;
}

/// The 9 physical pins of one connector, indexed by logical pin 1..=9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSet([PhysicalPin; PINS_PER_CONNECTOR]);

impl PinSet {
    #[must_use]
    pub const fn new(pins: [PhysicalPin; PINS_PER_CONNECTOR]) -> Self {
        Self(pins)
    }

    /// Build a pin set from raw physical pin numbers.
    #[must_use]
    pub const fn from_raw(pins: [u8; PINS_PER_CONNECTOR]) -> Self {
        let mut out = [PhysicalPin(0); PINS_PER_CONNECTOR];
        let mut i = 0;
        while i < PINS_PER_CONNECTOR {
            out[i] = PhysicalPin(pins[i]);
            i += 1;
        }
        Self(out)
    }

    /// Physical pin for a logical connector pin (1..=9).
    ///
    /// Out-of-range input is a caller bug; the pin counts are fixed at compile time.
    #[inline]
    #[must_use]
    pub const fn physical(&self, logical: u8) -> PhysicalPin {
        self.0[logical as usize - 1]
    }

    /// Set the mode of a logical pin.
    #[inline]
    pub fn configure(
        &self,
        io: &mut impl PinIo,
        logical: u8,
        mode: PinMode,
    ) -> Result<(), PinError> {
        io.set_mode(self.physical(logical), mode)
    }

    /// Configure a logical pin as an output and drive it.
    #[inline]
    pub fn configure_output(
        &self,
        io: &mut impl PinIo,
        logical: u8,
        level: Level,
    ) -> Result<(), PinError> {
        self.configure(io, logical, PinMode::Output)?;
        self.drive(io, logical, level)
    }

    /// Drive a logical output pin.
    #[inline]
    pub fn drive(&self, io: &mut impl PinIo, logical: u8, level: Level) -> Result<(), PinError> {
        io.write(self.physical(logical), level)
    }

    /// Read an active-low logical input: `true` when the line is pulled low.
    #[inline]
    pub fn is_pressed(&self, io: &mut impl PinIo, logical: u8) -> Result<bool, PinError> {
        Ok(io.read(self.physical(logical))? == Level::Low)
    }

    /// Read the analog level of a logical pin.
    #[inline]
    pub fn read_analog(&self, io: &mut impl PinIo, logical: u8) -> Result<u16, PinError> {
        io.read_analog(self.physical(logical))
    }
}
