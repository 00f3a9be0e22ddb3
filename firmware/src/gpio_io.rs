//! RP2040 GPIO/ADC implementation of the pin I/O trait.

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{Flex, Pull};
use embassy_time::Instant;
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use legacy_core::{Level, PhysicalPin, PinError, PinIo, PinMode};

/// GPIOs on the RP2040 (GP0..=GP29).
pub const GPIO_COUNT: usize = 30;

/// ADC inputs on the RP2040 (GP26..=GP29).
pub const ADC_CHANNELS: usize = 4;

/// The ADC samples 12 bits; decoders expect 10.
const ADC_SHIFT: u16 = 2;

/// An ADC input wired in parallel with a connector's digital GPIO.
struct AnalogLine<'d> {
    gpio: PhysicalPin,
    channel: Channel<'d>,
}

/// Pin I/O provider backed by RP2040 GPIOs.
///
/// Physical pins are GPIO numbers. Connector lines that carry potentiometer
/// wipers are also wired to an ADC input; [`attach_analog`](Self::attach_analog)
/// registers that input under the digital GPIO's number.
pub struct RpPinIo<'d> {
    digital: [Option<Flex<'d>>; GPIO_COUNT],
    analog: [Option<AnalogLine<'d>>; ADC_CHANNELS],
    adc: Adc<'d, Blocking>,
}

impl<'d> RpPinIo<'d> {
    /// Create a provider with no pins attached.
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self {
            digital: [const { None }; GPIO_COUNT],
            analog: [const { None }; ADC_CHANNELS],
            adc,
        }
    }

    /// Hand a GPIO to the provider.
    pub fn attach_digital(&mut self, gpio: u8, pin: Flex<'d>) -> &mut Self {
        match self.digital.get_mut(gpio as usize) {
            Some(slot) => *slot = Some(pin),
            None => warn!("GPIO {} out of range", gpio),
        }
        self
    }

    /// Make analog reads of `gpio` sample `channel`.
    pub fn attach_analog(&mut self, gpio: u8, channel: Channel<'d>) -> &mut Self {
        match self.analog.iter_mut().find(|line| line.is_none()) {
            Some(slot) => {
                *slot = Some(AnalogLine {
                    gpio: PhysicalPin(gpio),
                    channel,
                })
            }
            None => warn!("no free ADC slot for GPIO {}", gpio),
        }
        self
    }

    fn flex(&mut self, pin: PhysicalPin) -> Result<&mut Flex<'d>, PinError> {
        self.digital
            .get_mut(pin.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(PinError::InvalidPin)
    }
}

impl PinIo for RpPinIo<'_> {
    fn set_mode(&mut self, pin: PhysicalPin, mode: PinMode) -> Result<(), PinError> {
        let flex = self.flex(pin)?;
        match mode {
            PinMode::Input => {
                flex.set_pull(Pull::None);
                flex.set_as_input();
            }
            PinMode::InputPullUp => {
                flex.set_pull(Pull::Up);
                flex.set_as_input();
            }
            PinMode::Output => flex.set_as_output(),
        }
        Ok(())
    }

    fn read(&mut self, pin: PhysicalPin) -> Result<Level, PinError> {
        let flex = self.flex(pin)?;
        let low = InputPin::is_low(flex).map_err(|_| PinError::Io)?;
        Ok(if low { Level::Low } else { Level::High })
    }

    fn write(&mut self, pin: PhysicalPin, level: Level) -> Result<(), PinError> {
        let flex = self.flex(pin)?;
        let state = match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        };
        OutputPin::set_state(flex, state).map_err(|_| PinError::Io)
    }

    fn read_analog(&mut self, pin: PhysicalPin) -> Result<u16, PinError> {
        let line = self
            .analog
            .iter_mut()
            .flatten()
            .find(|line| line.gpio == pin)
            .ok_or(PinError::NotAnalog)?;
        let raw = self
            .adc
            .blocking_read(&mut line.channel)
            .map_err(|_| PinError::Adc)?;
        Ok(raw >> ADC_SHIFT)
    }

    fn millis(&self) -> u64 {
        Instant::now().as_millis()
    }
}
