//! A controller that has claimed a port.

use crate::debounce::ButtonSync;
use crate::decoders::{
    AtariJoystick, AtariKeypad, AtariPaddles, DecodeFrame, FlashbackPad, Intellivision, Protocol,
    Ti99Joystick,
};
use crate::output::HidSink;
use crate::pins::{PinError, PinIo, PinSet};
use crate::types::{pot, pot_to_axis, Axis, AxisState, PortSlot};

/// Decoder state of one attached controller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerKind {
    Intellivision(Intellivision),
    Flashback(FlashbackPad),
    AtariJoystick(AtariJoystick),
    AtariKeypad(AtariKeypad),
    AtariPaddles(AtariPaddles),
    Ti99(Ti99Joystick),
}

impl ControllerKind {
    /// Human-readable controller name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            ControllerKind::Intellivision(_) => Intellivision::NAME,
            ControllerKind::Flashback(_) => FlashbackPad::NAME,
            ControllerKind::AtariJoystick(_) => AtariJoystick::NAME,
            ControllerKind::AtariKeypad(_) => AtariKeypad::NAME,
            ControllerKind::AtariPaddles(_) => AtariPaddles::NAME,
            ControllerKind::Ti99(_) => Ti99Joystick::NAME,
        }
    }

    /// Reapply the decoder's pin configuration.
    pub fn setup_pins(&self, pins: &PinSet, io: &mut impl PinIo) -> Result<(), PinError> {
        match self {
            ControllerKind::Intellivision(_) => Intellivision::setup_pins(pins, io),
            ControllerKind::Flashback(_) => FlashbackPad::setup_pins(pins, io),
            ControllerKind::AtariJoystick(_) => AtariJoystick::setup_pins(pins, io),
            ControllerKind::AtariKeypad(_) => AtariKeypad::setup_pins(pins, io),
            ControllerKind::AtariPaddles(_) => AtariPaddles::setup_pins(pins, io),
            ControllerKind::Ti99(_) => Ti99Joystick::setup_pins(pins, io),
        }
    }

    pub fn decode(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
        frame: &mut DecodeFrame,
    ) -> Result<(), PinError> {
        match self {
            ControllerKind::Intellivision(c) => c.decode(pins, io, frame),
            ControllerKind::Flashback(c) => c.decode(pins, io, frame),
            ControllerKind::AtariJoystick(c) => c.decode(pins, io, frame),
            ControllerKind::AtariKeypad(c) => c.decode(pins, io, frame),
            ControllerKind::AtariPaddles(c) => c.decode(pins, io, frame),
            ControllerKind::Ti99(c) => c.decode(pins, io, frame),
        }
    }
}

/// An attached controller: its decoder, connector, slot and debounce state.
///
/// Created by the allocator after a successful probe and kept until the
/// ports are reset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LegacyController {
    kind: ControllerKind,
    pins: PinSet,
    slot: PortSlot,
    sync: ButtonSync,
}

impl LegacyController {
    /// Wrap a probed decoder. `now` starts the first debounce window.
    #[must_use]
    pub const fn new(kind: ControllerKind, pins: PinSet, slot: PortSlot, now: u64) -> Self {
        Self {
            kind,
            pins,
            slot,
            sync: ButtonSync::new(now),
        }
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ControllerKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub const fn pins(&self) -> &PinSet {
        &self.pins
    }

    #[inline]
    #[must_use]
    pub const fn slot(&self) -> PortSlot {
        self.slot
    }

    #[inline]
    #[must_use]
    pub const fn sync(&self) -> &ButtonSync {
        &self.sync
    }

    /// Run one decode cycle and push the result into `sink`.
    ///
    /// Buttons go through the debounce synchronizer; axes are forwarded
    /// every cycle, scaled to the HID range and moved to the slot's bank.
    pub fn decode(&mut self, io: &mut impl PinIo, sink: &mut impl HidSink) -> Result<(), PinError> {
        let now = io.millis();
        let mut frame = DecodeFrame::new();
        self.kind.decode(&self.pins, io, &mut frame)?;

        let origin = self.slot.button_origin();
        let forwarded = self.sync.apply(now, origin, frame.buttons(), sink);
        if forwarded > 0 {
            debug!("{}: {} button change(s)", self.name(), forwarded);
        }

        for AxisState { axis, location } in frame.axes() {
            sink.set_axis(self.slot.map_axis(axis), pot_to_axis(location));
        }
        Ok(())
    }

    /// Release every button this controller holds and center its stick.
    pub fn release(&mut self, sink: &mut impl HidSink) {
        self.sync.release_all(self.slot.button_origin(), sink);
        for axis in [Axis::X, Axis::Y] {
            sink.set_axis(self.slot.map_axis(axis), pot_to_axis(pot::CENTER));
        }
    }
}
