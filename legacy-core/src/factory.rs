//! Controller detection and port allocation.
//!
//! [`detect`] runs every protocol's probe against an unclaimed connector in
//! a fixed priority order. [`PortAllocator`] hands out the two controller
//! slots, so each attached controller owns a disjoint button range.

use crate::controller::{ControllerKind, LegacyController};
use crate::decoders::Protocol;
use crate::pins::{PinIo, PinSet};
use crate::types::PortSlot;

/// Number of controller slots.
pub const PORT_COUNT: usize = 2;

/// Run one protocol's probe. A pin fault counts as "not this protocol".
fn probe<P: Protocol>(
    pins: &PinSet,
    io: &mut impl PinIo,
    wrap: fn(P) -> ControllerKind,
) -> Option<ControllerKind> {
    match P::probe(pins, io) {
        Ok(found) => found.map(wrap),
        Err(e) => {
            warn!("{} probe failed: {:?}", P::NAME, e);
            None
        }
    }
}

/// Identify the controller attached to `pins`, trying protocols in
/// priority order and stopping at the first match.
pub fn detect(pins: &PinSet, io: &mut impl PinIo) -> Option<ControllerKind> {
    probe(pins, io, ControllerKind::Intellivision)
        .or_else(|| probe(pins, io, ControllerKind::Flashback))
        .or_else(|| probe(pins, io, ControllerKind::AtariJoystick))
        .or_else(|| probe(pins, io, ControllerKind::AtariKeypad))
        .or_else(|| probe(pins, io, ControllerKind::AtariPaddles))
        .or_else(|| probe(pins, io, ControllerKind::Ti99))
}

/// Occupancy of the two controller slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortAllocator {
    occupied: [bool; PORT_COUNT],
}

impl PortAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            occupied: [false; PORT_COUNT],
        }
    }

    /// The slot the next detected controller would get.
    #[must_use]
    pub fn next_slot(&self) -> Option<PortSlot> {
        [PortSlot::First, PortSlot::Second]
            .into_iter()
            .find(|slot| !self.occupied[slot.index()])
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied.iter().all(|&o| o)
    }

    #[inline]
    #[must_use]
    pub fn is_occupied(&self, slot: PortSlot) -> bool {
        self.occupied[slot.index()]
    }

    /// Probe `pins` and, on success, claim the next free slot for the
    /// controller found.
    ///
    /// With both slots taken this returns `None` without touching any pin.
    pub fn look_for_controller(
        &mut self,
        pins: &PinSet,
        io: &mut impl PinIo,
    ) -> Option<LegacyController> {
        let slot = self.next_slot()?;
        let kind = detect(pins, io)?;

        self.occupied[slot.index()] = true;
        info!("{} detected, slot {:?}", kind.name(), slot);
        Some(LegacyController::new(kind, *pins, slot, io.millis()))
    }

    /// Free both slots. There is no way to free just one.
    pub fn reset_all_ports(&mut self) {
        self.occupied = [false; PORT_COUNT];
    }
}
