//! Per-controller debounce and button-state synchronization.
//!
//! A controller has one shared deadline rather than one per button. While
//! the clock is before the deadline nothing is forwarded; the first cycle
//! with changes after it forwards exactly the flipped buttons and pushes the
//! deadline out by [`DEBOUNCE_WINDOW_MS`].

use crate::output::HidSink;
use crate::types::{ButtonState, BUTTONS_PER_PORT};

/// Minimum time between accepted button changes for one controller.
pub const DEBOUNCE_WINDOW_MS: u64 = 10;

/// Last forwarded button states of one controller plus its debounce deadline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSync {
    state: [bool; BUTTONS_PER_PORT],
    deadline: u64,
}

impl ButtonSync {
    /// Create a synchronizer for a controller attached at `now`.
    ///
    /// The first window starts at attach time, so a button held during
    /// detection is reported once the window has elapsed.
    #[must_use]
    pub const fn new(now: u64) -> Self {
        Self {
            state: [false; BUTTONS_PER_PORT],
            deadline: now + DEBOUNCE_WINDOW_MS,
        }
    }

    /// Whether button changes are currently suppressed.
    #[inline]
    #[must_use]
    pub const fn in_debounce(&self, now: u64) -> bool {
        now < self.deadline
    }

    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Last forwarded state of a controller-local button.
    #[inline]
    #[must_use]
    pub fn is_pressed(&self, button: u8) -> bool {
        self.state.get(button as usize).copied().unwrap_or(false)
    }

    /// Forward the buttons sampled in one cycle.
    ///
    /// `origin` is added to each local index to form the report index.
    /// Returns the number of buttons forwarded to the sink.
    pub fn apply(
        &mut self,
        now: u64,
        origin: u8,
        buttons: impl IntoIterator<Item = ButtonState>,
        sink: &mut impl HidSink,
    ) -> usize {
        if self.in_debounce(now) {
            return 0;
        }

        let mut forwarded = 0;
        for ButtonState { button, pressed } in buttons {
            let Some(slot) = self.state.get_mut(button as usize) else {
                continue;
            };
            if *slot != pressed {
                *slot = pressed;
                sink.set_button(origin + button, pressed);
                forwarded += 1;
            }
        }

        if forwarded > 0 {
            self.deadline = self.deadline.max(now + DEBOUNCE_WINDOW_MS);
        }
        forwarded
    }

    /// Forget every pressed button, forwarding the releases immediately.
    ///
    /// Used when a controller is dropped so no button stays latched in the report.
    pub fn release_all(&mut self, origin: u8, sink: &mut impl HidSink) {
        for (button, pressed) in self.state.iter_mut().enumerate() {
            if *pressed {
                *pressed = false;
                sink.set_button(origin + button as u8, false);
            }
        }
    }
}
