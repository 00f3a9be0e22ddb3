//! HID sink and output sink traits, plus the output error type.

use crate::report::JoystickReport;
use crate::types::Axis;
use core::future::Future;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
    /// Report dropped (e.g., host not polling fast enough).
    Dropped,
    /// Endpoint busy.
    Busy,
}

/// Addressable button/axis sink that decoders write into.
///
/// Button indices are absolute report indices (`0..30`); axis values are
/// already scaled to the HID range.
pub trait HidSink {
    fn set_button(&mut self, index: u8, pressed: bool);

    fn set_axis(&mut self, axis: Axis, value: i16);
}

/// Async trait for joystick report sinks.
///
/// This trait abstracts the destination for finished reports, enabling
/// different output methods (USB HID, a task signal, serial debug, etc.).
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait OutputSink {
    /// Send a joystick report to the output.
    ///
    /// May block until the previous report has been sent.
    fn send(&mut self, report: &JoystickReport) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the output is ready to accept data.
    fn is_ready(&self) -> bool;
}
