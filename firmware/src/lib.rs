//! Legacy 9-pin controller to USB HID joystick adapter for RP2040.
//!
//! This crate provides the embedded side of the adapter: GPIO/ADC pin
//! access for the two controller connectors and the USB HID joystick
//! output. Detection and decoding live in `legacy-core`.
//!
//! # Wiring
//!
//! | Connector pin | Port A | Port B |
//! |---------------|--------|--------|
//! | 1 | GP2 | GP11 |
//! | 2 | GP3 | GP12 |
//! | 3 | GP4 | GP13 |
//! | 4 | GP5 | GP14 |
//! | 5 | GP6, GP26 (ADC0) | GP15, GP28 (ADC2) |
//! | 6 | GP7 | GP16 |
//! | 7 | GP8 | GP17 |
//! | 8 | GP9 | GP18 |
//! | 9 | GP10, GP27 (ADC1) | GP19, GP29 (ADC3) |
//!
//! Pins 5 and 9 carry the paddle wipers and are wired to both a digital
//! GPIO and an ADC input. GP22 is a reset button to ground that drops both
//! controllers so new ones can be attached.

#![no_std]

// Re-export core types for convenience
pub use legacy_core::{
    BridgeError, JoystickReport, OutputError, OutputSink, PinIo, PinSet, PortBridge,
};

pub mod gpio_io;
pub mod usb_output;

pub use gpio_io::RpPinIo;
pub use usb_output::{configure_usb_hid, ReportSignal, SignalOutput, UsbHidOutput};

/// First connector.
pub const PORT_A: PinSet = PinSet::from_raw([2, 3, 4, 5, 6, 7, 8, 9, 10]);

/// Second connector.
pub const PORT_B: PinSet = PinSet::from_raw([11, 12, 13, 14, 15, 16, 17, 18, 19]);

/// Delay between polling cycles.
pub const POLL_INTERVAL_MS: u64 = 1;
