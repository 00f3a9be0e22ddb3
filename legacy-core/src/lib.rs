//! Platform-agnostic detection and decoding of legacy 9-pin game controllers.
//!
//! This crate turns the raw pin levels of joystick-era peripherals into a
//! modern joystick report without any platform-specific dependencies. It
//! can be used both in embedded `no_std` environments and on host for
//! testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`pins`]: Logical connector pins ([`PinSet`]) and the pin I/O trait ([`PinIo`])
//! - [`shift_register`]: Bit-banged shift register reader ([`ShiftRegister`])
//! - [`decoders`]: One [`Protocol`] implementation per controller family
//! - [`factory`]: Detection cascade and slot allocation ([`PortAllocator`])
//! - [`controller`]: An attached controller ([`LegacyController`])
//! - [`debounce`]: Button debouncing ([`ButtonSync`])
//! - [`report`]: The joystick report ([`JoystickReport`])
//! - [`output`]: Report sink traits ([`HidSink`], [`OutputSink`])
//! - [`bridge`]: Orchestrates the polling loop ([`PortBridge`])
//!
//! # Supported controllers
//!
//! Detection tries each family in this order and needs the listed control
//! held while the connector is probed:
//!
//! | Controller | Held at attach |
//! |------------|----------------|
//! | Intellivision | Enter |
//! | Atari 7800 Flashback | Primary fire |
//! | Atari 2600 joystick / driving controller | Fire |
//! | Atari 2600 keypad | `#` |
//! | Atari 2600 paddles | Either fire |
//! | TI-99/4A joystick | Fire on the stick to use |
//!
//! # Report layout
//!
//! The first attached controller owns buttons 0..=14 and the X/Y axes, the
//! second owns buttons 15..=29 and Rx/Ry.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod bridge;
pub mod controller;
pub mod debounce;
pub mod decoders;
pub mod factory;
pub mod output;
pub mod pins;
pub mod report;
pub mod shift_register;
pub mod types;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use bridge::{BridgeError, Port, PortBridge};
pub use controller::{ControllerKind, LegacyController};
pub use debounce::{ButtonSync, DEBOUNCE_WINDOW_MS};
pub use decoders::{DecodeFrame, Protocol};
pub use factory::{detect, PortAllocator, PORT_COUNT};
pub use output::{HidSink, OutputError, OutputSink};
pub use pins::{Level, PhysicalPin, PinError, PinIo, PinMode, PinSet, PINS_PER_CONNECTOR};
pub use report::JoystickReport;
pub use shift_register::{ShiftRegister, ShiftRegisterPins};
pub use types::{
    pot_to_axis, Axis, AxisState, ButtonState, PinState, PortSlot, AXIS_COUNT, BUTTONS_PER_PORT,
    MAX_BUTTONS,
};
