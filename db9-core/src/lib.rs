//! Platform-agnostic core of a dual-analog pad adapter for DB9 host ports.
//!
//! This crate provides the emulations and the mode state machine without
//! any platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`types`]: Core data structures ([`ControllerSnapshot`], [`Buttons`], [`ButtonRegister`])
//! - [`mapping`]: Joystick mapping profiles ([`MappingProfile`], [`ProfileSelector`])
//! - [`mouse`]: Quadrature mouse emulation ([`MouseEmulator`])
//! - [`serial_pad`]: Strobe and clock edge handlers of the serial pad protocol
//! - [`context`]: State shared with the edge handlers ([`PortContext`])
//! - [`adapter`]: One polling cycle of the mode controller ([`Adapter`])
//! - [`lines`]: Open-collector output driver ([`OpenCollector`], [`HostLines`])
//! - [`indicator`]: LED patterns ([`Indicator`])
//! - [`input`]: Controller input trait ([`ControllerInput`])
//!
//! # Modes
//!
//! | Mode | Direction lines | Button lines |
//! |------|-----------------|--------------|
//! | Joystick | profile output | profile output |
//! | Mouse | quadrature pulses | shoulder groups |
//! | SerialPad | D-pad and left stick | clock in, data out |
//!
//! Joystick is the initial mode. The right stick enters mouse mode and any
//! D-pad press leaves it. The host enters the serial pad mode by asserting
//! the mode-select line; the previous mode returns once the line has been
//! released for [`config::SERIAL_PAD_TIMEOUT`].
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod adapter;
pub mod config;
pub mod context;
pub mod indicator;
pub mod input;
pub mod lines;
pub mod mapping;
pub mod mode;
pub mod mouse;
pub mod serial_pad;
pub mod types;

// Re-export main types at crate root
pub use adapter::{Adapter, CycleReport};
pub use context::PortContext;
pub use indicator::{Indicator, Pattern};
pub use input::{ControllerInput, ControllerKind, Fault, InputError, ProbeOutcome};
pub use lines::{DirectionLines, FlexLine, HostLines, Line, OpenCollector};
pub use mapping::{MappingProfile, ProfileSelector, Selection};
pub use mode::{Mode, Transition};
pub use mouse::MouseEmulator;
pub use serial_pad::StrobeOutcome;
pub use types::{
    AnalogStick, Axis, AxisCalibration, ButtonRegister, Buttons, ControllerSnapshot,
    TwoButtonSignal,
};
