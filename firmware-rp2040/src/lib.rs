//! Dual-analog pad to DB9 host port adapter for RP2040.
//!
//! This crate provides the embedded side of the adapter: it polls a
//! dual-analog controller and presents it on a DB9 host port as a
//! two-button joystick, a quadrature mouse or a serial extended pad.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | Up       | 2    | Host direction line (open collector) |
//! | Down     | 3    | Host direction line, mouse H-pulse |
//! | Left     | 4    | Host direction line, mouse VQ-pulse |
//! | Right    | 5    | Host direction line, mouse HQ-pulse |
//! | Button 1 | 6    | Fire button, serial pad clock input |
//! | Button 2 | 7    | Fire button, serial pad data output |
//! | Select   | 8    | Host mode-select line (input, asserted low) |
//! | DAT      | 16   | Controller data (input, pulled up) |
//! | ATT      | 17   | Controller attention |
//! | CLK      | 18   | Controller clock |
//! | CMD      | 19   | Controller command |
//! | Mode LED | 15   | Mode and fault indicator |
//! | LED      | 25   | On-board LED (ready indicator) |
//!
//! # Architecture
//!
//! - **Polling loop** (thread mode): reads the controller once per
//!   [`POLL_INTERVAL`], runs the [`Adapter`](db9_core::Adapter) cycle,
//!   drives the direction lines and the mode LED.
//! - **Port task** (interrupt executor): reacts to mode-select and clock
//!   edges, owns both button lines.
//!
//! The two share a [`PortContext`](db9_core::PortContext) and an
//! embassy-sync [`Signal`](embassy_sync::signal::Signal) that wakes the
//! port task when new button levels are published.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

use embassy_time::Duration;

// Re-export core types for convenience
pub use db9_core::{
    Adapter, ControllerInput, ControllerSnapshot, CycleReport, Fault, Indicator, InputError,
    Mode, Pattern, PortContext, ProbeOutcome,
};

pub mod input;
pub mod port;

pub use input::DualShockInput;
pub use port::{serve_host_port, HostLine};

/// Polling loop period.
pub const POLL_INTERVAL: Duration = Duration::from_micros(500);

/// LED refresh period while a boot fault is shown.
pub const FAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(10);
