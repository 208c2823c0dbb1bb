//! Dual-analog controller port protocol.
//!
//! Chip-agnostic: the bus is generic over `embedded-hal` pins and a
//! blocking delay, so any HAL implementing those traits can drive it.
//!
//! - [`frame`]: command bytes, reply decoding into
//!   [`ControllerSnapshot`](db9_core::ControllerSnapshot) and boot classification
//! - [`bus`]: bit-banged transfers, polling and the analog-mode probe

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bus;
pub mod frame;

pub use bus::PsxBus;
pub use frame::{classify, decode_poll, DeviceId, FrameError};
