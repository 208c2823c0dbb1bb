//! Controller input implementations.
//!
//! - `dualshock`: dual-analog pad on a bit-banged controller port

pub mod dualshock;

pub use dualshock::DualShockInput;
