//! Dual-analog pad input over GPIO.
//!
//! # Pins
//!
//! - GPIO 16: DAT (input, pull-up)
//! - GPIO 17: ATT
//! - GPIO 18: CLK
//! - GPIO 19: CMD

use db9_core::{ControllerInput, ControllerSnapshot, InputError, ProbeOutcome};
use embassy_rp::gpio::{Input, Output};
use embassy_time::Delay;
use psx_proto::{FrameError, PsxBus};

type Bus<'d> = PsxBus<Output<'d>, Output<'d>, Output<'d>, Input<'d>, Delay>;

/// Controller input on a bit-banged controller port.
pub struct DualShockInput<'d> {
    bus: Bus<'d>,
}

impl<'d> DualShockInput<'d> {
    /// Create the input from its four bus pins.
    pub fn new(
        clk: Output<'d>,
        cmd: Output<'d>,
        att: Output<'d>,
        dat: Input<'d>,
    ) -> Result<Self, FrameError> {
        Ok(Self {
            bus: PsxBus::new(clk, cmd, att, dat, Delay)?,
        })
    }
}

impl ControllerInput for DualShockInput<'_> {
    async fn probe(&mut self) -> ProbeOutcome {
        self.bus.probe()
    }

    async fn read(&mut self) -> Result<ControllerSnapshot, InputError> {
        Ok(self.bus.poll()?)
    }
}
