//! Host port GPIO: open-collector lines and the edge-driven button line task.
//!
//! # Pins
//!
//! - GPIO 2..=5: direction lines, owned by the polling loop
//! - GPIO 6: button 1, the clock input while the serial pad mode is active
//! - GPIO 7: button 2, the data output while the serial pad mode is active
//! - GPIO 8: mode-select input (asserted low)

use db9_core::lines::{FlexLine, OpenCollector};
use db9_core::{Mode, PortContext};
use defmt::debug;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_rp::gpio::{Flex, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

/// A host port line on a GPIO that switches between input and output.
pub struct HostLine<'d>(Flex<'d>);

impl<'d> HostLine<'d> {
    /// Take the pin and leave it floating.
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_low();
        pin.set_as_input();
        pin.set_pull(Pull::None);
        Self(pin)
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.0.is_high()
    }

    /// Wait until the line is high; returns at once if it already is.
    pub async fn wait_for_high(&mut self) {
        self.0.wait_for_high().await;
    }

    /// Wait until the line is low; returns at once if it already is.
    pub async fn wait_for_low(&mut self) {
        self.0.wait_for_low().await;
    }
}

impl FlexLine for HostLine<'_> {
    fn float(&mut self) {
        self.0.set_as_input();
        self.0.set_pull(Pull::None);
    }

    fn drive_low(&mut self) {
        self.0.set_low();
        self.0.set_as_output();
    }
}

enum PortEvent {
    Strobe,
    Clock,
    Published,
}

/// Serve the mode-select line and both button lines forever.
///
/// Outside the serial pad mode the button lines follow the levels published
/// by the polling loop; `published` is signalled whenever they change or the
/// mode may have changed. In the serial pad mode button 1 is released and
/// watched for clock edges, and button 2 carries the shift register output.
///
/// Both inputs are waited on by level, starting from the last handled
/// state. A level wait resolves immediately if the line changed while the
/// previous event was being handled, so no transition is dropped between
/// two waits.
pub async fn serve_host_port(
    ctx: &PortContext,
    mut strobe: Input<'_>,
    button1: HostLine<'_>,
    button2: HostLine<'_>,
    published: &Signal<CriticalSectionRawMutex, ()>,
) -> ! {
    let mut clock = OpenCollector::new(button1);
    let mut data = OpenCollector::new(button2);
    clock.release();
    data.release();
    let mut in_session = false;
    // Last handled clock level; rising edges are low-to-high transitions
    let mut clock_high = true;

    loop {
        let asserted = ctx.strobe_asserted();
        let event = if ctx.mode() == Mode::SerialPad {
            if !in_session {
                clock.set_active(false);
                clock_high = clock.pin_mut().is_high();
                in_session = true;
            }
            let strobe_change = async {
                if asserted {
                    strobe.wait_for_high().await
                } else {
                    strobe.wait_for_low().await
                }
            };
            let pin = clock.pin_mut();
            let clock_change = async {
                if clock_high {
                    pin.wait_for_low().await
                } else {
                    pin.wait_for_high().await
                }
            };
            match select3(strobe_change, clock_change, published.wait()).await {
                Either3::First(()) => PortEvent::Strobe,
                Either3::Second(()) => PortEvent::Clock,
                Either3::Third(()) => PortEvent::Published,
            }
        } else {
            in_session = false;
            let (b1, b2) = ctx.button_lines();
            clock.set_active(b1);
            data.set_active(b2);
            let strobe_change = async {
                if asserted {
                    strobe.wait_for_high().await
                } else {
                    strobe.wait_for_low().await
                }
            };
            match select(strobe_change, published.wait()).await {
                Either::First(()) => PortEvent::Strobe,
                Either::Second(()) => PortEvent::Published,
            }
        };

        match event {
            PortEvent::Strobe => {
                // The level was reached, even if it has changed back since
                let outcome = ctx.on_strobe_edge(!asserted, Instant::now());
                if let Some(from) = outcome.entered_from {
                    debug!("Serial pad session started from {:?}", from);
                }
                if let Some(level) = outcome.data {
                    data.set_active(!level);
                }
            }
            PortEvent::Clock => {
                clock_high = !clock_high;
                if clock_high {
                    if let Some(level) = ctx.on_clock_edge() {
                        data.set_active(!level);
                    }
                }
            }
            PortEvent::Published => {}
        }

        if let Some(outcome) = ctx.sync_strobe_level(strobe.is_low(), Instant::now()) {
            if let Some(level) = outcome.data {
                data.set_active(!level);
            }
        }
    }
}
