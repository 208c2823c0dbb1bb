//! Serial pad protocol encoder.
//!
//! The host asserts the mode-select line to latch the buttons, then clocks
//! them out one bit per rising edge on the clock line, least significant bit
//! first, on the data line. After the eight register bits, zeros shift in:
//! the host reads the 9th and 10th bits as pressed and uses them to
//! recognise the pad.
//!
//! Both handlers are meant to run from the edge interrupt context. Each does
//! a bounded amount of work on the [`PortContext`] atomics and returns the
//! level to put on the data line.

use embassy_time::Instant;
use portable_atomic::Ordering;

use crate::context::PortContext;
use crate::mode::Mode;

/// What the strobe handler did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeOutcome {
    /// Mode replaced by the serial pad mode, if this edge started a session.
    pub entered_from: Option<Mode>,
    /// Data line level to output now: `true` released, `false` pressed.
    pub data: Option<bool>,
}

impl PortContext {
    /// Handle an edge of the mode-select line.
    ///
    /// On assertion, switches to the serial pad mode if needed, latches the
    /// live register into the shift register and returns its first bit.
    /// On release, only the timestamp used by the timeout is recorded.
    pub fn on_strobe_edge(&self, asserted: bool, now: Instant) -> StrobeOutcome {
        self.strobe_asserted.store(asserted, Ordering::Release);

        if !asserted {
            self.strobe_released_at.store(now.as_ticks(), Ordering::Release);
            return StrobeOutcome {
                entered_from: None,
                data: None,
            };
        }

        let entered_from = self.enter_serial_pad();
        let latched = self.live.load(Ordering::Acquire);
        self.shift.store(latched >> 1, Ordering::Release);

        StrobeOutcome {
            entered_from,
            data: Some(latched & 1 != 0),
        }
    }

    /// Reconcile the handled strobe state with a sampled line level.
    ///
    /// Runs [`on_strobe_edge`](Self::on_strobe_edge) if `asserted` differs
    /// from the last handled edge, so an edge the GPIO layer dropped is
    /// still acted on once the level is read. `None` if nothing changed.
    pub fn sync_strobe_level(&self, asserted: bool, now: Instant) -> Option<StrobeOutcome> {
        if self.strobe_asserted() == asserted {
            return None;
        }
        Some(self.on_strobe_edge(asserted, now))
    }

    /// Handle a rising edge of the clock line.
    ///
    /// Returns the next data line level, or `None` outside the serial pad
    /// mode where the clock line is a joystick button.
    pub fn on_clock_edge(&self) -> Option<bool> {
        if self.mode() != Mode::SerialPad {
            return None;
        }
        let register = self.shift.load(Ordering::Acquire);
        self.shift.store(register >> 1, Ordering::Release);
        Some(register & 1 != 0)
    }
}
