//! Mode LED patterns.

use embassy_time::{Duration, Instant};

use crate::config::{ACK_PULSE_OFF, ACK_PULSE_ON, MOUSE_BLINK_INTERVAL};
use crate::input::Fault;
use crate::mode::Mode;

/// What the LED does when nothing else is being signalled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    Off,
    Steady,
    /// On for one interval, off for the next.
    Blink(Duration),
}

impl Pattern {
    /// Pattern shown while `mode` is active.
    #[must_use]
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Joystick => Pattern::Off,
            Mode::Mouse => Pattern::Blink(MOUSE_BLINK_INTERVAL),
            Mode::SerialPad => Pattern::Steady,
        }
    }

    /// Pattern shown forever after a boot fault.
    #[must_use]
    pub const fn for_fault(fault: Fault) -> Self {
        Pattern::Blink(fault.blink_interval())
    }
}

/// Drives one LED from a [`Pattern`] plus an optional pulse train.
#[derive(Debug)]
pub struct Indicator {
    pattern: Pattern,
    since: Instant,
    pulses: Option<(u8, Instant)>,
}

impl Indicator {
    #[must_use]
    pub const fn new(pattern: Pattern, now: Instant) -> Self {
        Self {
            pattern,
            since: now,
            pulses: None,
        }
    }

    /// Change the background pattern; blinking restarts in the on phase.
    pub fn set_pattern(&mut self, pattern: Pattern, now: Instant) {
        if pattern != self.pattern {
            self.pattern = pattern;
            self.since = now;
        }
    }

    /// Flash `count` pulses, overriding the pattern until done.
    pub fn acknowledge(&mut self, count: u8, now: Instant) {
        self.pulses = Some((count, now));
    }

    /// Whether an acknowledgment is still being shown at `now`.
    #[must_use]
    pub fn is_acknowledging(&self, now: Instant) -> bool {
        self.pulse_level(now).is_some()
    }

    /// LED level at `now`; `true` is lit.
    pub fn level(&mut self, now: Instant) -> bool {
        if let Some(level) = self.pulse_level(now) {
            return level;
        }
        self.pulses = None;

        match self.pattern {
            Pattern::Off => false,
            Pattern::Steady => true,
            Pattern::Blink(interval) => {
                let elapsed = now.saturating_duration_since(self.since).as_ticks();
                let interval = interval.as_ticks().max(1);
                (elapsed / interval) % 2 == 0
            }
        }
    }

    fn pulse_level(&self, now: Instant) -> Option<bool> {
        let (count, started) = self.pulses?;
        let slot = (ACK_PULSE_ON + ACK_PULSE_OFF).as_ticks();
        let elapsed = now.saturating_duration_since(started).as_ticks();
        if elapsed / slot >= u64::from(count) {
            return None;
        }
        Some(elapsed % slot < ACK_PULSE_ON.as_ticks())
    }
}
