//! Quadrature mouse emulation from the right analog stick.
//!
//! Each axis drives two lines. The leading line toggles once per period and
//! the trailing line follows half a period later, copying the leading line's
//! level. Which line leads encodes the direction; the period encodes the
//! speed.

use embassy_time::{Duration, Instant};
use fixed::types::U16F16;

use crate::config::{
    ANALOG_DEAD_ZONE, AXIS_MAX_DEFLECTION, MOUSE_FAST_PERIOD_US, MOUSE_SLOW_PERIOD_US,
};
use crate::lines::{HostLines, Line};
use crate::types::{Axis, Buttons, ControllerSnapshot};

/// Toggle period for a deflection of `magnitude` away from idle.
///
/// `None` inside the dead zone. Otherwise linear from
/// [`MOUSE_SLOW_PERIOD_US`] just past the dead zone down to
/// [`MOUSE_FAST_PERIOD_US`] at [`AXIS_MAX_DEFLECTION`].
#[must_use]
pub fn toggle_period(magnitude: u16) -> Option<Duration> {
    let dead_zone = u16::from(ANALOG_DEAD_ZONE);
    if magnitude <= dead_zone {
        return None;
    }
    let span = U16F16::from_num(AXIS_MAX_DEFLECTION - dead_zone);
    let beyond = U16F16::from_num(magnitude.min(AXIS_MAX_DEFLECTION) - dead_zone);
    let ratio = beyond / span;

    let slow = U16F16::from_num(MOUSE_SLOW_PERIOD_US);
    let range = U16F16::from_num(MOUSE_SLOW_PERIOD_US - MOUSE_FAST_PERIOD_US);
    let period = slow - range * ratio;
    Some(Duration::from_micros(period.to_num::<u64>()))
}

/// The two lines of one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LinePair {
    /// Leads for positive deflection.
    pulse: Line,
    /// Leads for negative deflection.
    quadrature: Line,
}

const HORIZONTAL: LinePair = LinePair {
    pulse: Line::Down,
    quadrature: Line::Right,
};

const VERTICAL: LinePair = LinePair {
    pulse: Line::Up,
    quadrature: Line::Left,
};

/// Pulse generator for one axis.
#[derive(Debug)]
struct AxisPulser {
    axis: Axis,
    pair: LinePair,
    /// Level of the leading line; `true` is high (released).
    level: bool,
    last_toggle: Instant,
    trail_pending: Option<Line>,
}

impl AxisPulser {
    const fn new(axis: Axis, pair: LinePair) -> Self {
        Self {
            axis,
            pair,
            level: true,
            last_toggle: Instant::MIN,
            trail_pending: None,
        }
    }

    fn reset(&mut self, now: Instant) {
        self.level = true;
        self.last_toggle = now;
        self.trail_pending = None;
    }

    fn tick<L: HostLines>(&mut self, snapshot: &ControllerSnapshot, now: Instant, lines: &mut L) {
        let deflection = snapshot.deflection(self.axis);
        let Some(period) = toggle_period(deflection.unsigned_abs()) else {
            self.trail_pending = None;
            return;
        };
        let (lead, trail) = if deflection > 0 {
            (self.pair.pulse, self.pair.quadrature)
        } else {
            (self.pair.quadrature, self.pair.pulse)
        };

        let elapsed = now.saturating_duration_since(self.last_toggle);
        if elapsed >= period {
            // Catch up on a trailing edge the loop was too slow to emit
            if let Some(line) = self.trail_pending.take() {
                lines.set_line(line, !self.level);
            }
            self.level = !self.level;
            lines.set_line(lead, !self.level);
            self.last_toggle = now;
            self.trail_pending = Some(trail);
        } else if elapsed >= period / 2 {
            if let Some(line) = self.trail_pending.take() {
                lines.set_line(line, !self.level);
            }
        }
    }
}

/// Two independent axis pulse generators plus the mouse buttons.
#[derive(Debug)]
pub struct MouseEmulator {
    x: AxisPulser,
    y: AxisPulser,
}

impl MouseEmulator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: AxisPulser::new(Axis::RightX, HORIZONTAL),
            y: AxisPulser::new(Axis::RightY, VERTICAL),
        }
    }

    /// Forget all timers and levels, e.g. when the lines were released on
    /// a mode change.
    pub fn reset(&mut self, now: Instant) {
        self.x.reset(now);
        self.y.reset(now);
    }

    /// Advance both pulse trains to `now`.
    pub fn tick<L: HostLines>(
        &mut self,
        snapshot: &ControllerSnapshot,
        now: Instant,
        lines: &mut L,
    ) {
        self.x.tick(snapshot, now, lines);
        self.y.tick(snapshot, now, lines);
    }

    /// Mouse buttons: `(left, right)` from the shoulder groups.
    #[must_use]
    pub fn buttons(snapshot: &ControllerSnapshot) -> (bool, bool) {
        (
            snapshot.any_pressed(Buttons::LEFT_SHOULDER),
            snapshot.any_pressed(Buttons::RIGHT_SHOULDER),
        )
    }
}

impl Default for MouseEmulator {
    fn default() -> Self {
        Self::new()
    }
}
