//! Open-collector line driver shared by every emulation.
//!
//! The host port has pull-ups on its side. An active line is pulled low by
//! switching the pin to an output driving low; an inactive line is released
//! by turning the pin back into a floating input. A line is never driven
//! high.

use crate::types::TwoButtonSignal;

/// One of the four direction lines of the host port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    Up,
    Down,
    Left,
    Right,
}

impl Line {
    pub const ALL: [Line; 4] = [Line::Up, Line::Down, Line::Left, Line::Right];
}

/// A pin whose direction can be switched at runtime.
///
/// Implemented by the platform for its GPIO type.
pub trait FlexLine {
    /// Configure as input with no pull resistor.
    fn float(&mut self);

    /// Configure as output driving low.
    fn drive_low(&mut self);
}

/// Open-collector wrapper around a [`FlexLine`].
///
/// Remembers the last state so repeated writes of the same value do not
/// reconfigure the pin.
pub struct OpenCollector<P> {
    pin: P,
    active: Option<bool>,
}

impl<P: FlexLine> OpenCollector<P> {
    /// Wrap a pin without touching its current configuration.
    #[must_use]
    pub fn new(pin: P) -> Self {
        Self { pin, active: None }
    }

    /// Pull the line low (`true`) or let it float (`false`).
    #[inline]
    pub fn set_active(&mut self, active: bool) {
        if self.active == Some(active) {
            return;
        }
        if active {
            self.pin.drive_low();
        } else {
            self.pin.float();
        }
        self.active = Some(active);
    }

    /// Release the line unconditionally, even if it is believed released.
    pub fn release(&mut self) {
        self.pin.float();
        self.active = Some(false);
    }

    /// Whether the line is currently pulled low.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active == Some(true)
    }

    /// Get a mutable reference to the underlying pin.
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

/// Sink for the four direction lines, written by the polling loop.
pub trait HostLines {
    /// Pull `line` low (`true`) or release it (`false`).
    fn set_line(&mut self, line: Line, active: bool);

    /// Release all four direction lines.
    fn release_all(&mut self) {
        for line in Line::ALL {
            self.set_line(line, false);
        }
    }

    /// Write the direction part of a joystick signal.
    fn apply_directions(&mut self, signal: &TwoButtonSignal) {
        self.set_line(Line::Up, signal.up);
        self.set_line(Line::Down, signal.down);
        self.set_line(Line::Left, signal.left);
        self.set_line(Line::Right, signal.right);
    }
}

/// The four direction lines as open-collector outputs.
pub struct DirectionLines<P> {
    up: OpenCollector<P>,
    down: OpenCollector<P>,
    left: OpenCollector<P>,
    right: OpenCollector<P>,
}

impl<P: FlexLine> DirectionLines<P> {
    /// Take ownership of the pins and release all of them.
    pub fn new(up: P, down: P, left: P, right: P) -> Self {
        let mut lines = Self {
            up: OpenCollector::new(up),
            down: OpenCollector::new(down),
            left: OpenCollector::new(left),
            right: OpenCollector::new(right),
        };
        lines.up.release();
        lines.down.release();
        lines.left.release();
        lines.right.release();
        lines
    }

    fn line_mut(&mut self, line: Line) -> &mut OpenCollector<P> {
        match line {
            Line::Up => &mut self.up,
            Line::Down => &mut self.down,
            Line::Left => &mut self.left,
            Line::Right => &mut self.right,
        }
    }

    /// Whether `line` is currently pulled low.
    #[must_use]
    pub fn is_active(&self, line: Line) -> bool {
        match line {
            Line::Up => self.up.is_active(),
            Line::Down => self.down.is_active(),
            Line::Left => self.left.is_active(),
            Line::Right => self.right.is_active(),
        }
    }
}

impl<P: FlexLine> HostLines for DirectionLines<P> {
    fn set_line(&mut self, line: Line, active: bool) {
        self.line_mut(line).set_active(active);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PinOp {
        Float,
        DriveLow,
    }

    #[derive(Default)]
    struct MockPin {
        ops: Vec<PinOp>,
    }

    impl FlexLine for MockPin {
        fn float(&mut self) {
            self.ops.push(PinOp::Float);
        }

        fn drive_low(&mut self) {
            self.ops.push(PinOp::DriveLow);
        }
    }

    #[test]
    fn test_open_collector_never_drives_high() {
        let mut line = OpenCollector::new(MockPin::default());
        line.set_active(true);
        line.set_active(false);
        assert_eq!(line.pin_mut().ops, [PinOp::DriveLow, PinOp::Float]);
    }

    #[test]
    fn test_open_collector_skips_redundant_writes() {
        let mut line = OpenCollector::new(MockPin::default());
        line.set_active(true);
        line.set_active(true);
        line.set_active(true);
        assert_eq!(line.pin_mut().ops, [PinOp::DriveLow]);
        assert!(line.is_active());
    }

    #[test]
    fn test_direction_lines_start_released() {
        let mut lines = DirectionLines::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        );
        for line in Line::ALL {
            assert!(!lines.is_active(line));
            assert_eq!(lines.line_mut(line).pin_mut().ops, [PinOp::Float]);
        }
    }

    #[test]
    fn test_apply_directions() {
        let mut lines = DirectionLines::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        );
        let signal = TwoButtonSignal {
            up: true,
            right: true,
            ..TwoButtonSignal::default()
        };
        lines.apply_directions(&signal);
        assert!(lines.is_active(Line::Up));
        assert!(lines.is_active(Line::Right));
        assert!(!lines.is_active(Line::Down));
        assert!(!lines.is_active(Line::Left));

        lines.release_all();
        assert!(Line::ALL.iter().all(|&l| !lines.is_active(l)));
    }
}
