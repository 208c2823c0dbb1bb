//! Core data model: Buttons, AnalogStick, ControllerSnapshot, TwoButtonSignal,
//! ButtonRegister.

use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::config::{ANALOG_DEAD_ZONE, ANALOG_IDLE};

/// Digital button state of the source controller as a bitfield.
///
/// Bit positions follow the order in which the controller reports its
/// buttons on the wire, so a decoded frame maps onto this type directly.
/// A set bit means pressed.
///
/// # Example
///
/// ```
/// use db9_core::Buttons;
///
/// let buttons = Buttons::CROSS | Buttons::L1;
/// assert!(buttons.contains(Buttons::CROSS));
/// assert!(buttons.intersects(Buttons::LEFT_SHOULDER));
/// assert!(!buttons.intersects(Buttons::DPAD));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u16);

impl Buttons {
    pub const SELECT: Self = Self(1 << 0);
    pub const L3: Self = Self(1 << 1); // Left stick press
    pub const R3: Self = Self(1 << 2); // Right stick press
    pub const START: Self = Self(1 << 3);
    pub const DPAD_UP: Self = Self(1 << 4);
    pub const DPAD_RIGHT: Self = Self(1 << 5);
    pub const DPAD_DOWN: Self = Self(1 << 6);
    pub const DPAD_LEFT: Self = Self(1 << 7);
    pub const L2: Self = Self(1 << 8);
    pub const R2: Self = Self(1 << 9);
    pub const L1: Self = Self(1 << 10);
    pub const R1: Self = Self(1 << 11);
    pub const TRIANGLE: Self = Self(1 << 12);
    pub const CIRCLE: Self = Self(1 << 13);
    pub const CROSS: Self = Self(1 << 14);
    pub const SQUARE: Self = Self(1 << 15);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// All four D-pad directions.
    pub const DPAD: Self =
        Self(Self::DPAD_UP.0 | Self::DPAD_RIGHT.0 | Self::DPAD_DOWN.0 | Self::DPAD_LEFT.0);

    /// The three buttons on the left side: L1, L2 and the left stick press.
    pub const LEFT_SHOULDER: Self = Self(Self::L1.0 | Self::L2.0 | Self::L3.0);

    /// The three buttons on the right side: R1, R2 and the right stick press.
    pub const RIGHT_SHOULDER: Self = Self(Self::R1.0 | Self::R2.0 | Self::R3.0);

    /// Check if all of the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: Buttons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Check if any of the given button(s) is pressed.
    #[inline]
    #[must_use]
    pub const fn intersects(self, buttons: Buttons) -> bool {
        (self.0 & buttons.0) != 0
    }

    /// Check if the given button is pressed (alias for contains).
    #[inline]
    #[must_use]
    pub const fn is_pressed(self, button: Buttons) -> bool {
        self.contains(button)
    }

    /// Set or clear button(s).
    #[inline]
    pub fn set(&mut self, button: Buttons, pressed: bool) {
        if pressed {
            self.0 |= button.0;
        } else {
            self.0 &= !button.0;
        }
    }

    /// Check if no buttons are pressed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for Buttons {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

/// Identifies one of the four analog axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

impl Axis {
    /// Idle value and dead zone for this axis.
    #[must_use]
    pub const fn calibration(self) -> AxisCalibration {
        AxisCalibration::DEFAULT
    }
}

/// Center value and dead zone of one analog axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCalibration {
    pub idle: u8,
    pub dead_zone: u8,
}

impl AxisCalibration {
    pub const DEFAULT: Self = Self {
        idle: ANALOG_IDLE,
        dead_zone: ANALOG_DEAD_ZONE,
    };

    /// Signed distance of `value` from the idle point.
    #[inline]
    #[must_use]
    pub const fn deflection(self, value: u8) -> i16 {
        value as i16 - self.idle as i16
    }

    /// Whether `value` lies beyond the dead zone in either direction.
    #[inline]
    #[must_use]
    pub const fn is_deflected(self, value: u8) -> bool {
        self.deflection(value).unsigned_abs() > self.dead_zone as u16
    }
}

/// Analog stick with X/Y axes.
///
/// Range: [0, 255], 0 is left/up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogStick {
    pub x: u8,
    pub y: u8,
}

impl AnalogStick {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub const IDLE: Self = Self {
        x: ANALOG_IDLE,
        y: ANALOG_IDLE,
    };
}

impl Default for AnalogStick {
    fn default() -> Self {
        Self::IDLE
    }
}

/// One polling cycle's view of the source controller.
///
/// Produced once per cycle by the input adapter and read-only afterwards, so
/// every mapping in a cycle sees the same values.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerSnapshot {
    pub buttons: Buttons,
    pub left_stick: AnalogStick,
    pub right_stick: AnalogStick,
}

impl ControllerSnapshot {
    /// Everything released, both sticks idle.
    ///
    /// Substituted for any snapshot that could not be read.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            buttons: Buttons::NONE,
            left_stick: AnalogStick::IDLE,
            right_stick: AnalogStick::IDLE,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(&self, button: Buttons) -> bool {
        self.buttons.is_pressed(button)
    }

    #[inline]
    #[must_use]
    pub const fn any_pressed(&self, buttons: Buttons) -> bool {
        self.buttons.intersects(buttons)
    }

    /// Raw value of one axis.
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> u8 {
        match axis {
            Axis::LeftX => self.left_stick.x,
            Axis::LeftY => self.left_stick.y,
            Axis::RightX => self.right_stick.x,
            Axis::RightY => self.right_stick.y,
        }
    }

    /// Signed deflection of one axis from its idle value.
    #[inline]
    #[must_use]
    pub const fn deflection(&self, axis: Axis) -> i16 {
        axis.calibration().deflection(self.axis(axis))
    }

    /// Whether the right stick is pushed beyond its dead zone on either axis.
    #[must_use]
    pub const fn right_stick_deflected(&self) -> bool {
        Axis::RightX.calibration().is_deflected(self.right_stick.x)
            || Axis::RightY.calibration().is_deflected(self.right_stick.y)
    }
}

/// Two-button joystick output: four directions and two fire buttons.
///
/// `true` means active, i.e. the line is pulled low.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwoButtonSignal {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub b1: bool,
    pub b2: bool,
}

/// Button snapshot shifted out by the serial pad protocol.
///
/// Active-low: a cleared bit means pressed. Bit 0 is shifted out first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonRegister(pub u8);

impl ButtonRegister {
    pub const BLUE: u8 = 1 << 0;
    pub const RED: u8 = 1 << 1;
    pub const YELLOW: u8 = 1 << 2;
    pub const GREEN: u8 = 1 << 3;
    pub const FRONT_RIGHT: u8 = 1 << 4;
    pub const FRONT_LEFT: u8 = 1 << 5;
    pub const START: u8 = 1 << 6;
    /// Not a button; always reads released.
    pub const RESERVED: u8 = 1 << 7;

    /// Nothing pressed.
    pub const RELEASED: Self = Self(0xFF);

    /// Fold a snapshot's digital buttons into the register layout.
    #[must_use]
    pub fn from_snapshot(snapshot: &ControllerSnapshot) -> Self {
        let mapping = [
            (snapshot.is_pressed(Buttons::START), Self::START),
            (snapshot.is_pressed(Buttons::TRIANGLE), Self::GREEN),
            (snapshot.is_pressed(Buttons::CROSS), Self::RED),
            (snapshot.is_pressed(Buttons::CIRCLE), Self::BLUE),
            (snapshot.is_pressed(Buttons::SQUARE), Self::YELLOW),
            (snapshot.any_pressed(Buttons::LEFT_SHOULDER), Self::FRONT_LEFT),
            (snapshot.any_pressed(Buttons::RIGHT_SHOULDER), Self::FRONT_RIGHT),
        ];

        let mut register = Self::RELEASED;
        for (pressed, bit) in mapping {
            if pressed {
                register.0 &= !bit;
            }
        }
        register
    }

    /// Whether the button at `bit` reads pressed.
    #[inline]
    #[must_use]
    pub const fn is_pressed(self, bit: u8) -> bool {
        self.0 & bit == 0
    }

    /// Get the raw register value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl Default for ButtonRegister {
    fn default() -> Self {
        Self::RELEASED
    }
}
