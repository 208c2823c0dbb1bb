//! Emulation modes and the transitions between them.

/// Which emulation currently owns the host port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Two-button digital joystick.
    #[default]
    Joystick = 0,
    /// Relative quadrature mouse driven by the right stick.
    Mouse = 1,
    /// Host-clocked serial button pad.
    SerialPad = 2,
}

impl Mode {
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a value stored with [`Mode::as_u8`].
    ///
    /// Unknown values fall back to [`Mode::Joystick`].
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Mode::Mouse,
            2 => Mode::SerialPad,
            _ => Mode::Joystick,
        }
    }
}

/// A change of mode observed by the polling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_u8_roundtrip() {
        for mode in [Mode::Joystick, Mode::Mouse, Mode::SerialPad] {
            assert_eq!(Mode::from_u8(mode.as_u8()), mode);
        }
        assert_eq!(Mode::from_u8(0xAA), Mode::Joystick);
    }
}
