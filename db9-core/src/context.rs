//! State shared between the polling loop and the edge handlers.
//!
//! [`PortContext`] is placed in a `static` and handed by reference to both
//! execution contexts. Every field is an atomic; sequences that touch more
//! than one field run inside a critical section.
//!
//! Writers:
//!
//! | Field | Polling loop | Edge handlers |
//! |-------|--------------|---------------|
//! | mode, prior mode | polled transitions, timeout restore | entering serial pad |
//! | live register | every cycle | read once per strobe |
//! | shift register | never | strobe copy, clock shift |
//! | strobe level and release time | never | strobe edges |
//! | button line levels | every joystick/mouse cycle | read when applying |

use embassy_time::Instant;
use portable_atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use crate::config::SERIAL_PAD_TIMEOUT;
use crate::mode::Mode;
use crate::types::{Buttons, ButtonRegister, ControllerSnapshot};

const BUTTON1_BIT: u8 = 1 << 0;
const BUTTON2_BIT: u8 = 1 << 1;

/// Mode, registers and timers shared across execution contexts.
pub struct PortContext {
    mode: AtomicU8,
    prior_mode: AtomicU8,
    pub(crate) live: AtomicU8,
    pub(crate) shift: AtomicU8,
    pub(crate) strobe_asserted: AtomicBool,
    pub(crate) strobe_released_at: AtomicU64,
    button_lines: AtomicU8,
}

impl PortContext {
    /// Joystick mode, nothing pressed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(Mode::Joystick as u8),
            prior_mode: AtomicU8::new(Mode::Joystick as u8),
            live: AtomicU8::new(ButtonRegister::RELEASED.0),
            shift: AtomicU8::new(ButtonRegister::RELEASED.0),
            strobe_asserted: AtomicBool::new(false),
            strobe_released_at: AtomicU64::new(0),
            button_lines: AtomicU8::new(0),
        }
    }

    /// Currently active mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Mode restored when the serial pad session ends.
    #[must_use]
    pub fn prior_mode(&self) -> Mode {
        Mode::from_u8(self.prior_mode.load(Ordering::Acquire))
    }

    /// Switch to the serial pad mode, remembering the mode it replaces.
    ///
    /// Called from the strobe handler. Returns the replaced mode, or `None`
    /// if the serial pad mode was already active.
    pub fn enter_serial_pad(&self) -> Option<Mode> {
        critical_section::with(|_| {
            let current = self.mode();
            if current == Mode::SerialPad {
                return None;
            }
            self.prior_mode.store(current.as_u8(), Ordering::Release);
            self.mode.store(Mode::SerialPad.as_u8(), Ordering::Release);
            Some(current)
        })
    }

    /// Apply the transitions that depend on the controller snapshot.
    ///
    /// Joystick goes to mouse when the right stick leaves its dead zone;
    /// mouse goes back to joystick on any D-pad press. Returns the new mode
    /// if a transition happened.
    pub fn apply_polled_transition(&self, snapshot: &ControllerSnapshot) -> Option<Mode> {
        let (from, to) = match self.mode() {
            Mode::Joystick if snapshot.right_stick_deflected() => (Mode::Joystick, Mode::Mouse),
            Mode::Mouse if snapshot.any_pressed(Buttons::DPAD) => (Mode::Mouse, Mode::Joystick),
            _ => return None,
        };
        // Fails if the strobe handler switched to the serial pad meanwhile
        self.mode
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| to)
    }

    /// Strobe level as of the last handled edge; `true` is asserted.
    #[inline]
    #[must_use]
    pub fn strobe_asserted(&self) -> bool {
        self.strobe_asserted.load(Ordering::Acquire)
    }

    /// Leave the serial pad mode once the strobe line has been released
    /// for [`SERIAL_PAD_TIMEOUT`].
    ///
    /// Returns the restored mode if the session ended.
    pub fn check_serial_pad_timeout(&self, now: Instant) -> Option<Mode> {
        critical_section::with(|_| {
            if self.mode() != Mode::SerialPad || self.strobe_asserted() {
                return None;
            }
            let released_at = Instant::from_ticks(self.strobe_released_at.load(Ordering::Acquire));
            if now.saturating_duration_since(released_at) < SERIAL_PAD_TIMEOUT {
                return None;
            }
            let restored = self.prior_mode();
            self.mode.store(restored.as_u8(), Ordering::Release);
            Some(restored)
        })
    }

    /// Store the register the next strobe will latch.
    #[inline]
    pub fn refresh_live(&self, register: ButtonRegister) {
        self.live.store(register.raw() | ButtonRegister::RESERVED, Ordering::Release);
    }

    /// Register the next strobe will latch.
    #[must_use]
    pub fn live(&self) -> ButtonRegister {
        ButtonRegister(self.live.load(Ordering::Acquire))
    }

    /// Publish the desired state of both button lines in one store.
    ///
    /// Refused while the serial pad mode owns those lines; returns whether
    /// the levels were published.
    pub fn publish_button_lines(&self, b1: bool, b2: bool) -> bool {
        critical_section::with(|_| {
            if self.mode() == Mode::SerialPad {
                return false;
            }
            let mut packed = 0;
            if b1 {
                packed |= BUTTON1_BIT;
            }
            if b2 {
                packed |= BUTTON2_BIT;
            }
            self.button_lines.store(packed, Ordering::Release);
            true
        })
    }

    /// Last published `(b1, b2)` line state; `true` means pulled low.
    #[must_use]
    pub fn button_lines(&self) -> (bool, bool) {
        let packed = self.button_lines.load(Ordering::Acquire);
        (packed & BUTTON1_BIT != 0, packed & BUTTON2_BIT != 0)
    }
}

impl Default for PortContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalogStick;

    fn right_stick(x: u8, y: u8) -> ControllerSnapshot {
        ControllerSnapshot {
            right_stick: AnalogStick::new(x, y),
            ..ControllerSnapshot::released()
        }
    }

    fn dpad(buttons: Buttons) -> ControllerSnapshot {
        ControllerSnapshot {
            buttons,
            ..ControllerSnapshot::released()
        }
    }

    #[test]
    fn test_starts_in_joystick() {
        let ctx = PortContext::new();
        assert_eq!(ctx.mode(), Mode::Joystick);
        assert_eq!(ctx.live(), ButtonRegister::RELEASED);
    }

    #[test]
    fn test_right_stick_enters_mouse() {
        let ctx = PortContext::new();
        assert_eq!(ctx.apply_polled_transition(&right_stick(127, 127)), None);
        assert_eq!(ctx.apply_polled_transition(&right_stick(0, 127)), Some(Mode::Mouse));
        assert_eq!(ctx.mode(), Mode::Mouse);
    }

    #[test]
    fn test_dpad_leaves_mouse_regardless_of_stick() {
        let ctx = PortContext::new();
        ctx.apply_polled_transition(&right_stick(127, 255));

        let mut snapshot = right_stick(255, 255);
        snapshot.buttons = Buttons::DPAD_LEFT | Buttons::CROSS;
        assert_eq!(ctx.apply_polled_transition(&snapshot), Some(Mode::Joystick));
        // Next cycle the stick is still deflected: back to mouse
        assert_eq!(ctx.apply_polled_transition(&right_stick(255, 255)), Some(Mode::Mouse));
    }

    #[test]
    fn test_dpad_in_joystick_is_not_a_transition() {
        let ctx = PortContext::new();
        assert_eq!(ctx.apply_polled_transition(&dpad(Buttons::DPAD_UP)), None);
    }

    #[test]
    fn test_polled_transitions_ignored_in_serial_pad() {
        let ctx = PortContext::new();
        assert_eq!(ctx.enter_serial_pad(), Some(Mode::Joystick));
        assert_eq!(ctx.apply_polled_transition(&right_stick(0, 0)), None);
        assert_eq!(ctx.mode(), Mode::SerialPad);
    }

    #[test]
    fn test_enter_serial_pad_only_once() {
        let ctx = PortContext::new();
        ctx.apply_polled_transition(&right_stick(0, 127));
        assert_eq!(ctx.enter_serial_pad(), Some(Mode::Mouse));
        assert_eq!(ctx.enter_serial_pad(), None);
        assert_eq!(ctx.prior_mode(), Mode::Mouse);
    }

    #[test]
    fn test_publish_button_lines_refused_in_serial_pad() {
        let ctx = PortContext::new();
        assert!(ctx.publish_button_lines(true, false));
        assert_eq!(ctx.button_lines(), (true, false));

        ctx.enter_serial_pad();
        assert!(!ctx.publish_button_lines(false, true));
        assert_eq!(ctx.button_lines(), (true, false));
    }

    #[test]
    fn test_refresh_live_forces_reserved_bit() {
        let ctx = PortContext::new();
        ctx.refresh_live(ButtonRegister(0x00));
        assert_eq!(ctx.live().raw(), 0x80);
    }
}
