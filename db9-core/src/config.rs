//! Compile-time tuning constants.
//!
//! There is no runtime configuration: every threshold and timing used by the
//! emulations lives here so it can be adjusted in one place.

use embassy_time::Duration;

/// Analog axis value reported by a centered stick.
pub const ANALOG_IDLE: u8 = 127;

/// Deflection from [`ANALOG_IDLE`] that must be exceeded before an axis
/// counts as moved.
pub const ANALOG_DEAD_ZONE: u8 = 65;

/// Largest possible deflection from [`ANALOG_IDLE`] (reached at 255).
pub const AXIS_MAX_DEFLECTION: u16 = 128;

/// Time the mode-select line must stay deasserted before the serial pad
/// session is abandoned and the previous mode restored.
pub const SERIAL_PAD_TIMEOUT: Duration = Duration::from_millis(200);

/// Mouse pulse toggle period just outside the dead zone, in microseconds.
pub const MOUSE_SLOW_PERIOD_US: u16 = 10_000;

/// Mouse pulse toggle period at full deflection, in microseconds.
pub const MOUSE_FAST_PERIOD_US: u16 = 1_000;

/// Mode LED blink interval while mouse emulation is active.
pub const MOUSE_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Fault blink: the controller answered with a type we cannot drive.
pub const FAULT_UNSUPPORTED_BLINK_INTERVAL: Duration = Duration::from_millis(1000);

/// Fault blink: nothing answered on the controller port.
pub const FAULT_NOT_FOUND_BLINK_INTERVAL: Duration = Duration::from_millis(250);

/// Fault blink: something answered but the exchange was garbled.
pub const FAULT_COMMUNICATION_BLINK_INTERVAL: Duration = Duration::from_millis(100);

/// On-time of one profile acknowledgment pulse.
pub const ACK_PULSE_ON: Duration = Duration::from_millis(150);

/// Off-time following each profile acknowledgment pulse.
pub const ACK_PULSE_OFF: Duration = Duration::from_millis(150);
