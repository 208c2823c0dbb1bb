//! Controller input trait, error and boot classification types.

use core::future::Future;
use embassy_time::Duration;

use crate::config::{
    FAULT_COMMUNICATION_BLINK_INTERVAL, FAULT_NOT_FOUND_BLINK_INTERVAL,
    FAULT_UNSUPPORTED_BLINK_INTERVAL,
};
use crate::types::ControllerSnapshot;

/// Error type for controller reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Bus/communication I/O error.
    Io,
    /// The controller did not acknowledge the command.
    NoAck,
    /// Response too short or malformed.
    Framing,
    /// Controller unplugged.
    Disconnected,
}

/// Controller families recognised at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerKind {
    /// Buttons only, sticks report idle.
    Digital,
    /// Dual analog sticks.
    DualAnalog,
    /// Dual analog sticks with pressure-sensitive buttons.
    DualAnalogPressure,
    /// Analog flight stick.
    FlightStick,
    Mouse,
    /// Twist-steering racing pad.
    Twist,
    LightGun,
    /// Rotary jog dial.
    Jog,
}

impl ControllerKind {
    /// Whether the buttons-and-sticks layout can be mapped by this adapter.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            ControllerKind::Digital
                | ControllerKind::DualAnalog
                | ControllerKind::DualAnalogPressure
                | ControllerKind::FlightStick
        )
    }
}

/// Result of probing the controller port at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeOutcome {
    /// Something answered with an unknown type but standard framing.
    Unrecognized,
    Supported(ControllerKind),
    Unsupported(ControllerKind),
    NotFound,
    CommunicationError,
}

impl ProbeOutcome {
    /// The fault to signal, or `None` if the controller can be used.
    #[must_use]
    pub const fn fault(self) -> Option<Fault> {
        match self {
            ProbeOutcome::Unrecognized | ProbeOutcome::Supported(_) => None,
            ProbeOutcome::Unsupported(_) => Some(Fault::UnsupportedType),
            ProbeOutcome::NotFound => Some(Fault::NotFound),
            ProbeOutcome::CommunicationError => Some(Fault::CommunicationError),
        }
    }
}

/// Permanent boot failure. Only a reset recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    UnsupportedType,
    NotFound,
    CommunicationError,
}

impl Fault {
    /// Mode LED blink interval identifying this fault.
    #[must_use]
    pub const fn blink_interval(self) -> Duration {
        match self {
            Fault::UnsupportedType => FAULT_UNSUPPORTED_BLINK_INTERVAL,
            Fault::NotFound => FAULT_NOT_FOUND_BLINK_INTERVAL,
            Fault::CommunicationError => FAULT_COMMUNICATION_BLINK_INTERVAL,
        }
    }
}

/// Async trait for the source controller.
///
/// This trait abstracts the wire protocol used to poll the controller, so
/// the emulations only ever see a [`ControllerSnapshot`].
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ControllerInput {
    /// Detect and classify the controller. Called once at boot.
    fn probe(&mut self) -> impl Future<Output = ProbeOutcome>;

    /// Read one snapshot. Called exactly once per polling cycle.
    ///
    /// On error, callers should fall back to
    /// [`ControllerSnapshot::released()`].
    fn read(&mut self) -> impl Future<Output = Result<ControllerSnapshot, InputError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_outcomes_have_no_fault() {
        assert_eq!(ProbeOutcome::Unrecognized.fault(), None);
        assert_eq!(
            ProbeOutcome::Supported(ControllerKind::DualAnalog).fault(),
            None
        );
    }

    #[test]
    fn test_fault_classification() {
        assert_eq!(
            ProbeOutcome::Unsupported(ControllerKind::LightGun).fault(),
            Some(Fault::UnsupportedType)
        );
        assert_eq!(ProbeOutcome::NotFound.fault(), Some(Fault::NotFound));
        assert_eq!(
            ProbeOutcome::CommunicationError.fault(),
            Some(Fault::CommunicationError)
        );
    }

    #[test]
    fn test_supported_kinds() {
        assert!(ControllerKind::Digital.is_supported());
        assert!(ControllerKind::DualAnalogPressure.is_supported());
        assert!(!ControllerKind::Twist.is_supported());
        assert!(!ControllerKind::Mouse.is_supported());
    }
}
