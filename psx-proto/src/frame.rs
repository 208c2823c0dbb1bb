//! Command frames, poll response decoding and controller classification.

use db9_core::{AnalogStick, Buttons, ControllerKind, ControllerSnapshot, InputError, ProbeOutcome};

/// Bytes exchanged per poll: header (3), buttons (2), sticks (4).
pub const POLL_FRAME_LEN: usize = 9;

/// Second response byte of every well-formed reply.
pub const ACK_MARKER: u8 = 0x5A;

/// Read buttons and sticks.
pub const CMD_POLL: [u8; POLL_FRAME_LEN] = [0x01, 0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Enter configuration mode.
pub const CMD_ENTER_CONFIG: [u8; 5] = [0x01, 0x43, 0x00, 0x01, 0x00];

/// Switch to analog mode and lock the mode button.
pub const CMD_SET_ANALOG_LOCKED: [u8; 9] = [0x01, 0x44, 0x00, 0x01, 0x03, 0x00, 0x00, 0x00, 0x00];

/// Leave configuration mode.
pub const CMD_EXIT_CONFIG: [u8; 9] = [0x01, 0x43, 0x00, 0x00, 0x5A, 0x5A, 0x5A, 0x5A, 0x5A];

/// Error type for frame decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Data line idle high for the whole frame: nothing plugged in.
    NoController,
    /// Header present but the acknowledge marker is missing.
    NoAck,
    /// Fewer bytes than the controller type announces.
    Short,
    /// Pin access failed.
    Io,
}

impl From<FrameError> for InputError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::NoController => InputError::Disconnected,
            FrameError::NoAck => InputError::NoAck,
            FrameError::Short => InputError::Framing,
            FrameError::Io => InputError::Io,
        }
    }
}

/// Controller type and payload size byte (second byte of a reply).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(pub u8);

impl DeviceId {
    /// Payload length in bytes after the 3-byte header.
    #[must_use]
    pub const fn payload_len(self) -> usize {
        (self.0 & 0x0F) as usize * 2
    }

    /// Controller family, or `None` for an unknown type nibble.
    #[must_use]
    pub const fn kind(self) -> Option<ControllerKind> {
        if self.0 == 0x79 {
            return Some(ControllerKind::DualAnalogPressure);
        }
        match self.0 >> 4 {
            0x1 => Some(ControllerKind::Mouse),
            0x2 => Some(ControllerKind::Twist),
            0x4 => Some(ControllerKind::Digital),
            0x5 => Some(ControllerKind::FlightStick),
            0x6 => Some(ControllerKind::LightGun),
            0x7 => Some(ControllerKind::DualAnalog),
            0xE => Some(ControllerKind::Jog),
            _ => None,
        }
    }

    /// Whether the reply carries stick values.
    #[must_use]
    pub const fn has_sticks(self) -> bool {
        self.payload_len() >= 6
    }
}

/// Check the header of a reply and return its device id.
pub fn check_header(raw: &[u8]) -> Result<DeviceId, FrameError> {
    if raw.len() < 3 {
        return Err(FrameError::Short);
    }
    if raw.iter().all(|&b| b == 0xFF) {
        return Err(FrameError::NoController);
    }
    if raw[2] != ACK_MARKER {
        return Err(FrameError::NoAck);
    }
    Ok(DeviceId(raw[1]))
}

/// Decode a poll reply into a snapshot.
///
/// Buttons are active-low on the wire. Controllers without sticks report
/// both sticks idle.
pub fn decode_poll(raw: &[u8]) -> Result<ControllerSnapshot, FrameError> {
    let id = check_header(raw)?;
    let payload_len = id.payload_len().min(POLL_FRAME_LEN - 3);
    if payload_len < 2 || raw.len() < 3 + payload_len {
        return Err(FrameError::Short);
    }

    let buttons = Buttons(!u16::from_le_bytes([raw[3], raw[4]]));
    let (right_stick, left_stick) = if id.has_sticks() {
        (
            AnalogStick::new(raw[5], raw[6]),
            AnalogStick::new(raw[7], raw[8]),
        )
    } else {
        (AnalogStick::IDLE, AnalogStick::IDLE)
    };

    Ok(ControllerSnapshot {
        buttons,
        left_stick,
        right_stick,
    })
}

/// Boot classification of a poll reply.
#[must_use]
pub fn classify(result: Result<DeviceId, FrameError>) -> ProbeOutcome {
    match result {
        Ok(id) => match id.kind() {
            Some(kind) if kind.is_supported() => ProbeOutcome::Supported(kind),
            Some(kind) => ProbeOutcome::Unsupported(kind),
            None => ProbeOutcome::Unrecognized,
        },
        Err(FrameError::NoController) => ProbeOutcome::NotFound,
        Err(_) => ProbeOutcome::CommunicationError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALOG_IDLE_FRAME: [u8; POLL_FRAME_LEN] =
        [0xFF, 0x73, 0x5A, 0xFF, 0xFF, 0x7F, 0x7F, 0x7F, 0x7F];

    #[test]
    fn test_decode_analog_idle() {
        let snapshot = decode_poll(&ANALOG_IDLE_FRAME).unwrap();
        assert_eq!(snapshot, ControllerSnapshot::released());
    }

    #[test]
    fn test_decode_buttons_active_low() {
        let mut frame = ANALOG_IDLE_FRAME;
        frame[3] = !(1 << 3); // Start
        frame[4] = !(1 << 6); // Cross
        let snapshot = decode_poll(&frame).unwrap();
        assert_eq!(snapshot.buttons, Buttons::START | Buttons::CROSS);
    }

    #[test]
    fn test_decode_stick_order() {
        let frame = [0xFF, 0x73, 0x5A, 0xFF, 0xFF, 0x10, 0x20, 0x30, 0x40];
        let snapshot = decode_poll(&frame).unwrap();
        assert_eq!(snapshot.right_stick, AnalogStick::new(0x10, 0x20));
        assert_eq!(snapshot.left_stick, AnalogStick::new(0x30, 0x40));
    }

    #[test]
    fn test_decode_digital_reports_idle_sticks() {
        let frame = [0xFF, 0x41, 0x5A, 0xEF, 0xFF, 0x00, 0x00, 0x00, 0x00];
        let snapshot = decode_poll(&frame).unwrap();
        assert_eq!(snapshot.buttons, Buttons::DPAD_UP);
        assert_eq!(snapshot.left_stick, AnalogStick::IDLE);
        assert_eq!(snapshot.right_stick, AnalogStick::IDLE);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_poll(&[0xFF; POLL_FRAME_LEN]), Err(FrameError::NoController));
        assert_eq!(
            decode_poll(&[0xFF, 0x73, 0x00, 0xFF, 0xFF, 0, 0, 0, 0]),
            Err(FrameError::NoAck)
        );
        assert_eq!(decode_poll(&[0xFF, 0x73, 0x5A, 0xFF]), Err(FrameError::Short));
        assert_eq!(decode_poll(&[0xFF, 0x70, 0x5A, 0xFF, 0xFF]), Err(FrameError::Short));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(Ok(DeviceId(0x73))),
            ProbeOutcome::Supported(ControllerKind::DualAnalog)
        );
        assert_eq!(
            classify(Ok(DeviceId(0x79))),
            ProbeOutcome::Supported(ControllerKind::DualAnalogPressure)
        );
        assert_eq!(
            classify(Ok(DeviceId(0x41))),
            ProbeOutcome::Supported(ControllerKind::Digital)
        );
        assert_eq!(
            classify(Ok(DeviceId(0x23))),
            ProbeOutcome::Unsupported(ControllerKind::Twist)
        );
        assert_eq!(
            classify(Ok(DeviceId(0x63))),
            ProbeOutcome::Unsupported(ControllerKind::LightGun)
        );
        assert_eq!(classify(Ok(DeviceId(0xF3))), ProbeOutcome::Unrecognized);
        assert_eq!(classify(Err(FrameError::NoController)), ProbeOutcome::NotFound);
        assert_eq!(classify(Err(FrameError::NoAck)), ProbeOutcome::CommunicationError);
    }

    #[test]
    fn test_frame_error_to_input_error() {
        assert_eq!(InputError::from(FrameError::NoAck), InputError::NoAck);
        assert_eq!(InputError::from(FrameError::NoController), InputError::Disconnected);
    }
}
