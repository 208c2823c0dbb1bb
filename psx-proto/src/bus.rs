//! Bit-banged controller bus over `embedded-hal` pins.
//!
//! Bytes go out LSB first on CMD while DAT is sampled with the clock low.
//! ATT frames a whole command and is held low for its duration.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use db9_core::{ControllerKind, ControllerSnapshot, ProbeOutcome};

use crate::frame::{
    check_header, classify, decode_poll, FrameError, CMD_ENTER_CONFIG, CMD_EXIT_CONFIG,
    CMD_POLL, CMD_SET_ANALOG_LOCKED, POLL_FRAME_LEN,
};

/// Half of one bus clock period.
pub const CLOCK_HALF_PERIOD_US: u32 = 4;

/// Settle time between ATT falling and the first clock edge.
pub const ATTENTION_SETUP_US: u32 = 16;

/// Gap between bytes of a frame.
pub const BYTE_GAP_US: u32 = 8;

/// Detection attempts before the probe gives up.
pub const PROBE_ATTEMPTS: u8 = 5;

/// Wait between detection attempts.
pub const PROBE_RETRY_DELAY_MS: u32 = 50;

/// Controller bus on four GPIO lines.
pub struct PsxBus<CLK, CMD, ATT, DAT, D> {
    clk: CLK,
    cmd: CMD,
    att: ATT,
    dat: DAT,
    delay: D,
}

impl<CLK, CMD, ATT, DAT, D> PsxBus<CLK, CMD, ATT, DAT, D>
where
    CLK: OutputPin,
    CMD: OutputPin,
    ATT: OutputPin,
    DAT: InputPin,
    D: DelayNs,
{
    /// Take the pins and park the bus idle (clock and attention high).
    pub fn new(clk: CLK, cmd: CMD, att: ATT, dat: DAT, delay: D) -> Result<Self, FrameError> {
        let mut bus = Self {
            clk,
            cmd,
            att,
            dat,
            delay,
        };
        bus.clk.set_high().map_err(|_| FrameError::Io)?;
        bus.cmd.set_high().map_err(|_| FrameError::Io)?;
        bus.att.set_high().map_err(|_| FrameError::Io)?;
        Ok(bus)
    }

    /// Exchange one framed command. `response` receives one byte per
    /// command byte; extra response bytes are clocked with zeros.
    pub fn transfer(&mut self, command: &[u8], response: &mut [u8]) -> Result<(), FrameError> {
        self.att.set_low().map_err(|_| FrameError::Io)?;
        self.delay.delay_us(ATTENTION_SETUP_US);

        let result = self.exchange_frame(command, response);

        self.att.set_high().map_err(|_| FrameError::Io)?;
        result
    }

    fn exchange_frame(&mut self, command: &[u8], response: &mut [u8]) -> Result<(), FrameError> {
        for (i, slot) in response.iter_mut().enumerate() {
            *slot = self.exchange_byte(command.get(i).copied().unwrap_or(0))?;
            self.delay.delay_us(BYTE_GAP_US);
        }
        Ok(())
    }

    fn exchange_byte(&mut self, out: u8) -> Result<u8, FrameError> {
        let mut input = 0u8;
        for bit in 0..8 {
            if out & (1 << bit) != 0 {
                self.cmd.set_high().map_err(|_| FrameError::Io)?;
            } else {
                self.cmd.set_low().map_err(|_| FrameError::Io)?;
            }
            self.clk.set_low().map_err(|_| FrameError::Io)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
            if self.dat.is_high().map_err(|_| FrameError::Io)? {
                input |= 1 << bit;
            }
            self.clk.set_high().map_err(|_| FrameError::Io)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        }
        self.cmd.set_high().map_err(|_| FrameError::Io)?;
        Ok(input)
    }

    /// Raw poll reply.
    pub fn poll_raw(&mut self) -> Result<[u8; POLL_FRAME_LEN], FrameError> {
        let mut response = [0u8; POLL_FRAME_LEN];
        self.transfer(&CMD_POLL, &mut response)?;
        Ok(response)
    }

    /// Poll and decode one snapshot.
    pub fn poll(&mut self) -> Result<ControllerSnapshot, FrameError> {
        let response = self.poll_raw()?;
        decode_poll(&response)
    }

    /// Switch a dual-analog pad into analog mode and lock it there.
    pub fn enable_analog(&mut self) -> Result<(), FrameError> {
        let mut response = [0u8; CMD_SET_ANALOG_LOCKED.len()];
        self.transfer(&CMD_ENTER_CONFIG, &mut response[..CMD_ENTER_CONFIG.len()])?;
        check_header(&response[..CMD_ENTER_CONFIG.len()])?;
        self.transfer(&CMD_SET_ANALOG_LOCKED, &mut response)?;
        self.transfer(&CMD_EXIT_CONFIG, &mut response)?;
        check_header(&response)?;
        Ok(())
    }

    /// Detect and classify the controller.
    ///
    /// Retries while nothing answers. A pad found in digital mode is asked
    /// to switch to analog; pads without analog mode keep answering digital
    /// and are accepted as such.
    pub fn probe(&mut self) -> ProbeOutcome {
        let mut last = Err(FrameError::NoController);
        for _ in 0..PROBE_ATTEMPTS {
            last = self.poll_raw().and_then(|raw| check_header(&raw));
            match last {
                Ok(id) if id.kind() == Some(ControllerKind::Digital) => {
                    if self.enable_analog().is_ok() {
                        last = self.poll_raw().and_then(|raw| check_header(&raw));
                    }
                    break;
                }
                Ok(_) => break,
                Err(_) => self.delay.delay_ms(PROBE_RETRY_DELAY_MS),
            }
        }
        classify(last)
    }
}
