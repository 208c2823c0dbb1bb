//! Adapter: runs one polling cycle of the mode controller.

use embassy_time::Instant;

use crate::context::PortContext;
use crate::input::{ControllerInput, InputError};
use crate::lines::HostLines;
use crate::mapping::{self, MappingProfile, ProfileSelector, Selection};
use crate::mode::{Mode, Transition};
use crate::mouse::MouseEmulator;
use crate::types::{ButtonRegister, ControllerSnapshot};

/// What happened during one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Mode the outputs were computed for.
    pub mode: Mode,
    /// Set when the mode differs from the previous cycle's.
    pub transition: Option<Transition>,
    /// Set when a profile was selected this cycle.
    pub profile_ack: Option<MappingProfile>,
    /// Whether new button line levels were published for the edge task.
    pub buttons_published: bool,
    /// Read failure replaced by a released snapshot.
    pub input_error: Option<InputError>,
}

/// Polling-loop half of the mode controller.
///
/// Owns the per-mode state that only the polling loop touches. The state
/// shared with the edge handlers lives in [`PortContext`].
///
/// # Error Handling
///
/// On input errors, the cycle runs with [`ControllerSnapshot::released()`]
/// so the host lines stay well-formed.
#[derive(Debug, Default)]
pub struct Adapter {
    selector: ProfileSelector,
    mouse: MouseEmulator,
    active_mode: Mode,
}

impl Adapter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selector: ProfileSelector::new(),
            mouse: MouseEmulator::new(),
            active_mode: Mode::Joystick,
        }
    }

    /// Active joystick mapping profile.
    #[must_use]
    pub const fn profile(&self) -> MappingProfile {
        self.selector.active()
    }

    /// Read the controller once and run a cycle on the result.
    ///
    /// `clock` is sampled after the read completes.
    pub async fn cycle<I, L>(
        &mut self,
        input: &mut I,
        ctx: &PortContext,
        lines: &mut L,
        clock: impl FnOnce() -> Instant,
    ) -> CycleReport
    where
        I: ControllerInput,
        L: HostLines,
    {
        let (snapshot, input_error) = match input.read().await {
            Ok(snapshot) => (snapshot, None),
            Err(e) => (ControllerSnapshot::released(), Some(e)),
        };
        let mut report = self.step(ctx, &snapshot, clock(), lines);
        report.input_error = input_error;
        report
    }

    /// Run one cycle against an already-read snapshot.
    ///
    /// Transitions (timeout, polled) are applied before any output is
    /// computed.
    pub fn step<L: HostLines>(
        &mut self,
        ctx: &PortContext,
        snapshot: &ControllerSnapshot,
        now: Instant,
        lines: &mut L,
    ) -> CycleReport {
        ctx.refresh_live(ButtonRegister::from_snapshot(snapshot));
        ctx.check_serial_pad_timeout(now);
        ctx.apply_polled_transition(snapshot);

        let mode = ctx.mode();
        let transition = if mode != self.active_mode {
            let transition = Transition {
                from: self.active_mode,
                to: mode,
            };
            self.active_mode = mode;
            lines.release_all();
            self.mouse.reset(now);
            Some(transition)
        } else {
            None
        };

        let mut report = CycleReport {
            mode,
            transition,
            profile_ack: None,
            buttons_published: false,
            input_error: None,
        };

        match mode {
            Mode::Joystick => match self.selector.update(snapshot) {
                Selection::Inactive => {
                    let signal = self.selector.active().map(snapshot);
                    lines.apply_directions(&signal);
                    report.buttons_published = ctx.publish_button_lines(signal.b1, signal.b2);
                }
                // The modifier combination replaces joystick output entirely
                Selection::Held => {}
                Selection::Selected(profile) => report.profile_ack = Some(profile),
            },
            Mode::Mouse => {
                self.selector.track(snapshot);
                self.mouse.tick(snapshot, now, lines);
                let (left, right) = MouseEmulator::buttons(snapshot);
                report.buttons_published = ctx.publish_button_lines(left, right);
            }
            Mode::SerialPad => {
                self.selector.track(snapshot);
                lines.apply_directions(&mapping::directions(snapshot));
            }
        }

        report
    }
}
