//! Controller-to-joystick mapping profiles.
//!
//! Each profile is a pure function of one [`ControllerSnapshot`]. The active
//! profile is chosen with a modifier combination handled by
//! [`ProfileSelector`].

use crate::types::{Axis, Buttons, ControllerSnapshot, TwoButtonSignal};

/// Button held to enter profile selection.
pub const PROFILE_MODIFIER: Buttons = Buttons::SELECT;

/// Selector buttons, in profile order.
const PROFILE_SELECTORS: [(Buttons, MappingProfile); 4] = [
    (Buttons::SQUARE, MappingProfile::Normal),
    (Buttons::TRIANGLE, MappingProfile::Racing1),
    (Buttons::CIRCLE, MappingProfile::Racing2),
    (Buttons::CROSS, MappingProfile::Platform),
];

/// How the controller is folded into a two-button joystick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MappingProfile {
    /// Everything that points somewhere moves the joystick.
    #[default]
    Normal,
    /// Horizontal steering, accelerate and brake on face buttons.
    Racing1,
    /// Horizontal steering, accelerate and brake on the shoulders.
    Racing2,
    /// Only the D-pad pushes up; a face button jumps.
    Platform,
}

impl MappingProfile {
    /// Position of the profile, 1 to 4. Also the acknowledgment pulse count.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            MappingProfile::Normal => 1,
            MappingProfile::Racing1 => 2,
            MappingProfile::Racing2 => 3,
            MappingProfile::Platform => 4,
        }
    }

    /// Fold a snapshot into joystick output under this profile.
    #[must_use]
    pub fn map(self, snapshot: &ControllerSnapshot) -> TwoButtonSignal {
        match self {
            MappingProfile::Normal => map_normal(snapshot),
            MappingProfile::Racing1 => map_racing1(snapshot),
            MappingProfile::Racing2 => map_racing2(snapshot),
            MappingProfile::Platform => map_platform(snapshot),
        }
    }
}

/// Reduce one axis to a `(negative, positive)` flag pair.
///
/// Both flags are false inside the dead zone.
#[inline]
#[must_use]
pub fn reduce_axis(snapshot: &ControllerSnapshot, axis: Axis) -> (bool, bool) {
    let dead_zone = axis.calibration().dead_zone as i16;
    let deflection = snapshot.deflection(axis);
    (deflection < -dead_zone, deflection > dead_zone)
}

/// Left/right from the horizontal axis of the left stick and the D-pad.
fn steering(snapshot: &ControllerSnapshot) -> (bool, bool) {
    let (left, right) = reduce_axis(snapshot, Axis::LeftX);
    (
        left || snapshot.is_pressed(Buttons::DPAD_LEFT),
        right || snapshot.is_pressed(Buttons::DPAD_RIGHT),
    )
}

/// D-pad plus left stick on all four directions.
///
/// Also used for the direction lines while the serial pad protocol is active.
#[must_use]
pub fn directions(snapshot: &ControllerSnapshot) -> TwoButtonSignal {
    let (left, right) = steering(snapshot);
    let (up, down) = reduce_axis(snapshot, Axis::LeftY);
    TwoButtonSignal {
        up: up || snapshot.is_pressed(Buttons::DPAD_UP),
        down: down || snapshot.is_pressed(Buttons::DPAD_DOWN),
        left,
        right,
        b1: false,
        b2: false,
    }
}

fn map_normal(snapshot: &ControllerSnapshot) -> TwoButtonSignal {
    let mut signal = directions(snapshot);
    signal.b1 = snapshot.any_pressed(Buttons::SQUARE | Buttons::RIGHT_SHOULDER);
    signal.b2 = snapshot.any_pressed(Buttons::CROSS | Buttons::LEFT_SHOULDER);
    signal
}

fn map_racing1(snapshot: &ControllerSnapshot) -> TwoButtonSignal {
    let (left, right) = steering(snapshot);
    let down = snapshot.any_pressed(Buttons::DPAD_DOWN | Buttons::SQUARE);
    // Braking wins over accelerating
    let up = !down && snapshot.any_pressed(Buttons::DPAD_UP | Buttons::CROSS);

    TwoButtonSignal {
        up,
        down,
        left,
        right,
        b1: snapshot.any_pressed(Buttons::CIRCLE | Buttons::RIGHT_SHOULDER),
        b2: snapshot.any_pressed(Buttons::TRIANGLE | Buttons::LEFT_SHOULDER),
    }
}

fn map_racing2(snapshot: &ControllerSnapshot) -> TwoButtonSignal {
    let (left, right) = steering(snapshot);
    let down = snapshot
        .any_pressed(Buttons::DPAD_DOWN | Buttons::SQUARE | Buttons::L1 | Buttons::L2);
    let up = !down && snapshot.any_pressed(Buttons::DPAD_UP | Buttons::R1 | Buttons::R2);

    TwoButtonSignal {
        up,
        down,
        left,
        right,
        b1: snapshot.any_pressed(Buttons::CIRCLE | Buttons::R3),
        b2: snapshot.any_pressed(Buttons::TRIANGLE | Buttons::L3),
    }
}

fn map_platform(snapshot: &ControllerSnapshot) -> TwoButtonSignal {
    let mut signal = directions(snapshot);
    // The stick never jumps: up comes from the D-pad or the jump button only
    signal.up = snapshot.any_pressed(Buttons::DPAD_UP | Buttons::CROSS);
    signal.b1 = snapshot.any_pressed(Buttons::CIRCLE | Buttons::RIGHT_SHOULDER);
    signal.b2 = snapshot.any_pressed(Buttons::SQUARE | Buttons::LEFT_SHOULDER);
    signal
}

/// Outcome of feeding one snapshot to the [`ProfileSelector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// Modifier not held; compute joystick output with the active profile.
    Inactive,
    /// Modifier held; no joystick output this cycle.
    Held,
    /// Modifier held and a profile was just picked.
    Selected(MappingProfile),
}

/// Tracks the active profile and the modifier combination.
#[derive(Debug, Default)]
pub struct ProfileSelector {
    active: MappingProfile,
    previous: Buttons,
}

impl ProfileSelector {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: MappingProfile::Normal,
            previous: Buttons::NONE,
        }
    }

    /// Currently active profile.
    #[must_use]
    pub const fn active(&self) -> MappingProfile {
        self.active
    }

    /// Record the buttons without selecting anything.
    ///
    /// Used outside joystick mode so a combination held across a mode
    /// change does not fire on return.
    pub fn track(&mut self, snapshot: &ControllerSnapshot) {
        self.previous = snapshot.buttons;
    }

    /// Inspect one snapshot for the modifier combination.
    ///
    /// A selector button counts once, on the cycle it goes down while the
    /// modifier is held.
    pub fn update(&mut self, snapshot: &ControllerSnapshot) -> Selection {
        let pressed = snapshot.buttons;
        let newly_pressed = pressed & !self.previous;
        self.previous = pressed;

        if !pressed.is_pressed(PROFILE_MODIFIER) {
            return Selection::Inactive;
        }

        for (button, profile) in PROFILE_SELECTORS {
            if newly_pressed.is_pressed(button) {
                self.active = profile;
                return Selection::Selected(profile);
            }
        }
        Selection::Held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalogStick;

    const ALL_PROFILES: [MappingProfile; 4] = [
        MappingProfile::Normal,
        MappingProfile::Racing1,
        MappingProfile::Racing2,
        MappingProfile::Platform,
    ];

    fn snapshot(buttons: Buttons) -> ControllerSnapshot {
        ControllerSnapshot {
            buttons,
            ..ControllerSnapshot::released()
        }
    }

    #[test]
    fn test_released_maps_to_nothing() {
        for profile in ALL_PROFILES {
            assert_eq!(
                profile.map(&ControllerSnapshot::released()),
                TwoButtonSignal::default()
            );
        }
    }

    #[test]
    fn test_normal_left_stick_full_right() {
        let snapshot = ControllerSnapshot {
            left_stick: AnalogStick::new(255, 127),
            ..ControllerSnapshot::released()
        };
        let expected = TwoButtonSignal {
            right: true,
            ..TwoButtonSignal::default()
        };
        assert_eq!(MappingProfile::Normal.map(&snapshot), expected);
    }

    #[test]
    fn test_normal_ors_analog_and_dpad() {
        let snapshot = ControllerSnapshot {
            buttons: Buttons::DPAD_LEFT | Buttons::DPAD_DOWN,
            left_stick: AnalogStick::new(255, 0),
            ..ControllerSnapshot::released()
        };
        let signal = MappingProfile::Normal.map(&snapshot);
        assert!(signal.up);
        assert!(signal.down);
        assert!(signal.left);
        assert!(signal.right);
    }

    #[test]
    fn test_normal_buttons() {
        let signal = MappingProfile::Normal.map(&snapshot(Buttons::R2));
        assert!(signal.b1 && !signal.b2);
        let signal = MappingProfile::Normal.map(&snapshot(Buttons::CROSS | Buttons::L3));
        assert!(!signal.b1 && signal.b2);
    }

    #[test]
    fn test_racing1_brake_dominates() {
        let braking = ControllerSnapshot {
            buttons: Buttons::DPAD_DOWN,
            left_stick: AnalogStick::new(127, 0),
            ..ControllerSnapshot::released()
        };
        let signal = MappingProfile::Racing1.map(&braking);
        assert!(!signal.up);
        assert!(signal.down);

        let signal = MappingProfile::Racing1.map(&snapshot(Buttons::CROSS | Buttons::SQUARE));
        assert!(!signal.up);
        assert!(signal.down);
    }

    #[test]
    fn test_racing_ignores_vertical_analog() {
        let snapshot = ControllerSnapshot {
            left_stick: AnalogStick::new(127, 0),
            right_stick: AnalogStick::new(0, 255),
            ..ControllerSnapshot::released()
        };
        for profile in [MappingProfile::Racing1, MappingProfile::Racing2] {
            assert_eq!(profile.map(&snapshot), TwoButtonSignal::default());
        }
    }

    #[test]
    fn test_racing_down_implies_not_up_for_every_button_combination() {
        // Walk every combination of the buttons that feed up/down
        let feeders = [
            Buttons::DPAD_UP,
            Buttons::DPAD_DOWN,
            Buttons::CROSS,
            Buttons::SQUARE,
            Buttons::L1,
            Buttons::L2,
            Buttons::R1,
            Buttons::R2,
        ];
        for mask in 0u16..(1 << feeders.len()) {
            let mut buttons = Buttons::NONE;
            for (i, &button) in feeders.iter().enumerate() {
                buttons.set(button, mask & (1 << i) != 0);
            }
            for profile in [MappingProfile::Racing1, MappingProfile::Racing2] {
                let signal = profile.map(&snapshot(buttons));
                assert!(!(signal.down && signal.up), "{:?} {:?}", profile, buttons);
            }
        }
    }

    #[test]
    fn test_racing2_shoulders_drive_pedals() {
        let signal = MappingProfile::Racing2.map(&snapshot(Buttons::R1));
        assert!(signal.up && !signal.down);
        let signal = MappingProfile::Racing2.map(&snapshot(Buttons::R2 | Buttons::L2));
        assert!(!signal.up && signal.down);
        let signal = MappingProfile::Racing2.map(&snapshot(Buttons::R3));
        assert!(signal.b1 && !signal.up);
    }

    #[test]
    fn test_platform_up_only_from_dpad_or_jump() {
        let stick_up = ControllerSnapshot {
            left_stick: AnalogStick::new(127, 0),
            ..ControllerSnapshot::released()
        };
        assert!(!MappingProfile::Platform.map(&stick_up).up);

        let jump = MappingProfile::Platform.map(&snapshot(Buttons::CROSS));
        assert!(jump.up);
        assert!(!jump.b1 && !jump.b2);

        let stick_down = ControllerSnapshot {
            left_stick: AnalogStick::new(127, 255),
            ..ControllerSnapshot::released()
        };
        assert!(MappingProfile::Platform.map(&stick_down).down);
    }

    #[test]
    fn test_selector_inactive_without_modifier() {
        let mut selector = ProfileSelector::new();
        assert_eq!(selector.update(&snapshot(Buttons::CIRCLE)), Selection::Inactive);
        assert_eq!(selector.active(), MappingProfile::Normal);
    }

    #[test]
    fn test_selector_picks_profile_once() {
        let mut selector = ProfileSelector::new();
        assert_eq!(selector.update(&snapshot(Buttons::SELECT)), Selection::Held);

        let combo = snapshot(Buttons::SELECT | Buttons::CIRCLE);
        assert_eq!(
            selector.update(&combo),
            Selection::Selected(MappingProfile::Racing2)
        );
        // Still held: no repeated acknowledgment
        assert_eq!(selector.update(&combo), Selection::Held);
        assert_eq!(selector.active(), MappingProfile::Racing2);
    }

    #[test]
    fn test_selector_reselect_is_idempotent() {
        let mut selector = ProfileSelector::new();
        let combo = snapshot(Buttons::SELECT | Buttons::CROSS);

        assert_eq!(
            selector.update(&combo),
            Selection::Selected(MappingProfile::Platform)
        );
        selector.update(&snapshot(Buttons::NONE));
        assert_eq!(
            selector.update(&combo),
            Selection::Selected(MappingProfile::Platform)
        );
        assert_eq!(selector.active().ordinal(), 4);
    }

    #[test]
    fn test_selector_button_before_modifier_does_not_select() {
        let mut selector = ProfileSelector::new();
        selector.update(&snapshot(Buttons::TRIANGLE));
        assert_eq!(
            selector.update(&snapshot(Buttons::TRIANGLE | Buttons::SELECT)),
            Selection::Held
        );
        assert_eq!(selector.active(), MappingProfile::Normal);
    }

    #[test]
    fn test_ordinals() {
        let ordinals: [u8; 4] = ALL_PROFILES.map(MappingProfile::ordinal);
        assert_eq!(ordinals, [1, 2, 3, 4]);
    }

    #[test]
    fn test_fire_button_sources_per_profile() {
        let table = [
            (
                MappingProfile::Normal,
                Buttons::SQUARE | Buttons::RIGHT_SHOULDER,
                Buttons::CROSS | Buttons::LEFT_SHOULDER,
            ),
            (
                MappingProfile::Racing1,
                Buttons::CIRCLE | Buttons::RIGHT_SHOULDER,
                Buttons::TRIANGLE | Buttons::LEFT_SHOULDER,
            ),
            (
                MappingProfile::Racing2,
                Buttons::CIRCLE | Buttons::R3,
                Buttons::TRIANGLE | Buttons::L3,
            ),
            (
                MappingProfile::Platform,
                Buttons::CIRCLE | Buttons::RIGHT_SHOULDER,
                Buttons::SQUARE | Buttons::LEFT_SHOULDER,
            ),
        ];

        for (profile, b1_sources, b2_sources) in table {
            for bit in 0..16 {
                let button = Buttons(1 << bit);
                let signal = profile.map(&snapshot(button));
                assert_eq!(
                    signal.b1,
                    b1_sources.intersects(button),
                    "{:?} b1 for button bit {}",
                    profile,
                    bit
                );
                assert_eq!(
                    signal.b2,
                    b2_sources.intersects(button),
                    "{:?} b2 for button bit {}",
                    profile,
                    bit
                );
            }
        }
    }
}
