use super::*;
use crate::controller::snapshot::{Analog, SnapshotState};
use crate::mapping::config::{ModeStatus, Side, StickMode};
use crate::mapping::cursor::CursorOwner;
use crate::mapping::dispatch::{HostOperator, InjectedEvent, KeyState, ViewPreset};
use crate::mapping::templates::default_modes;
use crate::mapping::test_support::{RecordingHost, RecordingInjector, ViewCall};
use approx::assert_relative_eq;

struct Rig {
    mapper: InputMapper<RecordingInjector>,
    prefs: Preferences,
    host: RecordingHost,
    input: SnapshotState,
}

impl Rig {
    fn new(modes: Vec<Mode>) -> Self {
        let mut rig = Self {
            mapper: InputMapper::new(RecordingInjector::default()),
            prefs: Preferences::from_modes(modes),
            host: RecordingHost::default(),
            input: SnapshotState::new(),
        };
        assert!(rig.mapper.start(&mut rig.prefs, &mut rig.host));
        rig
    }

    fn tick(&mut self) {
        self.mapper.apply(&mut self.prefs, &self.input, &mut self.host);
    }

    fn press(&mut self, button: Button) {
        self.input.set_button(button, true);
        self.tick();
    }

    fn release(&mut self, button: Button) {
        self.input.set_button(button, false);
        self.tick();
    }

    fn trigger(&mut self, side: SideId, value: f32) {
        self.input.set_axis(side.trigger(), value);
        self.tick();
    }

    fn stick(&mut self, side: SideId, x: f32, y: f32) {
        self.input.set_stick(side, x, y);
        self.tick();
    }

    fn set_mode(&mut self, index: usize) -> bool {
        self.mapper.set_mode(&mut self.prefs, &mut self.host, index)
    }

    fn mouse(&self) -> Vec<(MouseButton, KeyState)> {
        self.mapper.injector().mouse_events()
    }
}

/// Modes that all cycle with the shoulders and the left trigger
fn cycling_modes(count: usize) -> Vec<Mode> {
    (0..count)
        .map(|i| {
            Mode::new(format!("M{}", i))
                .with_left(
                    Side::default()
                        .with_button(Button::LeftShoulder, Action::PrevMode)
                        .with_trigger(Action::NextMode),
                )
                .with_right(Side::default().with_button(Button::RightShoulder, Action::NextMode))
        })
        .collect()
}

fn right(button: Button, action: Action) -> Side {
    Side::default().with_button(button, action)
}

#[test]
fn stopped_mapper_ignores_input() {
    let mut mapper = InputMapper::new(RecordingInjector::default());
    let mut prefs = Preferences::from_modes(vec![Mode::new("A").with_right(right(Button::A, Action::Grab))]);
    let mut host = RecordingHost::default();
    let mut input = SnapshotState::new();
    input.set_button(Button::A, true);

    mapper.apply(&mut prefs, &input, &mut host);

    assert!(host.operators.is_empty());
    assert!(!mapper.is_running());
}

#[test]
fn button_fires_once_per_press() {
    let mut rig = Rig::new(vec![Mode::new("A").with_right(right(Button::A, Action::Grab))]);
    rig.press(Button::A);
    rig.tick();
    rig.tick();
    rig.release(Button::A);
    rig.press(Button::A);

    assert_eq!(
        rig.host.operators,
        vec![HostOperator::Translate, HostOperator::Translate]
    );
}

#[test]
fn statuses_and_label_follow_active_mode() {
    let mut rig = Rig::new(cycling_modes(2));
    rig.tick();
    assert_eq!(rig.prefs.modes[0].status, ModeStatus::Active);
    assert_eq!(rig.prefs.modes[1].status, ModeStatus::Enabled);
    assert_eq!(rig.mapper.mode_label(), "M0");

    rig.press(Button::RightShoulder);
    assert_eq!(rig.prefs.modes[1].status, ModeStatus::Active);
    assert_eq!(rig.mapper.mode_label(), "M1");
    assert_eq!(rig.host.redraws, 1);
}

#[test]
fn trigger_drives_mouse_button() {
    let mut rig = Rig::new(vec![
        Mode::new("A").with_left(Side::default().with_trigger(Action::MouseLeft))
    ]);
    rig.trigger(SideId::Left, 0.8);
    assert!(rig.mapper.is_mouse_held(MouseButton::Left));
    rig.trigger(SideId::Left, 0.6);
    rig.trigger(SideId::Left, 0.3);

    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Left, KeyState::Press),
            (MouseButton::Left, KeyState::Release)
        ]
    );
}

#[test]
fn trigger_held_button_released_when_binding_vanishes() {
    let mut rig = Rig::new(vec![
        Mode::new("A").with_right(Side::default().with_trigger(Action::MouseRight))
    ]);
    rig.trigger(SideId::Right, 1.0);
    assert!(rig.mapper.is_mouse_held(MouseButton::Right));

    // the release edge is never seen through the binding any more
    rig.prefs.modes[0].right.trigger = ButtonBinding::UNBOUND;
    rig.trigger(SideId::Right, 0.45);

    assert!(!rig.mapper.is_mouse_held(MouseButton::Right));
    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Right, KeyState::Press),
            (MouseButton::Right, KeyState::Release)
        ]
    );
}

#[test]
fn at_most_one_press_per_mouse_button() {
    let mut rig = Rig::new(vec![Mode::new("A")
        .with_left(Side::default().with_trigger(Action::MouseLeft))
        .with_right(right(Button::A, Action::MouseLeft))]);
    rig.input.set_axis(Analog::LeftTrigger, 1.0);
    rig.press(Button::A);

    let presses = rig
        .mouse()
        .into_iter()
        .filter(|(_, state)| *state == KeyState::Press)
        .count();
    assert_eq!(presses, 1);
}

#[test]
fn mode_change_flushes_held_mouse_buttons() {
    let mut modes = cycling_modes(2);
    modes[0].right = modes[0].right.clone().with_button(Button::A, Action::MouseLeft);
    let mut rig = Rig::new(modes);

    rig.press(Button::A);
    rig.press(Button::RightShoulder);
    rig.release(Button::A);
    rig.release(Button::RightShoulder);

    assert_eq!(rig.mapper.mode_index(), 1);
    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Left, KeyState::Press),
            (MouseButton::Left, KeyState::Release)
        ]
    );
}

#[test]
fn previous_mode_wraps_around() {
    let mut rig = Rig::new(cycling_modes(3));
    rig.press(Button::LeftShoulder);
    assert_eq!(rig.mapper.mode_index(), 2);
    rig.release(Button::LeftShoulder);
    rig.press(Button::RightShoulder);
    assert_eq!(rig.mapper.mode_index(), 0);
}

#[test]
fn cycling_with_one_enabled_mode_stays_put() {
    let mut modes = cycling_modes(3);
    modes[1].enabled = false;
    modes[2].enabled = false;
    let mut rig = Rig::new(modes);
    rig.press(Button::RightShoulder);
    assert_eq!(rig.mapper.mode_index(), 0);
    assert_eq!(rig.host.redraws, 0);
}

#[test]
fn trigger_mode_switch_sees_both_edges() {
    let mut rig = Rig::new(cycling_modes(3));
    rig.trigger(SideId::Left, 0.9);
    assert_eq!(rig.mapper.mode_index(), 1);
    rig.tick();
    assert_eq!(rig.mapper.mode_index(), 1);
    rig.trigger(SideId::Left, 0.0);
    rig.trigger(SideId::Left, 0.9);
    assert_eq!(rig.mapper.mode_index(), 2);
}

#[test]
fn mode_change_ends_the_tick() {
    let mut modes = cycling_modes(2);
    modes[0].right = modes[0].right.clone().with_button(Button::A, Action::Grab);
    modes[1].right = modes[1].right.clone().with_button(Button::A, Action::Rotate);
    let mut rig = Rig::new(modes);

    rig.input.set_button(Button::A, true);
    rig.press(Button::LeftShoulder);
    assert_eq!(rig.mapper.mode_index(), 1);
    assert!(rig.host.operators.is_empty());

    // still held, seen as a fresh press under the new table
    rig.tick();
    assert_eq!(rig.host.operators, vec![HostOperator::Rotate]);
}

#[test]
fn disabled_stored_index_falls_back() {
    let mut modes = cycling_modes(3);
    modes[0].enabled = false;
    let mut rig = Rig::new(modes);
    rig.tick();
    assert_eq!(rig.mapper.mode_index(), 1);
    assert_eq!(rig.prefs.modes[0].status, ModeStatus::Disabled);
    assert_eq!(rig.prefs.modes[1].status, ModeStatus::Active);
}

#[test]
fn no_enabled_modes_suspends_mapping() {
    let mut modes = vec![Mode::new("A").with_right(right(Button::A, Action::Grab))];
    modes[0].enabled = false;
    let mut rig = Rig::new(modes);
    rig.press(Button::A);
    assert!(rig.host.operators.is_empty());
    assert_eq!(rig.prefs.modes[0].status, ModeStatus::Disabled);
    assert_eq!(rig.mapper.mode_label(), "");
}

fn shift_modes() -> Vec<Mode> {
    let mut modes = cycling_modes(3);
    modes[0].name = "Mouse".into();
    modes[1].name = "Edit".into();
    modes[2].name = "Other".into();
    modes[0].left = modes[0]
        .left
        .clone()
        .with_button(Button::DpadUp, ButtonBinding::shift_to("Edit"));
    modes
}

#[test]
fn temp_shift_jumps_and_restores() {
    let mut rig = Rig::new(shift_modes());
    rig.press(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 1);
    assert_eq!(
        rig.mapper.temp_shift().map(|shift| shift.previous_index),
        Some(0)
    );

    rig.tick();
    assert_eq!(rig.mapper.mode_index(), 1);

    rig.release(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 0);
    assert_eq!(rig.mapper.temp_shift(), None);
}

#[test]
fn temp_shift_restores_after_manual_switch() {
    let mut rig = Rig::new(shift_modes());
    rig.press(Button::DpadUp);
    rig.press(Button::RightShoulder);
    assert_eq!(rig.mapper.mode_index(), 2);
    rig.release(Button::RightShoulder);

    rig.release(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 0);
}

#[test]
fn temp_shift_can_be_used_again() {
    let mut rig = Rig::new(shift_modes());
    rig.press(Button::DpadUp);
    rig.release(Button::DpadUp);
    rig.press(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 1);
    assert!(rig.mapper.temp_shift().is_some());
}

#[test]
fn temp_shift_without_usable_target_cycles_forward() {
    let mut modes = shift_modes();
    modes[0].left = modes[0]
        .left
        .clone()
        .with_button(Button::DpadUp, ButtonBinding::shift_to("Missing"));
    let mut rig = Rig::new(modes);
    rig.press(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 1);
    rig.release(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 0);
}

#[test]
fn temp_shift_needs_two_enabled_modes() {
    let mut modes = shift_modes();
    modes[1].enabled = false;
    modes[2].enabled = false;
    let mut rig = Rig::new(modes);
    rig.press(Button::DpadUp);
    assert_eq!(rig.mapper.mode_index(), 0);
    assert_eq!(rig.mapper.temp_shift(), None);
}

#[test]
fn temp_shift_into_disabled_previous_only_clears() {
    let mut rig = Rig::new(shift_modes());
    rig.press(Button::DpadUp);
    rig.prefs.modes[0].enabled = false;
    rig.release(Button::DpadUp);
    assert_eq!(rig.mapper.temp_shift(), None);
    assert_eq!(rig.mapper.mode_index(), 1);
}

#[test]
fn eight_way_stick_fires_view_presets() {
    let mut rig = Rig::new(default_modes());
    rig.stick(SideId::Left, 0.0, -1.0);
    rig.tick();
    rig.stick(SideId::Left, 1.0, 0.0);
    rig.stick(SideId::Left, 0.0, 0.0);

    assert_eq!(
        rig.host.operators,
        vec![
            HostOperator::ViewPreset(ViewPreset::Top),
            HostOperator::ViewPreset(ViewPreset::Right)
        ]
    );
}

fn direction_mode(stick_mode: StickMode) -> Mode {
    let mut axis = AxisSettings {
        stick_mode,
        ..AxisSettings::default()
    };
    axis.directions.set(Direction::Up, Action::MouseLeft);
    axis.directions.set(Direction::Right, Action::MouseRight);
    axis.directions.set(Direction::UpLeft, Action::Grab);
    Mode::new("Sticks").with_left(Side::default().with_axis(axis))
}

#[test]
fn direction_change_releases_before_pressing() {
    let mut rig = Rig::new(vec![direction_mode(StickMode::EightButtons)]);
    rig.stick(SideId::Left, 0.0, -1.0);
    rig.stick(SideId::Left, 1.0, 0.0);
    rig.stick(SideId::Left, 0.1, 0.0);

    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Left, KeyState::Press),
            (MouseButton::Left, KeyState::Release),
            (MouseButton::Right, KeyState::Press),
            (MouseButton::Right, KeyState::Release)
        ]
    );
}

#[test]
fn four_way_stick_never_fires_diagonal_slots() {
    let mut rig = Rig::new(vec![direction_mode(StickMode::FourButtons)]);
    // up-left, raw y is down-positive
    rig.stick(SideId::Left, -0.7, -0.7);
    assert!(rig.host.operators.is_empty());
    assert!(rig.mouse().is_empty());

    let mut rig = Rig::new(vec![direction_mode(StickMode::EightButtons)]);
    rig.stick(SideId::Left, -0.7, -0.7);
    assert_eq!(rig.host.operators, vec![HostOperator::Translate]);
}

#[test]
fn pointer_stick_moves_the_cursor() {
    let mut rig = Rig::new(default_modes());
    rig.stick(SideId::Right, 1.0, 0.0);
    assert_eq!(
        rig.mapper.injector().events,
        vec![InjectedEvent::MouseMove { dx: 7, dy: 0 }]
    );
    assert_eq!(rig.mapper.cursor().owner(), CursorOwner::Controller);

    let window = rig.host.window.unwrap();
    rig.mapper.notify_mouse_move(&window, 5.0, 5.0);
    assert_eq!(rig.mapper.cursor().owner(), CursorOwner::Mouse);
}

#[test]
fn pointer_needs_a_window() {
    let mut rig = Rig::new(default_modes());
    rig.host.window = None;
    rig.stick(SideId::Right, 1.0, 0.0);
    rig.tick();
    assert!(rig.mapper.injector().events.is_empty());
}

#[test]
fn separate_axes_drive_the_viewport() {
    let mut rig = Rig::new(default_modes());
    assert!(rig.set_mode(1));
    rig.stick(SideId::Left, 0.5, -0.5);

    match rig.host.view_calls() {
        [ViewCall::Rotate(yaw, pitch), ViewCall::Dolly(amount, speed)] => {
            assert_relative_eq!(*yaw, -0.01);
            assert_relative_eq!(*pitch, 0.0);
            assert_relative_eq!(*amount, -0.5);
            assert_relative_eq!(*speed, 0.2);
        }
        other => panic!("unexpected view calls {:?}", other),
    }
}

#[test]
fn missing_viewport_still_runs_buttons() {
    let mut rig = Rig::new(default_modes());
    rig.host.view = None;
    rig.set_mode(1);
    rig.input.set_stick(SideId::Left, 0.5, -0.5);
    rig.press(Button::A);
    assert_eq!(rig.host.operators, vec![HostOperator::Translate]);
    assert!(rig.host.view_calls().is_empty());
}

#[test]
fn misc_buttons_use_the_mode_table() {
    let mut rig = Rig::new(default_modes());
    rig.set_mode(1);
    rig.press(Button::Back);
    rig.press(Button::Start);
    assert_eq!(
        rig.host.operators,
        vec![
            HostOperator::PieMenu(crate::mapping::dispatch::PieMenu::Pivot),
            HostOperator::PieMenu(crate::mapping::dispatch::PieMenu::Orientation)
        ]
    );
}

#[test]
fn host_failures_do_not_stop_mapping() {
    let mut rig = Rig::new(vec![Mode::new("A").with_right(
        right(Button::A, Action::KeyframeAdd).with_button(Button::B, Action::Copy),
    )]);
    rig.host.fail_operators = true;
    rig.press(Button::A);
    rig.press(Button::B);
    assert_eq!(rig.host.operators, vec![HostOperator::KeyframeInsert]);
    assert_eq!(rig.mapper.injector().events.len(), 4);
    assert!(rig.mapper.is_running());
}

#[test]
fn toggle_overlay_flips_on_press() {
    let mut rig = Rig::new(vec![Mode::new("A").with_start(Action::ToggleOverlay)]);
    rig.press(Button::Start);
    assert!(rig.host.overlay);
    rig.release(Button::Start);
    assert!(rig.host.overlay);
    rig.press(Button::Start);
    assert!(!rig.host.overlay);
    assert_eq!(rig.host.overlay_writes, 2);
}

#[test]
fn show_overlay_is_hidden_by_a_flush() {
    let mut modes = cycling_modes(2);
    modes[0].left = modes[0]
        .left
        .clone()
        .with_button(Button::DpadLeft, Action::ShowOverlay);
    let mut rig = Rig::new(modes);

    rig.press(Button::DpadLeft);
    assert!(rig.host.overlay);
    rig.press(Button::RightShoulder);
    assert!(!rig.host.overlay);
    rig.release(Button::DpadLeft);
    assert!(!rig.host.overlay);
    assert_eq!(rig.host.overlay_writes, 2);
}

#[test]
fn show_overlay_hides_on_release() {
    let mut rig = Rig::new(vec![Mode::new("A").with_back(Action::ShowOverlay)]);
    rig.press(Button::Back);
    assert!(rig.host.overlay);
    rig.release(Button::Back);
    assert!(!rig.host.overlay);
}

#[test]
fn set_mode_flushes_and_records_selection() {
    let mut modes = cycling_modes(3);
    modes[0].right = Side::default().with_trigger(Action::MouseRight);
    modes[1].enabled = false;
    let mut rig = Rig::new(modes);
    rig.trigger(SideId::Right, 1.0);

    assert!(rig.set_mode(2));
    assert_eq!(rig.prefs.modes_index, 2);
    assert_eq!(rig.mapper.mode_index(), 2);
    assert!(!rig.mapper.is_mouse_held(MouseButton::Right));

    assert!(!rig.set_mode(1));
    assert!(!rig.set_mode(2));
    assert_eq!(rig.mapper.mode_index(), 2);
}

#[test]
fn reset_releases_everything_and_rewinds() {
    let mut modes = shift_modes();
    modes[1].right = Side::default().with_trigger(Action::MouseRight);
    let mut rig = Rig::new(modes);
    rig.press(Button::DpadUp);
    rig.trigger(SideId::Right, 1.0);
    assert!(rig.mapper.is_mouse_held(MouseButton::Right));

    rig.mapper.reset(&mut rig.host);

    assert!(!rig.mapper.is_mouse_held(MouseButton::Right));
    assert_eq!(rig.mapper.mode_index(), 0);
    assert_eq!(rig.mapper.temp_shift(), None);
    assert!(rig.mapper.is_running());
    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Right, KeyState::Press),
            (MouseButton::Right, KeyState::Release)
        ]
    );
}

#[test]
fn start_toggles_and_stop_clears_statuses() {
    let mut rig = Rig::new(cycling_modes(2));
    rig.tick();
    assert_eq!(rig.prefs.modes[0].status, ModeStatus::Active);

    assert!(!rig.mapper.start(&mut rig.prefs, &mut rig.host));
    assert!(!rig.mapper.is_running());
    assert_eq!(rig.prefs.modes[0].status, ModeStatus::Enabled);

    rig.press(Button::RightShoulder);
    assert_eq!(rig.mapper.mode_index(), 0);
}

fn stick_cycling_modes(count: usize) -> Vec<Mode> {
    (0..count)
        .map(|i| {
            let mut axis = AxisSettings {
                stick_mode: StickMode::FourButtons,
                ..AxisSettings::default()
            };
            axis.directions.set(Direction::Up, Action::NextMode);
            axis.directions.set(Direction::Down, Action::MouseLeft);
            Mode::new(format!("S{}", i)).with_left(Side::default().with_axis(axis))
        })
        .collect()
}

#[test]
fn held_stick_direction_switches_mode_once() {
    let mut rig = Rig::new(stick_cycling_modes(3));
    let mut seen = Vec::new();
    for _ in 0..4 {
        rig.stick(SideId::Left, 0.0, -1.0);
        seen.push(rig.mapper.mode_index());
    }
    assert_eq!(seen, vec![1, 1, 1, 1]);

    rig.stick(SideId::Left, 0.0, 0.0);
    rig.stick(SideId::Left, 0.0, -1.0);
    assert_eq!(rig.mapper.mode_index(), 2);
}

#[test]
fn stick_mode_switch_keeps_other_directions_working() {
    let mut rig = Rig::new(stick_cycling_modes(2));
    rig.stick(SideId::Left, 0.0, -1.0);
    rig.stick(SideId::Left, 0.0, 1.0);
    rig.stick(SideId::Left, 0.0, 0.0);
    assert_eq!(rig.mapper.mode_index(), 1);
    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Left, KeyState::Press),
            (MouseButton::Left, KeyState::Release)
        ]
    );
}

#[test]
fn removing_every_mode_releases_held_buttons() {
    let mut rig = Rig::new(vec![Mode::new("A").with_right(right(Button::A, Action::MouseLeft))]);
    rig.press(Button::A);
    assert!(rig.mapper.is_mouse_held(MouseButton::Left));

    rig.prefs.modes.clear();
    rig.release(Button::A);
    rig.tick();

    assert!(!rig.mapper.is_mouse_held(MouseButton::Left));
    assert_eq!(rig.mapper.mode_label(), "");
    assert_eq!(
        rig.mouse(),
        vec![
            (MouseButton::Left, KeyState::Press),
            (MouseButton::Left, KeyState::Release)
        ]
    );
}
