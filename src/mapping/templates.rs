//! Built-in mode templates used when no mode file exists

use crate::controller::snapshot::Button;
use crate::mapping::config::{
    Action, AxisSettings, CombinedAction, Direction, DirectionActions, Mode, SeparateAction,
    Side, StickMode,
};

fn combined(action: CombinedAction) -> AxisSettings {
    AxisSettings {
        stick_mode: StickMode::Combined,
        combined_action: action,
        ..AxisSettings::default()
    }
}

fn separate(x: SeparateAction, y: SeparateAction) -> AxisSettings {
    AxisSettings {
        stick_mode: StickMode::Separate,
        axis_x_action: x,
        axis_y_action: y,
        ..AxisSettings::default()
    }
}

fn view_presets() -> AxisSettings {
    let mut directions = DirectionActions::default();
    for (direction, action) in [
        (Direction::Left, Action::ViewLeft),
        (Direction::Right, Action::ViewRight),
        (Direction::Up, Action::ViewTop),
        (Direction::Down, Action::ViewBottom),
        (Direction::UpRight, Action::ViewTop),
        (Direction::DownLeft, Action::ViewBottom),
        (Direction::UpLeft, Action::ViewPerspective),
        (Direction::DownRight, Action::ViewCamera),
    ] {
        directions.set(direction, action);
    }
    AxisSettings {
        stick_mode: StickMode::EightButtons,
        directions,
        ..AxisSettings::default()
    }
}

/// "Mouse", "Edit", "Move/Pan" and "Orientation"
pub fn default_modes() -> Vec<Mode> {
    vec![
        Mode::new("Mouse")
            .with_left(
                Side::default()
                    .with_button(Button::DpadUp, Action::PrevKeyframe)
                    .with_button(Button::DpadDown, Action::NextKeyframe)
                    .with_button(Button::DpadLeft, Action::PrevFrame)
                    .with_button(Button::DpadRight, Action::NextFrame)
                    .with_button(Button::LeftShoulder, Action::PrevMode)
                    .with_trigger(Action::MouseLeft)
                    .with_axis(view_presets()),
            )
            .with_right(
                Side::default()
                    .with_button(Button::A, Action::PivotPie)
                    .with_button(Button::B, Action::OrientationPie)
                    .with_button(Button::X, Action::ModeToggleEdit)
                    .with_button(Button::RightShoulder, Action::NextMode)
                    .with_trigger(Action::MouseRight)
                    .with_axis(combined(CombinedAction::MousePointer)),
            ),
        Mode::new("Edit")
            .with_left(
                Side::default()
                    .with_button(Button::DpadUp, Action::MouseWheelUp)
                    .with_button(Button::DpadDown, Action::MouseWheelDown)
                    .with_button(Button::DpadLeft, Action::PrevFrame)
                    .with_button(Button::DpadRight, Action::NextFrame)
                    .with_button(Button::LeftShoulder, Action::PrevMode)
                    .with_trigger(Action::MouseLeft)
                    .with_axis(separate(
                        SeparateAction::RotateLocalY,
                        SeparateAction::MoveView,
                    )),
            )
            .with_right(
                Side::default()
                    .with_button(Button::A, Action::Grab)
                    .with_button(Button::B, Action::Rotate)
                    .with_button(Button::Y, Action::Scale)
                    .with_button(Button::X, Action::Extrude)
                    .with_button(Button::RightShoulder, Action::NextMode)
                    .with_trigger(Action::MouseRight)
                    .with_axis(combined(CombinedAction::MousePointer)),
            )
            .with_back(Action::PivotPie)
            .with_start(Action::OrientationPie),
        Mode::new("Move/Pan")
            .with_left(
                Side::default()
                    .with_button(Button::DpadRight, Action::ConstraintX)
                    .with_button(Button::DpadUp, Action::ConstraintY)
                    .with_button(Button::DpadDown, Action::ConstraintZ)
                    .with_button(Button::LeftShoulder, Action::PrevMode)
                    .with_trigger(Action::MouseLeft)
                    .with_axis(separate(
                        SeparateAction::RotateLocalY,
                        SeparateAction::MoveView,
                    )),
            )
            .with_right(
                Side::default()
                    .with_button(Button::B, Action::ZeroKey)
                    .with_button(Button::A, Action::KeyframeAdd)
                    .with_button(Button::X, Action::Copy)
                    .with_button(Button::Y, Action::Paste)
                    .with_button(Button::RightShoulder, Action::NextMode)
                    .with_trigger(Action::MouseRight)
                    .with_axis(combined(CombinedAction::PanView)),
            ),
        Mode::new("Orientation")
            .with_left(
                Side::default()
                    .with_button(Button::DpadRight, Action::PlaneX)
                    .with_button(Button::DpadUp, Action::PlaneY)
                    .with_button(Button::DpadDown, Action::PlaneZ)
                    .with_button(Button::LeftShoulder, Action::PrevMode)
                    .with_trigger(Action::MouseLeft)
                    .with_axis(combined(CombinedAction::RotateView)),
            )
            .with_right(
                Side::default()
                    .with_button(Button::X, Action::KeyframeRemove)
                    .with_button(Button::B, Action::Delete)
                    .with_button(Button::Y, Action::Duplicate)
                    .with_button(Button::RightShoulder, Action::NextMode)
                    .with_trigger(Action::MouseRight)
                    .with_axis(separate(SeparateAction::PanLr, SeparateAction::OrbitUd)),
            ),
    ]
}
