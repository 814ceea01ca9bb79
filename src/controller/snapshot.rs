//! Typed controller identifiers and the per-tick input snapshot
//!
//! The mapping engine never talks to a device backend directly. It reads one
//! [`InputSnapshot`] per tick: named analog values in `[-1, 1]` and boolean
//! button states. [`SnapshotState`] is the plain in-memory implementation that
//! the gilrs collector fills and the tests drive by hand.
//!
//! Stick Y values follow the down-positive convention, so a stick pushed up
//! reads negative. The default `invert_y` of every axis turns that back into
//! "up is positive" for the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Trigger values strictly above this count as pressed
pub const TRIGGER_THRESHOLD: f32 = 0.45;

/// Physical buttons of a standard gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    LeftStick,
    LeftShoulder,
    A,
    B,
    X,
    Y,
    RightStick,
    RightShoulder,
    Back,
    Start,
}

impl Button {
    /// Buttons that belong to no side, evaluated after both sides
    pub const MISC: [Button; 2] = [Button::Back, Button::Start];

    /// Side a button belongs to, `None` for back/start
    pub const fn side(self) -> Option<SideId> {
        match self {
            Button::DpadUp
            | Button::DpadDown
            | Button::DpadLeft
            | Button::DpadRight
            | Button::LeftStick
            | Button::LeftShoulder => Some(SideId::Left),
            Button::A
            | Button::B
            | Button::X
            | Button::Y
            | Button::RightStick
            | Button::RightShoulder => Some(SideId::Right),
            Button::Back | Button::Start => None,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Button::DpadUp => "D-Pad Up",
            Button::DpadDown => "D-Pad Down",
            Button::DpadLeft => "D-Pad Left",
            Button::DpadRight => "D-Pad Right",
            Button::LeftStick => "Left Stick Button",
            Button::LeftShoulder => "Left Shoulder",
            Button::A => "A Button",
            Button::B => "B Button",
            Button::X => "X Button",
            Button::Y => "Y Button",
            Button::RightStick => "Right Stick Button",
            Button::RightShoulder => "Right Shoulder",
            Button::Back => "Back",
            Button::Start => "Start",
        };
        f.write_str(label)
    }
}

/// Analog inputs, sticks in `[-1, 1]` and triggers in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analog {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// One half of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideId {
    Left,
    Right,
}

impl SideId {
    pub const ALL: [SideId; 2] = [SideId::Left, SideId::Right];

    /// Buttons of this side in evaluation order
    pub const fn buttons(self) -> [Button; 6] {
        match self {
            SideId::Left => [
                Button::DpadUp,
                Button::DpadDown,
                Button::DpadLeft,
                Button::DpadRight,
                Button::LeftStick,
                Button::LeftShoulder,
            ],
            SideId::Right => [
                Button::A,
                Button::B,
                Button::X,
                Button::Y,
                Button::RightStick,
                Button::RightShoulder,
            ],
        }
    }

    pub const fn trigger(self) -> Analog {
        match self {
            SideId::Left => Analog::LeftTrigger,
            SideId::Right => Analog::RightTrigger,
        }
    }

    /// (x, y) analogs of the stick on this side
    pub const fn stick(self) -> (Analog, Analog) {
        match self {
            SideId::Left => (Analog::LeftX, Analog::LeftY),
            SideId::Right => (Analog::RightX, Analog::RightY),
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideId::Left => f.write_str("left"),
            SideId::Right => f.write_str("right"),
        }
    }
}

/// Identity of any discrete control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlId {
    Button(Button),
    Trigger(SideId),
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::Button(button) => write!(f, "{}", button),
            ControlId::Trigger(side) => write!(f, "{} trigger", side),
        }
    }
}

/// Read-only view of the controller for one tick
///
/// Absent readings are `0.0` and `false`.
pub trait InputSnapshot {
    fn axis(&self, analog: Analog) -> f32;

    fn button(&self, button: Button) -> bool;

    fn trigger_pressed(&self, side: SideId) -> bool {
        self.axis(side.trigger()) > TRIGGER_THRESHOLD
    }

    /// Booleanised reading of any discrete control
    fn control_pressed(&self, control: ControlId) -> bool {
        match control {
            ControlId::Button(button) => self.button(button),
            ControlId::Trigger(side) => self.trigger_pressed(side),
        }
    }
}

/// In-memory snapshot, filled by the collector or by tests
#[derive(Debug, Clone, Default)]
pub struct SnapshotState {
    axes: HashMap<Analog, f32>,
    buttons: HashMap<Button, bool>,
}

impl SnapshotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an analog value clamped to `[-1, 1]`
    pub fn set_axis(&mut self, analog: Analog, value: f32) {
        self.axes.insert(analog, value.clamp(-1.0, 1.0));
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons.insert(button, pressed);
    }

    pub fn set_stick(&mut self, side: SideId, x: f32, y: f32) {
        let (axis_x, axis_y) = side.stick();
        self.set_axis(axis_x, x);
        self.set_axis(axis_y, y);
    }

    /// Drops every reading, as if the device vanished
    pub fn clear(&mut self) {
        self.axes.clear();
        self.buttons.clear();
    }
}

impl InputSnapshot for SnapshotState {
    fn axis(&self, analog: Analog) -> f32 {
        self.axes.get(&analog).copied().unwrap_or(0.0)
    }

    fn button(&self, button: Button) -> bool {
        self.buttons.get(&button).copied().unwrap_or(false)
    }
}
