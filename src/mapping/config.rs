//! Mode configuration model
//!
//! A [`Preferences`] value is the ordered list of [`Mode`]s plus the index the
//! user last selected. Each mode carries two [`Side`]s (six buttons, a trigger
//! and a stick each) and the two misc buttons. The engine only reads this
//! model during a tick and writes back nothing but [`ModeStatus`] and
//! `modes_index`.
//!
//! On disk the model is TOML:
//!
//! ```toml
//! [[modes]]
//! name = "Edit"
//! back = "PIVOT_PIE"
//!
//! [modes.left]
//! trigger = "MOUSE_LEFT"
//! buttons = { dpad_up = "MOUSE_WHEEL_UP", left_shoulder = { action = "TEMP_MODE_SHIFT", target_mode = "Mouse" } }
//!
//! [modes.left.axis]
//! stick_mode = "SEPARATE"
//! axis_x_action = "ROTATE_LOCAL_Y"
//! axis_y_action = "MOVE_VIEW"
//! ```

use crate::controller::snapshot::{Button, SideId};
use crate::mapping::error::MappingError;
use crate::mapping::templates;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a discrete control can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    #[default]
    None,
    ViewLeft,
    ViewRight,
    ViewTop,
    ViewBottom,
    ViewFront,
    ViewBack,
    ViewCamera,
    ViewPerspective,
    MouseLeft,
    MouseRight,
    PivotPie,
    OrientationPie,
    NextMode,
    PrevMode,
    TempModeShift,
    ToggleOverlay,
    ShowOverlay,
    Grab,
    Rotate,
    Scale,
    Extrude,
    Copy,
    Paste,
    Duplicate,
    ConstraintX,
    ConstraintY,
    ConstraintZ,
    PlaneX,
    PlaneY,
    PlaneZ,
    KeyframeAdd,
    KeyframeRemove,
    ModeToggleEdit,
    SelectAll,
    SelectNone,
    NextFrame,
    PrevFrame,
    NextKeyframe,
    PrevKeyframe,
    Delete,
    ZeroKey,
    MouseWheelUp,
    MouseWheelDown,
}

impl Action {
    pub const fn is_none(self) -> bool {
        matches!(self, Action::None)
    }

    /// Actions that select the active mode and bypass the per-mode edge memory
    pub const fn is_mode_switch(self) -> bool {
        matches!(
            self,
            Action::NextMode | Action::PrevMode | Action::TempModeShift
        )
    }

    pub const fn is_overlay(self) -> bool {
        matches!(self, Action::ToggleOverlay | Action::ShowOverlay)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Action::None => "None",
            Action::ViewLeft => "Left View",
            Action::ViewRight => "Right View",
            Action::ViewTop => "Top View",
            Action::ViewBottom => "Bottom View",
            Action::ViewFront => "Front View",
            Action::ViewBack => "Rear View",
            Action::ViewCamera => "Camera View",
            Action::ViewPerspective => "Toggle Perspective",
            Action::MouseLeft => "Mouse - Left Button",
            Action::MouseRight => "Mouse - Right Button",
            Action::PivotPie => "Pivot Pie Menu",
            Action::OrientationPie => "Orientation Pie Menu",
            Action::NextMode => "Next Gamepad Mode",
            Action::PrevMode => "Previous Gamepad Mode",
            Action::TempModeShift => "Temporary Mode Shift",
            Action::ToggleOverlay => "Toggle Overlay",
            Action::ShowOverlay => "Show Overlay",
            Action::Grab => "Grab (G)",
            Action::Rotate => "Rotate (R)",
            Action::Scale => "Scale (S)",
            Action::Extrude => "Extrude (E)",
            Action::Copy => "Copy (Ctrl+C)",
            Action::Paste => "Paste (Ctrl+V)",
            Action::Duplicate => "Duplicate (Shift+D)",
            Action::ConstraintX => "X Axis Constraint",
            Action::ConstraintY => "Y Axis Constraint",
            Action::ConstraintZ => "Z Axis Constraint",
            Action::PlaneX => "X Plane Constraint",
            Action::PlaneY => "Y Plane Constraint",
            Action::PlaneZ => "Z Plane Constraint",
            Action::KeyframeAdd => "Insert Keyframe",
            Action::KeyframeRemove => "Remove Keyframe",
            Action::ModeToggleEdit => "Toggle Edit/Object",
            Action::SelectAll => "Select All",
            Action::SelectNone => "Select None",
            Action::NextFrame => "Next Frame",
            Action::PrevFrame => "Previous Frame",
            Action::NextKeyframe => "Next Keyframe",
            Action::PrevKeyframe => "Previous Keyframe",
            Action::Delete => "Delete",
            Action::ZeroKey => "Enter 0",
            Action::MouseWheelUp => "Mouse Wheel Up",
            Action::MouseWheelDown => "Mouse Wheel Down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a stick is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StickMode {
    #[default]
    Combined,
    Separate,
    FourButtons,
    EightButtons,
}

/// Whole-stick actions for [`StickMode::Combined`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombinedAction {
    #[default]
    None,
    MousePointer,
    PanView,
    RotateView,
    ZoomView,
    OrbitSelected,
}

/// Per-axis actions for [`StickMode::Separate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeparateAction {
    #[default]
    None,
    MoveView,
    PanLr,
    PanUd,
    RotateLocalX,
    RotateLocalY,
    OrbitLr,
    OrbitUd,
    ZoomView,
}

/// Stick direction slots used by the button stick modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub const fn is_cardinal(self) -> bool {
        matches!(
            self,
            Direction::Up | Direction::Down | Direction::Left | Direction::Right
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpLeft => "up_left",
            Direction::UpRight => "up_right",
            Direction::DownLeft => "down_left",
            Direction::DownRight => "down_right",
        };
        f.write_str(name)
    }
}

/// Actions of the eight direction slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionActions {
    pub up: Action,
    pub down: Action,
    pub left: Action,
    pub right: Action,
    pub up_left: Action,
    pub up_right: Action,
    pub down_left: Action,
    pub down_right: Action,
}

impl DirectionActions {
    pub const fn get(&self, direction: Direction) -> Action {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::UpLeft => self.up_left,
            Direction::UpRight => self.up_right,
            Direction::DownLeft => self.down_left,
            Direction::DownRight => self.down_right,
        }
    }

    pub fn set(&mut self, direction: Direction, action: Action) {
        let slot = match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::UpLeft => &mut self.up_left,
            Direction::UpRight => &mut self.up_right,
            Direction::DownLeft => &mut self.down_left,
            Direction::DownRight => &mut self.down_right,
        };
        *slot = action;
    }
}

/// Stick behaviour of one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub stick_mode: StickMode,
    pub invert_x: bool,
    pub invert_y: bool,
    pub combined_action: CombinedAction,
    pub axis_x_action: SeparateAction,
    pub axis_y_action: SeparateAction,
    pub cursor_speed: f32,
    pub pan_speed: f32,
    pub dolly_speed: f32,
    pub orbit_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub axis_deadzone_x: f32,
    pub axis_deadzone_y: f32,
    pub button_deadzone: f32,
    pub directions: DirectionActions,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            stick_mode: StickMode::Combined,
            invert_x: false,
            invert_y: true,
            combined_action: CombinedAction::None,
            axis_x_action: SeparateAction::None,
            axis_y_action: SeparateAction::None,
            cursor_speed: 0.5,
            pan_speed: 0.08,
            dolly_speed: 0.2,
            orbit_speed: 0.02,
            rotate_speed: 0.02,
            zoom_speed: 0.05,
            axis_deadzone_x: 0.1,
            axis_deadzone_y: 0.1,
            button_deadzone: 0.6,
            directions: DirectionActions::default(),
        }
    }
}

/// Action bound to a discrete control, with the target of a temporary shift
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BindingRepr")]
pub struct ButtonBinding {
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_mode: Option<String>,
}

/// Accepts both `"GRAB"` and `{ action = "GRAB", target_mode = "..." }`
#[derive(Deserialize)]
#[serde(untagged)]
enum BindingRepr {
    Plain(Action),
    Full {
        action: Action,
        #[serde(default)]
        target_mode: Option<String>,
    },
}

impl From<BindingRepr> for ButtonBinding {
    fn from(repr: BindingRepr) -> Self {
        match repr {
            BindingRepr::Plain(action) => action.into(),
            BindingRepr::Full {
                action,
                target_mode,
            } => Self {
                action,
                target_mode: target_mode.filter(|name| !name.is_empty()),
            },
        }
    }
}

impl From<Action> for ButtonBinding {
    fn from(action: Action) -> Self {
        Self {
            action,
            target_mode: None,
        }
    }
}

impl ButtonBinding {
    pub const UNBOUND: ButtonBinding = ButtonBinding {
        action: Action::None,
        target_mode: None,
    };

    /// Temporary shift into the named mode while held
    pub fn shift_to(target: impl Into<String>) -> Self {
        Self {
            action: Action::TempModeShift,
            target_mode: Some(target.into()),
        }
    }
}

/// Six buttons, a trigger and a stick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Side {
    pub buttons: BTreeMap<Button, ButtonBinding>,
    pub trigger: ButtonBinding,
    pub axis: AxisSettings,
}

impl Side {
    pub fn binding(&self, button: Button) -> &ButtonBinding {
        self.buttons.get(&button).unwrap_or(&ButtonBinding::UNBOUND)
    }

    pub fn with_button(mut self, button: Button, binding: impl Into<ButtonBinding>) -> Self {
        self.buttons.insert(button, binding.into());
        self
    }

    pub fn with_trigger(mut self, binding: impl Into<ButtonBinding>) -> Self {
        self.trigger = binding.into();
        self
    }

    pub fn with_axis(mut self, axis: AxisSettings) -> Self {
        self.axis = axis;
        self
    }
}

/// Display status written back by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeStatus {
    Active,
    #[default]
    Enabled,
    Disabled,
}

fn default_true() -> bool {
    true
}

/// One named mapping table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    pub name: String,
    #[serde(default = "default_true", alias = "use_mode")]
    pub enabled: bool,
    #[serde(default)]
    pub left: Side,
    #[serde(default)]
    pub right: Side,
    #[serde(default)]
    pub back: ButtonBinding,
    #[serde(default)]
    pub start: ButtonBinding,
    #[serde(skip)]
    pub status: ModeStatus,
}

impl Mode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            left: Side::default(),
            right: Side::default(),
            back: ButtonBinding::default(),
            start: ButtonBinding::default(),
            status: ModeStatus::default(),
        }
    }

    pub fn with_left(mut self, side: Side) -> Self {
        self.left = side;
        self
    }

    pub fn with_right(mut self, side: Side) -> Self {
        self.right = side;
        self
    }

    pub fn with_back(mut self, binding: impl Into<ButtonBinding>) -> Self {
        self.back = binding.into();
        self
    }

    pub fn with_start(mut self, binding: impl Into<ButtonBinding>) -> Self {
        self.start = binding.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub const fn side(&self, side: SideId) -> &Side {
        match side {
            SideId::Left => &self.left,
            SideId::Right => &self.right,
        }
    }

    /// Binding of any button, side buttons included
    pub fn binding(&self, button: Button) -> &ButtonBinding {
        match button {
            Button::Back => &self.back,
            Button::Start => &self.start,
            other => match other.side() {
                Some(side) => self.side(side).binding(other),
                None => &ButtonBinding::UNBOUND,
            },
        }
    }

    fn bindings_mut(&mut self) -> impl Iterator<Item = &mut ButtonBinding> + '_ {
        self.left
            .buttons
            .values_mut()
            .chain(std::iter::once(&mut self.left.trigger))
            .chain(self.right.buttons.values_mut())
            .chain(std::iter::once(&mut self.right.trigger))
            .chain([&mut self.back, &mut self.start])
    }
}

/// The complete user configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub modes_index: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        let mut prefs = Self {
            modes: templates::default_modes(),
            modes_index: 0,
        };
        prefs.update_mode_statuses(None);
        prefs
    }
}

impl Preferences {
    pub fn from_modes(modes: Vec<Mode>) -> Self {
        let mut prefs = Self {
            modes,
            modes_index: 0,
        };
        prefs.update_mode_statuses(None);
        prefs
    }

    /// `<config dir>/padnav/modes.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("padnav").join("modes.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, MappingError> {
        let mut prefs: Preferences = toml::from_str(content)?;
        prefs.validate()?;
        prefs.update_mode_statuses(None);
        Ok(prefs)
    }

    pub fn load(path: &Path) -> Result<Self, MappingError> {
        debug!("Reading mode file {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let prefs = Self::from_toml_str(&content)?;
        info!(
            "Loaded {} modes from {}",
            prefs.modes.len(),
            path.display()
        );
        Ok(prefs)
    }

    /// Loads the file if it exists, the built-in templates otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, MappingError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(
                "No mode file at {}, using built-in templates",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> Result<String, MappingError> {
        toml::to_string_pretty(self).map_err(|e| MappingError::ConfigError(e.to_string()))
    }

    /// Rejects empty or duplicate names and buttons bound on the wrong side
    pub fn validate(&self) -> Result<(), MappingError> {
        let mut seen = HashSet::new();
        for (index, mode) in self.modes.iter().enumerate() {
            if mode.name.trim().is_empty() {
                return Err(MappingError::EmptyName(index));
            }
            if !seen.insert(mode.name.as_str()) {
                return Err(MappingError::DuplicateName(mode.name.clone()));
            }
            for side in SideId::ALL {
                if let Some(button) = mode
                    .side(side)
                    .buttons
                    .keys()
                    .find(|button| button.side() != Some(side))
                {
                    return Err(MappingError::WrongSide {
                        mode: mode.name.clone(),
                        button: *button,
                        side,
                    });
                }
            }
        }
        Ok(())
    }

    /// Positions of all enabled modes, in order
    pub fn enabled_indices(&self) -> Vec<usize> {
        self.modes
            .iter()
            .enumerate()
            .filter(|(_, mode)| mode.enabled)
            .map(|(index, _)| index)
            .collect()
    }

    /// Position of the first enabled mode with this name
    pub fn find_enabled(&self, name: &str) -> Option<usize> {
        self.modes
            .iter()
            .position(|mode| mode.enabled && mode.name == name)
    }

    pub fn update_mode_statuses(&mut self, active: Option<usize>) {
        for (index, mode) in self.modes.iter_mut().enumerate() {
            mode.status = if !mode.enabled {
                ModeStatus::Disabled
            } else if Some(index) == active {
                ModeStatus::Active
            } else {
                ModeStatus::Enabled
            };
        }
    }

    /// Renames a mode and rewrites every shift target that pointed at it
    pub fn rename_mode(&mut self, index: usize, new_name: &str) -> Result<(), MappingError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(MappingError::EmptyName(index));
        }
        let old_name = match self.modes.get(index) {
            Some(mode) => mode.name.clone(),
            None => {
                return Err(MappingError::ConfigError(format!(
                    "no mode at position {}",
                    index
                )))
            }
        };
        if old_name == new_name {
            return Ok(());
        }
        if self.modes.iter().any(|mode| mode.name == new_name) {
            return Err(MappingError::DuplicateName(new_name.to_string()));
        }

        let mut rewritten = 0;
        for mode in &mut self.modes {
            for binding in mode.bindings_mut() {
                if binding.target_mode.as_deref() == Some(old_name.as_str()) {
                    binding.target_mode = Some(new_name.to_string());
                    rewritten += 1;
                }
            }
        }
        self.modes[index].name = new_name.to_string();
        info!(
            "Renamed mode '{}' to '{}' ({} shift targets updated)",
            old_name, new_name, rewritten
        );
        Ok(())
    }
}
