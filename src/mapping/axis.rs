//! Stick interpretation: deadzones, view motions and direction sectors
//!
//! Everything here is pure. [`read_stick`] turns a raw `(x, y)` pair and the
//! side's [`AxisSettings`] into a [`StickReading`] that the engine then
//! dispatches. Angles are measured with `atan2(y, x)` in degrees after
//! inversion, so 0° is right and 90° is up.
//!
//! ```text
//!              up (90°)
//!      up_left     │     up_right
//!   (112.5..157.5) │  (22.5..67.5)
//!  left ───────────┼─────────── right
//!  (>=157.5|<-157.5)│   (-22.5..22.5)
//!      down_left   │   down_right
//!                 down
//! ```

use crate::mapping::config::{AxisSettings, CombinedAction, Direction, SeparateAction, StickMode};

/// Lower bound for every stick deadzone
pub const MIN_AXIS_DEADZONE: f32 = 0.1;

/// Separate-axis values below this magnitude dispatch nothing
const ZERO_EPSILON: f32 = 1e-6;

/// One view or pointer delta produced by a stick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMotion {
    Pointer { x: f32, y: f32, speed: f32 },
    Pan { dx: f32, dy: f32, speed: f32 },
    Dolly { amount: f32, speed: f32 },
    Orbit { yaw: f32, pitch: f32 },
    Rotate { yaw: f32, pitch: f32 },
    Zoom { amount: f32 },
}

/// Which direction slots a button stick mode may activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Four,
    Eight,
}

impl Granularity {
    pub const fn allows(self, direction: Direction) -> bool {
        match self {
            Granularity::Four => direction.is_cardinal(),
            Granularity::Eight => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StickReading {
    /// Analog stick modes: zero or more deltas for this tick
    Motions(Vec<ViewMotion>),
    /// Button stick modes: the direction the stick points at, if any
    Direction {
        active: Option<Direction>,
        granularity: Granularity,
    },
}

/// Applies the invert flags of a side
pub fn invert(settings: &AxisSettings, x: f32, y: f32) -> (f32, f32) {
    let x = if settings.invert_x { -x } else { x };
    let y = if settings.invert_y { -y } else { y };
    (x, y)
}

pub fn combined_deadzone(settings: &AxisSettings) -> f32 {
    settings
        .axis_deadzone_x
        .max(settings.axis_deadzone_y)
        .max(MIN_AXIS_DEADZONE)
}

pub fn magnitude(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Four-way direction, ties favour the horizontal axis
pub fn direction_4(x: f32, y: f32) -> Direction {
    if x.abs() >= y.abs() {
        if x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Eight-way direction from 45° sectors centred on the axes
pub fn direction_8(x: f32, y: f32) -> Direction {
    let angle = y.atan2(x).to_degrees();
    if (-22.5..22.5).contains(&angle) {
        Direction::Right
    } else if (22.5..67.5).contains(&angle) {
        Direction::UpRight
    } else if (67.5..112.5).contains(&angle) {
        Direction::Up
    } else if (112.5..157.5).contains(&angle) {
        Direction::UpLeft
    } else if (-157.5..-112.5).contains(&angle) {
        Direction::DownLeft
    } else if (-112.5..-67.5).contains(&angle) {
        Direction::Down
    } else if (-67.5..-22.5).contains(&angle) {
        Direction::DownRight
    } else {
        Direction::Left
    }
}

/// Direction for the button stick modes, `None` inside the deadzone
pub fn classify_direction(
    settings: &AxisSettings,
    x: f32,
    y: f32,
    granularity: Granularity,
) -> Option<Direction> {
    let threshold = combined_deadzone(settings).max(settings.button_deadzone);
    if magnitude(x, y) < threshold {
        return None;
    }
    Some(match granularity {
        Granularity::Four => direction_4(x, y),
        Granularity::Eight => direction_8(x, y),
    })
}

pub fn combined_motion(settings: &AxisSettings, x: f32, y: f32) -> Option<ViewMotion> {
    if settings.combined_action == CombinedAction::None {
        return None;
    }
    if magnitude(x, y) < combined_deadzone(settings) {
        return None;
    }
    let motion = match settings.combined_action {
        CombinedAction::None => return None,
        CombinedAction::MousePointer => ViewMotion::Pointer {
            x,
            y,
            speed: settings.cursor_speed,
        },
        CombinedAction::PanView => ViewMotion::Pan {
            dx: x,
            dy: y,
            speed: settings.pan_speed,
        },
        CombinedAction::RotateView => ViewMotion::Rotate {
            yaw: -x * settings.rotate_speed,
            pitch: y * settings.rotate_speed,
        },
        CombinedAction::ZoomView => ViewMotion::Zoom {
            amount: y * settings.zoom_speed,
        },
        CombinedAction::OrbitSelected => ViewMotion::Orbit {
            yaw: -x * settings.orbit_speed,
            pitch: y * settings.orbit_speed,
        },
    };
    Some(motion)
}

/// Value of one separate axis after its own deadzone
pub fn gated(value: f32, deadzone: f32) -> f32 {
    if value.abs() >= deadzone.max(MIN_AXIS_DEADZONE) {
        value
    } else {
        0.0
    }
}

pub fn separate_motion(
    settings: &AxisSettings,
    action: SeparateAction,
    value: f32,
) -> Option<ViewMotion> {
    if value.abs() < ZERO_EPSILON {
        return None;
    }
    let motion = match action {
        SeparateAction::None => return None,
        SeparateAction::MoveView => ViewMotion::Dolly {
            amount: -value,
            speed: settings.dolly_speed,
        },
        SeparateAction::PanLr => ViewMotion::Pan {
            dx: value,
            dy: 0.0,
            speed: settings.pan_speed,
        },
        SeparateAction::PanUd => ViewMotion::Pan {
            dx: 0.0,
            dy: value,
            speed: settings.pan_speed,
        },
        SeparateAction::ZoomView => ViewMotion::Zoom {
            amount: value * settings.zoom_speed,
        },
        SeparateAction::RotateLocalX => ViewMotion::Rotate {
            yaw: 0.0,
            pitch: value * settings.rotate_speed,
        },
        SeparateAction::RotateLocalY => ViewMotion::Rotate {
            yaw: -value * settings.rotate_speed,
            pitch: 0.0,
        },
        SeparateAction::OrbitUd => ViewMotion::Orbit {
            yaw: 0.0,
            pitch: value * settings.orbit_speed,
        },
        SeparateAction::OrbitLr => ViewMotion::Orbit {
            yaw: -value * settings.orbit_speed,
            pitch: 0.0,
        },
    };
    Some(motion)
}

/// Interprets one stick for this tick
pub fn read_stick(settings: &AxisSettings, raw_x: f32, raw_y: f32) -> StickReading {
    let (x, y) = invert(settings, raw_x, raw_y);
    match settings.stick_mode {
        StickMode::Combined => {
            StickReading::Motions(combined_motion(settings, x, y).into_iter().collect())
        }
        StickMode::Separate => {
            let x_value = gated(x, settings.axis_deadzone_x);
            let y_value = gated(y, settings.axis_deadzone_y);
            let motions = [
                separate_motion(settings, settings.axis_x_action, x_value),
                separate_motion(settings, settings.axis_y_action, y_value),
            ]
            .into_iter()
            .flatten()
            .collect();
            StickReading::Motions(motions)
        }
        StickMode::FourButtons | StickMode::EightButtons => {
            let granularity = if settings.stick_mode == StickMode::EightButtons {
                Granularity::Eight
            } else {
                Granularity::Four
            };
            StickReading::Direction {
                active: classify_direction(settings, x, y, granularity),
                granularity,
            }
        }
    }
}
