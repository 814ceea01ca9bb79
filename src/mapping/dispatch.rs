//! Boundary between the engine and its collaborators
//!
//! The engine never touches a window system or a camera itself. Resolved
//! actions leave through three traits:
//!
//! - [`Viewport`] for camera deltas
//! - [`Host`] for tool invocations, window lookup and overlay state
//! - [`EventInjector`] for synthetic mouse and keyboard events
//!
//! [`Dispatcher`] owns the injector and the set of virtual mouse buttons
//! currently held, so every press it emits can be matched by a release.

use crate::controller::snapshot::{ControlId, SideId};
use crate::mapping::config::{Action, Direction};
use crate::mapping::cursor::WindowInfo;
use glam::IVec2;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Camera primitives of the 3D view
pub trait Viewport {
    fn pan(&mut self, dx: f32, dy: f32, speed: f32);
    fn dolly(&mut self, amount: f32, speed: f32);
    fn orbit(&mut self, yaw: f32, pitch: f32);
    fn rotate_in_place(&mut self, yaw: f32, pitch: f32);
    fn zoom(&mut self, amount: f32);

    /// Turns the view around its forward axis, views without roll ignore it
    fn roll(&mut self, _amount: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Left,
    Right,
    Top,
    Bottom,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieMenu {
    Pivot,
    Orientation,
}

/// What the host is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditContext {
    #[default]
    Object,
    EditMesh,
    Other,
}

/// Whether selection applies to whole objects or mesh elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectScope {
    Objects,
    Elements,
}

impl From<EditContext> for SelectScope {
    fn from(context: EditContext) -> Self {
        match context {
            EditContext::Object => SelectScope::Objects,
            _ => SelectScope::Elements,
        }
    }
}

/// Tool invocations the host understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOperator {
    Translate,
    Rotate,
    Resize,
    ExtrudeRegion,
    DuplicateMove,
    DeleteObjects,
    DeleteVertices,
    SelectAll(SelectScope),
    DeselectAll(SelectScope),
    ViewPreset(ViewPreset),
    ViewCamera,
    TogglePerspective,
    PieMenu(PieMenu),
    KeyframeInsert,
    KeyframeDelete,
    ToggleEditMode,
    FrameOffset(i32),
    KeyframeJump { next: bool },
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("operator {0:?} is not available in the current context")]
    Unavailable(HostOperator),

    #[error("operator {operator:?} failed: {reason}")]
    Failed {
        operator: HostOperator,
        reason: String,
    },
}

/// The interactive application hosting the view
pub trait Host {
    fn window(&self) -> Option<WindowInfo>;

    /// The 3D view to drive, `None` when no usable view exists
    fn viewport(&mut self) -> Option<&mut dyn Viewport>;

    fn edit_context(&self) -> EditContext;

    fn invoke(&mut self, operator: HostOperator) -> Result<(), HostError>;

    fn overlay_visible(&self) -> bool {
        false
    }

    fn set_overlay_visible(&mut self, _visible: bool) {}

    /// Mode indicators changed and should be redrawn
    fn redraw_indicators(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
    LeftShift,
    LeftCtrl,
    LeftAlt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

/// Synthetic input handed to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedEvent {
    MouseButton { button: MouseButton, state: KeyState },
    MouseMove { dx: i32, dy: i32 },
    Wheel(WheelDirection),
    Key { key: Key, state: KeyState },
}

/// Platform event injection, `false` when the event could not be delivered
pub trait EventInjector {
    fn inject(&mut self, event: &InjectedEvent) -> bool;
}

/// Injector for platforms without event injection
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInjector;

impl EventInjector for NullInjector {
    fn inject(&mut self, _event: &InjectedEvent) -> bool {
        false
    }
}

/// What pressed a virtual mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Control(ControlId),
    Direction { stick: SideId, direction: Direction },
}

impl Origin {
    pub const fn trigger_side(&self) -> Option<SideId> {
        match self {
            Origin::Control(ControlId::Trigger(side)) => Some(*side),
            _ => None,
        }
    }
}

pub const fn mouse_button_for(action: Action) -> Option<MouseButton> {
    match action {
        Action::MouseLeft => Some(MouseButton::Left),
        Action::MouseRight => Some(MouseButton::Right),
        _ => None,
    }
}

/// Runs a host operator; failures are logged and swallowed
pub fn run_operator(host: &mut dyn Host, operator: HostOperator) -> bool {
    match host.invoke(operator) {
        Ok(()) => {
            debug!("Host operator {:?} done", operator);
            true
        }
        Err(e) => {
            warn!("Host operator failed: {}", e);
            false
        }
    }
}

pub struct Dispatcher<I: EventInjector> {
    injector: I,
    held: BTreeMap<MouseButton, Origin>,
    injection_warned: bool,
}

impl<I: EventInjector> Dispatcher<I> {
    pub fn new(injector: I) -> Self {
        Self {
            injector,
            held: BTreeMap::new(),
            injection_warned: false,
        }
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn injector_mut(&mut self) -> &mut I {
        &mut self.injector
    }

    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held.contains_key(&button)
    }

    /// Held virtual mouse buttons with what pressed them
    pub fn held(&self) -> impl Iterator<Item = (MouseButton, Origin)> + '_ {
        self.held.iter().map(|(button, origin)| (*button, *origin))
    }

    /// Presses a virtual mouse button unless it is already held
    pub fn press_mouse(&mut self, button: MouseButton, origin: Origin) -> bool {
        if self.held.contains_key(&button) {
            return false;
        }
        self.held.insert(button, origin);
        self.inject(InjectedEvent::MouseButton {
            button,
            state: KeyState::Press,
        });
        true
    }

    pub fn release_mouse(&mut self, button: MouseButton) -> bool {
        if self.held.remove(&button).is_none() {
            return false;
        }
        self.inject(InjectedEvent::MouseButton {
            button,
            state: KeyState::Release,
        });
        true
    }

    /// Releases every held mouse button, one event each
    pub fn release_all(&mut self) -> usize {
        let held = std::mem::take(&mut self.held);
        for button in held.keys() {
            self.inject(InjectedEvent::MouseButton {
                button: *button,
                state: KeyState::Release,
            });
        }
        held.len()
    }

    /// Press edge of a resolved action
    ///
    /// Mode switching and overlay actions are handled by the engine and
    /// ignored here.
    pub fn begin(&mut self, host: &mut dyn Host, action: Action, origin: Origin) {
        if let Some(button) = mouse_button_for(action) {
            self.press_mouse(button, origin);
            return;
        }
        let context = host.edit_context();
        let operator = match action {
            Action::PivotPie => HostOperator::PieMenu(PieMenu::Pivot),
            Action::OrientationPie => HostOperator::PieMenu(PieMenu::Orientation),
            Action::Grab => HostOperator::Translate,
            Action::Rotate => HostOperator::Rotate,
            Action::Scale => HostOperator::Resize,
            Action::Extrude if context == EditContext::EditMesh => HostOperator::ExtrudeRegion,
            Action::Duplicate => HostOperator::DuplicateMove,
            Action::KeyframeAdd => HostOperator::KeyframeInsert,
            Action::KeyframeRemove => HostOperator::KeyframeDelete,
            Action::ModeToggleEdit => HostOperator::ToggleEditMode,
            Action::SelectAll => HostOperator::SelectAll(context.into()),
            Action::SelectNone => HostOperator::DeselectAll(context.into()),
            Action::NextFrame | Action::PrevFrame => {
                if host.window().is_none() {
                    debug!("No window, {} skipped", action);
                    return;
                }
                HostOperator::FrameOffset(if action == Action::NextFrame { 1 } else { -1 })
            }
            Action::NextKeyframe => HostOperator::KeyframeJump { next: true },
            Action::PrevKeyframe => HostOperator::KeyframeJump { next: false },
            Action::Delete if context == EditContext::Object => HostOperator::DeleteObjects,
            Action::Delete if context == EditContext::EditMesh => HostOperator::DeleteVertices,
            Action::ViewLeft => HostOperator::ViewPreset(ViewPreset::Left),
            Action::ViewRight => HostOperator::ViewPreset(ViewPreset::Right),
            Action::ViewTop => HostOperator::ViewPreset(ViewPreset::Top),
            Action::ViewBottom => HostOperator::ViewPreset(ViewPreset::Bottom),
            Action::ViewFront => HostOperator::ViewPreset(ViewPreset::Front),
            Action::ViewBack => HostOperator::ViewPreset(ViewPreset::Back),
            Action::ViewCamera => HostOperator::ViewCamera,
            Action::ViewPerspective => HostOperator::TogglePerspective,
            Action::Extrude => return self.tap(Key::Char('E')),
            Action::Delete => return self.tap(Key::Delete),
            Action::Copy => return self.chord(&[Key::LeftCtrl, Key::Char('C')]),
            Action::Paste => return self.chord(&[Key::LeftCtrl, Key::Char('V')]),
            Action::ConstraintX => return self.tap(Key::Char('X')),
            Action::ConstraintY => return self.tap(Key::Char('Y')),
            Action::ConstraintZ => return self.tap(Key::Char('Z')),
            Action::PlaneX => return self.chord(&[Key::LeftShift, Key::Char('X')]),
            Action::PlaneY => return self.chord(&[Key::LeftShift, Key::Char('Y')]),
            Action::PlaneZ => return self.chord(&[Key::LeftShift, Key::Char('Z')]),
            Action::ZeroKey => return self.tap(Key::Char('0')),
            Action::MouseWheelUp => return self.wheel(WheelDirection::Up),
            Action::MouseWheelDown => return self.wheel(WheelDirection::Down),
            Action::None
            | Action::MouseLeft
            | Action::MouseRight
            | Action::NextMode
            | Action::PrevMode
            | Action::TempModeShift
            | Action::ToggleOverlay
            | Action::ShowOverlay => return,
        };
        run_operator(host, operator);
    }

    /// Release edge of a resolved action, only mouse buttons are holdable
    pub fn end(&mut self, action: Action) {
        if let Some(button) = mouse_button_for(action) {
            self.release_mouse(button);
        }
    }

    pub fn mouse_move(&mut self, delta: IVec2) {
        self.inject(InjectedEvent::MouseMove {
            dx: delta.x,
            dy: delta.y,
        });
    }

    pub fn wheel(&mut self, direction: WheelDirection) {
        self.inject(InjectedEvent::Wheel(direction));
    }

    pub fn tap(&mut self, key: Key) {
        self.key(key, KeyState::Press);
        self.key(key, KeyState::Release);
    }

    /// Modifiers down in order, tap the last key, modifiers up in reverse
    pub fn chord(&mut self, keys: &[Key]) {
        let Some((primary, modifiers)) = keys.split_last() else {
            return;
        };
        for modifier in modifiers {
            self.key(*modifier, KeyState::Press);
        }
        self.tap(*primary);
        for modifier in modifiers.iter().rev() {
            self.key(*modifier, KeyState::Release);
        }
    }

    fn key(&mut self, key: Key, state: KeyState) {
        self.inject(InjectedEvent::Key { key, state });
    }

    fn inject(&mut self, event: InjectedEvent) {
        if self.injector.inject(&event) {
            return;
        }
        if !self.injection_warned {
            self.injection_warned = true;
            warn!("Event injection unavailable, synthetic input is dropped");
        }
    }
}
