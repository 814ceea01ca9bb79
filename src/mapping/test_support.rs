//! Recording doubles for the engine's collaborators

use crate::mapping::cursor::WindowInfo;
use crate::mapping::dispatch::{
    EditContext, EventInjector, Host, HostError, HostOperator, InjectedEvent, KeyState,
    MouseButton, Viewport,
};

#[derive(Debug, Default)]
pub struct RecordingInjector {
    pub events: Vec<InjectedEvent>,
}

impl RecordingInjector {
    pub fn mouse_events(&self) -> Vec<(MouseButton, KeyState)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                InjectedEvent::MouseButton { button, state } => Some((*button, *state)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventInjector for RecordingInjector {
    fn inject(&mut self, event: &InjectedEvent) -> bool {
        self.events.push(*event);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCall {
    Pan(f32, f32, f32),
    Dolly(f32, f32),
    Orbit(f32, f32),
    Rotate(f32, f32),
    Zoom(f32),
}

#[derive(Debug, Default)]
pub struct RecordingViewport {
    pub calls: Vec<ViewCall>,
}

impl Viewport for RecordingViewport {
    fn pan(&mut self, dx: f32, dy: f32, speed: f32) {
        self.calls.push(ViewCall::Pan(dx, dy, speed));
    }

    fn dolly(&mut self, amount: f32, speed: f32) {
        self.calls.push(ViewCall::Dolly(amount, speed));
    }

    fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.calls.push(ViewCall::Orbit(yaw, pitch));
    }

    fn rotate_in_place(&mut self, yaw: f32, pitch: f32) {
        self.calls.push(ViewCall::Rotate(yaw, pitch));
    }

    fn zoom(&mut self, amount: f32) {
        self.calls.push(ViewCall::Zoom(amount));
    }
}

#[derive(Debug)]
pub struct RecordingHost {
    pub window: Option<WindowInfo>,
    pub view: Option<RecordingViewport>,
    pub context: EditContext,
    pub operators: Vec<HostOperator>,
    pub fail_operators: bool,
    pub overlay: bool,
    pub overlay_writes: usize,
    pub redraws: usize,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            window: Some(WindowInfo {
                id: 1,
                width: 800,
                height: 600,
            }),
            view: Some(RecordingViewport::default()),
            context: EditContext::Object,
            operators: Vec::new(),
            fail_operators: false,
            overlay: false,
            overlay_writes: 0,
            redraws: 0,
        }
    }
}

impl RecordingHost {
    pub fn view_calls(&self) -> &[ViewCall] {
        self.view.as_ref().map(|v| v.calls.as_slice()).unwrap_or(&[])
    }
}

impl Host for RecordingHost {
    fn window(&self) -> Option<WindowInfo> {
        self.window
    }

    fn viewport(&mut self) -> Option<&mut dyn Viewport> {
        self.view.as_mut().map(|v| v as &mut dyn Viewport)
    }

    fn edit_context(&self) -> EditContext {
        self.context
    }

    fn invoke(&mut self, operator: HostOperator) -> Result<(), HostError> {
        self.operators.push(operator);
        if self.fail_operators {
            Err(HostError::Unavailable(operator))
        } else {
            Ok(())
        }
    }

    fn overlay_visible(&self) -> bool {
        self.overlay
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay = visible;
        self.overlay_writes += 1;
    }

    fn redraw_indicators(&mut self) {
        self.redraws += 1;
    }
}
