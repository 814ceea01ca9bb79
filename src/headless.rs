//! Headless host for running the engine without a 3D application
//!
//! Camera operations drive a [`ViewState`], view presets and the edit toggle
//! change local state, everything else is logged. Injected events are logged
//! instead of reaching a window system.

use crate::mapping::cursor::WindowInfo;
use crate::mapping::dispatch::{
    EditContext, EventInjector, Host, HostError, HostOperator, InjectedEvent, ViewPreset, Viewport,
};
use crate::mapping::view::ViewState;
use glam::Quat;
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::{debug, info};

#[derive(Debug)]
pub struct HeadlessHost {
    pub window: Option<WindowInfo>,
    pub view: ViewState,
    pub context: EditContext,
    pub perspective: bool,
    pub overlay: bool,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            window: Some(WindowInfo {
                id: 0,
                width: 1920,
                height: 1080,
            }),
            view: ViewState::default(),
            context: EditContext::Object,
            perspective: true,
            overlay: false,
        }
    }
}

/// Orientation looking along the preset's axis, top looks down -Z
pub fn preset_rotation(preset: ViewPreset) -> Quat {
    let front = Quat::from_rotation_x(FRAC_PI_2);
    match preset {
        ViewPreset::Top => Quat::IDENTITY,
        ViewPreset::Bottom => Quat::from_rotation_x(PI),
        ViewPreset::Front => front,
        ViewPreset::Back => Quat::from_rotation_z(PI) * front,
        ViewPreset::Right => Quat::from_rotation_z(FRAC_PI_2) * front,
        ViewPreset::Left => Quat::from_rotation_z(-FRAC_PI_2) * front,
    }
}

impl Host for HeadlessHost {
    fn window(&self) -> Option<WindowInfo> {
        self.window
    }

    fn viewport(&mut self) -> Option<&mut dyn Viewport> {
        Some(&mut self.view)
    }

    fn edit_context(&self) -> EditContext {
        self.context
    }

    fn invoke(&mut self, operator: HostOperator) -> Result<(), HostError> {
        match operator {
            HostOperator::ViewPreset(preset) => {
                self.view.rotation = preset_rotation(preset);
            }
            HostOperator::TogglePerspective => self.perspective = !self.perspective,
            HostOperator::ToggleEditMode => {
                self.context = match self.context {
                    EditContext::EditMesh => EditContext::Object,
                    _ => EditContext::EditMesh,
                };
            }
            HostOperator::ExtrudeRegion | HostOperator::DeleteVertices
                if self.context != EditContext::EditMesh =>
            {
                return Err(HostError::Unavailable(operator));
            }
            _ => {}
        }
        info!("Operator {:?}", operator);
        Ok(())
    }

    fn overlay_visible(&self) -> bool {
        self.overlay
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        debug!("Overlay visible: {}", visible);
        self.overlay = visible;
    }

    fn redraw_indicators(&mut self) {
        debug!("Mode indicators redrawn");
    }
}

/// Logs synthetic input instead of delivering it
#[derive(Debug, Default)]
pub struct LogInjector {
    pub delivered: usize,
}

impl EventInjector for LogInjector {
    fn inject(&mut self, event: &InjectedEvent) -> bool {
        match event {
            InjectedEvent::MouseMove { .. } => debug!("Inject {:?}", event),
            _ => info!("Inject {:?}", event),
        }
        self.delivered += 1;
        true
    }
}
