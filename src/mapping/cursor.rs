//! Virtual cursor driven by a stick
//!
//! Stick deflection is converted into sub-pixel motion and accumulated;
//! whole pixels are emitted as relative moves and the fractional part is
//! carried to the next tick, so slow deflections still move the pointer.

use glam::{IVec2, Vec2};
use tracing::debug;

/// Converts the configured speed (0..1) into pixels per tick at full deflection
pub const CURSOR_SPEED_MULTIPLIER: f32 = 15.0;

/// Host window the pointer lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

impl WindowInfo {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// Who moved the pointer last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorOwner {
    #[default]
    Controller,
    Mouse,
}

#[derive(Debug, Default)]
pub struct CursorAccumulator {
    owner: CursorOwner,
    window: Option<u64>,
    position: Option<Vec2>,
    fractional: Vec2,
}

impl CursorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> CursorOwner {
        self.owner
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn fractional(&self) -> Vec2 {
        self.fractional
    }

    /// Recentres the pointer when the window changed or no position is known
    pub fn ensure_defaults(&mut self, window: &WindowInfo) {
        if self.window != Some(window.id) || self.position.is_none() {
            self.window = Some(window.id);
            self.position = Some(window.center());
            debug!("Virtual cursor centred in window {}", window.id);
        }
    }

    /// Accumulates one tick of deflection and returns the whole-pixel move, if any
    ///
    /// Positive `y` means stick up, which moves the pointer up the screen.
    pub fn accumulate(&mut self, window: &WindowInfo, x: f32, y: f32, speed: f32) -> Option<IVec2> {
        self.owner = CursorOwner::Controller;
        self.ensure_defaults(window);

        self.fractional += Vec2::new(x, -y) * speed * CURSOR_SPEED_MULTIPLIER;
        let whole = self.fractional.trunc();
        self.fractional -= whole;

        let delta = whole.as_ivec2();
        if delta == IVec2::ZERO {
            return None;
        }
        if let Some(position) = self.position.as_mut() {
            *position += whole;
        }
        Some(delta)
    }

    /// A real mouse moved; it owns the pointer until the stick moves again
    pub fn notify_mouse_move(&mut self, window: &WindowInfo, x: f32, y: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        self.owner = CursorOwner::Mouse;
        self.window = Some(window.id);
        self.position = Some(Vec2::new(x, y));
        self.fractional = Vec2::ZERO;
    }

    pub fn reset(&mut self) {
        self.owner = CursorOwner::Controller;
        self.fractional = Vec2::ZERO;
    }
}
