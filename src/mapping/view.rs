//! Orbit-style view state backed by `glam`
//!
//! The view is a pivot `location`, a `rotation` and a `distance` from the
//! pivot to the eye. The eye looks along `rotation * -Z`.

use crate::mapping::dispatch::Viewport;
use glam::{Quat, Vec3};

/// Angles at or below this magnitude are ignored
const ANGLE_EPSILON: f32 = 1e-5;

/// Radians per unit of roll input
pub const ROLL_SPEED: f32 = 0.05;

/// Closest the eye may get to the pivot
pub const MIN_DISTANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub location: Vec3,
    pub rotation: Quat,
    pub distance: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            distance: 10.0,
        }
    }
}

impl ViewState {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Eye position, `distance` behind the pivot
    pub fn eye(&self) -> Vec3 {
        self.location - self.forward() * self.distance
    }

    fn apply_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        if yaw.abs() > ANGLE_EPSILON {
            self.rotation = (Quat::from_axis_angle(Vec3::Z, yaw) * self.rotation).normalize();
        }
        if pitch.abs() > ANGLE_EPSILON {
            let right = (self.rotation * Vec3::X).normalize();
            self.rotation = (Quat::from_axis_angle(right, pitch) * self.rotation).normalize();
        }
    }
}

impl Viewport for ViewState {
    fn pan(&mut self, dx: f32, dy: f32, speed: f32) {
        let offset = Vec3::new(-dx, dy, 0.0) * speed;
        self.location += self.rotation * offset;
    }

    fn dolly(&mut self, amount: f32, speed: f32) {
        self.location += self.forward() * (amount * speed);
    }

    /// Turns the view around the pivot
    fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.apply_yaw_pitch(yaw, pitch);
    }

    /// Turns the view around the eye, moving the pivot instead
    fn rotate_in_place(&mut self, yaw: f32, pitch: f32) {
        let eye = self.eye();
        self.apply_yaw_pitch(yaw, pitch);
        self.location = eye + self.forward() * self.distance;
    }

    fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount)).max(MIN_DISTANCE);
    }

    fn roll(&mut self, amount: f32) {
        let angle = amount * ROLL_SPEED;
        if angle.abs() <= ANGLE_EPSILON {
            return;
        }
        let axis = self.forward().normalize();
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }
}
