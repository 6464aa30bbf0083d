//! Observer camera that slides along a fixed line of sight towards the plane.

use glam::{Mat4, Vec3};
use lodplane_plugin::FrameMatrices;

/// Closest the observer may get to the plane centre.
pub const MIN_DISTANCE: f32 = 0.25;
/// Farthest the observer may retreat.
pub const MAX_DISTANCE: f32 = 20.0;

const NEAR_PLANE: f32 = 0.01;
const FAR_PLANE: f32 = 100.0;

/// Which movement keys are currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementInput {
    pub toward: bool,
    pub away: bool,
}

impl MovementInput {
    /// -1 moves closer, +1 moves away, 0 when neither or both are held.
    pub fn direction(self) -> f32 {
        match (self.toward, self.away) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Camera orbiting `target` at `distance`, looking down at 45 degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverCamera {
    target: Vec3,
    distance: f32,
    speed: f32,
    fov_y: f32,
}

impl ObserverCamera {
    pub fn new(target: Vec3, distance: f32, speed: f32, fov_y_degrees: f32) -> Self {
        Self {
            target,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            speed,
            fov_y: fov_y_degrees.to_radians(),
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Move along the line of sight for `dt` seconds.
    pub fn advance(&mut self, input: MovementInput, dt: f32) {
        let step = input.direction() * self.speed * dt;
        self.distance = (self.distance + step).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(0.0, 1.0, 1.0).normalize() * self.distance;
        self.target + offset
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect_ratio.max(f32::EPSILON), NEAR_PLANE, FAR_PLANE)
    }

    /// Model is identity; the plane is authored in world space.
    pub fn frame_matrices(&self, aspect_ratio: f32) -> FrameMatrices {
        FrameMatrices::new(Mat4::IDENTITY, self.view(), self.projection(aspect_ratio))
    }
}
