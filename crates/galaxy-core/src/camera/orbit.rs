//! Damped orbit around the galaxy origin.

use glam::Vec3;

use crate::constants::{
    CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_PITCH_MAX, CAMERA_PITCH_MIN,
    DRAG_SENSITIVITY, ORBIT_SMOOTHING,
};

#[derive(Clone, Debug)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    target_yaw: f32,
    target_pitch: f32,
    target_distance: f32,
    dragging: bool,
}

impl OrbitState {
    pub fn new(yaw: f32, pitch: f32, distance: f32) -> Self {
        let pitch = pitch.clamp(CAMERA_PITCH_MIN, CAMERA_PITCH_MAX);
        let distance = distance.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        Self {
            yaw,
            pitch,
            distance,
            target_yaw: yaw,
            target_pitch: pitch,
            target_distance: distance,
            dragging: false,
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer delta in pixels while dragging.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.dragging {
            return;
        }
        self.target_yaw += dx * DRAG_SENSITIVITY;
        self.target_pitch =
            (self.target_pitch + dy * DRAG_SENSITIVITY).clamp(CAMERA_PITCH_MIN, CAMERA_PITCH_MAX);
    }

    /// Wheel zoom scales the orbit radius within the distance clamps.
    pub fn zoom(&mut self, scale: f32) {
        self.target_distance =
            (self.target_distance * scale).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    /// Exponential approach toward the drag targets.
    pub fn tick(&mut self, dt: f32) {
        let alpha = (1.0 - (-ORBIT_SMOOTHING * dt).exp()).clamp(0.0, 1.0);
        self.yaw += (self.target_yaw - self.yaw) * alpha;
        self.pitch += (self.target_pitch - self.pitch) * alpha;
        self.distance += (self.target_distance - self.distance) * alpha;
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }
}
