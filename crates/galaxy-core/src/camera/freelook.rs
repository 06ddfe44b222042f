//! Inertial free-look: drag imparts a decaying angular velocity instead of
//! binding the camera directly to the pointer.

use glam::{Vec2, Vec3};

use crate::constants::{
    CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_PITCH_MAX, CAMERA_PITCH_MIN,
    DRAG_SENSITIVITY, FREELOOK_DAMPING, FREELOOK_MAX_VELOCITY, FREELOOK_VELOCITY_EPSILON,
};

#[derive(Clone, Debug)]
pub struct FreeLookState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Radians per second, (yaw, pitch).
    velocity: Vec2,
    dragging: bool,
    /// Velocity sampled from the most recent drag motion.
    drag_velocity: Vec2,
}

impl FreeLookState {
    pub fn new(yaw: f32, pitch: f32, distance: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(CAMERA_PITCH_MIN, CAMERA_PITCH_MAX),
            distance: distance.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE),
            velocity: Vec2::ZERO,
            dragging: false,
            drag_velocity: Vec2::ZERO,
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.velocity = Vec2::ZERO;
        self.drag_velocity = Vec2::ZERO;
    }

    /// Release imparts the sampled drag velocity as inertia.
    pub fn end_drag(&mut self) {
        if self.dragging {
            self.dragging = false;
            self.velocity = clamp_velocity(self.drag_velocity);
            self.drag_velocity = Vec2::ZERO;
        }
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer delta in pixels over `dt` seconds while dragging. The camera
    /// follows the drag directly; the instantaneous angular velocity is
    /// remembered so release carries it over.
    pub fn drag(&mut self, dx: f32, dy: f32, dt: f32) {
        if !self.dragging {
            return;
        }
        let dyaw = dx * DRAG_SENSITIVITY;
        let dpitch = dy * DRAG_SENSITIVITY;
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(CAMERA_PITCH_MIN, CAMERA_PITCH_MAX);
        if dt > 1e-5 {
            self.drag_velocity = Vec2::new(dyaw / dt, dpitch / dt);
        }
    }

    pub fn zoom(&mut self, scale: f32) {
        self.distance = (self.distance * scale).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    /// Apply inertia: rotate by `velocity * dt`, then damp by a fixed factor
    /// per frame. Velocities below epsilon snap to exactly zero.
    pub fn tick(&mut self, dt: f32) {
        if self.dragging || self.velocity == Vec2::ZERO {
            return;
        }
        let v = clamp_velocity(self.velocity);
        self.yaw += v.x * dt;
        self.pitch = (self.pitch + v.y * dt).clamp(CAMERA_PITCH_MIN, CAMERA_PITCH_MAX);
        self.velocity = v * FREELOOK_DAMPING;
        if self.velocity.length() < FREELOOK_VELOCITY_EPSILON {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Test hook: set the release velocity directly.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = clamp_velocity(velocity);
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }
}

fn clamp_velocity(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > FREELOOK_MAX_VELOCITY {
        v * (FREELOOK_MAX_VELOCITY / len)
    } else {
        v
    }
}
