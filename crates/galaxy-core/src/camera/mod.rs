//! Camera choreography: free orbit, inertial free-look, and the focus
//! state machine, advanced by a single per-frame tick.

mod easing;
mod focus;
mod freelook;
mod orbit;

pub use easing::Easing;
pub use focus::{
    CameraPose, DofSettings, FocusAnimation, FocusConfig, FocusEvent, FocusOutcome, FocusPhase,
};
pub use freelook::FreeLookState;
pub use orbit::OrbitState;

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;

use crate::constants::CAMERA_DEFAULT_DISTANCE;
use crate::events::FocusObserver;
use crate::registry::{ErrorKind, Severity, SharedRegistry};

use self::focus::FocusMachine;

/// Shared token other components check to suspend interaction while a
/// camera animation owns the pose.
#[derive(Clone, Default)]
pub struct InputLock(Rc<Cell<bool>>);

impl InputLock {
    pub fn is_locked(&self) -> bool {
        self.0.get()
    }

    fn set(&self, locked: bool) {
        self.0.set(locked);
    }
}

/// Snapshot of the focus state machine for the UI layer.
#[derive(Clone, Debug)]
pub struct FocusSnapshot {
    pub phase: FocusPhase,
    pub target_track: Option<String>,
    pub saved_pose: Option<CameraPose>,
    pub elapsed: f32,
}

/// User-togglable interaction mode while Idle.
enum CameraMode {
    Orbit(OrbitState),
    FreeLook(FreeLookState),
}

pub struct CameraController {
    mode: CameraMode,
    machine: FocusMachine,
    pose: CameraPose,
    registry: SharedRegistry,
    observers: Vec<Rc<dyn FocusObserver>>,
    input_lock: InputLock,
    last_pointer: Option<(f32, f32)>,
    disposed: bool,
}

impl CameraController {
    pub fn new(registry: SharedRegistry) -> Self {
        Self::with_config(registry, FocusConfig::default())
    }

    pub fn with_config(registry: SharedRegistry, config: FocusConfig) -> Self {
        let orbit = OrbitState::new(0.0, 0.35, CAMERA_DEFAULT_DISTANCE);
        let pose = CameraPose::new(orbit.eye(), Vec3::ZERO);
        Self {
            mode: CameraMode::Orbit(orbit),
            machine: FocusMachine::new(config),
            pose,
            registry,
            observers: Vec::new(),
            input_lock: InputLock::default(),
            last_pointer: None,
            disposed: false,
        }
    }

    pub fn add_observer(&mut self, observer: Rc<dyn FocusObserver>) {
        self.observers.push(observer);
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn phase(&self) -> FocusPhase {
        self.machine.phase()
    }

    pub fn dof(&self) -> DofSettings {
        self.machine.dof()
    }

    pub fn input_lock(&self) -> InputLock {
        self.input_lock.clone()
    }

    pub fn focus_snapshot(&self) -> FocusSnapshot {
        FocusSnapshot {
            phase: self.machine.phase(),
            target_track: self.machine.target_track().map(str::to_owned),
            saved_pose: self.machine.saved_pose(),
            elapsed: self.machine.elapsed(),
        }
    }

    pub fn orbit_mode(&self) -> bool {
        matches!(self.mode, CameraMode::Orbit(_))
    }

    /// Switch between orbit and free-look, keeping the current spherical
    /// coordinates so the camera does not jump.
    pub fn toggle_mode(&mut self) {
        self.mode = match &self.mode {
            CameraMode::Orbit(o) => {
                CameraMode::FreeLook(FreeLookState::new(o.yaw, o.pitch, o.distance))
            }
            CameraMode::FreeLook(f) => {
                CameraMode::Orbit(OrbitState::new(f.yaw, f.pitch, f.distance))
            }
        };
    }

    // ---------------- User input ----------------

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.input_lock.is_locked() {
            return;
        }
        self.last_pointer = Some((x, y));
        match &mut self.mode {
            CameraMode::Orbit(o) => o.begin_drag(),
            CameraMode::FreeLook(f) => f.begin_drag(),
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, dt: f32) {
        if self.input_lock.is_locked() {
            self.last_pointer = Some((x, y));
            return;
        }
        let Some((px, py)) = self.last_pointer else {
            self.last_pointer = Some((x, y));
            return;
        };
        let (dx, dy) = (x - px, y - py);
        self.last_pointer = Some((x, y));
        match &mut self.mode {
            CameraMode::Orbit(o) => o.drag(dx, dy),
            CameraMode::FreeLook(f) => f.drag(dx, dy, dt),
        }
    }

    pub fn pointer_up(&mut self) {
        match &mut self.mode {
            CameraMode::Orbit(o) => o.end_drag(),
            CameraMode::FreeLook(f) => f.end_drag(),
        }
        self.last_pointer = None;
    }

    pub fn wheel(&mut self, delta: f32) {
        if self.input_lock.is_locked() {
            return;
        }
        // Positive delta zooms in.
        let scale = (1.0 - delta * 0.1).clamp(0.5, 2.0);
        match &mut self.mode {
            CameraMode::Orbit(o) => o.zoom(scale),
            CameraMode::FreeLook(f) => f.zoom(scale),
        }
    }

    // ---------------- Focus choreography ----------------

    /// Fly to a body. Legal only from Idle; otherwise a warning and no
    /// state change. Rejected while the GPU context is lost.
    pub fn focus(
        &mut self,
        track_id: &str,
        body_position: Vec3,
        body_radius: f32,
    ) -> Option<FocusAnimation> {
        if self.machine.phase() != FocusPhase::Idle {
            log::warn!(
                "focus({track_id}) ignored: already {:?}",
                self.machine.phase()
            );
            return None;
        }
        if self.registry.borrow().context_lost() {
            log::warn!("focus({track_id}) ignored: gpu context lost");
            return None;
        }
        let animation =
            self.machine
                .begin_focus(self.pose, body_position, body_radius, track_id.to_owned());
        self.input_lock.set(true);
        for observer in &self.observers {
            observer.on_focus_start(track_id);
        }
        Some(animation)
    }

    /// Fly back to the saved pose. Legal only from Focused.
    pub fn exit_focus(&mut self) -> Option<FocusAnimation> {
        if self.machine.phase() != FocusPhase::Focused {
            log::warn!("exit_focus ignored: phase {:?}", self.machine.phase());
            return None;
        }
        let animation = self.machine.begin_return(self.pose);
        for observer in &self.observers {
            observer.on_return_start();
        }
        Some(animation)
    }

    /// Force the controller back to user control, cancelling any flight.
    /// Used on context loss; input is never left locked.
    pub fn abort_to_idle(&mut self) {
        self.machine.abort();
        self.input_lock.set(false);
        self.sync_mode_to_pose();
    }

    /// Per-frame advance of whichever state owns the pose.
    pub fn tick(&mut self, dt: f32) {
        if self.disposed {
            return;
        }
        match self.machine.phase() {
            FocusPhase::Focusing | FocusPhase::Returning => {
                let (pose, event) = self.machine.tick(dt);
                if let Some(pose) = pose {
                    self.pose = pose;
                }
                match event {
                    Some(FocusEvent::FocusComplete(track)) => {
                        // Parked near the target; input stays suspended
                        // until an explicit exit.
                        for observer in &self.observers {
                            observer.on_focus_complete(&track);
                        }
                    }
                    Some(FocusEvent::ReturnComplete) => {
                        self.input_lock.set(false);
                        self.sync_mode_to_pose();
                        for observer in &self.observers {
                            observer.on_return_complete();
                        }
                    }
                    Some(FocusEvent::Faulted) => {
                        self.registry.borrow_mut().report(
                            ErrorKind::Animation,
                            Severity::High,
                            "focus animation produced a non-finite pose; input restored",
                            false,
                        );
                        self.input_lock.set(false);
                        self.sync_mode_to_pose();
                    }
                    None => {}
                }
            }
            FocusPhase::Focused => {
                // Camera parked; nothing advances until exit_focus.
            }
            FocusPhase::Idle => {
                match &mut self.mode {
                    CameraMode::Orbit(o) => {
                        o.tick(dt);
                        self.pose = CameraPose::new(o.eye(), Vec3::ZERO);
                    }
                    CameraMode::FreeLook(f) => {
                        f.tick(dt);
                        self.pose = CameraPose::new(f.eye(), Vec3::ZERO);
                    }
                }
            }
        }
    }

    /// Drop pending animation state immediately; no callback may run after
    /// disposal.
    pub fn dispose(&mut self) {
        self.machine.abort();
        self.input_lock.set(false);
        self.observers.clear();
        self.disposed = true;
    }

    /// Re-derive the interaction mode's spherical coordinates from the
    /// current pose after an animation handed control back.
    fn sync_mode_to_pose(&mut self) {
        let eye = self.pose.eye;
        let distance = eye.length().max(1e-3);
        let pitch = (eye.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = eye.x.atan2(eye.z);
        self.mode = match &self.mode {
            CameraMode::Orbit(_) => CameraMode::Orbit(OrbitState::new(yaw, pitch, distance)),
            CameraMode::FreeLook(_) => {
                CameraMode::FreeLook(FreeLookState::new(yaw, pitch, distance))
            }
        };
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        if !self.disposed {
            self.machine.abort();
            self.input_lock.set(false);
        }
    }
}
