//! Focus/return state machine: flies the camera to a selected body along a
//! cinematic arc and back to the pose saved on entry.
//!
//! Animations advance only through the per-frame tick; the returned
//! [`FocusAnimation`] is a future that resolves on the terminal frame, so
//! callers can await completion without any timer or polling loop.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::camera::easing::Easing;
use crate::constants::{
    DOF_STRENGTH, FOCUS_APPROACH_ANGLE, FOCUS_ARC_HEIGHT, FOCUS_DURATION_SEC,
    FOCUS_STANDOFF_MIN, FOCUS_STANDOFF_RADII, RETURN_DURATION_SEC,
};

/// Camera eye plus look-at target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    pub fn is_finite(&self) -> bool {
        self.eye.is_finite() && self.target.is_finite()
    }

    pub fn approx_eq(&self, other: &CameraPose, epsilon: f32) -> bool {
        (self.eye - other.eye).length() <= epsilon
            && (self.target - other.target).length() <= epsilon
    }
}

/// Depth-of-field parameters for the post-process stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DofSettings {
    pub enabled: bool,
    pub focus_distance: f32,
    pub strength: f32,
}

impl Default for DofSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            focus_distance: 0.0,
            strength: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusPhase {
    Idle,
    Focusing,
    Focused,
    Returning,
}

/// Durations, stand-off, and easing for the focus choreography.
#[derive(Clone, Copy, Debug)]
pub struct FocusConfig {
    pub standoff_radii: f32,
    pub standoff_min: f32,
    pub approach_angle: f32,
    pub focus_duration: f32,
    pub return_duration: f32,
    pub arc_height: f32,
    pub easing: Easing,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            standoff_radii: FOCUS_STANDOFF_RADII,
            standoff_min: FOCUS_STANDOFF_MIN,
            approach_angle: FOCUS_APPROACH_ANGLE,
            focus_duration: FOCUS_DURATION_SEC,
            return_duration: RETURN_DURATION_SEC,
            arc_height: FOCUS_ARC_HEIGHT,
            easing: Easing::CubicInOut,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    Completed,
    Cancelled,
    Faulted,
}

struct AnimationShared {
    outcome: Option<FocusOutcome>,
    waker: Option<Waker>,
}

/// Resolves on the terminal frame of the focus or return interpolation.
pub struct FocusAnimation {
    shared: Rc<RefCell<AnimationShared>>,
}

impl FocusAnimation {
    pub fn outcome(&self) -> Option<FocusOutcome> {
        self.shared.borrow().outcome
    }

    pub fn is_complete(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Future for FocusAnimation {
    type Output = FocusOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = self.shared.borrow_mut();
        match shared.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

fn new_animation() -> (FocusAnimation, Rc<RefCell<AnimationShared>>) {
    let shared = Rc::new(RefCell::new(AnimationShared {
        outcome: None,
        waker: None,
    }));
    (
        FocusAnimation {
            shared: shared.clone(),
        },
        shared,
    )
}

fn resolve(shared: &Rc<RefCell<AnimationShared>>, outcome: FocusOutcome) {
    let mut s = shared.borrow_mut();
    if s.outcome.is_none() {
        s.outcome = Some(outcome);
        if let Some(waker) = s.waker.take() {
            waker.wake();
        }
    }
}

/// Bezier flight path for the eye; the look-at target lerps.
struct FlightPath {
    start: CameraPose,
    end: CameraPose,
    /// 1-2 offset control points lift the path into an arc.
    controls: SmallVec<[Vec3; 2]>,
}

impl FlightPath {
    fn arc(start: CameraPose, end: CameraPose, arc_height: f32) -> Self {
        let travel = end.eye - start.eye;
        let distance = travel.length();
        let lift = distance * arc_height;
        let mut controls: SmallVec<[Vec3; 2]> = SmallVec::new();
        if distance > 25.0 {
            // Long flight: cubic arc with a lateral swing so the approach
            // curves around rather than over the field.
            let side = travel.cross(Vec3::Y).normalize_or_zero() * (distance * 0.12);
            controls.push(start.eye.lerp(end.eye, 0.33) + Vec3::Y * lift + side);
            controls.push(start.eye.lerp(end.eye, 0.66) + Vec3::Y * lift - side);
        } else {
            controls.push((start.eye + end.eye) * 0.5 + Vec3::Y * lift);
        }
        Self {
            start,
            end,
            controls,
        }
    }

    fn sample(&self, k: f32) -> CameraPose {
        let eye = match self.controls.len() {
            0 => self.start.eye.lerp(self.end.eye, k),
            1 => {
                let c = self.controls[0];
                let a = self.start.eye.lerp(c, k);
                let b = c.lerp(self.end.eye, k);
                a.lerp(b, k)
            }
            _ => {
                // Cubic bezier via de Casteljau.
                let c0 = self.controls[0];
                let c1 = self.controls[1];
                let a = self.start.eye.lerp(c0, k);
                let b = c0.lerp(c1, k);
                let c = c1.lerp(self.end.eye, k);
                let ab = a.lerp(b, k);
                let bc = b.lerp(c, k);
                ab.lerp(bc, k)
            }
        };
        CameraPose {
            eye,
            target: self.start.target.lerp(self.end.target, k),
        }
    }
}

struct ActiveFlight {
    path: FlightPath,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    shared: Rc<RefCell<AnimationShared>>,
}

/// Events surfaced by the per-frame tick for the controller to relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusEvent {
    FocusComplete(String),
    ReturnComplete,
    Faulted,
}

/// The focus/return state machine proper. Owned by the camera controller;
/// the UI layer reads phase and target through it.
pub struct FocusMachine {
    phase: FocusPhase,
    target_track: Option<String>,
    saved_pose: Option<CameraPose>,
    flight: Option<ActiveFlight>,
    dof: DofSettings,
    config: FocusConfig,
}

impl FocusMachine {
    pub fn new(config: FocusConfig) -> Self {
        Self {
            phase: FocusPhase::Idle,
            target_track: None,
            saved_pose: None,
            flight: None,
            dof: DofSettings::default(),
            config,
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn target_track(&self) -> Option<&str> {
        self.target_track.as_deref()
    }

    pub fn saved_pose(&self) -> Option<CameraPose> {
        self.saved_pose
    }

    pub fn dof(&self) -> DofSettings {
        self.dof
    }

    /// Seconds since the current phase was entered (animation phases only).
    pub fn elapsed(&self) -> f32 {
        self.flight.as_ref().map(|f| f.elapsed).unwrap_or(0.0)
    }

    /// Compute the cinematic focus pose for a body: stand off along the
    /// body's direction from the origin, rotated by the approach angle so
    /// the shot is not straight head-on.
    pub fn focus_pose(&self, body_position: Vec3, body_radius: f32) -> CameraPose {
        let standoff = (body_radius * self.config.standoff_radii).max(self.config.standoff_min);
        let out_dir = body_position.normalize_or_zero();
        let out_dir = if out_dir == Vec3::ZERO { Vec3::Z } else { out_dir };
        let approach = Quat::from_rotation_y(self.config.approach_angle) * out_dir;
        CameraPose {
            eye: body_position + approach * standoff,
            target: body_position,
        }
    }

    /// Start flying from `current` toward `body_position`. Caller has
    /// already verified phase == Idle.
    pub fn begin_focus(
        &mut self,
        current: CameraPose,
        body_position: Vec3,
        body_radius: f32,
        track_id: String,
    ) -> FocusAnimation {
        let end = self.focus_pose(body_position, body_radius);
        let (animation, shared) = new_animation();
        self.saved_pose = Some(current);
        self.target_track = Some(track_id);
        self.phase = FocusPhase::Focusing;
        self.dof = DofSettings {
            enabled: true,
            focus_distance: (end.eye - body_position).length(),
            strength: DOF_STRENGTH,
        };
        self.flight = Some(ActiveFlight {
            path: FlightPath::arc(current, end, self.config.arc_height),
            duration: self.config.focus_duration.max(1e-3),
            elapsed: 0.0,
            easing: self.config.easing,
            shared,
        });
        animation
    }

    /// Start flying back to the saved pose. Caller has already verified
    /// phase == Focused.
    pub fn begin_return(&mut self, current: CameraPose) -> FocusAnimation {
        let saved = self.saved_pose.unwrap_or(current);
        let (animation, shared) = new_animation();
        self.phase = FocusPhase::Returning;
        self.dof = DofSettings::default();
        self.flight = Some(ActiveFlight {
            path: FlightPath::arc(current, saved, self.config.arc_height * 0.5),
            duration: self.config.return_duration.max(1e-3),
            elapsed: 0.0,
            easing: self.config.easing,
            shared,
        });
        animation
    }

    /// Advance the active flight. Returns the sampled pose and, on a
    /// terminal frame, the transition event.
    pub fn tick(&mut self, dt: f32) -> (Option<CameraPose>, Option<FocusEvent>) {
        let Some(mut flight) = self.flight.take() else {
            return (None, None);
        };
        flight.elapsed += dt;
        let t = (flight.elapsed / flight.duration).min(1.0);
        let pose = flight.path.sample(flight.easing.apply(t));

        if !pose.is_finite() {
            // Recoverable but reported: restore input control, do not
            // guarantee pose correctness.
            resolve(&flight.shared, FocusOutcome::Faulted);
            self.phase = FocusPhase::Idle;
            self.target_track = None;
            self.dof = DofSettings::default();
            return (None, Some(FocusEvent::Faulted));
        }

        if t < 1.0 {
            self.flight = Some(flight);
            return (Some(pose), None);
        }

        // Terminal frame: snap exactly to the target pose to kill drift.
        let end = flight.path.end;
        resolve(&flight.shared, FocusOutcome::Completed);
        let event = match self.phase {
            FocusPhase::Focusing => {
                self.phase = FocusPhase::Focused;
                let track = self.target_track.clone().unwrap_or_default();
                Some(FocusEvent::FocusComplete(track))
            }
            FocusPhase::Returning => {
                self.phase = FocusPhase::Idle;
                self.target_track = None;
                self.saved_pose = None;
                Some(FocusEvent::ReturnComplete)
            }
            _ => None,
        };
        (Some(end), event)
    }

    /// Abandon any in-flight animation and return to Idle. Used on context
    /// loss and on disposal so no callback can fire afterwards.
    pub fn abort(&mut self) {
        if let Some(flight) = self.flight.take() {
            resolve(&flight.shared, FocusOutcome::Cancelled);
        }
        self.phase = FocusPhase::Idle;
        self.target_track = None;
        self.saved_pose = None;
        self.dof = DofSettings::default();
    }
}
