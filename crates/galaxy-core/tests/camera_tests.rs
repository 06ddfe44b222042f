// Host-side tests for the camera choreography state machine.

use std::cell::RefCell;
use std::rc::Rc;

use galaxy_core::{
    shared_registry, CameraController, Easing, FocusObserver, FocusOutcome, FocusPhase,
    FreeLookState,
};
use glam::{Vec2, Vec3};

const FRAME_DT: f32 = 1.0 / 60.0;

fn make_controller() -> CameraController {
    CameraController::new(shared_registry())
}

/// Tick until the state machine settles into `phase` (or panic).
fn tick_until(controller: &mut CameraController, phase: FocusPhase) {
    for _ in 0..600 {
        controller.tick(FRAME_DT);
        if controller.phase() == phase {
            return;
        }
    }
    panic!(
        "never reached {phase:?}, stuck in {:?}",
        controller.phase()
    );
}

#[test]
fn focus_is_only_legal_from_idle() {
    let mut controller = make_controller();
    assert_eq!(controller.phase(), FocusPhase::Idle);

    let first = controller.focus("track-a", Vec3::new(12.0, 0.0, 4.0), 1.2);
    assert!(first.is_some(), "focus from Idle must start an animation");
    assert_eq!(controller.phase(), FocusPhase::Focusing);

    // At most one focus animation in flight: rejected with no state change.
    let second = controller.focus("track-b", Vec3::new(-6.0, 2.0, 0.0), 1.0);
    assert!(second.is_none());
    assert_eq!(controller.phase(), FocusPhase::Focusing);
    assert_eq!(
        controller.focus_snapshot().target_track.as_deref(),
        Some("track-a")
    );

    tick_until(&mut controller, FocusPhase::Focused);
    let third = controller.focus("track-c", Vec3::ZERO, 1.0);
    assert!(third.is_none(), "focus while Focused must be ignored");
    assert_eq!(controller.phase(), FocusPhase::Focused);
}

#[test]
fn exit_focus_is_only_legal_from_focused() {
    let mut controller = make_controller();
    assert!(controller.exit_focus().is_none(), "no-op from Idle");

    controller.focus("track-a", Vec3::new(10.0, 0.0, 0.0), 1.0);
    assert!(controller.exit_focus().is_none(), "no-op while Focusing");

    tick_until(&mut controller, FocusPhase::Focused);
    let ret = controller.exit_focus();
    assert!(ret.is_some());
    assert_eq!(controller.phase(), FocusPhase::Returning);
    assert!(controller.exit_focus().is_none(), "no-op while Returning");
}

#[test]
fn completed_focus_parks_on_target_and_return_restores_pose() {
    let mut controller = make_controller();
    let saved = controller.pose();

    let animation = controller
        .focus("track-a", Vec3::new(14.0, 3.0, -2.0), 1.5)
        .expect("focus accepted");
    tick_until(&mut controller, FocusPhase::Focused);
    assert_eq!(animation.outcome(), Some(FocusOutcome::Completed));
    assert_eq!(
        controller.focus_snapshot().target_track.as_deref(),
        Some("track-a")
    );
    // Parked looking at the body.
    assert!((controller.pose().target - Vec3::new(14.0, 3.0, -2.0)).length() < 1e-4);

    let ret = controller.exit_focus().expect("exit accepted");
    tick_until(&mut controller, FocusPhase::Idle);
    assert_eq!(ret.outcome(), Some(FocusOutcome::Completed));
    assert!(controller.focus_snapshot().target_track.is_none());
    // Terminal frame snaps exactly; allow epsilon for the contract.
    assert!(
        controller.pose().approx_eq(&saved, 1e-3),
        "pose after return {:?} != saved {:?}",
        controller.pose(),
        saved
    );
}

#[test]
fn input_is_locked_during_choreography() {
    let mut controller = make_controller();
    let lock = controller.input_lock();
    assert!(!lock.is_locked());

    controller.focus("track-a", Vec3::new(8.0, 0.0, 0.0), 1.0);
    assert!(lock.is_locked(), "locked while Focusing");
    tick_until(&mut controller, FocusPhase::Focused);
    assert!(lock.is_locked(), "locked while Focused");

    controller.exit_focus();
    tick_until(&mut controller, FocusPhase::Idle);
    assert!(!lock.is_locked(), "unlocked after return completes");
}

#[test]
fn dof_follows_focus_state() {
    let mut controller = make_controller();
    assert!(!controller.dof().enabled);

    controller.focus("track-a", Vec3::new(9.0, 1.0, 0.0), 1.0);
    let dof = controller.dof();
    assert!(dof.enabled);
    assert!(dof.focus_distance > 0.0);
    assert!(dof.strength > 0.0);

    tick_until(&mut controller, FocusPhase::Focused);
    controller.exit_focus();
    assert!(!controller.dof().enabled, "dof disabled on return start");
}

#[test]
fn abort_cancels_the_pending_animation_and_unlocks() {
    let mut controller = make_controller();
    let lock = controller.input_lock();
    let animation = controller
        .focus("track-a", Vec3::new(8.0, 0.0, 0.0), 1.0)
        .expect("focus accepted");
    controller.tick(FRAME_DT);
    assert!(animation.outcome().is_none());

    controller.abort_to_idle();
    assert_eq!(controller.phase(), FocusPhase::Idle);
    assert_eq!(animation.outcome(), Some(FocusOutcome::Cancelled));
    assert!(!lock.is_locked(), "input never left locked");
}

#[test]
fn dispose_mid_animation_drops_pending_state() {
    let mut controller = make_controller();
    let animation = controller
        .focus("track-a", Vec3::new(8.0, 0.0, 0.0), 1.0)
        .expect("focus accepted");
    controller.dispose();
    assert_eq!(animation.outcome(), Some(FocusOutcome::Cancelled));
    // Ticking a disposed controller must not revive anything.
    controller.tick(FRAME_DT);
    assert_eq!(controller.phase(), FocusPhase::Idle);
}

#[test]
fn observers_see_the_full_choreography_in_order() {
    struct Recorder(Rc<RefCell<Vec<String>>>);
    impl FocusObserver for Recorder {
        fn on_focus_start(&self, track_id: &str) {
            self.0.borrow_mut().push(format!("focus-start:{track_id}"));
        }
        fn on_focus_complete(&self, track_id: &str) {
            self.0
                .borrow_mut()
                .push(format!("focus-complete:{track_id}"));
        }
        fn on_return_start(&self) {
            self.0.borrow_mut().push("return-start".to_owned());
        }
        fn on_return_complete(&self) {
            self.0.borrow_mut().push("return-complete".to_owned());
        }
    }

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut controller = make_controller();
    controller.add_observer(Rc::new(Recorder(events.clone())));

    controller.focus("track-a", Vec3::new(7.0, 0.0, 0.0), 1.0);
    tick_until(&mut controller, FocusPhase::Focused);
    controller.exit_focus();
    tick_until(&mut controller, FocusPhase::Idle);

    assert_eq!(
        *events.borrow(),
        vec![
            "focus-start:track-a",
            "focus-complete:track-a",
            "return-start",
            "return-complete",
        ]
    );
}

// ---------------- Inertial free-look ----------------

#[test]
fn inertia_decays_geometrically_per_frame() {
    let damping = 0.94_f32; // fixed per-frame damping factor
    let mut freelook = FreeLookState::new(0.0, 0.0, 20.0);
    let v0 = 1.2_f32;
    freelook.set_velocity(Vec2::new(v0, 0.0));

    for n in 1..=40 {
        freelook.tick(FRAME_DT);
        let expected = v0 * damping.powi(n);
        let actual = freelook.velocity().x;
        assert!(
            (actual - expected).abs() < 1e-4,
            "after {n} frames expected {expected}, got {actual}"
        );
    }
}

#[test]
fn inertia_snaps_to_exactly_zero_below_epsilon() {
    let mut freelook = FreeLookState::new(0.0, 0.0, 20.0);
    freelook.set_velocity(Vec2::new(2e-4, 0.0));
    for _ in 0..20 {
        freelook.tick(FRAME_DT);
    }
    assert_eq!(
        freelook.velocity(),
        Vec2::ZERO,
        "no infinite decay: velocity must reach exactly zero"
    );
}

#[test]
fn release_velocity_is_clamped_to_the_maximum() {
    let mut freelook = FreeLookState::new(0.0, 0.0, 20.0);
    freelook.set_velocity(Vec2::new(100.0, 0.0));
    assert!(freelook.velocity().length() <= 3.5 + 1e-5);
}

#[test]
fn zoom_respects_distance_clamps() {
    let mut freelook = FreeLookState::new(0.0, 0.0, 20.0);
    for _ in 0..100 {
        freelook.zoom(0.5);
    }
    assert!(freelook.distance >= 4.0, "min distance clamp");
    for _ in 0..100 {
        freelook.zoom(2.0);
    }
    assert!(freelook.distance <= 120.0, "max distance clamp");
}

// ---------------- Easing ----------------

#[test]
fn easing_endpoints_are_exact() {
    let all = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
    ];
    for easing in all {
        assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at t=0");
        assert!(
            (easing.apply(1.0) - 1.0).abs() < 1e-6,
            "{easing:?} at t=1 -> {}",
            easing.apply(1.0)
        );
        // Monotonic over a coarse sweep.
        let mut prev = 0.0;
        for step in 1..=20 {
            let v = easing.apply(step as f32 / 20.0);
            assert!(v >= prev - 1e-6, "{easing:?} not monotonic at step {step}");
            prev = v;
        }
    }
}
