// Host-side tests for the galaxy assembly: track-set reconciliation,
// quality downgrades, and the simulated context-loss scenario.

use galaxy_core::{
    ComplexityTier, DeviceProbe, FocusPhase, Galaxy, MaterialState, TrackRecord,
};
use glam::Vec3;

const FRAME_DT: f32 = 1.0 / 60.0;

fn make_track(id: &str, genre: &str) -> TrackRecord {
    TrackRecord {
        id: id.to_owned(),
        title: format!("{id} title"),
        artist: "Artist".to_owned(),
        album: String::new(),
        genre: genre.to_owned(),
        duration_sec: 240,
        popularity: 60,
        bpm: Some(120.0),
        energy: Some(0.6),
    }
}

fn make_galaxy(tracks: &[TrackRecord]) -> Galaxy {
    let mut galaxy = Galaxy::new(DeviceProbe::default());
    galaxy.sync_tracks(tracks);
    for (i, track) in tracks.iter().enumerate() {
        galaxy.set_body_position(&track.id, Vec3::new(8.0 + i as f32 * 4.0, 0.0, 0.0));
    }
    galaxy
}

fn tick_until(galaxy: &mut Galaxy, phase: FocusPhase) {
    for _ in 0..600 {
        galaxy.tick(FRAME_DT);
        if galaxy.camera().phase() == phase {
            return;
        }
    }
    panic!("never reached {phase:?}");
}

#[test]
fn sync_creates_one_body_per_track() {
    let tracks = vec![
        make_track("t1", "rock"),
        make_track("t2", "jazz"),
        make_track("t3", "metal"),
    ];
    let galaxy = make_galaxy(&tracks);
    assert_eq!(galaxy.body_count(), 3);
    // Default probe is Medium: bodies start at the Medium tier.
    for body in galaxy.bodies() {
        assert_eq!(body.tier, ComplexityTier::Medium);
        assert_eq!(body.geometry.vertex_count(), 42);
        assert_eq!(body.material.state, MaterialState::ShaderActive);
        assert!(!body.disposed());
    }
}

#[test]
fn sync_disposes_bodies_for_tracks_that_left() {
    let tracks = vec![make_track("t1", "rock"), make_track("t2", "jazz")];
    let mut galaxy = make_galaxy(&tracks);
    assert_eq!(galaxy.body_count(), 2);

    galaxy.set_hovered(Some("t2"));
    galaxy.sync_tracks(&tracks[..1]);
    assert_eq!(galaxy.body_count(), 1);
    assert!(galaxy.body("t2").is_none());
    assert!(galaxy.body("t1").is_some());
    assert_eq!(galaxy.hovered(), None, "stale hover cleared");

    // Re-entering a track regenerates the identical body.
    let before = galaxy.body("t1").unwrap().geometry.positions.clone();
    galaxy.sync_tracks(&tracks);
    assert_eq!(galaxy.body_count(), 2);
    assert_eq!(galaxy.body("t1").unwrap().geometry.positions, before);
}

#[test]
fn downgrade_regenerates_at_lower_tier_keeping_positions() {
    let tracks = vec![make_track("t1", "rock")];
    let mut galaxy = make_galaxy(&tracks);
    let before = galaxy.body("t1").unwrap();
    assert_eq!(before.tier, ComplexityTier::Medium);
    let position = before.position;

    galaxy.downgrade_quality();
    let after = galaxy.body("t1").unwrap();
    assert_eq!(after.tier, ComplexityTier::Low);
    assert_eq!(after.geometry.vertex_count(), 12);
    assert_eq!(after.position, position, "layout survives regeneration");

    // Saturates at UltraLow.
    for _ in 0..4 {
        galaxy.downgrade_quality();
    }
    assert_eq!(galaxy.body("t1").unwrap().tier, ComplexityTier::UltraLow);
}

#[test]
fn escalated_performance_warnings_downgrade_every_body() {
    let tracks = vec![make_track("t1", "rock"), make_track("t2", "pop")];
    let mut galaxy = make_galaxy(&tracks);

    galaxy.report_performance_warning("frame-time-ms", 16.0, 40.0);
    for body in galaxy.bodies() {
        assert_eq!(body.tier, ComplexityTier::Medium, "one warning is not enough");
    }
    galaxy.report_performance_warning("frame-time-ms", 16.0, 40.0);
    for body in galaxy.bodies() {
        assert_eq!(body.tier, ComplexityTier::Low);
    }
    assert!(galaxy.profiler().performance_mode());
}

#[test]
fn context_loss_while_focused_recovers_safely() {
    // Simulated GPU context loss while Focused on a body.
    let tracks = vec![make_track("x", "metal")];
    let mut galaxy = make_galaxy(&tracks);

    galaxy.focus_track("x").expect("focus accepted");
    tick_until(&mut galaxy, FocusPhase::Focused);
    assert_eq!(galaxy.focus_state().target_track.as_deref(), Some("x"));

    galaxy.handle_context_loss();
    // Forced toward a safe state with input restored.
    assert_eq!(galaxy.camera().phase(), FocusPhase::Idle);
    assert!(!galaxy.camera().input_lock().is_locked());
    assert!(galaxy.profiler().performance_mode());
    // Regenerated bodies carry the flat fallback material while lost.
    assert_eq!(
        galaxy.body("x").unwrap().material.state,
        MaterialState::FallbackFlat
    );

    // Focus is rejected until the context is marked restored.
    assert!(galaxy.focus_track("x").is_none());
    galaxy.handle_context_restored();
    // Performance mode was loss-driven, not escalation-driven: it lifts,
    // and the single shader retry swaps materials back to shader-active.
    assert!(!galaxy.profiler().performance_mode());
    assert_eq!(
        galaxy.body("x").unwrap().material.state,
        MaterialState::ShaderActive
    );
    assert!(galaxy.focus_track("x").is_some(), "focus succeeds after restore");
}

#[test]
fn focus_on_unknown_track_is_rejected() {
    let mut galaxy = make_galaxy(&[make_track("t1", "rock")]);
    assert!(galaxy.focus_track("nope").is_none());
    assert_eq!(galaxy.camera().phase(), FocusPhase::Idle);
}

#[test]
fn dispose_releases_every_body() {
    let tracks = vec![make_track("t1", "rock"), make_track("t2", "jazz")];
    let mut galaxy = make_galaxy(&tracks);
    galaxy.focus_track("t1");
    galaxy.dispose();
    assert_eq!(galaxy.body_count(), 0);
    assert_eq!(galaxy.camera().phase(), FocusPhase::Idle);
}

#[test]
fn error_reports_are_queryable_through_the_galaxy() {
    let mut galaxy = make_galaxy(&[make_track("t1", "rock")]);
    assert!(galaxy.error_reports().is_empty());
    galaxy.report_performance_warning("draw-calls", 100.0, 250.0);
    let reports = galaxy.error_reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].message.contains("draw-calls"));
}
