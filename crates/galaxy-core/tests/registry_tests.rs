// Host-side tests for the error registry and the fallback policy:
// every injected failure yields a renderable artifact plus exactly one
// appended report.

use std::cell::Cell;
use std::rc::Rc;

use galaxy_core::{
    shared_registry, BodyGenerator, DeviceProbe, DeviceProfiler, ErrorKind, ErrorRegistry,
    FallbackPolicy, MaterialKind, MaterialState, Severity, ShaderStage, TextureProvider,
    TrackRecord,
};
use instant::{Duration, Instant};

fn make_track(id: &str) -> TrackRecord {
    TrackRecord {
        id: id.to_owned(),
        title: format!("{id} title"),
        artist: "Artist".to_owned(),
        album: String::new(),
        genre: "rock".to_owned(),
        duration_sec: 200,
        popularity: 50,
        bpm: None,
        energy: None,
    }
}

fn make_policy() -> (FallbackPolicy, galaxy_core::SharedRegistry, Rc<DeviceProfiler>) {
    let registry = shared_registry();
    let profiler = Rc::new(DeviceProfiler::new(DeviceProbe::default()));
    let policy = FallbackPolicy::new(registry.clone(), profiler.clone());
    (policy, registry, profiler)
}

#[test]
fn shader_failure_yields_flat_material_and_one_report() {
    let (policy, registry, _) = make_policy();
    let track = make_track("shader-1");
    let material = policy.report_shader_failure(
        ShaderStage::Fragment,
        galaxy_core::CRYSTAL_WGSL,
        "compile error: syntax",
        MaterialKind::Crystal,
        &track,
    );
    assert_eq!(material.state, MaterialState::FallbackFlat);
    assert!(!material.animated);
    let registry = registry.borrow();
    assert_eq!(registry.len(), 1, "exactly one report appended");
    let report = registry.latest().unwrap();
    assert_eq!(report.kind, ErrorKind::ShaderCompile);
    assert!(report.fallback_applied);
}

#[test]
fn texture_failure_yields_procedural_fallback_and_one_report() {
    let (policy, registry, _) = make_policy();
    let track = make_track("tex-1");
    let texture = policy.report_texture_failure("https://art/cover.png", "404", &track);
    assert!(texture.size >= 8);
    assert_eq!(texture.pixels.len(), (texture.size * texture.size * 4) as usize);
    assert_eq!(registry.borrow().len(), 1);
    assert_eq!(
        registry.borrow().latest().unwrap().kind,
        ErrorKind::TextureLoad
    );

    // Per-track stability and distinguishability.
    let again = policy.report_texture_failure("https://art/cover.png", "404", &track);
    assert_eq!(texture, again, "fallback art is stable per track");
    let other = policy.report_texture_failure("https://art/other.png", "404", &make_track("tex-2"));
    assert_ne!(texture, other, "fallback art differs across tracks");
}

#[test]
fn geometry_failure_yields_safe_solid_and_one_report() {
    let (policy, registry, _) = make_policy();
    let generator = BodyGenerator::new(registry.clone());
    let track = make_track("geo-1");
    let geometry = policy.report_geometry_failure(&generator, "mesh build panicked", &track);
    geometry.validate().expect("fallback geometry must render");
    assert_eq!(registry.borrow().len(), 1);
    assert_eq!(
        registry.borrow().latest().unwrap().kind,
        ErrorKind::GeometryGeneration
    );
}

#[test]
fn ring_buffer_evicts_oldest() {
    let mut registry = ErrorRegistry::with_capacity(4);
    for i in 0..6 {
        registry.report(
            ErrorKind::TextureLoad,
            Severity::Low,
            format!("report {i}"),
            false,
        );
    }
    assert_eq!(registry.len(), 4);
    let first = registry.reports().next().unwrap();
    assert_eq!(first.message, "report 2", "oldest entries evicted");
    assert_eq!(registry.latest().unwrap().message, "report 5");
}

#[test]
fn notification_fires_at_high_severity_only() {
    let mut registry = ErrorRegistry::new();
    let calls = Rc::new(Cell::new(0));
    let calls_cb = calls.clone();
    registry.set_notification_callback(Box::new(move |_| {
        calls_cb.set(calls_cb.get() + 1);
    }));

    registry.report(ErrorKind::TextureLoad, Severity::Low, "low", false);
    registry.report(ErrorKind::TextureLoad, Severity::Medium, "medium", false);
    assert_eq!(calls.get(), 0, "below threshold");

    registry.report(ErrorKind::ShaderCompile, Severity::High, "high", true);
    registry.report(ErrorKind::GpuContextLost, Severity::Critical, "critical", true);
    assert_eq!(calls.get(), 2);
}

#[test]
fn two_consecutive_high_warnings_escalate_once() {
    let (policy, _, profiler) = make_policy();
    assert!(!profiler.performance_mode());

    // High severity requires value >= 2x threshold.
    assert!(!policy.report_performance_warning("frame-time", 16.0, 40.0));
    assert!(
        policy.report_performance_warning("frame-time", 16.0, 44.0),
        "second consecutive high warning escalates"
    );
    assert!(profiler.performance_mode());

    // Idempotent: further warnings never re-escalate.
    assert!(!policy.report_performance_warning("frame-time", 16.0, 50.0));
    assert!(profiler.performance_mode());
}

#[test]
fn medium_warnings_break_the_escalation_chain() {
    let (policy, _, profiler) = make_policy();
    assert!(!policy.report_performance_warning("frame-time", 16.0, 40.0));
    // Mild overrun resets the consecutive-high counter.
    assert!(!policy.report_performance_warning("frame-time", 16.0, 20.0));
    assert!(!policy.report_performance_warning("frame-time", 16.0, 40.0));
    assert!(!profiler.performance_mode(), "chain was broken in between");
}

#[test]
fn context_loss_forces_performance_mode_and_allows_one_retry() {
    let (policy, registry, profiler) = make_policy();
    policy.report_context_loss();
    assert!(registry.borrow().context_lost());
    assert!(profiler.performance_mode());
    assert!(
        !registry.borrow_mut().take_shader_retry(),
        "no retry while lost"
    );

    policy.mark_context_restored();
    assert!(!registry.borrow().context_lost());
    assert!(registry.borrow_mut().take_shader_retry(), "one retry granted");
    assert!(
        !registry.borrow_mut().take_shader_retry(),
        "retry is single-use"
    );
}

#[test]
fn texture_loads_race_the_deadline() {
    let registry = shared_registry();
    let profiler = DeviceProfiler::new(DeviceProbe::default());
    let mut textures = TextureProvider::new(registry.clone(), profiler.texture_quality());

    textures.begin_load("https://art/a.png", 11);
    textures.begin_load("https://art/b.png", 22);
    assert_eq!(textures.pending_count(), 2);

    // Nothing resolves before the deadline.
    assert!(textures.tick(Instant::now()).is_empty());

    // Host completes one load successfully.
    let loaded = galaxy_core::procedural_fallback_texture(99, profiler.texture_quality());
    let resolved = textures
        .complete_load("https://art/a.png", Ok(loaded))
        .expect("known url");
    assert!(!resolved.fallback);
    assert_eq!(registry.borrow().len(), 0, "success reports nothing");

    // The other load times out and resolves to the fallback.
    let late = Instant::now() + Duration::from_secs(9);
    let timed_out = textures.tick(late);
    assert_eq!(timed_out.len(), 1);
    assert!(timed_out[0].fallback);
    assert_eq!(timed_out[0].track_seed, 22);
    assert_eq!(textures.pending_count(), 0, "never left pending");
    assert_eq!(registry.borrow().len(), 1);
}
