// Host-side tests for deterministic body generation.

use galaxy_core::{
    profile_for_genre, shared_registry, BodyGenerator, ComplexityPolicy, ComplexityTier,
    TrackRecord,
};

fn make_track(id: &str, genre: &str, popularity: u8, duration_sec: u32) -> TrackRecord {
    TrackRecord {
        id: id.to_owned(),
        title: format!("{id} title"),
        artist: "Test Artist".to_owned(),
        album: "Test Album".to_owned(),
        genre: genre.to_owned(),
        duration_sec,
        popularity,
        bpm: None,
        energy: None,
    }
}

const ALL_TIERS: [ComplexityTier; 5] = [
    ComplexityTier::UltraLow,
    ComplexityTier::Low,
    ComplexityTier::Medium,
    ComplexityTier::High,
    ComplexityTier::UltraHigh,
];

#[test]
fn generation_is_deterministic_per_track_and_tier() {
    let generator = BodyGenerator::new(shared_registry());
    let track = make_track("det-1", "rock", 70, 240);
    for tier in ALL_TIERS {
        let a = generator.generate(&track, tier);
        let b = generator.generate(&track, tier);
        assert_eq!(
            a.positions, b.positions,
            "vertex positions differ at {tier:?}"
        );
        assert_eq!(a.indices, b.indices, "indices differ at {tier:?}");
        assert_eq!(
            a.pulse_phase, b.pulse_phase,
            "pulse phases differ at {tier:?}"
        );
        assert_eq!(
            a.bpm_multiplier, b.bpm_multiplier,
            "bpm multipliers differ at {tier:?}"
        );
        assert_eq!(
            a.original_position, b.original_position,
            "original positions differ at {tier:?}"
        );
    }
}

#[test]
fn generation_is_deterministic_across_generator_instances() {
    // A fresh generator (fresh registry, fresh everything) must reproduce
    // the same body: the only inputs are the track and the tier.
    let track = make_track("det-2", "jazz", 50, 300);
    let a = BodyGenerator::new(shared_registry()).generate(&track, ComplexityTier::Medium);
    let b = BodyGenerator::new(shared_registry()).generate(&track, ComplexityTier::Medium);
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.pulse_phase, b.pulse_phase);
}

#[test]
fn vertex_count_is_strictly_monotonic_across_tiers() {
    let generator = BodyGenerator::new(shared_registry());
    let track = make_track("mono-1", "pop", 60, 200);
    let mut prev = 0usize;
    for tier in ALL_TIERS {
        let geometry = generator.generate(&track, tier);
        assert!(
            geometry.vertex_count() > prev,
            "vertex count not increasing at {tier:?}: {} <= {prev}",
            geometry.vertex_count()
        );
        assert_eq!(
            geometry.vertex_count(),
            tier.vertex_count(),
            "vertex count does not match the tier table at {tier:?}"
        );
        prev = geometry.vertex_count();
    }
}

#[test]
fn different_tracks_same_genre_differ_geometrically() {
    let generator = BodyGenerator::new(shared_registry());
    let a = generator.generate(&make_track("a", "metal", 50, 200), ComplexityTier::Medium);
    let b = generator.generate(&make_track("b", "metal", 50, 200), ComplexityTier::Medium);
    assert_eq!(a.vertex_count(), b.vertex_count());
    assert_ne!(
        a.positions, b.positions,
        "facet variation must separate equal-profile tracks"
    );
}

#[test]
fn metal_scenario_at_high_tier() {
    // Popular metal track at the High tier.
    let generator = BodyGenerator::new(shared_registry());
    let track = TrackRecord {
        id: "abc".to_owned(),
        title: "abc title".to_owned(),
        artist: "abc artist".to_owned(),
        album: String::new(),
        genre: "metal".to_owned(),
        duration_sec: 240,
        popularity: 90,
        bpm: None,
        energy: None,
    };
    let geometry = generator.generate(&track, ComplexityTier::High);

    // Icosahedron with 2 subdivisions.
    assert_eq!(geometry.vertex_count(), 162);
    // No bpm supplied: the channel defaults to exactly 1.0 everywhere.
    assert!(geometry.bpm_multiplier.iter().all(|&m| m == 1.0));

    let profile = profile_for_genre(&track.genre);
    assert_eq!(profile.elongation, 1.35);
    assert_eq!(profile.sharpness, 1.8);
    assert_eq!(profile.roughness, 1.5);
}

#[test]
fn bpm_multiplier_scales_with_known_bpm() {
    let generator = BodyGenerator::new(shared_registry());
    let mut track = make_track("bpm-1", "dance", 60, 200);
    track.bpm = Some(150.0);
    let geometry = generator.generate(&track, ComplexityTier::Low);
    let base = 150.0 / 120.0;
    for &m in &geometry.bpm_multiplier {
        assert!(
            m >= base * 0.8 - 1e-5 && m <= base * 1.2 + 1e-5,
            "bpm multiplier {m} outside expected band"
        );
    }
    // Not all identical: the spread is per vertex.
    let first = geometry.bpm_multiplier[0];
    assert!(geometry.bpm_multiplier.iter().any(|&m| m != first));
}

#[test]
fn channels_are_well_formed() {
    let generator = BodyGenerator::new(shared_registry());
    let track = make_track("chan-1", "electronic", 40, 180);
    let geometry = generator.generate(&track, ComplexityTier::Medium);
    let n = geometry.vertex_count();
    assert_eq!(geometry.pulse_phase.len(), n);
    assert_eq!(geometry.bpm_multiplier.len(), n);
    assert_eq!(geometry.original_position.len(), n);
    assert_eq!(geometry.facet_normal.len(), n);
    assert_eq!(geometry.normals.len(), n);
    for &phase in &geometry.pulse_phase {
        assert!((0.0..std::f32::consts::TAU).contains(&phase));
    }
    for normal in &geometry.facet_normal {
        assert!(
            (normal.length() - 1.0).abs() < 1e-3,
            "facet normal not unit length"
        );
    }
    // Animation offsets are relative to the generated shape.
    assert_eq!(geometry.original_position, geometry.positions);
}

#[test]
fn geometry_is_structurally_valid_at_every_tier() {
    let generator = BodyGenerator::new(shared_registry());
    for (i, genre) in ["metal", "classical", "unknown-tag", ""].iter().enumerate() {
        let track = make_track(&format!("valid-{i}"), genre, 80, 400);
        for tier in ALL_TIERS {
            let geometry = generator.generate(&track, tier);
            geometry
                .validate()
                .unwrap_or_else(|e| panic!("invalid geometry for {genre:?} at {tier:?}: {e}"));
            assert!(geometry.bounding.radius > 0.0);
        }
    }
}

#[test]
fn elongation_stretches_the_y_axis() {
    let generator = BodyGenerator::new(shared_registry());
    // Ambient has the strongest elongation (1.6) and no sharpness/roughness.
    let track = make_track("elong-1", "ambient", 50, 200);
    let geometry = generator.generate(&track, ComplexityTier::Low);
    let max_y = geometry
        .positions
        .iter()
        .map(|p| p.y.abs())
        .fold(0.0_f32, f32::max);
    let max_x = geometry
        .positions
        .iter()
        .map(|p| p.x.abs())
        .fold(0.0_f32, f32::max);
    assert!(
        max_y > max_x * 1.3,
        "expected elongated silhouette, got y={max_y} x={max_x}"
    );
}

#[test]
fn complexity_policy_blends_popularity_and_duration() {
    let policy = ComplexityPolicy::default();
    assert_eq!(policy.popularity_weight, 0.7);
    assert_eq!(policy.duration_weight, 0.3);

    let tier = ComplexityTier::High;
    let (min, max) = tier.accent_range();
    let quiet = policy.accent_count(&make_track("q", "pop", 0, 0), tier);
    let loud = policy.accent_count(&make_track("l", "pop", 100, 1200), tier);
    assert_eq!(quiet, min, "zero factors should sit at the tier minimum");
    assert_eq!(loud, max, "saturated factors should reach the tier maximum");
    for popularity in [0u8, 25, 50, 75, 100] {
        let count = policy.accent_count(&make_track("m", "pop", popularity, 300), tier);
        assert!(
            (min..=max).contains(&count),
            "accent count {count} escaped [{min}, {max}]"
        );
    }
}

#[test]
fn safe_solid_is_renderable_and_seeded() {
    let generator = BodyGenerator::new(shared_registry());
    let track = make_track("safe-1", "rock", 10, 60);
    let solid = generator.safe_solid(&track);
    solid.validate().expect("safe solid must be renderable");
    assert_eq!(solid.vertex_count(), 6, "safe solid is the flat octahedron");
    // Seeded channels: two different tracks get different pulse phases.
    let other = generator.safe_solid(&make_track("safe-2", "rock", 10, 60));
    assert_ne!(solid.pulse_phase, other.pulse_phase);
}
