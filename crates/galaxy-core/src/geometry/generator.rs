//! Deterministic per-track body generation.
//!
//! Everything here is a pure function of the track's identity fields, its
//! numeric metadata, and the complexity tier. Deformation passes sample a
//! position-keyed random field so a regeneration at a lower tier keeps the
//! same silhouette at a lower facet count.

use glam::Vec3;
use rand::Rng;

use crate::constants::{
    ACCENT_PUSH, BPM_MULT_BASE, BPM_MULT_SPAN, BPM_REFERENCE, DURATION_FACTOR_CAP_SEC,
    FACET_VARIATION_SPAN, ROUGHNESS_JITTER_SPAN, SHARPNESS_PUSH_SPAN,
};
use crate::geometry::{icosahedron, octahedron, subdivide, CrystalGeometry, GeometryError};
use crate::registry::{ErrorKind, Severity, SharedRegistry};
use crate::seed::{directional_rand, shape_seed, SeedRng};
use crate::tier::ComplexityTier;
use crate::track::{profile_for_genre, ShapeProfile, TrackRecord};

// Salts for the independent random fields over one seed.
const SALT_SHARPNESS: u32 = 0x51;
const SALT_ROUGHNESS: u32 = 0x52;
const SALT_FACET: u32 = 0x53;
const SALT_ACCENT: u32 = 0x54;
// Sequential channel streams.
const STREAM_PULSE: u32 = 1;
const STREAM_BPM: u32 = 2;

/// Blend weights for mapping popularity and duration onto the per-tier
/// accent range. The source used a fixed 0.7/0.3 split with no stated
/// rationale, so it stays a tunable policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplexityPolicy {
    pub popularity_weight: f32,
    pub duration_weight: f32,
}

impl Default for ComplexityPolicy {
    fn default() -> Self {
        Self {
            popularity_weight: 0.7,
            duration_weight: 0.3,
        }
    }
}

impl ComplexityPolicy {
    /// Accent-vertex count for a track, clamped to the tier range.
    pub fn accent_count(&self, track: &TrackRecord, tier: ComplexityTier) -> u32 {
        let (min, max) = tier.accent_range();
        let popularity = f32::from(track.popularity.min(100)) / 100.0;
        let duration =
            (track.duration_sec as f32 / DURATION_FACTOR_CAP_SEC).clamp(0.0, 1.0);
        let blend = self.popularity_weight * popularity + self.duration_weight * duration;
        let span = (max - min) as f32;
        (min + (blend * span).floor() as u32).clamp(min, max)
    }
}

pub struct BodyGenerator {
    registry: SharedRegistry,
    policy: ComplexityPolicy,
}

impl BodyGenerator {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            policy: ComplexityPolicy::default(),
        }
    }

    pub fn with_policy(registry: SharedRegistry, policy: ComplexityPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> ComplexityPolicy {
        self.policy
    }

    /// Generate the geometry for one track at one tier.
    ///
    /// Never fails: construction errors are reported to the registry as
    /// geometry-generation/medium and the minimal safe solid is returned.
    pub fn generate(&self, track: &TrackRecord, tier: ComplexityTier) -> CrystalGeometry {
        match self.build(track, tier) {
            Ok(geometry) => geometry,
            Err(err) => {
                self.registry.borrow_mut().report(
                    ErrorKind::GeometryGeneration,
                    Severity::Medium,
                    format!("track {}: {err}; substituting safe solid", track.id),
                    true,
                );
                self.safe_solid(track)
            }
        }
    }

    fn build(
        &self,
        track: &TrackRecord,
        tier: ComplexityTier,
    ) -> Result<CrystalGeometry, GeometryError> {
        let seed = shape_seed(&track.id, &track.title, &track.artist);
        let profile = profile_for_genre(&track.genre);
        validate_profile(&profile)?;

        let (mut positions, mut faces) = if tier.uses_octahedron() {
            octahedron()
        } else {
            icosahedron()
        };
        subdivide(&mut positions, &mut faces, tier.subdivisions());

        deform(&mut positions, seed, &profile);
        accent_pass(&mut positions, seed, self.policy.accent_count(track, tier));

        let mut geometry = CrystalGeometry {
            positions,
            indices: faces.into_iter().flatten().collect(),
            ..Default::default()
        };
        geometry.recompute_normals();
        geometry.recompute_facet_normals();
        geometry.recompute_bounding();
        attach_channels(&mut geometry, seed, track.bpm);
        geometry.validate()?;
        Ok(geometry)
    }

    /// Minimal low-complexity solid used when construction fails. Still
    /// seeded from the track so even the fallback is per-track stable.
    pub fn safe_solid(&self, track: &TrackRecord) -> CrystalGeometry {
        let seed = shape_seed(&track.id, &track.title, &track.artist);
        let (positions, faces) = octahedron();
        let mut geometry = CrystalGeometry {
            positions,
            indices: faces.into_iter().flatten().collect(),
            ..Default::default()
        };
        geometry.recompute_normals();
        geometry.recompute_facet_normals();
        geometry.recompute_bounding();
        attach_channels(&mut geometry, seed, None);
        geometry
    }
}

fn validate_profile(profile: &ShapeProfile) -> Result<(), GeometryError> {
    let fields = [profile.elongation, profile.sharpness, profile.roughness];
    if fields.iter().any(|f| !f.is_finite() || *f <= 0.0) {
        return Err(GeometryError::NonFiniteFactors(format!("{profile:?}")));
    }
    Ok(())
}

/// Genre-driven deformation plus the always-on facet-variation pass.
fn deform(positions: &mut [Vec3], seed: u32, profile: &ShapeProfile) {
    for p in positions.iter_mut() {
        let dir = p.normalize_or_zero();

        // Elongation stretches one axis.
        p.y *= profile.elongation;

        // Sharpness pushes outward along the radius, scaled per vertex.
        if profile.sharpness > 1.0 {
            let r = directional_rand(seed, dir, SALT_SHARPNESS);
            let push = (profile.sharpness - 1.0) * SHARPNESS_PUSH_SPAN * r;
            *p += dir * push;
        }

        // Roughness jitters along the direction from center, signed.
        if profile.roughness > 1.0 {
            let r = directional_rand(seed, dir, SALT_ROUGHNESS) - 0.5;
            let jitter = (profile.roughness - 1.0) * ROUGHNESS_JITTER_SPAN * r;
            *p += dir * jitter;
        }

        // Independent facet-variation pass: no two tracks of the same genre
        // and tier are geometrically identical.
        let r = directional_rand(seed, dir, SALT_FACET) - 0.5;
        *p += dir * (r * FACET_VARIATION_SPAN);
    }
}

/// Push the N most accented vertices further out. Selection is by the
/// position-keyed accent field, so it is deterministic and tier-stable.
fn accent_pass(positions: &mut [Vec3], seed: u32, accents: u32) {
    if accents == 0 || positions.is_empty() {
        return;
    }
    let mut scored: Vec<(usize, f32)> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| (i, directional_rand(seed, p.normalize_or_zero(), SALT_ACCENT)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for &(i, score) in scored.iter().take(accents as usize) {
        let dir = positions[i].normalize_or_zero();
        positions[i] += dir * (ACCENT_PUSH * (0.5 + 0.5 * score));
    }
}

/// Per-vertex animation channels, drawn from sequential seeded streams.
fn attach_channels(geometry: &mut CrystalGeometry, seed: u32, bpm: Option<f32>) {
    let count = geometry.positions.len();

    let mut pulse_rng = SeedRng::stream(seed, STREAM_PULSE);
    geometry.pulse_phase = (0..count)
        .map(|_| pulse_rng.gen_range(0.0..std::f32::consts::TAU))
        .collect();

    geometry.bpm_multiplier = match bpm {
        Some(bpm) if bpm.is_finite() && bpm > 0.0 => {
            let mut bpm_rng = SeedRng::stream(seed, STREAM_BPM);
            let base = bpm / BPM_REFERENCE;
            (0..count)
                .map(|_| base * (BPM_MULT_BASE + BPM_MULT_SPAN * bpm_rng.next_f32()))
                .collect()
        }
        _ => vec![1.0; count],
    };

    // Animation offsets are always relative to the generated shape, never
    // re-derived from the base solid.
    geometry.original_position = geometry.positions.clone();
}
