//! Shader-based and fallback-flat material descriptors.
//!
//! The core does not own a GPU device; materials are descriptors (WGSL
//! source + parameters) that the frontend turns into pipelines. The
//! guarantee that matters here is totality: every request produces a
//! renderable descriptor, shader-active when possible, flat otherwise.

use crate::registry::SharedRegistry;
use crate::seed::shape_seed;
use crate::tier::ComplexityTier;
use crate::track::TrackRecord;
use crate::{CRYSTAL_WGSL, FLAT_WGSL};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialState {
    ShaderActive,
    FallbackFlat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// What kind of material a shader failure was reported for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Crystal,
    Flat,
}

/// Renderable material descriptor for one body.
#[derive(Clone, Debug)]
pub struct CrystalMaterial {
    pub state: MaterialState,
    /// Seeded per-track base color, linear RGBA.
    pub base_color: [f32; 4],
    /// Energy-driven glow; zero for fallback-flat.
    pub emissive_strength: f32,
    /// WGSL source the frontend compiles.
    pub shader_source: &'static str,
    /// Whether the shader animates the pulse channels.
    pub animated: bool,
}

pub struct MaterialProvider {
    registry: SharedRegistry,
}

impl MaterialProvider {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// Shader-active crystal material, unless the context is lost, in which
    /// case the flat fallback is served immediately.
    pub fn crystal_material(&self, track: &TrackRecord, tier: ComplexityTier) -> CrystalMaterial {
        if self.registry.borrow().context_lost() {
            return self.fallback_flat(track);
        }
        let seed = shape_seed(&track.id, &track.title, &track.artist);
        let energy = track.energy.unwrap_or(0.5).clamp(0.0, 1.0);
        CrystalMaterial {
            state: MaterialState::ShaderActive,
            base_color: seeded_color(seed, energy),
            emissive_strength: 0.2 + 0.8 * energy,
            shader_source: CRYSTAL_WGSL,
            // The lowest tier renders static flat facets even when the
            // shader path is healthy.
            animated: tier > ComplexityTier::UltraLow,
        }
    }

    /// Always-valid flat material with the same seeded color, so a body
    /// keeps its identity after a shader failure.
    pub fn fallback_flat(&self, track: &TrackRecord) -> CrystalMaterial {
        let seed = shape_seed(&track.id, &track.title, &track.artist);
        CrystalMaterial {
            state: MaterialState::FallbackFlat,
            base_color: seeded_color(seed, 0.35),
            emissive_strength: 0.0,
            shader_source: FLAT_WGSL,
            animated: false,
        }
    }
}

/// Hue from the seed, saturation/lightness from energy. Stable per track.
pub fn seeded_color(seed: u32, energy: f32) -> [f32; 4] {
    let hue = (seed % 360) as f32;
    let saturation = 0.45 + 0.4 * energy;
    let lightness = 0.42 + 0.18 * energy;
    let [r, g, b] = hsl_to_rgb(hue, saturation, lightness);
    [r, g, b, 1.0]
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r1 + m, g1 + m, b1 + m]
}
