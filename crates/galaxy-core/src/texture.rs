//! Texture provision: per-tier quality caps, pending loads racing a fixed
//! deadline, and the procedural per-track fallback art.

use instant::{Duration, Instant};

use crate::constants::{
    FALLBACK_SPECKLE_DENSITY, FALLBACK_TEXTURE_SIZE, TEXTURE_LOAD_TIMEOUT_SEC,
};
use crate::material::seeded_color;
use crate::registry::{ErrorKind, Severity, SharedRegistry};
use crate::seed::SeedRng;
use crate::tier::TextureQuality;

const STREAM_SPECKLE: u32 = 7;

/// CPU-side RGBA8 texture, either loaded art or procedural fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct ProceduralTexture {
    pub size: u32,
    /// RGBA8, row-major, `size * size * 4` bytes.
    pub pixels: Vec<u8>,
}

/// Radial hue gradient plus speckle noise keyed off the track seed:
/// fallback art is stable and visually distinguishable per track.
pub fn procedural_fallback_texture(seed: u32, quality: TextureQuality) -> ProceduralTexture {
    let size = FALLBACK_TEXTURE_SIZE.min(quality.max_resolution).max(8);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    let center_color = seeded_color(seed, 0.9);
    let edge_color = seeded_color(seed.rotate_left(13), 0.25);
    let mut speckle_rng = SeedRng::stream(seed, STREAM_SPECKLE);
    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let t = (dx * dx + dy * dy).sqrt().min(1.0);
            let mut rgb = [
                center_color[0] + (edge_color[0] - center_color[0]) * t,
                center_color[1] + (edge_color[1] - center_color[1]) * t,
                center_color[2] + (edge_color[2] - center_color[2]) * t,
            ];
            if speckle_rng.next_f32() < FALLBACK_SPECKLE_DENSITY {
                let boost = 0.5 + 0.5 * speckle_rng.next_f32();
                for channel in rgb.iter_mut() {
                    *channel = (*channel + boost).min(1.0);
                }
            }
            pixels.push((rgb[0] * 255.0) as u8);
            pixels.push((rgb[1] * 255.0) as u8);
            pixels.push((rgb[2] * 255.0) as u8);
            pixels.push(255);
        }
    }
    ProceduralTexture { size, pixels }
}

/// A texture load the host started and has not yet resolved.
#[derive(Debug)]
struct PendingLoad {
    url: String,
    track_seed: u32,
    deadline: Instant,
}

/// Outcome of one load: the track seed it belongs to and the texture that
/// won the race.
#[derive(Debug)]
pub struct ResolvedTexture {
    pub url: String,
    pub track_seed: u32,
    pub texture: ProceduralTexture,
    pub fallback: bool,
}

/// Tracks in-flight texture loads against a fixed timeout. Loads resolve to
/// either the loaded asset or the procedural fallback, never left pending.
pub struct TextureProvider {
    registry: SharedRegistry,
    quality: TextureQuality,
    timeout: Duration,
    pending: Vec<PendingLoad>,
}

impl TextureProvider {
    pub fn new(registry: SharedRegistry, quality: TextureQuality) -> Self {
        Self {
            registry,
            quality,
            timeout: Duration::from_secs_f32(TEXTURE_LOAD_TIMEOUT_SEC),
            pending: Vec::new(),
        }
    }

    pub fn quality(&self) -> TextureQuality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: TextureQuality) {
        self.quality = quality;
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Register an in-flight load started by the host.
    pub fn begin_load(&mut self, url: impl Into<String>, track_seed: u32) {
        self.pending.push(PendingLoad {
            url: url.into(),
            track_seed,
            deadline: Instant::now() + self.timeout,
        });
    }

    /// Host finished a load (either way). A failed load reports and yields
    /// the procedural fallback; an unknown url yields `None`.
    pub fn complete_load(
        &mut self,
        url: &str,
        result: Result<ProceduralTexture, String>,
    ) -> Option<ResolvedTexture> {
        let index = self.pending.iter().position(|p| p.url == url)?;
        let load = self.pending.swap_remove(index);
        match result {
            Ok(texture) => Some(ResolvedTexture {
                url: load.url,
                track_seed: load.track_seed,
                texture,
                fallback: false,
            }),
            Err(error) => Some(self.resolve_fallback(load.url, load.track_seed, &error)),
        }
    }

    /// Resolve every load that ran past its deadline to the fallback.
    /// Called once per frame tick.
    pub fn tick(&mut self, now: Instant) -> Vec<ResolvedTexture> {
        let mut resolved = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if now >= self.pending[index].deadline {
                let load = self.pending.swap_remove(index);
                resolved.push(self.resolve_fallback(load.url, load.track_seed, "load timed out"));
            } else {
                index += 1;
            }
        }
        resolved
    }

    fn resolve_fallback(&self, url: String, track_seed: u32, error: &str) -> ResolvedTexture {
        self.registry.borrow_mut().report(
            ErrorKind::TextureLoad,
            Severity::Medium,
            format!("{url}: {error}; procedural fallback applied"),
            true,
        );
        ResolvedTexture {
            texture: procedural_fallback_texture(track_seed, self.quality),
            url,
            track_seed,
            fallback: true,
        }
    }
}
