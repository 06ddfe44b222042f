//! Quality tiers and the device-class → tier selection tables.

use crate::constants::SCORE_ULTRA;

/// Discrete geometry/shader cost level for one body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComplexityTier {
    UltraLow,
    Low,
    Medium,
    High,
    UltraHigh,
}

impl ComplexityTier {
    /// Base solid: the ultra-low tier renders a flat octahedron, everything
    /// else subdivides an icosahedron.
    pub fn uses_octahedron(self) -> bool {
        matches!(self, ComplexityTier::UltraLow)
    }

    /// Icosahedron subdivision level (ignored for the octahedron tier).
    pub fn subdivisions(self) -> u32 {
        match self {
            ComplexityTier::UltraLow | ComplexityTier::Low => 0,
            ComplexityTier::Medium => 1,
            ComplexityTier::High => 2,
            ComplexityTier::UltraHigh => 3,
        }
    }

    /// Unique vertex count of the base solid at this tier.
    /// Strictly monotonic: 6 < 12 < 42 < 162 < 642.
    pub fn vertex_count(self) -> usize {
        match self {
            ComplexityTier::UltraLow => 6,
            ComplexityTier::Low => 12,
            ComplexityTier::Medium => 42,
            ComplexityTier::High => 162,
            ComplexityTier::UltraHigh => 642,
        }
    }

    /// `[min, max]` count of sharpness-accent vertices; the popularity and
    /// duration blend picks a value inside this range.
    pub fn accent_range(self) -> (u32, u32) {
        match self {
            ComplexityTier::UltraLow => (0, 2),
            ComplexityTier::Low => (2, 4),
            ComplexityTier::Medium => (4, 8),
            ComplexityTier::High => (8, 16),
            ComplexityTier::UltraHigh => (16, 32),
        }
    }

    /// One tier lower; saturates at UltraLow.
    pub fn lower(self) -> Self {
        match self {
            ComplexityTier::UltraHigh => ComplexityTier::High,
            ComplexityTier::High => ComplexityTier::Medium,
            ComplexityTier::Medium => ComplexityTier::Low,
            ComplexityTier::Low | ComplexityTier::UltraLow => ComplexityTier::UltraLow,
        }
    }
}

/// Three-level result of the one-shot device profiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviceClass {
    Low,
    Medium,
    High,
}

/// Geometry tier for a device class. Exceptional High scores unlock
/// UltraHigh; UltraLow is reached only through forced performance mode.
pub fn geometry_tier(class: DeviceClass, score: i32) -> ComplexityTier {
    match class {
        DeviceClass::High if score >= SCORE_ULTRA => ComplexityTier::UltraHigh,
        DeviceClass::High => ComplexityTier::High,
        DeviceClass::Medium => ComplexityTier::Medium,
        DeviceClass::Low => ComplexityTier::Low,
    }
}

/// Texture budget: resolution cap, mipmap/anisotropy policy, compression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureQuality {
    pub max_resolution: u32,
    pub mipmaps: bool,
    pub anisotropy: u8,
    pub compressed: bool,
}

pub fn texture_quality(class: DeviceClass) -> TextureQuality {
    match class {
        DeviceClass::High => TextureQuality {
            max_resolution: 2048,
            mipmaps: true,
            anisotropy: 8,
            compressed: false,
        },
        DeviceClass::Medium => TextureQuality {
            max_resolution: 1024,
            mipmaps: true,
            anisotropy: 4,
            compressed: true,
        },
        DeviceClass::Low => TextureQuality {
            max_resolution: 512,
            mipmaps: false,
            anisotropy: 1,
            compressed: true,
        },
    }
}
