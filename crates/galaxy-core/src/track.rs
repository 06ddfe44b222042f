//! Track input model and the genre → shape-profile lookup.

/// One track of the user's library, produced by the external data layer.
/// Read-only to the core.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRecord {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Free-form genre tag; normalized lower-case for lookups.
    pub genre: String,
    pub duration_sec: u32,
    /// 0..=100.
    pub popularity: u8,
    pub bpm: Option<f32>,
    /// 0..=1 when known.
    pub energy: Option<f32>,
}

impl TrackRecord {
    pub fn normalized_genre(&self) -> String {
        self.genre.trim().to_ascii_lowercase()
    }
}

/// Deformation factors applied to a body's base polyhedron.
///
/// `elongation` scales one axis; `sharpness > 1` pushes vertices outward
/// along their radius; `roughness > 1` jitters vertices along their own
/// direction from center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeProfile {
    pub elongation: f32,
    pub sharpness: f32,
    pub roughness: f32,
}

impl Default for ShapeProfile {
    fn default() -> Self {
        Self {
            elongation: 1.15,
            sharpness: 1.15,
            roughness: 1.1,
        }
    }
}

/// Shape factors per genre tag. Unrecognized tags get the default profile.
pub fn profile_for_genre(genre: &str) -> ShapeProfile {
    let tag = genre.trim().to_ascii_lowercase();
    match tag.as_str() {
        "metal" | "heavymetal" | "thrash" => ShapeProfile {
            elongation: 1.35,
            sharpness: 1.8,
            roughness: 1.5,
        },
        "rock" | "rusrock" | "hardrock" => ShapeProfile {
            elongation: 1.2,
            sharpness: 1.4,
            roughness: 1.3,
        },
        "punk" => ShapeProfile {
            elongation: 1.1,
            sharpness: 1.6,
            roughness: 1.45,
        },
        "electronic" | "electronics" | "dance" | "house" | "techno" => ShapeProfile {
            elongation: 1.0,
            sharpness: 1.2,
            roughness: 1.05,
        },
        "classical" => ShapeProfile {
            elongation: 1.5,
            sharpness: 1.0,
            roughness: 1.0,
        },
        "ambient" => ShapeProfile {
            elongation: 1.6,
            sharpness: 1.0,
            roughness: 1.0,
        },
        "jazz" | "blues" => ShapeProfile {
            elongation: 1.25,
            sharpness: 1.1,
            roughness: 1.15,
        },
        "pop" | "ruspop" => ShapeProfile {
            elongation: 1.1,
            sharpness: 1.05,
            roughness: 1.05,
        },
        "rap" | "hiphop" | "hip-hop" => ShapeProfile {
            elongation: 1.0,
            sharpness: 1.3,
            roughness: 1.2,
        },
        "indie" | "folk" | "alternative" => ShapeProfile {
            elongation: 1.3,
            sharpness: 1.15,
            roughness: 1.2,
        },
        _ => ShapeProfile::default(),
    }
}
