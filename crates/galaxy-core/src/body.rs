//! One renderable crystal body per track.

use glam::Vec3;

use crate::geometry::CrystalGeometry;
use crate::material::CrystalMaterial;
use crate::tier::ComplexityTier;

pub struct CrystalBody {
    pub track_id: String,
    /// Assigned by the external layout pass; owned here for camera targeting.
    pub position: Vec3,
    pub geometry: CrystalGeometry,
    pub material: CrystalMaterial,
    pub shape_seed: u32,
    pub tier: ComplexityTier,
    disposed: bool,
}

impl CrystalBody {
    pub fn new(
        track_id: String,
        geometry: CrystalGeometry,
        material: CrystalMaterial,
        shape_seed: u32,
        tier: ComplexityTier,
    ) -> Self {
        Self {
            track_id,
            position: Vec3::ZERO,
            geometry,
            material,
            shape_seed,
            tier,
            disposed: false,
        }
    }

    /// World-space bounding radius, used for picking and focus stand-off.
    pub fn bounding_radius(&self) -> f32 {
        self.geometry.bounding.radius
    }

    pub fn disposed(&self) -> bool {
        self.disposed
    }

    /// Release geometry buffers when the track leaves the visible set.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.geometry.release();
            self.disposed = true;
        }
    }
}

impl Drop for CrystalBody {
    fn drop(&mut self) {
        self.dispose();
    }
}
