//! Mesh buffers for crystal bodies, with the custom per-vertex channels the
//! animation shader consumes.

mod generator;
mod polyhedron;

pub use generator::{BodyGenerator, ComplexityPolicy};
pub use polyhedron::{icosahedron, octahedron, subdivide};

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite shape factors: {0}")]
    NonFiniteFactors(String),
    #[error("non-finite vertex produced at index {0}")]
    NonFiniteVertex(usize),
    #[error("degenerate mesh: {0}")]
    Degenerate(&'static str),
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

/// Interleaved POD vertex handed to renderers.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CrystalVertex {
    pub position: [f32; 3],
    pub pulse_phase: f32,
    pub normal: [f32; 3],
    pub bpm_multiplier: f32,
}

/// Mesh buffers plus the animation channels. All arrays are per unique
/// vertex; `indices` is a triangle list.
#[derive(Clone, Debug, Default)]
pub struct CrystalGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Seeded random phase per vertex, radians.
    pub pulse_phase: Vec<f32>,
    /// Tempo-derived animation rate, 1.0 when bpm is unknown.
    pub bpm_multiplier: Vec<f32>,
    /// Post-deformation vertex, the stable base for animated offsets.
    pub original_position: Vec<Vec3>,
    /// Flat normal of the first face referencing each vertex.
    pub facet_normal: Vec<Vec3>,
    pub bounding: BoundingSphere,
}

impl CrystalGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Area-weighted smooth normals, recomputed after deformation.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            // Cross product length carries the area weight.
            let n = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                if n.length_squared() > 1e-12 {
                    n.normalize()
                } else {
                    // Isolated or degenerate vertex: fall back to its radial direction.
                    self.positions[i].normalize_or_zero()
                }
            })
            .collect();
    }

    /// Flat normal of the first face that references each vertex.
    pub fn recompute_facet_normals(&mut self) {
        let mut facet = vec![Vec3::ZERO; self.positions.len()];
        let mut seen = vec![false; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let n = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a])
                .normalize_or_zero();
            for &v in &[a, b, c] {
                if !seen[v] {
                    seen[v] = true;
                    facet[v] = n;
                }
            }
        }
        self.facet_normal = facet;
    }

    pub fn recompute_bounding(&mut self) {
        if self.positions.is_empty() {
            self.bounding = BoundingSphere::default();
            return;
        }
        let center =
            self.positions.iter().copied().sum::<Vec3>() / self.positions.len() as f32;
        let radius = self
            .positions
            .iter()
            .map(|p| (*p - center).length())
            .fold(0.0_f32, f32::max);
        self.bounding = BoundingSphere { center, radius };
    }

    /// Structural validation; the generator converts failures here into the
    /// minimal safe solid rather than propagating.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.positions.is_empty() {
            return Err(GeometryError::Degenerate("no vertices"));
        }
        if self.indices.len() < 3 || self.indices.len() % 3 != 0 {
            return Err(GeometryError::Degenerate("index buffer not a triangle list"));
        }
        let vertex_count = self.positions.len();
        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(GeometryError::IndexOutOfBounds {
                    index,
                    vertex_count,
                });
            }
        }
        for (i, p) in self.positions.iter().enumerate() {
            if !p.is_finite() {
                return Err(GeometryError::NonFiniteVertex(i));
            }
        }
        if !self.bounding.radius.is_finite() || self.bounding.radius <= 0.0 {
            return Err(GeometryError::Degenerate("bounding radius not positive"));
        }
        Ok(())
    }

    /// Interleaved buffer for upload.
    pub fn packed_vertices(&self) -> Vec<CrystalVertex> {
        (0..self.positions.len())
            .map(|i| CrystalVertex {
                position: self.positions[i].to_array(),
                pulse_phase: self.pulse_phase[i],
                normal: self.normals[i].to_array(),
                bpm_multiplier: self.bpm_multiplier[i],
            })
            .collect()
    }

    /// Release buffer storage. The geometry stays structurally valid enough
    /// to detect use-after-dispose, but renders nothing.
    pub fn release(&mut self) {
        self.positions = Vec::new();
        self.normals = Vec::new();
        self.indices = Vec::new();
        self.pulse_phase = Vec::new();
        self.bpm_multiplier = Vec::new();
        self.original_position = Vec::new();
        self.facet_normal = Vec::new();
    }
}
