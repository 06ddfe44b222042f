//! Central failure dispatch: every report returns a concrete, always-valid
//! fallback artifact. Callers never receive a failure from these methods.

use std::rc::Rc;

use crate::geometry::{BodyGenerator, CrystalGeometry};
use crate::material::{CrystalMaterial, MaterialKind, MaterialProvider, ShaderStage};
use crate::profiler::DeviceProfiler;
use crate::registry::{ErrorKind, Severity, SharedRegistry};
use crate::seed::shape_seed;
use crate::texture::{procedural_fallback_texture, ProceduralTexture};
use crate::track::TrackRecord;

pub struct FallbackPolicy {
    registry: SharedRegistry,
    profiler: Rc<DeviceProfiler>,
    materials: MaterialProvider,
}

impl FallbackPolicy {
    pub fn new(registry: SharedRegistry, profiler: Rc<DeviceProfiler>) -> Self {
        let materials = MaterialProvider::new(registry.clone());
        Self {
            registry,
            profiler,
            materials,
        }
    }

    /// Shader compile/link failure → flat material for the same track.
    /// `source` is the offending WGSL; only a short excerpt is logged.
    pub fn report_shader_failure(
        &self,
        stage: ShaderStage,
        source: &str,
        error: &str,
        kind: MaterialKind,
        track: &TrackRecord,
    ) -> CrystalMaterial {
        let error_kind = match kind {
            MaterialKind::Crystal => ErrorKind::ShaderCompile,
            MaterialKind::Flat => ErrorKind::ShaderLink,
        };
        let excerpt: String = source.chars().take(80).collect();
        self.registry.borrow_mut().report(
            error_kind,
            Severity::High,
            format!(
                "{} shader for track {}: {error} (source: {excerpt}...)",
                stage.as_str(),
                track.id
            ),
            true,
        );
        self.materials.fallback_flat(track)
    }

    /// Texture load failure → procedural per-track placeholder.
    pub fn report_texture_failure(&self, url: &str, error: &str, track: &TrackRecord) -> ProceduralTexture {
        self.registry.borrow_mut().report(
            ErrorKind::TextureLoad,
            Severity::Medium,
            format!("{url} for track {}: {error}; procedural fallback applied", track.id),
            true,
        );
        let seed = shape_seed(&track.id, &track.title, &track.artist);
        procedural_fallback_texture(seed, self.profiler.texture_quality())
    }

    /// Geometry failure outside the generator's own catch → safe solid.
    pub fn report_geometry_failure(
        &self,
        generator: &BodyGenerator,
        error: &str,
        track: &TrackRecord,
    ) -> CrystalGeometry {
        self.registry.borrow_mut().report(
            ErrorKind::GeometryGeneration,
            Severity::Medium,
            format!("track {}: {error}; substituting safe solid", track.id),
            true,
        );
        generator.safe_solid(track)
    }

    /// Performance warning. Returns `true` when two consecutive
    /// high-severity warnings just escalated into forced performance mode;
    /// the escalation itself is idempotent.
    pub fn report_performance_warning(&self, metric: &str, threshold: f64, value: f64) -> bool {
        let escalated = self
            .registry
            .borrow_mut()
            .report_performance_warning(metric, threshold, value);
        if escalated {
            self.profiler.force_performance_mode();
        }
        escalated
    }

    /// GPU context loss: critical, forces performance mode until restored.
    pub fn report_context_loss(&self) {
        let mut registry = self.registry.borrow_mut();
        registry.report(
            ErrorKind::GpuContextLost,
            Severity::Critical,
            "gpu context lost; performance mode engaged",
            true,
        );
        registry.mark_context_lost();
        drop(registry);
        self.profiler.force_performance_mode();
    }

    /// Context restoration permits one shader recompile attempt.
    pub fn mark_context_restored(&self) {
        self.registry.borrow_mut().mark_context_restored();
    }
}
