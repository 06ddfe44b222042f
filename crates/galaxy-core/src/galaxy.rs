//! Ownership root wiring the profiler, registry, generator, providers, the
//! body set, and the camera controller into one per-frame engine.

use std::rc::Rc;

use fnv::FnvHashMap;
use glam::Vec3;
use instant::Instant;

use crate::body::CrystalBody;
use crate::camera::{CameraController, FocusAnimation, FocusSnapshot};
use crate::events::{FocusObserver, GalaxyObserver};
use crate::fallback::FallbackPolicy;
use crate::geometry::BodyGenerator;
use crate::material::MaterialProvider;
use crate::profiler::{DeviceProbe, DeviceProfiler};
use crate::registry::{shared_registry, ErrorReport, SharedRegistry};
use crate::seed::shape_seed;
use crate::texture::{ResolvedTexture, TextureProvider};
use crate::tier::ComplexityTier;
use crate::track::TrackRecord;

pub struct Galaxy {
    profiler: Rc<DeviceProfiler>,
    registry: SharedRegistry,
    policy: FallbackPolicy,
    generator: BodyGenerator,
    materials: MaterialProvider,
    textures: TextureProvider,
    bodies: FnvHashMap<String, CrystalBody>,
    /// Stable iteration order for rendering and picking.
    order: Vec<String>,
    tracks: FnvHashMap<String, TrackRecord>,
    camera: CameraController,
    observers: Vec<Rc<dyn GalaxyObserver>>,
    hovered: Option<String>,
    clock: f32,
    degraded_reported: bool,
}

impl Galaxy {
    pub fn new(probe: DeviceProbe) -> Self {
        let registry = shared_registry();
        let profiler = Rc::new(DeviceProfiler::new(probe));
        let policy = FallbackPolicy::new(registry.clone(), profiler.clone());
        let generator = BodyGenerator::new(registry.clone());
        let materials = MaterialProvider::new(registry.clone());
        let textures = TextureProvider::new(registry.clone(), profiler.texture_quality());
        let camera = CameraController::new(registry.clone());
        Self {
            profiler,
            registry,
            policy,
            generator,
            materials,
            textures,
            bodies: FnvHashMap::default(),
            order: Vec::new(),
            tracks: FnvHashMap::default(),
            camera,
            observers: Vec::new(),
            hovered: None,
            clock: 0.0,
            degraded_reported: false,
        }
    }

    // ---------------- Accessors ----------------

    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    pub fn profiler(&self) -> &DeviceProfiler {
        &self.profiler
    }

    pub fn fallback_policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn textures_mut(&mut self) -> &mut TextureProvider {
        &mut self.textures
    }

    pub fn focus_state(&self) -> FocusSnapshot {
        self.camera.focus_snapshot()
    }

    pub fn body(&self, track_id: &str) -> Option<&CrystalBody> {
        self.bodies.get(track_id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies in stable insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &CrystalBody> {
        self.order.iter().filter_map(|id| self.bodies.get(id))
    }

    pub fn error_reports(&self) -> Vec<ErrorReport> {
        self.registry.borrow().reports().cloned().collect()
    }

    pub fn add_observer(&mut self, observer: Rc<dyn GalaxyObserver>) {
        self.observers.push(observer);
    }

    pub fn add_focus_observer(&mut self, observer: Rc<dyn FocusObserver>) {
        self.camera.add_observer(observer);
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    // ---------------- Track set ----------------

    /// Reconcile the visible set: generate bodies for entering tracks,
    /// dispose bodies whose tracks left.
    pub fn sync_tracks(&mut self, tracks: &[TrackRecord]) {
        let tier = self.profiler.geometry_tier();

        // Dispose leavers first so their buffers are gone before new
        // geometry is built.
        let keep: FnvHashMap<&str, ()> = tracks.iter().map(|t| (t.id.as_str(), ())).collect();
        self.order.retain(|id| keep.contains_key(id.as_str()));
        self.bodies.retain(|id, body| {
            let stays = keep.contains_key(id.as_str());
            if !stays {
                body.dispose();
            }
            stays
        });
        self.tracks.retain(|id, _| keep.contains_key(id.as_str()));
        if let Some(hovered) = &self.hovered {
            if !self.bodies.contains_key(hovered) {
                self.hovered = None;
            }
        }

        for track in tracks {
            if self.bodies.contains_key(&track.id) {
                continue;
            }
            let body = self.build_body(track, tier);
            self.order.push(track.id.clone());
            self.bodies.insert(track.id.clone(), body);
            self.tracks.insert(track.id.clone(), track.clone());
        }
    }

    fn build_body(&self, track: &TrackRecord, tier: ComplexityTier) -> CrystalBody {
        let geometry = self.generator.generate(track, tier);
        let material = self.materials.crystal_material(track, tier);
        let seed = shape_seed(&track.id, &track.title, &track.artist);
        CrystalBody::new(track.id.clone(), geometry, material, seed, tier)
    }

    /// External layout pass hands positions in; the core owns them for
    /// camera targeting afterwards.
    pub fn set_body_position(&mut self, track_id: &str, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(track_id) {
            body.position = position;
        }
    }

    // ---------------- Interaction ----------------

    pub fn set_hovered(&mut self, track_id: Option<&str>) {
        let next = track_id.map(str::to_owned);
        if next == self.hovered {
            return;
        }
        self.hovered = next;
        for observer in &self.observers {
            observer.on_body_hovered(self.hovered.as_deref());
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Select a body and fly the camera to it. Returns the animation future
    /// when the focus was accepted.
    pub fn focus_track(&mut self, track_id: &str) -> Option<FocusAnimation> {
        let (position, radius) = {
            let body = self.bodies.get(track_id)?;
            (body.position, body.bounding_radius())
        };
        for observer in &self.observers {
            observer.on_body_selected(track_id);
        }
        self.camera.focus(track_id, position, radius)
    }

    pub fn exit_focus(&mut self) -> Option<FocusAnimation> {
        self.camera.exit_focus()
    }

    // ---------------- Quality management ----------------

    /// Regenerate every body one tier lower. Same seeds, same silhouettes,
    /// fewer facets. Saturates at UltraLow.
    pub fn downgrade_quality(&mut self) {
        let ids: Vec<String> = self.order.clone();
        for id in ids {
            let Some(track) = self.tracks.get(&id).cloned() else {
                continue;
            };
            let Some((tier, position)) = self.bodies.get(&id).map(|b| (b.tier, b.position)) else {
                continue;
            };
            let lower = tier.lower();
            if lower == tier {
                continue;
            }
            let mut rebuilt = self.build_body(&track, lower);
            rebuilt.position = position;
            if let Some(body) = self.bodies.get_mut(&id) {
                body.dispose();
                *body = rebuilt;
            }
        }
    }

    /// Performance warning from the host (frame time, draw calls, ...).
    /// Escalation downgrades every body and notifies observers once.
    pub fn report_performance_warning(&mut self, metric: &str, threshold: f64, value: f64) {
        if self.policy.report_performance_warning(metric, threshold, value) {
            self.downgrade_quality();
            self.notify_degraded();
        }
    }

    /// Simulated or real GPU context loss: critical report, camera forced to
    /// a safe state, performance mode engaged.
    pub fn handle_context_loss(&mut self) {
        self.policy.report_context_loss();
        self.camera.abort_to_idle();
        self.downgrade_quality();
        self.notify_degraded();
    }

    /// Context restored: performance mode lifts (unless the perf-warning
    /// escalation pinned it for the session) and shader materials get their
    /// single recompile attempt.
    pub fn handle_context_restored(&mut self) {
        self.policy.mark_context_restored();
        if !self.registry.borrow().escalated() {
            self.profiler.release_performance_mode();
        }
        let retry = self.registry.borrow_mut().take_shader_retry();
        if retry {
            for id in &self.order {
                let Some(track) = self.tracks.get(id) else {
                    continue;
                };
                if let Some(body) = self.bodies.get_mut(id) {
                    body.material = self.materials.crystal_material(track, body.tier);
                }
            }
        }
    }

    fn notify_degraded(&mut self) {
        if self.degraded_reported {
            return;
        }
        self.degraded_reported = true;
        for observer in &self.observers {
            observer.on_performance_degraded();
        }
    }

    // ---------------- Frame tick ----------------

    /// Advance everything one frame: camera flight, texture deadlines, and
    /// the animation clock the shaders sample.
    pub fn tick(&mut self, dt: f32) -> Vec<ResolvedTexture> {
        self.clock += dt;
        self.camera.tick(dt);
        self.textures.tick(Instant::now())
    }

    /// Tear the galaxy down: dispose every body and drop pending camera
    /// animation state.
    pub fn dispose(&mut self) {
        for body in self.bodies.values_mut() {
            body.dispose();
        }
        self.bodies.clear();
        self.order.clear();
        self.tracks.clear();
        self.camera.dispose();
    }
}
