//! Core engine for the crystal galaxy: deterministic per-track body
//! generation, device-tiered quality fallback, and camera choreography.
//!
//! Everything in this crate is platform-free and advances through a single
//! per-frame tick. Frontends supply a [`profiler::DeviceProbe`], feed track
//! records in, route user input to the camera controller, and upload the
//! resulting geometry/material descriptors however they render.

pub mod body;
pub mod camera;
pub mod constants;
pub mod events;
pub mod fallback;
pub mod galaxy;
pub mod geometry;
pub mod material;
pub mod profiler;
pub mod registry;
pub mod seed;
pub mod texture;
pub mod tier;
pub mod track;

/// Crystal shader: pulse-animated facets driven by the custom vertex
/// channels.
pub static CRYSTAL_WGSL: &str = include_str!("../shaders/crystal.wgsl");
/// Flat fallback shader used when shader-active materials are unavailable.
pub static FLAT_WGSL: &str = include_str!("../shaders/flat.wgsl");
/// Post-process blur/composite used for the depth-of-field focus effect.
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use body::CrystalBody;
pub use camera::{
    CameraController, CameraPose, DofSettings, Easing, FocusAnimation, FocusConfig, FocusOutcome,
    FocusPhase, FocusSnapshot, FreeLookState, InputLock, OrbitState,
};
pub use events::{FocusObserver, GalaxyObserver};
pub use fallback::FallbackPolicy;
pub use galaxy::Galaxy;
pub use geometry::{BodyGenerator, ComplexityPolicy, CrystalGeometry, CrystalVertex};
pub use material::{CrystalMaterial, MaterialKind, MaterialProvider, MaterialState, ShaderStage};
pub use profiler::{DeviceProbe, DeviceProfiler};
pub use registry::{
    shared_registry, ErrorKind, ErrorRegistry, ErrorReport, Severity, SharedRegistry,
};
pub use seed::{shape_seed, SeedRng};
pub use texture::{procedural_fallback_texture, ProceduralTexture, ResolvedTexture, TextureProvider};
pub use tier::{ComplexityTier, DeviceClass, TextureQuality};
pub use track::{profile_for_genre, ShapeProfile, TrackRecord};
