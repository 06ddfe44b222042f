// Tuning constants shared across the core. Grouped by concern.

// ---------------- Geometry generation ----------------

/// Reference tempo that maps to a 1.0 bpm multiplier.
pub const BPM_REFERENCE: f32 = 120.0;
/// Per-vertex bpm multiplier spread: `(bpm/120) * (BASE + SPAN * rand)`.
pub const BPM_MULT_BASE: f32 = 0.8;
pub const BPM_MULT_SPAN: f32 = 0.4;

/// Maximum outward push applied by a sharpness of 2.0 (unit-sphere radii).
pub const SHARPNESS_PUSH_SPAN: f32 = 0.45;
/// Extra push applied to accent vertices on top of the sharpness pass.
pub const ACCENT_PUSH: f32 = 0.35;
/// Jitter amplitude for a roughness of 2.0 (unit-sphere radii).
pub const ROUGHNESS_JITTER_SPAN: f32 = 0.18;
/// Amplitude of the per-track facet-variation pass (always applied).
pub const FACET_VARIATION_SPAN: f32 = 0.06;

/// Duration (seconds) at which the duration factor saturates to 1.0.
pub const DURATION_FACTOR_CAP_SEC: f32 = 600.0;

// ---------------- Device profiling ----------------

/// Score at or above which a device is classed High.
pub const SCORE_HIGH: i32 = 70;
/// Score at or above which a device is classed Medium.
pub const SCORE_MEDIUM: i32 = 40;
/// High-class score that unlocks the UltraHigh geometry tier. The probe
/// scoring tops out at 85, so only maxed-out devices reach it.
pub const SCORE_ULTRA: i32 = 85;

// ---------------- Error registry ----------------

/// Bounded ring capacity for error reports.
pub const ERROR_LOG_CAPACITY: usize = 256;
/// Consecutive high-severity performance warnings before forcing low tier.
pub const PERF_ESCALATION_COUNT: u32 = 2;

// ---------------- Textures ----------------

/// Texture loads race this deadline before the procedural fallback wins.
pub const TEXTURE_LOAD_TIMEOUT_SEC: f32 = 8.0;
/// Side length of procedural fallback textures (clamped by tier cap).
pub const FALLBACK_TEXTURE_SIZE: u32 = 128;
/// Speckle density of fallback textures (fraction of pixels).
pub const FALLBACK_SPECKLE_DENSITY: f32 = 0.08;

// ---------------- Camera ----------------

pub const CAMERA_MIN_DISTANCE: f32 = 4.0;
pub const CAMERA_MAX_DISTANCE: f32 = 120.0;
pub const CAMERA_DEFAULT_DISTANCE: f32 = 36.0;

/// Polar angle clamps (radians from the equator).
pub const CAMERA_PITCH_MIN: f32 = -1.45;
pub const CAMERA_PITCH_MAX: f32 = 1.45;

/// Orbit smoothing rate (per second, exponential approach).
pub const ORBIT_SMOOTHING: f32 = 8.0;
/// Drag-to-angle sensitivity (radians per pixel).
pub const DRAG_SENSITIVITY: f32 = 0.005;

/// Free-look inertia: per-frame multiplicative damping of angular velocity.
pub const FREELOOK_DAMPING: f32 = 0.94;
/// Angular velocity clamp (radians per second).
pub const FREELOOK_MAX_VELOCITY: f32 = 3.5;
/// Velocities below this are snapped to exactly zero.
pub const FREELOOK_VELOCITY_EPSILON: f32 = 1e-4;

/// Stand-off distance from a focused body (multiples of its bounding radius).
pub const FOCUS_STANDOFF_RADII: f32 = 4.0;
/// Minimum absolute stand-off distance.
pub const FOCUS_STANDOFF_MIN: f32 = 3.0;
/// Cinematic approach offset around the vertical axis (radians).
pub const FOCUS_APPROACH_ANGLE: f32 = 0.45;
pub const FOCUS_DURATION_SEC: f32 = 1.6;
pub const RETURN_DURATION_SEC: f32 = 1.1;
/// Height of the flight arc as a fraction of the travel distance.
pub const FOCUS_ARC_HEIGHT: f32 = 0.22;

/// Depth-of-field blur weight while focused.
pub const DOF_STRENGTH: f32 = 0.85;
