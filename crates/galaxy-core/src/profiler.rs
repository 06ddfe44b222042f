//! One-shot device capability scoring.
//!
//! The probe itself is a plain struct so frontends fill it from whatever GPU
//! API they hold (the native shell reads wgpu adapter info and limits) and
//! tests construct it directly. Scoring runs once at construction and is
//! cached for the profiler's lifetime; the only later mutation is the
//! idempotent forced performance mode.

use std::cell::Cell;

use crate::constants::{SCORE_HIGH, SCORE_MEDIUM};
use crate::tier::{geometry_tier, texture_quality, ComplexityTier, DeviceClass, TextureQuality};

/// Raw capability readings. Purely local; no network or disk I/O.
#[derive(Clone, Debug)]
pub struct DeviceProbe {
    /// Modern GPU API available (WebGPU/Vulkan/Metal class vs GL class).
    pub advanced_api: bool,
    pub float_textures: bool,
    pub depth_textures: bool,
    pub max_texture_size: u32,
    pub max_uniform_buffer_size: u32,
    /// Adapter vendor/renderer string, matched coarsely.
    pub gpu_vendor: String,
    /// Device memory hint in GiB when the platform exposes one.
    pub device_memory_gb: Option<f32>,
    pub is_mobile: bool,
    /// A prior run already forced manual performance mode.
    pub prior_performance_mode: bool,
}

impl Default for DeviceProbe {
    fn default() -> Self {
        Self {
            advanced_api: true,
            float_textures: true,
            depth_textures: true,
            max_texture_size: 4096,
            max_uniform_buffer_size: 65536,
            gpu_vendor: String::new(),
            device_memory_gb: None,
            is_mobile: false,
            prior_performance_mode: false,
        }
    }
}

pub struct DeviceProfiler {
    probe: DeviceProbe,
    score: i32,
    class: DeviceClass,
    forced_low: Cell<bool>,
}

impl DeviceProfiler {
    pub fn new(probe: DeviceProbe) -> Self {
        let score = score_probe(&probe);
        let class = if score >= SCORE_HIGH {
            DeviceClass::High
        } else if score >= SCORE_MEDIUM {
            DeviceClass::Medium
        } else {
            DeviceClass::Low
        };
        log::info!(
            "device profile: score={} class={:?} vendor={:?}",
            score,
            class,
            probe.gpu_vendor
        );
        let forced = probe.prior_performance_mode;
        Self {
            probe,
            score,
            class,
            forced_low: Cell::new(forced),
        }
    }

    pub fn probe(&self) -> &DeviceProbe {
        &self.probe
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Effective class; forced performance mode pins it to Low.
    pub fn device_class(&self) -> DeviceClass {
        if self.forced_low.get() {
            DeviceClass::Low
        } else {
            self.class
        }
    }

    /// Geometry tier for newly generated bodies.
    pub fn geometry_tier(&self) -> ComplexityTier {
        if self.forced_low.get() {
            ComplexityTier::UltraLow
        } else {
            geometry_tier(self.class, self.score)
        }
    }

    pub fn texture_quality(&self) -> TextureQuality {
        texture_quality(self.device_class())
    }

    /// Pin the profiler to the lowest tiers for the rest of the session.
    /// Idempotent.
    pub fn force_performance_mode(&self) {
        if !self.forced_low.replace(true) {
            log::warn!("performance mode forced: geometry and textures pinned to lowest tiers");
        }
    }

    /// Lift a forced performance mode (context restoration only; the
    /// perf-warning escalation stays for the session).
    pub fn release_performance_mode(&self) {
        if self.forced_low.replace(false) {
            log::info!("performance mode released");
        }
    }

    pub fn performance_mode(&self) -> bool {
        self.forced_low.get()
    }
}

fn score_probe(p: &DeviceProbe) -> i32 {
    let mut score = 0;
    if p.advanced_api {
        score += 30;
    }
    if p.float_textures {
        score += 10;
    }
    if p.depth_textures {
        score += 5;
    }
    score += match p.max_texture_size {
        s if s >= 8192 => 15,
        s if s >= 4096 => 10,
        s if s >= 2048 => 5,
        _ => 0,
    };
    if p.max_uniform_buffer_size >= 65536 {
        score += 5;
    }
    score += vendor_score(&p.gpu_vendor);
    score += match p.device_memory_gb {
        Some(gb) if gb >= 8.0 => 10,
        Some(gb) if gb >= 4.0 => 5,
        _ => 0,
    };
    if p.is_mobile {
        score -= 15;
    }
    if p.prior_performance_mode {
        score -= 20;
    }
    score
}

fn vendor_score(vendor: &str) -> i32 {
    let v = vendor.to_ascii_lowercase();
    if v.contains("nvidia") || v.contains("geforce") || v.contains("amd") || v.contains("radeon") {
        10
    } else if v.contains("apple") {
        8
    } else if v.contains("intel") {
        4
    } else if v.contains("adreno") || v.contains("mali") || v.contains("powervr") {
        -5
    } else {
        0
    }
}
