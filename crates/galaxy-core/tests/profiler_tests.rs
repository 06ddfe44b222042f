// Host-side tests for device capability scoring and the tier tables.

use galaxy_core::{ComplexityTier, DeviceClass, DeviceProbe, DeviceProfiler};

fn desktop_probe() -> DeviceProbe {
    DeviceProbe {
        advanced_api: true,
        float_textures: true,
        depth_textures: true,
        max_texture_size: 8192,
        max_uniform_buffer_size: 65536,
        gpu_vendor: "NVIDIA GeForce RTX 4080".to_owned(),
        device_memory_gb: Some(16.0),
        is_mobile: false,
        prior_performance_mode: false,
    }
}

#[test]
fn maxed_out_desktop_reaches_ultra_high() {
    let profiler = DeviceProfiler::new(desktop_probe());
    assert_eq!(profiler.device_class(), DeviceClass::High);
    assert_eq!(profiler.geometry_tier(), ComplexityTier::UltraHigh);
    let quality = profiler.texture_quality();
    assert_eq!(quality.max_resolution, 2048);
    assert!(quality.mipmaps);
}

#[test]
fn solid_but_not_maxed_desktop_stays_at_high() {
    let probe = DeviceProbe {
        max_texture_size: 4096,
        device_memory_gb: Some(8.0),
        ..desktop_probe()
    };
    let profiler = DeviceProfiler::new(probe);
    assert_eq!(profiler.device_class(), DeviceClass::High);
    assert_eq!(
        profiler.geometry_tier(),
        ComplexityTier::High,
        "below the ultra threshold"
    );
}

#[test]
fn default_probe_is_medium() {
    let profiler = DeviceProfiler::new(DeviceProbe::default());
    assert_eq!(profiler.device_class(), DeviceClass::Medium);
    assert_eq!(profiler.geometry_tier(), ComplexityTier::Medium);
    assert_eq!(profiler.texture_quality().max_resolution, 1024);
}

#[test]
fn mobile_heuristic_penalizes_into_low() {
    let probe = DeviceProbe {
        advanced_api: true,
        float_textures: false,
        depth_textures: true,
        max_texture_size: 4096,
        max_uniform_buffer_size: 16384,
        gpu_vendor: "Adreno 640".to_owned(),
        device_memory_gb: None,
        is_mobile: true,
        prior_performance_mode: false,
    };
    let profiler = DeviceProfiler::new(probe);
    assert_eq!(profiler.device_class(), DeviceClass::Low);
    assert_eq!(profiler.geometry_tier(), ComplexityTier::Low);
    let quality = profiler.texture_quality();
    assert_eq!(quality.max_resolution, 512);
    assert!(!quality.mipmaps);
    assert!(quality.compressed);
}

#[test]
fn prior_performance_mode_pins_lowest_tiers() {
    let probe = DeviceProbe {
        prior_performance_mode: true,
        ..desktop_probe()
    };
    let profiler = DeviceProfiler::new(probe);
    assert!(profiler.performance_mode());
    assert_eq!(profiler.device_class(), DeviceClass::Low);
    assert_eq!(profiler.geometry_tier(), ComplexityTier::UltraLow);
}

#[test]
fn forcing_performance_mode_is_idempotent() {
    let profiler = DeviceProfiler::new(desktop_probe());
    assert!(!profiler.performance_mode());
    profiler.force_performance_mode();
    let tier = profiler.geometry_tier();
    assert_eq!(tier, ComplexityTier::UltraLow);
    profiler.force_performance_mode();
    assert_eq!(profiler.geometry_tier(), tier, "second call is a no-op");
    // The cached score is untouched; only the effective class changes.
    assert_eq!(profiler.device_class(), DeviceClass::Low);
}

#[test]
fn score_is_cached_at_construction() {
    let profiler = DeviceProfiler::new(desktop_probe());
    let score = profiler.score();
    // Nothing on the profiler recomputes: repeated reads agree.
    for _ in 0..3 {
        assert_eq!(profiler.score(), score);
    }
}
