use std::rc::Rc;
use std::time::Instant;

use glam::{Vec3, Vec4};
use winit::{event::*, event_loop::EventLoop, keyboard, window::WindowBuilder};

use galaxy_core::{
    DeviceProbe, FocusObserver, Galaxy, GalaxyObserver, TrackRecord,
};

mod render;

/// Golden angle in radians; successive bodies spiral outward without
/// clumping.
const GOLDEN_ANGLE: f32 = 2.399963;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Crystal Galaxy")
        .build(&event_loop)
        .expect("window");

    let (mut state, adapter) =
        pollster::block_on(render::GpuState::new(&window)).expect("gpu");

    let mut galaxy = Galaxy::new(probe_from_adapter(&adapter));
    let observer = Rc::new(LogObserver);
    galaxy.add_focus_observer(observer.clone());
    galaxy.add_observer(observer);

    let tracks = demo_library();
    galaxy.sync_tracks(&tracks);
    layout_spiral(&mut galaxy, &tracks);
    state.upload(&galaxy);

    log::info!(
        "galaxy ready: {} bodies at tier {:?}",
        galaxy.body_count(),
        galaxy.profiler().geometry_tier()
    );
    log::info!("drag = rotate, wheel = zoom, click = focus, Esc = exit focus");
    log::info!("Tab = orbit/free-look, P = perf warning, L = context loss, R = restore");

    let mut last_frame = Instant::now();
    let mut last_dt = 1.0 / 60.0_f32;
    let mut cursor = (0.0_f32, 0.0_f32);
    let mut press_cursor = (0.0_f32, 0.0_f32);
    let mut pointer_down = false;
    let mut needs_upload = false;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => state.resize(size),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                galaxy.dispose();
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                cursor = (position.x as f32, position.y as f32);
                galaxy
                    .camera_mut()
                    .pointer_move(cursor.0, cursor.1, last_dt);
                if !pointer_down {
                    let hovered = pick_body(&galaxy, &state, cursor);
                    galaxy.set_hovered(hovered.as_deref());
                }
            }
            Event::WindowEvent {
                event:
                    WindowEvent::MouseInput {
                        state: button_state,
                        button: MouseButton::Left,
                        ..
                    },
                ..
            } => match button_state {
                ElementState::Pressed => {
                    pointer_down = true;
                    press_cursor = cursor;
                    galaxy.camera_mut().pointer_down(cursor.0, cursor.1);
                }
                ElementState::Released => {
                    pointer_down = false;
                    galaxy.camera_mut().pointer_up();
                    let moved = (cursor.0 - press_cursor.0).abs()
                        + (cursor.1 - press_cursor.1).abs();
                    if moved < 4.0 {
                        if let Some(id) = pick_body(&galaxy, &state, cursor) {
                            galaxy.focus_track(&id);
                        }
                    }
                }
            },
            Event::WindowEvent {
                event: WindowEvent::MouseWheel { delta, .. },
                ..
            } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                galaxy.camera_mut().wheel(amount);
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: keyboard::PhysicalKey::Code(code),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => match code {
                keyboard::KeyCode::Escape => {
                    galaxy.exit_focus();
                }
                keyboard::KeyCode::Tab => {
                    galaxy.camera_mut().toggle_mode();
                    log::info!(
                        "camera mode: {}",
                        if galaxy.camera().orbit_mode() {
                            "orbit"
                        } else {
                            "free-look"
                        }
                    );
                }
                keyboard::KeyCode::KeyP => {
                    galaxy.report_performance_warning("frame-time-ms", 16.6, 41.0);
                    needs_upload = true;
                }
                keyboard::KeyCode::KeyL => {
                    galaxy.handle_context_loss();
                    needs_upload = true;
                }
                keyboard::KeyCode::KeyR => {
                    galaxy.handle_context_restored();
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = (now - last_frame).as_secs_f32().min(0.1);
                last_frame = now;
                last_dt = dt.max(1e-4);

                galaxy.tick(dt);
                if needs_upload {
                    needs_upload = false;
                    state.upload(&galaxy);
                }
                match state.render(&galaxy) {
                    Ok(_) => state.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(_) => {}
                }
            }
            _ => {}
        })
        .unwrap();
}

// ---------------- Observers ----------------

struct LogObserver;

impl FocusObserver for LogObserver {
    fn on_focus_start(&self, track_id: &str) {
        log::info!("focusing on {track_id}");
    }
    fn on_focus_complete(&self, track_id: &str) {
        log::info!("focused on {track_id} (Esc to exit)");
    }
    fn on_return_start(&self) {
        log::info!("returning to saved pose");
    }
    fn on_return_complete(&self) {
        log::info!("back to free flight");
    }
}

impl GalaxyObserver for LogObserver {
    fn on_body_selected(&self, track_id: &str) {
        log::info!("selected {track_id}");
    }
    fn on_performance_degraded(&self) {
        log::warn!("performance degraded: quality lowered for this session");
    }
}

// ---------------- Device probe ----------------

fn probe_from_adapter(adapter: &wgpu::Adapter) -> DeviceProbe {
    let info = adapter.get_info();
    let limits = adapter.limits();
    let features = adapter.features();
    DeviceProbe {
        advanced_api: info.backend != wgpu::Backend::Gl,
        float_textures: features.contains(wgpu::Features::FLOAT32_FILTERABLE),
        depth_textures: true,
        max_texture_size: limits.max_texture_dimension_2d,
        max_uniform_buffer_size: limits.max_uniform_buffer_binding_size,
        gpu_vendor: info.name.clone(),
        device_memory_gb: None,
        is_mobile: false,
        prior_performance_mode: std::env::var("GALAXY_PERFORMANCE_MODE").is_ok(),
    }
}

// ---------------- Layout and picking ----------------

/// External layout pass: golden-angle spiral with gentle vertical wobble.
fn layout_spiral(galaxy: &mut Galaxy, tracks: &[TrackRecord]) {
    for (i, track) in tracks.iter().enumerate() {
        let n = i as f32;
        let radius = 6.0 + 2.2 * n.sqrt();
        let theta = n * GOLDEN_ANGLE;
        let position = Vec3::new(
            radius * theta.cos(),
            (n * 0.7).sin() * 2.5,
            radius * theta.sin(),
        );
        galaxy.set_body_position(&track.id, position);
    }
}

fn screen_to_world_ray(
    galaxy: &Galaxy,
    state: &render::GpuState,
    sx: f32,
    sy: f32,
) -> (Vec3, Vec3) {
    let pose = galaxy.camera().pose();
    let (width, height) = state.window_size();
    let ndc_x = (2.0 * sx / width) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height);
    let inv = state.view_proj(pose.eye, pose.target).inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p_far: Vec3 = p_far.truncate() / p_far.w;
    let rd = (p_far - pose.eye).normalize();
    (pose.eye, rd)
}

fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Nearest body hit by the cursor ray, if any.
fn pick_body(galaxy: &Galaxy, state: &render::GpuState, cursor: (f32, f32)) -> Option<String> {
    let (ro, rd) = screen_to_world_ray(galaxy, state, cursor.0, cursor.1);
    let mut best: Option<(f32, String)> = None;
    for body in galaxy.bodies() {
        // Generous pick radius so small tiers stay clickable.
        let radius = body.bounding_radius().max(0.8);
        if let Some(t) = ray_sphere(ro, rd, body.position, radius) {
            if best.as_ref().map(|(bt, _)| t < *bt).unwrap_or(true) {
                best = Some((t, body.track_id.clone()));
            }
        }
    }
    best.map(|(_, id)| id)
}

// ---------------- Demo library ----------------

/// Stand-in for the excluded data-collection layer.
fn demo_library() -> Vec<TrackRecord> {
    let seedlist: [(&str, &str, &str, &str, &str, u32, u8, Option<f32>, Option<f32>); 20] = [
        ("trk-001", "Master of Puppets", "Metallica", "metal", "Master of Puppets", 515, 93, Some(212.0), Some(0.95)),
        ("trk-002", "Paranoid Android", "Radiohead", "rock", "OK Computer", 386, 88, Some(82.0), Some(0.62)),
        ("trk-003", "Clair de Lune", "Debussy", "classical", "Suite bergamasque", 300, 75, None, Some(0.12)),
        ("trk-004", "Windowlicker", "Aphex Twin", "electronic", "Windowlicker", 366, 71, Some(126.0), Some(0.7)),
        ("trk-005", "So What", "Miles Davis", "jazz", "Kind of Blue", 562, 80, Some(136.0), Some(0.4)),
        ("trk-006", "Blitzkrieg Bop", "Ramones", "punk", "Ramones", 132, 69, Some(176.0), Some(0.9)),
        ("trk-007", "N.Y. State of Mind", "Nas", "rap", "Illmatic", 294, 84, Some(93.0), Some(0.68)),
        ("trk-008", "Teardrop", "Massive Attack", "electronic", "Mezzanine", 330, 82, Some(78.0), Some(0.35)),
        ("trk-009", "Ambient 1/1", "Brian Eno", "ambient", "Music for Airports", 1043, 56, None, Some(0.08)),
        ("trk-010", "Holiday in Cambodia", "Dead Kennedys", "punk", "Fresh Fruit", 225, 61, Some(128.0), Some(0.88)),
        ("trk-011", "Hurt", "Johnny Cash", "folk", "American IV", 216, 90, Some(95.0), Some(0.3)),
        ("trk-012", "One More Time", "Daft Punk", "dance", "Discovery", 320, 92, Some(123.0), Some(0.85)),
        ("trk-013", "Bohemian Rhapsody", "Queen", "rock", "A Night at the Opera", 354, 97, Some(72.0), Some(0.7)),
        ("trk-014", "Spiegel im Spiegel", "Arvo Part", "classical", "Spiegel im Spiegel", 480, 64, None, Some(0.1)),
        ("trk-015", "Angel of Death", "Slayer", "metal", "Reign in Blood", 291, 74, Some(210.0), Some(0.98)),
        ("trk-016", "Midnight City", "M83", "indie", "Hurry Up, We're Dreaming", 244, 86, Some(105.0), Some(0.75)),
        ("trk-017", "Juicy", "The Notorious B.I.G.", "hip-hop", "Ready to Die", 302, 89, Some(97.0), Some(0.72)),
        ("trk-018", "Take Five", "Dave Brubeck", "jazz", "Time Out", 324, 83, Some(174.0), Some(0.5)),
        ("trk-019", "Svefn-g-englar", "Sigur Ros", "ambient", "Agaetis byrjun", 610, 62, None, Some(0.2)),
        ("trk-020", "Toxic", "Britney Spears", "pop", "In the Zone", 199, 91, Some(143.0), Some(0.8)),
    ];
    seedlist
        .iter()
        .map(
            |&(id, title, artist, genre, album, duration_sec, popularity, bpm, energy)| {
                TrackRecord {
                    id: id.to_owned(),
                    title: title.to_owned(),
                    artist: artist.to_owned(),
                    album: album.to_owned(),
                    genre: genre.to_owned(),
                    duration_sec,
                    popularity,
                    bpm,
                    energy,
                }
            },
        )
        .collect()
}
