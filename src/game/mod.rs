//! Application shell: owns the renderer, reacts to input, and runs the
//! per-frame update.
//!
//! The camera, the loaded scene, and the `initialized` flag live behind
//! one mutex shared with the asset loader thread: `init` kicks off a
//! background load which publishes the finished scene under the lock,
//! while `update` bails out early until that happens. A reload simply
//! drops the flag and runs the loader again.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::engine;
use crate::graphics::Plotter;
use crate::input::{Key, Keyboard};
use crate::level::loader::{self, Scene};
use crate::world::Camera;

const TURN_SPEED: f32 = 120.0;
const WALK_SPEED: f32 = 125.0;
const RUN_SPEED: f32 = 200.0;
const JUMP_SPEED: f32 = 125.0;
const LOOK_SPEED: f32 = 1.0;

struct Shared {
    initialized: bool,
    camera: Camera,
    scene: Option<Scene>,
}

pub struct Application {
    keyboard: Arc<Keyboard>,
    renderer: engine::Renderer,
    shared: Arc<Mutex<Shared>>,
    render_metric: DurationMetric,
}

impl Application {
    pub fn new(keyboard: Arc<Keyboard>, plotter: Plotter) -> Self {
        Self {
            keyboard,
            renderer: engine::Renderer::new(plotter),
            shared: Arc::new(Mutex::new(Shared {
                initialized: false,
                camera: Camera::new(),
                scene: None,
            })),
            render_metric: DurationMetric::default(),
        }
    }

    /// Start loading a level in the background. The frame loop keeps
    /// running and picks the scene up once it is published.
    ///
    /// Initialization is all-or-nothing: a failed fetch logs the error
    /// chain and terminates the process.
    pub fn init(&self, level_path: PathBuf, texture_dir: PathBuf) {
        {
            let mut shared = self.shared.lock().unwrap();
            shared.initialized = false;
        }

        let shared = Arc::clone(&self.shared);
        std::thread::spawn(move || match loader::load_scene(&level_path, &texture_dir) {
            Ok(scene) => {
                let mut shared = shared.lock().unwrap();
                shared.camera.set_position(0.0, 0.0, 0.0);
                shared.camera.set_rotation(0.0);
                shared.scene = Some(scene);
                shared.initialized = true;
            }
            Err(err) => {
                log::error!("failed to init scene: {err:#}");
                std::process::exit(1);
            }
        });
    }

    /// Advance one frame: apply input to the camera and redraw. Does
    /// nothing while no scene is initialized.
    pub fn update(&mut self, elapsed_seconds: f32) {
        let mut shared = self.shared.lock().unwrap();
        if !shared.initialized {
            return;
        }

        self.apply_input(&mut shared.camera, elapsed_seconds);

        let scene = shared.scene.as_ref().unwrap();
        let root = if scene.walls.is_empty() { None } else { Some(0) };

        let started = Instant::now();
        self.renderer.clear();
        engine::render_bsp(
            &mut self.renderer,
            &scene.walls,
            root,
            &shared.camera,
            &scene.bank,
        );
        self.render_metric.record(started.elapsed());
        self.render_metric.report_every(60);
    }

    /// Hand the finished frame to the display surface.
    pub fn present<F>(&self, submit: F)
    where
        F: FnOnce(&[u8], usize, usize),
    {
        self.renderer.present(submit);
    }

    fn apply_input(&self, camera: &mut Camera, elapsed_seconds: f32) {
        let keyboard = &self.keyboard;
        if keyboard.is_key_pressed(Key::Up) || keyboard.is_key_pressed(Key::W) {
            camera.move_forward(RUN_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::Down) || keyboard.is_key_pressed(Key::S) {
            camera.move_backward(RUN_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::A) {
            camera.move_left(WALK_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::D) {
            camera.move_right(WALK_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::Left) {
            camera.turn_left(TURN_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::Right) {
            camera.turn_right(TURN_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::Space) {
            camera.move_up(JUMP_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::Shift) {
            camera.move_down(JUMP_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::Q) {
            camera.look_up(LOOK_SPEED * elapsed_seconds);
        }
        if keyboard.is_key_pressed(Key::E) {
            camera.look_down(LOOK_SPEED * elapsed_seconds);
        }
    }
}

/*──────────────────────── frame metrics ──────────────────────────────*/

#[derive(Default)]
struct DurationMetric {
    iterations: u32,
    total: Duration,
}

impl DurationMetric {
    fn record(&mut self, duration: Duration) {
        self.iterations += 1;
        self.total += duration;
    }

    fn report_every(&self, frames: u32) {
        if self.iterations > 0 && self.iterations % frames == 0 {
            let avg_ms = self.total.as_secs_f64() * 1000.0 / self.iterations as f64;
            log::debug!("render time avg: {avg_ms:.3} ms");
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_is_inert_until_initialized() {
        let keyboard = Arc::new(Keyboard::new());
        let mut app = Application::new(keyboard, Plotter::new(8, 8));
        // Must not panic or render without a scene.
        app.update(0.016);
        app.present(|pixels, _, _| {
            assert!(pixels.iter().all(|&b| b == 0));
        });
    }

    #[test]
    fn input_moves_camera() {
        let keyboard = Arc::new(Keyboard::new());
        let app = Application::new(Arc::clone(&keyboard), Plotter::new(8, 8));
        let mut camera = Camera::new();

        keyboard.set_pressed(Key::W, true);
        app.apply_input(&mut camera, 0.5);
        assert!((camera.z() - RUN_SPEED * 0.5).abs() < 1e-4);

        keyboard.set_pressed(Key::W, false);
        keyboard.set_pressed(Key::Left, true);
        app.apply_input(&mut camera, 0.5);
        // 60° left at TURN_SPEED=120
        assert!((camera.angle_sin() - 60f32.to_radians().sin()).abs() < 1e-4);
    }
}
