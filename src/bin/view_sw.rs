//! Realtime software viewer.
//!
//! ```bash
//! cargo run --release -- <level.json> [texture_dir]
//! ```
//!
//! Textures default to a `textures/` directory beside the level file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use minifb::{Window, WindowOptions};

use wallcast::game::Application;
use wallcast::graphics::Plotter;
use wallcast::input::{Key, Keyboard};

const W: usize = 1024;
const H: usize = 768;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ─────────── parse CLI ────────────
    let mut args = std::env::args().skip(1);
    let level_path = PathBuf::from(args.next().expect("usage: view_sw <level.json> [texture_dir]"));
    let texture_dir = args.next().map(PathBuf::from).unwrap_or_else(|| {
        level_path
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("textures")
    });

    // ─────────── application + async level fetch ───────────
    let keyboard = Arc::new(Keyboard::new());
    let mut app = Application::new(Arc::clone(&keyboard), Plotter::new(W, H));
    app.init(level_path, texture_dir);

    // ─────────── window + frame loop ────────────
    let mut window = Window::new("Wallcast Software Render", W, H, WindowOptions::default())?;
    window.set_target_fps(66); // ~15 ms per frame

    let mut framebuffer = vec![0u32; W * H];
    let mut last_frame = Instant::now();

    while window.is_open() && !window.is_key_down(minifb::Key::Escape) {
        poll_keys(&window, &keyboard);

        let now = Instant::now();
        let elapsed_seconds = (now - last_frame).as_secs_f32();
        last_frame = now;

        app.update(elapsed_seconds);
        app.present(|pixels, _, _| {
            // RGBA bytes → 0xAARRGGBB words for minifb.
            for (dst, src) in framebuffer.iter_mut().zip(pixels.chunks_exact(4)) {
                *dst = u32::from(src[3]) << 24
                    | u32::from(src[0]) << 16
                    | u32::from(src[1]) << 8
                    | u32::from(src[2]);
            }
        });
        window.update_with_buffer(&framebuffer, W, H)?;
    }
    Ok(())
}

/// Mirror the window's key state into the shared pressed-key set.
fn poll_keys(window: &Window, keyboard: &Keyboard) {
    use minifb::Key as Mk;

    let pairs = [
        (Key::Up, Mk::Up),
        (Key::Down, Mk::Down),
        (Key::Left, Mk::Left),
        (Key::Right, Mk::Right),
        (Key::Space, Mk::Space),
        (Key::W, Mk::W),
        (Key::A, Mk::A),
        (Key::S, Mk::S),
        (Key::D, Mk::D),
        (Key::Q, Mk::Q),
        (Key::E, Mk::E),
    ];
    for (key, minifb_key) in pairs {
        keyboard.set_pressed(key, window.is_key_down(minifb_key));
    }
    keyboard.set_pressed(
        Key::Shift,
        window.is_key_down(Mk::LeftShift) || window.is_key_down(Mk::RightShift),
    );
}
