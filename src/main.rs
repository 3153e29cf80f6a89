// What you SEE:
// • Left: the canvas. Right: the live camera with your ink, the controls and a HUD.
// • Pinch index finger and thumb to draw; hover an open hand over a control to use it.
// • Without AIR_CANVAS_DETECTOR the mouse is the hand: hold the left button to pinch.
// • C clears the canvas, T toggles the background, ESC quits.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use air_canvas::camera::CameraCapture;
use air_canvas::config::{CoordinateSpace, InputMapping};
use air_canvas::detector::{PointerSimulator, SubprocessDetector};
use air_canvas::draw::Drawer;
use air_canvas::render::{panel_point, Renderer};
use air_canvas::{CanvasConfig, FrameBuffer, Interpreter, LandmarkSource};

const CONFIG_ENV: &str = "AIR_CANVAS_CONFIG";
const DETECTOR_ENV: &str = "AIR_CANVAS_DETECTOR";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("air_canvas=info")),
        )
        .init();

    /* --- Config --- */
    let mut config = match env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            CanvasConfig::load(&path).with_context(|| format!("loading {}", path.display()))?
        }
        None => CanvasConfig::default(),
    };
    // The camera view is mirrored whenever the landmarks are.
    let mirror_live = config.input.mirror_x;

    /* --- Hand source --- */
    let mut detector = match env::var(DETECTOR_ENV) {
        Ok(command) => Some(SubprocessDetector::spawn(&command).context("starting landmark detector")?),
        Err(_) => {
            info!("{DETECTOR_ENV} not set, the mouse stands in for the hand");
            config.input = InputMapping { space: CoordinateSpace::Pixels, mirror_x: false };
            None
        }
    };
    let mut pointer = PointerSimulator::default();

    let interpreter = Interpreter::new(config).context("invalid canvas config")?;
    let mut session = interpreter.session();
    let (w, h) = (interpreter.config().width, interpreter.config().height);

    /* --- Camera + window ---
       A detector needs frames; the mouse does not, so it can run without a camera. */
    let mut cam = match CameraCapture::new(0, w as u32, h as u32) {
        Ok(cam) => Some(cam),
        Err(e) if detector.is_none() => {
            warn!(error = %e, "no camera, showing a blank live view");
            None
        }
        Err(e) => return Err(e).context("opening camera"),
    };
    let blank = FrameBuffer::new(w, h, 0x00_20_20_20);

    let mut renderer = Renderer::new(interpreter.config(), interpreter.layout(), mirror_live);
    let (win_w, win_h) = renderer.window_size();
    let mut drawer = Drawer::new("Air Canvas", win_w, win_h).context("opening window")?;

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut fps = 0.0f32;

    info!("session started");
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        let captured;
        let live = match cam.as_mut() {
            Some(cam) => {
                captured = cam.next_frame().context("reading camera frame")?;
                &captured
            }
            None => &blank,
        };

        if drawer.c_pressed_once() {
            session.clear_canvas();
        }
        if drawer.t_pressed_once() {
            session.toggle_background();
        }

        let snapshot = match detector.as_mut() {
            Some(d) => d.detect(live).context("landmark detector failed")?,
            None => {
                let at = drawer.mouse_pos().map(|(x, y)| panel_point(x, y, w));
                pointer.set(at, drawer.left_mouse_down());
                pointer.detect(live)?
            }
        };

        let out = interpreter.step(&mut session, &snapshot);
        let screen = renderer.render(interpreter.layout(), &session, &out, live, fps);
        drawer.present(screen).context("presenting frame")?;

        frames_this_second += 1;
        let elapsed = now.duration_since(last_fps_time);
        if elapsed >= Duration::from_secs(1) {
            fps = frames_this_second as f32 / elapsed.as_secs_f32();
            info!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!(frames = session.frames(), inked = session.drawing().canvas().inked(), "session ended");
    Ok(())
}
