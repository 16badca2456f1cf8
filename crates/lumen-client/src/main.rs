use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use lumen_engine::coords::{Dimension, ScreenRect};
use lumen_engine::gui::Align;
use lumen_engine::input::{EventReceiver, Key};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::paint::Color;
use lumen_engine::{EngineConfig, FpsControl, RenderingEngine, Settings};

mod demo;

const CONF_PATH: &str = "lumen.conf";
const LOAD_STEPS: [&str; 4] = [
    "Loading textures...",
    "Building meshes...",
    "Preparing shaders...",
    "Starting game...",
];

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let settings = Rc::new(match std::fs::read_to_string(CONF_PATH) {
        Ok(src) => Settings::from_conf_str(&src),
        Err(_) => Settings::new(),
    });
    let receiver = Rc::new(RefCell::new(EventReceiver::new()));

    let initial_size = Dimension::new(settings.get_u32("screen_w"), settings.get_u32("screen_h"));
    let initial_maximized = settings.get_bool("window_maximized");

    let engine = RenderingEngine::new(EngineConfig::default(), Rc::clone(&settings), Rc::clone(&receiver))?;
    engine.file_system().add_search_path("assets");
    if let Err(e) = engine.gui_env().set_font(&load_font()) {
        log::warn!("no usable font, text will not be drawn: {e:#}");
    }
    engine.setup_top_level_window();
    engine.set_resizable(true);

    let mut fps = FpsControl::new();
    let running = run_menu(&engine, &receiver, &mut fps)
        && run_loading(&engine, &mut fps)
        && run_game(&engine, &receiver, &mut fps);

    RenderingEngine::autosave_screensize_and_co(initial_size, initial_maximized);
    drop(engine);
    log::info!("shutting down (window closed: {})", !running);
    Ok(())
}

/// Main menu until Enter is pressed.
fn run_menu(engine: &RenderingEngine, receiver: &RefCell<EventReceiver>, fps: &mut FpsControl) -> bool {
    let mut size = RenderingEngine::window_size();
    let hint = {
        let mut gui = engine.gui_env();
        let id = gui.add_static_text("Press Enter to start", hint_area(size), Align::Center, Align::End);
        gui.set_text_color(id, Color::WHITE);
        id
    };

    fps.reset();
    let mut dtime = 0.0;
    let running = loop {
        if !engine.run() {
            break false;
        }
        if receiver.borrow().was_key_pressed(Key::Enter) {
            break true;
        }
        handle_common_keys(engine, receiver);

        let now = RenderingEngine::window_size();
        if now != size {
            size = now;
            engine.gui_env().set_rect(hint, hint_area(size));
        }

        engine.begin_scene(Some(engine.menu_sky_color()));
        engine.draw_menu_stars(dtime);
        {
            let mut driver = engine.video_driver();
            engine.gui_env().draw_all(&mut *driver);
        }
        engine.end_scene();

        dtime = fps.limit(engine.fps_limit());
    };

    engine.gui_env().remove(hint);
    running
}

/// Screen area above the bottom margin, where the menu hint sits.
fn hint_area(size: Dimension) -> ScreenRect {
    ScreenRect::new(0, 0, size.width as i32, size.height as i32 - 32)
}

/// Simulated asset loading: an indefinite phase followed by stepped progress.
fn run_loading(engine: &RenderingEngine, fps: &mut FpsControl) -> bool {
    fps.reset();
    let mut dtime = 0.0;
    let mut indef_pos = 0.0;
    let mut elapsed = 0.0;
    while elapsed < 1.0 {
        if !engine.run() {
            return false;
        }
        engine.draw_load_screen("Connecting...", dtime, 0, Some(&mut indef_pos));
        dtime = fps.limit(engine.fps_limit());
        elapsed += dtime;
    }

    for (i, step) in LOAD_STEPS.iter().enumerate() {
        let base = i as f32 * 25.0;
        let mut done = 0.0;
        while done < 25.0 {
            if !engine.run() {
                return false;
            }
            engine.draw_load_screen(step, dtime, (base + done) as i32, None);
            dtime = fps.limit(engine.fps_limit());
            done += dtime * 40.0;
        }
    }
    true
}

/// Game scene until Escape is pressed or the window closes.
fn run_game(engine: &RenderingEngine, receiver: &RefCell<EventReceiver>, fps: &mut FpsControl) -> bool {
    engine.initialize(
        Rc::new(RefCell::new(demo::DemoClient::default())),
        Rc::new(RefCell::new(demo::DemoHud)),
    );

    fps.reset();
    let mut show_hud = true;
    let mut running = true;
    loop {
        if !engine.run() {
            running = false;
            break;
        }
        let rx = receiver.borrow();
        if rx.was_key_pressed(Key::Escape) {
            break;
        }
        if rx.was_key_pressed(Key::Tab) {
            show_hud = !show_hud;
        }
        drop(rx);
        handle_common_keys(engine, receiver);

        engine.draw_scene(Color::new(255, 140, 186, 250), show_hud, show_hud, show_hud);
        let removed = engine.cleanup_mesh_cache();
        if removed > 0 {
            log::debug!("dropped {removed} unused meshes");
        }

        fps.limit(engine.fps_limit());
    }

    engine.finalize();
    running
}

fn handle_common_keys(engine: &RenderingEngine, receiver: &RefCell<EventReceiver>) {
    if receiver.borrow().was_key_pressed(Key::F11) {
        let settings = engine.settings();
        settings.set_bool("fullscreen", !settings.get_bool("fullscreen"));
    }
}

fn load_font() -> Vec<u8> {
    [
        "assets/fonts/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default()
}
