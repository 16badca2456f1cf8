//! Stand-in world and HUD drawn while the demo "game" runs.

use lumen_engine::coords::ScreenRect;
use lumen_engine::device::Canvas2d;
use lumen_engine::paint::Color;
use lumen_engine::pipeline::{
    Client, Eye, Hud, ShaderUniformSetter, ShaderUniformSetterFactory, UniformValues, View,
};

const GROUND: Color = Color::new(255, 76, 120, 60);
const HOTBAR: Color = Color::new(160, 20, 20, 20);
const CROSSHAIR: Color = Color::new(255, 255, 255, 255);

/// Draws a horizon band and a patch of ground. The band takes the fog color
/// produced by the installed uniform setters.
#[derive(Default)]
pub struct DemoClient {
    factories: Vec<Box<dyn ShaderUniformSetterFactory>>,
    setters: Vec<Box<dyn ShaderUniformSetter>>,
    frames: u64,
}

impl DemoClient {
    fn horizon_color(&mut self, view: &View) -> Color {
        if self.setters.is_empty() {
            self.setters = self
                .factories
                .iter()
                .filter_map(|f| f.create("world"))
                .collect();
        }

        let mut uniforms = UniformValues::new(view.fog);
        for setter in &mut self.setters {
            setter.on_set_uniforms(&mut uniforms);
        }

        match uniforms.get("fogColor") {
            Some(&[r, g, b, _]) => Color::new(255, to_u8(r), to_u8(g), to_u8(b)),
            _ => Color::new(255, 180, 200, 230),
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Client for DemoClient {
    fn draw_world(&mut self, canvas: &mut dyn Canvas2d, view: &View) {
        self.frames += 1;
        let vp = view.viewport;
        let horizon = vp.y0 + vp.height() / 2;

        // Stereo views are offset a little so the eyes disagree.
        let shift = match view.eye {
            Eye::Mono => 0,
            Eye::Left => -4,
            Eye::Right => 4,
        };

        let band = self.horizon_color(view);
        canvas.draw_2d_rectangle(band, ScreenRect::new(vp.x0, horizon - 24, vp.x1, horizon));
        canvas.draw_2d_rectangle(GROUND, ScreenRect::new(vp.x0, horizon, vp.x1, vp.y1));

        // Slowly drifting posts give the scene some motion.
        let spacing = (vp.width() / 8).max(1);
        let drift = (self.frames % spacing as u64) as i32;
        let mut x = vp.x0 + drift + shift;
        while x < vp.x1 {
            canvas.draw_2d_rectangle(
                Color::new(255, 60, 50, 40),
                ScreenRect::new(x, horizon - 40, x + 6, horizon + 10),
            );
            x += spacing;
        }
    }

    fn draw_wield_tool(&mut self, canvas: &mut dyn Canvas2d, view: &View) {
        let vp = view.viewport;
        let w = vp.width() / 10;
        canvas.draw_2d_rectangle(
            Color::new(255, 120, 90, 60),
            ScreenRect::new(vp.x1 - 2 * w, vp.y1 - w, vp.x1 - w, vp.y1),
        );
    }

    fn add_shader_uniform_setter_factory(&mut self, factory: Box<dyn ShaderUniformSetterFactory>) {
        log::debug!("demo client: shader uniform setter factory installed");
        self.factories.push(factory);
        self.setters.clear();
    }
}

/// Hotbar and crosshair.
#[derive(Debug, Default)]
pub struct DemoHud;

impl Hud for DemoHud {
    fn draw(&mut self, canvas: &mut dyn Canvas2d, view: &View) {
        let vp = view.viewport;
        let slot = 40;
        let width = slot * 8;
        let x = vp.x0 + (vp.width() - width) / 2;
        canvas.draw_2d_rectangle(HOTBAR, ScreenRect::from_pos_size(x, vp.y1 - slot - 8, width, slot));
    }

    fn draw_crosshair(&mut self, canvas: &mut dyn Canvas2d, view: &View) {
        let vp = view.viewport;
        let (cx, cy) = (vp.x0 + vp.width() / 2, vp.y0 + vp.height() / 2);
        canvas.draw_2d_rectangle(CROSSHAIR, ScreenRect::new(cx - 8, cy - 1, cx + 8, cy + 1));
        canvas.draw_2d_rectangle(CROSSHAIR, ScreenRect::new(cx - 1, cy - 8, cx + 1, cy + 8));
    }
}
