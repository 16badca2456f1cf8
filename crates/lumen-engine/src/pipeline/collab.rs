use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::ScreenRect;
use crate::device::{Canvas2d, FogParams};
use crate::paint::Color;

use super::ShaderUniformSetterFactory;

/// Which eye a view is rendered for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Eye {
    Mono,
    Left,
    Right,
}

/// One rendered view of the scene: where to draw and for which eye.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    pub viewport: ScreenRect,
    pub eye: Eye,
    pub fog: FogParams,
}

/// Per-frame inputs to [`RenderingCore::draw`](super::RenderingCore::draw).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneParams {
    pub sky_color: Color,
    pub show_hud: bool,
    pub draw_wield_tool: bool,
    pub draw_crosshair: bool,
    pub fog: FogParams,
}

/// Shadow map producer owned by the rendering core.
pub trait ShadowRenderer {
    fn is_enabled(&self) -> bool;

    /// Refreshes shadow maps before the world is drawn.
    fn update_shadow_maps(&mut self);
}

/// Shadow renderer handle shared by the core that drives it and the engine
/// that lends it out.
pub type SharedShadowRenderer = Rc<RefCell<dyn ShadowRenderer>>;

/// Game client: draws the world and registers shader hooks.
pub trait Client {
    fn draw_world(&mut self, canvas: &mut dyn Canvas2d, view: &View);

    fn draw_wield_tool(&mut self, canvas: &mut dyn Canvas2d, view: &View) {
        let _ = (canvas, view);
    }

    /// Called once when a rendering core is built for this client.
    fn create_shadow_renderer(&mut self) -> Option<SharedShadowRenderer> {
        None
    }

    /// Receives shader uniform setter factories installed by the engine.
    fn add_shader_uniform_setter_factory(&mut self, factory: Box<dyn ShaderUniformSetterFactory>) {
        let _ = factory;
    }
}

/// Heads-up display drawn over the world.
pub trait Hud {
    fn draw(&mut self, canvas: &mut dyn Canvas2d, view: &View);

    fn draw_crosshair(&mut self, canvas: &mut dyn Canvas2d, view: &View);
}
