use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{Dimension, ScreenRect};
use crate::device::Canvas2d;

use super::{Client, Eye, Hud, SceneParams, SharedShadowRenderer, View};

/// Stereo mode selected by the `3d_mode` setting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ThreeDMode {
    #[default]
    None,
    SideBySide,
    CrossView,
    TopBottom,
}

impl ThreeDMode {
    /// Parses a setting value. Unknown values yield `None`.
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim() {
            "none" | "" => Some(Self::None),
            "sidebyside" => Some(Self::SideBySide),
            "crossview" => Some(Self::CrossView),
            "topbottom" => Some(Self::TopBottom),
            _ => None,
        }
    }

    pub fn layout(self) -> ScreenLayout {
        match self {
            Self::None => ScreenLayout::Full,
            Self::SideBySide | Self::CrossView => ScreenLayout::SideBySide,
            Self::TopBottom => ScreenLayout::TopBottom,
        }
    }
}

/// How the screen is split between views.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ScreenLayout {
    #[default]
    Full,
    SideBySide,
    TopBottom,
}

impl ScreenLayout {
    /// Size of one view on a screen of `screen` pixels.
    pub fn virtual_size(self, screen: Dimension) -> Dimension {
        match self {
            Self::Full => screen,
            Self::SideBySide => Dimension::new(screen.width / 2, screen.height),
            Self::TopBottom => Dimension::new(screen.width, screen.height / 2),
        }
    }

    /// Viewports of every view, first eye first.
    pub fn viewports(self, screen: Dimension) -> Vec<ScreenRect> {
        let full = ScreenRect::of_size(screen);
        let v = self.virtual_size(screen);
        match self {
            Self::Full => vec![full],
            Self::SideBySide => vec![
                ScreenRect::new(0, 0, v.width as i32, full.y1),
                ScreenRect::new(v.width as i32, 0, 2 * v.width as i32, full.y1),
            ],
            Self::TopBottom => vec![
                ScreenRect::new(0, 0, full.x1, v.height as i32),
                ScreenRect::new(0, v.height as i32, full.x1, 2 * v.height as i32),
            ],
        }
    }
}

/// Per-frame render sequencing for one client.
pub trait RenderingCore {
    fn layout(&self) -> ScreenLayout;

    /// Records one frame into an open scene.
    fn draw(&mut self, canvas: &mut dyn Canvas2d, params: &SceneParams);

    /// Shadow renderer driven by this core. It is only borrowed while shadow
    /// maps update, so collaborators may use it from their draw callbacks.
    fn shadow_renderer(&self) -> Option<SharedShadowRenderer>;
}

/// Shared state of the built-in cores.
struct CoreParts {
    client: Rc<RefCell<dyn Client>>,
    hud: Rc<RefCell<dyn Hud>>,
    shadow: Option<SharedShadowRenderer>,
}

impl CoreParts {
    fn new(client: Rc<RefCell<dyn Client>>, hud: Rc<RefCell<dyn Hud>>) -> Self {
        let shadow = client.borrow_mut().create_shadow_renderer();
        Self { client, hud, shadow }
    }

    fn update_shadows(&mut self) {
        if let Some(shadow) = &self.shadow {
            let mut shadow = shadow.borrow_mut();
            if shadow.is_enabled() {
                shadow.update_shadow_maps();
            }
        }
    }

    fn draw_view(&self, canvas: &mut dyn Canvas2d, params: &SceneParams, view: &View) {
        {
            let mut client = self.client.borrow_mut();
            client.draw_world(canvas, view);
            if params.draw_wield_tool {
                client.draw_wield_tool(canvas, view);
            }
        }

        if params.show_hud {
            let mut hud = self.hud.borrow_mut();
            if params.draw_crosshair {
                hud.draw_crosshair(canvas, view);
            }
            hud.draw(canvas, view);
        }
    }

    fn shadow_renderer(&self) -> Option<SharedShadowRenderer> {
        self.shadow.clone()
    }
}

/// Single full-screen view.
pub struct PlainCore {
    parts: CoreParts,
}

impl PlainCore {
    pub fn new(client: Rc<RefCell<dyn Client>>, hud: Rc<RefCell<dyn Hud>>) -> Self {
        Self {
            parts: CoreParts::new(client, hud),
        }
    }
}

impl RenderingCore for PlainCore {
    fn layout(&self) -> ScreenLayout {
        ScreenLayout::Full
    }

    fn draw(&mut self, canvas: &mut dyn Canvas2d, params: &SceneParams) {
        self.parts.update_shadows();
        let view = View {
            viewport: ScreenRect::of_size(canvas.screen_size()),
            eye: Eye::Mono,
            fog: params.fog,
        };
        self.parts.draw_view(canvas, params, &view);
    }

    fn shadow_renderer(&self) -> Option<SharedShadowRenderer> {
        self.parts.shadow_renderer()
    }
}

/// Two views sharing the screen, one per eye.
pub struct StereoCore {
    parts: CoreParts,
    layout: ScreenLayout,
    swap_eyes: bool,
}

impl StereoCore {
    /// `swap_eyes` puts the right eye in the first viewport (cross-eyed viewing).
    pub fn new(
        client: Rc<RefCell<dyn Client>>,
        hud: Rc<RefCell<dyn Hud>>,
        layout: ScreenLayout,
        swap_eyes: bool,
    ) -> Self {
        Self {
            parts: CoreParts::new(client, hud),
            layout,
            swap_eyes,
        }
    }
}

impl RenderingCore for StereoCore {
    fn layout(&self) -> ScreenLayout {
        self.layout
    }

    fn draw(&mut self, canvas: &mut dyn Canvas2d, params: &SceneParams) {
        self.parts.update_shadows();
        let eyes = if self.swap_eyes {
            [Eye::Right, Eye::Left]
        } else {
            [Eye::Left, Eye::Right]
        };

        let viewports = self.layout.viewports(canvas.screen_size());
        for (viewport, eye) in viewports.into_iter().zip(eyes) {
            let view = View {
                viewport,
                eye,
                fog: params.fog,
            };
            self.parts.draw_view(canvas, params, &view);
        }
    }

    fn shadow_renderer(&self) -> Option<SharedShadowRenderer> {
        self.parts.shadow_renderer()
    }
}

/// Builds the core for `mode`.
pub fn create_core(
    mode: ThreeDMode,
    client: Rc<RefCell<dyn Client>>,
    hud: Rc<RefCell<dyn Hud>>,
) -> Box<dyn RenderingCore> {
    match mode {
        ThreeDMode::None => Box::new(PlainCore::new(client, hud)),
        ThreeDMode::SideBySide => Box::new(StereoCore::new(client, hud, ScreenLayout::SideBySide, false)),
        ThreeDMode::CrossView => Box::new(StereoCore::new(client, hud, ScreenLayout::SideBySide, true)),
        ThreeDMode::TopBottom => Box::new(StereoCore::new(client, hud, ScreenLayout::TopBottom, false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{FogParams, RecordingCanvas};
    use crate::pipeline::ShadowRenderer;
    use crate::paint::Color;

    #[derive(Default)]
    struct Log(Vec<String>);

    struct TestClient {
        log: Rc<RefCell<Log>>,
        shadows: Option<Rc<RefCell<u32>>>,
    }

    struct TestShadow {
        updates: Rc<RefCell<u32>>,
    }

    impl ShadowRenderer for TestShadow {
        fn is_enabled(&self) -> bool {
            true
        }

        fn update_shadow_maps(&mut self) {
            *self.updates.borrow_mut() += 1;
        }
    }

    impl Client for TestClient {
        fn draw_world(&mut self, canvas: &mut dyn Canvas2d, view: &View) {
            self.log.borrow_mut().0.push(format!("world {:?} {}", view.eye, view.viewport.x0));
            canvas.draw_2d_rectangle(Color::BLACK, view.viewport);
        }

        fn draw_wield_tool(&mut self, _canvas: &mut dyn Canvas2d, view: &View) {
            self.log.borrow_mut().0.push(format!("wield {:?}", view.eye));
        }

        fn create_shadow_renderer(&mut self) -> Option<SharedShadowRenderer> {
            self.shadows
                .clone()
                .map(|updates| Rc::new(RefCell::new(TestShadow { updates })) as SharedShadowRenderer)
        }
    }

    struct TestHud {
        log: Rc<RefCell<Log>>,
    }

    impl Hud for TestHud {
        fn draw(&mut self, _canvas: &mut dyn Canvas2d, view: &View) {
            self.log.borrow_mut().0.push(format!("hud {:?}", view.eye));
        }

        fn draw_crosshair(&mut self, _canvas: &mut dyn Canvas2d, view: &View) {
            self.log.borrow_mut().0.push(format!("crosshair {:?}", view.eye));
        }
    }

    fn collaborators(
        shadows: Option<Rc<RefCell<u32>>>,
    ) -> (Rc<RefCell<Log>>, Rc<RefCell<dyn Client>>, Rc<RefCell<dyn Hud>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let client: Rc<RefCell<dyn Client>> = Rc::new(RefCell::new(TestClient {
            log: Rc::clone(&log),
            shadows,
        }));
        let hud: Rc<RefCell<dyn Hud>> = Rc::new(RefCell::new(TestHud { log: Rc::clone(&log) }));
        (log, client, hud)
    }

    fn params(show_hud: bool, wield: bool, crosshair: bool) -> SceneParams {
        SceneParams {
            sky_color: Color::BLACK,
            show_hud,
            draw_wield_tool: wield,
            draw_crosshair: crosshair,
            fog: FogParams::default(),
        }
    }

    // ── mode / layout ─────────────────────────────────────────────────────

    #[test]
    fn mode_parsing() {
        assert_eq!(ThreeDMode::from_setting("none"), Some(ThreeDMode::None));
        assert_eq!(ThreeDMode::from_setting("sidebyside"), Some(ThreeDMode::SideBySide));
        assert_eq!(ThreeDMode::from_setting("anaglyph"), None);
    }

    #[test]
    fn side_by_side_halves_width() {
        let screen = Dimension::new(1025, 600);
        assert_eq!(ScreenLayout::SideBySide.virtual_size(screen), Dimension::new(512, 600));
        assert_eq!(ScreenLayout::Full.virtual_size(screen), screen);
        assert_eq!(
            ScreenLayout::SideBySide.viewports(screen),
            vec![ScreenRect::new(0, 0, 512, 600), ScreenRect::new(512, 0, 1024, 600)]
        );
    }

    #[test]
    fn top_bottom_halves_height() {
        let screen = Dimension::new(800, 600);
        assert_eq!(ScreenLayout::TopBottom.virtual_size(screen), Dimension::new(800, 300));
        assert_eq!(ScreenLayout::TopBottom.viewports(screen)[1], ScreenRect::new(0, 300, 800, 600));
    }

    // ── draw order ────────────────────────────────────────────────────────

    #[test]
    fn plain_core_draw_order() {
        let (log, client, hud) = collaborators(None);
        let mut core = create_core(ThreeDMode::None, client, hud);
        let mut canvas = RecordingCanvas::new(640, 480);

        core.draw(&mut canvas, &params(true, true, true));
        assert_eq!(
            log.borrow().0,
            vec!["world Mono 0", "wield Mono", "crosshair Mono", "hud Mono"]
        );
        assert_eq!(canvas.rects[0].1, ScreenRect::new(0, 0, 640, 480));
        assert!(core.shadow_renderer().is_none());
    }

    #[test]
    fn hidden_hud_skips_crosshair() {
        let (log, client, hud) = collaborators(None);
        let mut core = create_core(ThreeDMode::None, client, hud);
        core.draw(&mut RecordingCanvas::new(10, 10), &params(false, false, true));
        assert_eq!(log.borrow().0, vec!["world Mono 0"]);
    }

    #[test]
    fn stereo_core_draws_each_eye() {
        let (log, client, hud) = collaborators(None);
        let mut core = create_core(ThreeDMode::CrossView, client, hud);
        assert_eq!(core.layout(), ScreenLayout::SideBySide);

        core.draw(&mut RecordingCanvas::new(800, 600), &params(false, false, false));
        assert_eq!(log.borrow().0, vec!["world Right 0", "world Left 400"]);
    }

    #[test]
    fn shadow_renderer_is_taken_from_client() {
        let updates = Rc::new(RefCell::new(0));
        let (_log, client, hud) = collaborators(Some(Rc::clone(&updates)));
        let mut core = create_core(ThreeDMode::None, client, hud);

        core.draw(&mut RecordingCanvas::new(10, 10), &params(false, false, false));
        core.draw(&mut RecordingCanvas::new(10, 10), &params(false, false, false));
        assert_eq!(*updates.borrow(), 2);
        assert!(core.shadow_renderer().is_some_and(|s| s.borrow().is_enabled()));
    }
}
