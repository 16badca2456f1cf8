use std::cell::{Cell, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;
use winit::window::{Fullscreen, Icon, Window};

use crate::coords::{Dimension, ScreenRect};
use crate::device::{
    self, Canvas2d, DriverType, SurfaceErrorAction, VideoDriver, VideoDriverInfo,
};
use crate::gui::{Align, GuiEnvironment};
use crate::input::{EventReceiver, PointerType};
use crate::io::{FileSystem, FileTextureSource, TextureSource};
use crate::menu::MenuDecor;
use crate::paint::Color;
use crate::pipeline::{
    create_core, Client, FogShaderUniformSetterFactory, Hud, RenderingCore, SceneParams,
    ScreenLayout, ShadowRenderer, SharedShadowRenderer, ThreeDMode,
};
use crate::render::Texture;
use crate::scene::{Mesh, SceneManager};
use crate::settings::{CallbackToken, Settings};

use super::autosave::{AutosaveUpdate, WindowState};
use super::config::{gpu_init_from_settings, window_attributes, EngineConfig};
use super::load_screen::{self, BarTextures, ProgressSpan};
use super::pump::{self, EventPump};

thread_local! {
    static INSTANCE: RefCell<Weak<EngineInner>> = const { RefCell::new(Weak::new()) };
}

/// Engine state shared between the owning [`RenderingEngine`] and the
/// thread-local singleton. Field order is drop order.
struct EngineInner {
    core: RefCell<Option<Box<dyn RenderingCore>>>,
    layout: Cell<ScreenLayout>,
    shadow: RefCell<Option<SharedShadowRenderer>>,

    gui: RefCell<GuiEnvironment>,
    menu: RefCell<MenuDecor>,
    scene: RefCell<SceneManager>,
    textures: RefCell<FileTextureSource>,
    fs: RefCell<FileSystem>,

    driver: RefCell<VideoDriver>,
    window: Arc<Window>,
    event_loop: RefCell<EventLoop<()>>,

    receiver: Rc<RefCell<EventReceiver>>,
    settings: Rc<Settings>,
    config: EngineConfig,

    exit_requested: Cell<bool>,
    callbacks: RefCell<Vec<CallbackToken>>,
}

/// Facade over the window, the video driver and the engine subsystems.
///
/// Exactly one engine may exist per thread. While it is alive the static
/// accessors ([`window_size`](Self::window_size),
/// [`with_video_driver`](Self::with_video_driver), ...) reach it without a
/// handle; calling them with no engine is a programming error and panics.
///
/// While [`draw_scene`](Self::draw_scene) runs the client and HUD, the driver
/// is lent to the frame. Collaborators draw through the canvas they are given
/// and may call [`window_size`](Self::window_size),
/// [`display_density`](Self::display_density),
/// [`raw_window`](Self::raw_window),
/// [`last_pointer_type`](Self::last_pointer_type),
/// [`with_shadow_renderer`](Self::with_shadow_renderer) and the driver
/// tables. [`with_video_driver`](Self::with_video_driver) panics there.
pub struct RenderingEngine {
    inner: Rc<EngineInner>,
}

impl RenderingEngine {
    /// Opens the window and video driver described by `config` and `settings`
    /// and registers the engine as this thread's singleton.
    ///
    /// # Panics
    /// If another engine is alive on this thread.
    pub fn new(
        config: EngineConfig,
        settings: Rc<Settings>,
        receiver: Rc<RefCell<EventReceiver>>,
    ) -> Result<Self> {
        assert!(
            !Self::exists(),
            "RenderingEngine: an engine already exists on this thread"
        );

        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let attrs = window_attributes(&config, &settings);
        let gpu = gpu_init_from_settings(&config.gpu, &settings);
        let (window, driver) = pump::open_window(&mut event_loop, attrs, gpu, config.max_startup_pumps)?;

        let inner = Rc::new(EngineInner {
            core: RefCell::new(None),
            layout: Cell::new(ScreenLayout::Full),
            shadow: RefCell::new(None),
            gui: RefCell::new(GuiEnvironment::new()),
            menu: RefCell::new(MenuDecor::new()),
            scene: RefCell::new(SceneManager::new()),
            textures: RefCell::new(FileTextureSource::new()),
            fs: RefCell::new(FileSystem::new()),
            driver: RefCell::new(driver),
            window,
            event_loop: RefCell::new(event_loop),
            receiver,
            settings,
            config,
            exit_requested: Cell::new(false),
            callbacks: RefCell::new(Vec::new()),
        });

        register_window_callbacks(&inner);
        INSTANCE.with(|i| *i.borrow_mut() = Rc::downgrade(&inner));

        log::info!(
            "rendering engine up: {}x{} on {}",
            inner.window.inner_size().width,
            inner.window.inner_size().height,
            inner.driver.borrow().driver_type().info().friendly_name,
        );
        Ok(Self { inner })
    }

    /// True while an engine is alive on this thread.
    pub fn exists() -> bool {
        INSTANCE.with(|i| i.borrow().strong_count() > 0)
    }

    fn instance() -> Rc<EngineInner> {
        INSTANCE
            .with(|i| i.borrow().upgrade())
            .expect("RenderingEngine: no engine on this thread")
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn video_driver(&self) -> RefMut<'_, VideoDriver> {
        self.inner.driver.borrow_mut()
    }

    pub fn file_system(&self) -> RefMut<'_, FileSystem> {
        self.inner.fs.borrow_mut()
    }

    pub fn scene_manager(&self) -> RefMut<'_, SceneManager> {
        self.inner.scene.borrow_mut()
    }

    pub fn gui_env(&self) -> RefMut<'_, GuiEnvironment> {
        self.inner.gui.borrow_mut()
    }

    pub fn settings(&self) -> &Rc<Settings> {
        &self.inner.settings
    }

    pub fn event_receiver(&self) -> &Rc<RefCell<EventReceiver>> {
        &self.inner.receiver
    }

    // ── static accessors ──────────────────────────────────────────────────

    /// Size of one rendered view. Stereo layouts split the window.
    pub fn window_size() -> Dimension {
        Self::instance().window_size()
    }

    /// GUI scale of the display: the `display_density_factor` setting times
    /// the window scale factor.
    pub fn display_density() -> f32 {
        Self::instance().display_density()
    }

    /// # Panics
    /// From inside a frame being drawn, where the driver is already lent out.
    pub fn with_video_driver<R>(f: impl FnOnce(&mut VideoDriver) -> R) -> R {
        let inner = Self::instance();
        let Ok(mut driver) = inner.driver.try_borrow_mut() else {
            panic!("RenderingEngine::with_video_driver: driver is lent to the frame being drawn, use its canvas");
        };
        f(&mut driver)
    }

    /// The native window the engine renders to.
    pub fn raw_window() -> Arc<Window> {
        Arc::clone(&Self::instance().window)
    }

    pub fn last_pointer_type() -> PointerType {
        Self::instance().receiver.borrow().last_pointer_type()
    }

    /// Runs `f` on the shadow renderer of the active core, if there is one.
    /// Usable while a frame is being drawn.
    ///
    /// # Panics
    /// When called again from inside `f` or from the shadow renderer itself.
    pub fn with_shadow_renderer<R>(f: impl FnOnce(&mut dyn ShadowRenderer) -> R) -> Option<R> {
        lend_shadow_renderer(&Self::instance().shadow, f)
    }

    pub fn video_driver_info(ty: DriverType) -> &'static VideoDriverInfo {
        device::video_driver_info(ty)
    }

    pub fn supported_video_drivers() -> Vec<DriverType> {
        device::supported_video_drivers()
    }

    /// Writes the final window size and maximized state back to the settings
    /// when `autosave_screensize` is enabled. Values equal to the ones the
    /// window was opened with are left alone.
    pub fn autosave_screensize_and_co(initial_size: Dimension, initial_maximized: bool) {
        let inner = Self::instance();
        if !inner.settings.get_bool("autosave_screensize") {
            return;
        }

        let now = WindowState {
            size: Dimension::from(inner.window.inner_size()),
            maximized: inner.window.is_maximized(),
            fullscreen: inner.window.fullscreen().is_some(),
        };
        let update = AutosaveUpdate::compute(initial_size, initial_maximized, now);
        if !update.is_empty() {
            log::debug!("autosaving window state: {update:?}");
            update.apply(&inner.settings);
        }
    }

    // ── window ────────────────────────────────────────────────────────────

    /// Dispatches pending window events. Returns false once the application
    /// should stop: the window was closed or the driver failed fatally.
    pub fn run(&self) -> bool {
        let inner = &self.inner;
        inner.receiver.borrow_mut().clear_frame();

        let pump = EventPump::new(&inner.window, &inner.driver, &inner.receiver);
        if !pump.pump(&mut inner.event_loop.borrow_mut()) {
            inner.exit_requested.set(true);
        }
        !inner.exit_requested.get()
    }

    /// Frame rate cap from `fps_max`, or `fps_max_unfocused` while the window
    /// is in the background.
    pub fn fps_limit(&self) -> f32 {
        let key = if self.inner.receiver.borrow().is_focused() {
            "fps_max"
        } else {
            "fps_max_unfocused"
        };
        self.inner.settings.get_u32(key) as f32
    }

    pub fn set_resizable(&self, resizable: bool) {
        self.inner.window.set_resizable(resizable);
    }

    pub fn set_window_caption(&self, caption: &str) {
        self.inner.window.set_title(caption);
    }

    /// Applies the configured caption and icon.
    pub fn setup_top_level_window(&self) {
        self.set_window_caption(&self.inner.config.title);
        if !self.set_window_icon() {
            log::debug!("window icon '{}' not applied", self.inner.config.icon);
        }
    }

    /// Loads the configured icon through the file system. Returns false when
    /// the image is missing or cannot be used as an icon.
    pub fn set_window_icon(&self) -> bool {
        let name = &self.inner.config.icon;
        let icon = self
            .inner
            .fs
            .borrow()
            .read(name)
            .and_then(|bytes| Texture::decode(name.as_str(), &bytes))
            .and_then(|tex| {
                let size = tex.size();
                Icon::from_rgba(tex.pixels().to_vec(), size.width, size.height)
                    .with_context(|| format!("'{name}' is not a valid icon"))
            });

        match icon {
            Ok(icon) => {
                self.inner.window.set_window_icon(Some(icon));
                true
            }
            Err(e) => {
                log::warn!("window icon: {e:#}");
                false
            }
        }
    }

    // ── scene ─────────────────────────────────────────────────────────────

    pub fn begin_scene(&self, clear: Option<Color>) {
        self.inner.driver.borrow_mut().begin_scene(clear);
    }

    /// Presents the open scene. A fatal driver error makes [`run`](Self::run)
    /// return false.
    pub fn end_scene(&self) {
        self.inner.end_scene(&mut self.inner.driver.borrow_mut());
    }

    /// Builds the rendering core selected by the `3d_mode` setting.
    pub fn initialize(&self, client: Rc<RefCell<dyn Client>>, hud: Rc<RefCell<dyn Hud>>) {
        let setting = self.inner.settings.get("3d_mode").unwrap_or_default();
        let mode = ThreeDMode::from_setting(&setting).unwrap_or_else(|| {
            log::warn!("unsupported 3d_mode '{setting}'; rendering without stereo");
            ThreeDMode::None
        });

        client
            .borrow_mut()
            .add_shader_uniform_setter_factory(Box::new(FogShaderUniformSetterFactory));

        let core = create_core(mode, client, hud);
        self.inner.layout.set(core.layout());
        *self.inner.shadow.borrow_mut() = core.shadow_renderer();
        *self.inner.core.borrow_mut() = Some(core);
        log::info!("rendering core initialized ({mode:?})");
    }

    /// Drops the rendering core and with it the client collaborators.
    pub fn finalize(&self) {
        self.inner.shadow.borrow_mut().take();
        if self.inner.core.borrow_mut().take().is_some() {
            log::info!("rendering core finalized");
        }
        self.inner.layout.set(ScreenLayout::Full);
    }

    /// Renders one frame through the core. Without a core the frame is only
    /// cleared to `sky_color`.
    pub fn draw_scene(&self, sky_color: Color, show_hud: bool, draw_wield_tool: bool, draw_crosshair: bool) {
        let mut driver = self.inner.driver.borrow_mut();
        let params = SceneParams {
            sky_color,
            show_hud,
            draw_wield_tool,
            draw_crosshair,
            fog: driver.fog(),
        };

        driver.begin_scene(Some(sky_color));
        if let Some(core) = self.inner.core.borrow_mut().as_mut() {
            core.draw(&mut *driver, &params);
        }
        self.inner.end_scene(&mut driver);
    }

    pub fn cleanup_mesh_cache(&self) -> usize {
        self.inner.scene.borrow_mut().cleanup_mesh_cache()
    }

    pub fn remove_mesh(&self, mesh: &Mesh) -> bool {
        self.inner.scene.borrow_mut().remove_mesh(mesh)
    }

    // ── load screen ───────────────────────────────────────────────────────

    /// Draws a complete loading screen frame: centered `text` over a progress
    /// bar, on the menu sky color. Bar images come from the engine file
    /// system.
    pub fn draw_load_screen(&self, text: &str, dtime: f32, percent: i32, indef_pos: Option<&mut f32>) {
        let fs = self.inner.fs.borrow();
        let mut cache = self.inner.textures.borrow_mut();
        let mut textures = cache.with_fs(&fs);
        self.draw_load_screen_with(text, &mut textures, dtime, percent, indef_pos);
    }

    /// [`draw_load_screen`](Self::draw_load_screen) with bar images from `tsrc`.
    ///
    /// With `indef_pos` the bar shows an indefinite sliding animation and
    /// `percent` is ignored.
    pub fn draw_load_screen_with(
        &self,
        text: &str,
        tsrc: &mut dyn TextureSource,
        dtime: f32,
        percent: i32,
        indef_pos: Option<&mut f32>,
    ) {
        let inner = &self.inner;
        let screen = inner.window_size();
        let mut gui = inner.gui.borrow_mut();

        let text_rect = ScreenRect::centered(
            screen.width as i32 / 2,
            screen.height as i32 / 2,
            gui.measure(text),
        );
        let text_id = gui.add_static_text(text, text_rect, Align::Center, Align::Start);

        let span = ProgressSpan::advance(percent, indef_pos, dtime);
        let mut driver = inner.driver.borrow_mut();
        driver.begin_scene(Some(inner.menu.borrow().sky_color()));

        if span.is_drawable() {
            let textures = BarTextures {
                fg: tsrc.get_texture(load_screen::PROGRESS_BAR),
                bg: tsrc.get_texture(load_screen::PROGRESS_BAR_BG),
            };
            let density = inner.settings.get_f32_clamped("gui_scaling", 0.5, 20.0) * inner.display_density();
            load_screen::draw_progress_bar(&mut *driver, screen, &textures, density, span);
        }

        gui.draw_all(&mut *driver);
        inner.end_scene(&mut driver);
        gui.remove(text_id);
    }

    // ── menu ──────────────────────────────────────────────────────────────

    /// Advances and draws the menu starfield into the open scene.
    pub fn draw_menu_stars(&self, dtime: f32) {
        let size = self.inner.window_size();
        let mut driver = self.inner.driver.borrow_mut();
        self.inner
            .menu
            .borrow_mut()
            .draw_stars(Some(&mut *driver as &mut dyn Canvas2d), size, dtime);
    }

    pub fn menu_sky_color(&self) -> Color {
        self.inner.menu.borrow().sky_color()
    }

    pub fn set_menu_sky_color(&self, color: Color) {
        self.inner.menu.borrow_mut().set_sky_color(color);
    }

    pub fn menu_clouds_color(&self) -> Color {
        self.inner.menu.borrow().clouds_color()
    }

    pub fn set_menu_clouds_color(&self, color: Color) {
        self.inner.menu.borrow_mut().set_clouds_color(color);
    }

    pub fn menu_stars_enabled(&self) -> bool {
        self.inner.menu.borrow().stars_enabled()
    }

    pub fn set_menu_stars_enabled(&self, enabled: bool) {
        self.inner.menu.borrow_mut().set_stars_enabled(enabled);
    }
}

impl Drop for RenderingEngine {
    fn drop(&mut self) {
        for token in self.inner.callbacks.borrow_mut().drain(..) {
            self.inner.settings.deregister_changed_callback(token);
        }
        self.finalize();
        INSTANCE.with(|i| *i.borrow_mut() = Weak::new());
        log::debug!("rendering engine dropped");
    }
}

impl EngineInner {
    fn window_size(&self) -> Dimension {
        self.layout
            .get()
            .virtual_size(Dimension::from(self.window.inner_size()))
    }

    fn display_density(&self) -> f32 {
        self.settings.get_f32("display_density_factor") * self.window.scale_factor() as f32
    }

    fn end_scene(&self, driver: &mut VideoDriver) {
        match driver.end_scene() {
            Ok(()) => {}
            Err(SurfaceErrorAction::Fatal) => {
                log::error!("video driver lost its surface for good; shutting down");
                self.exit_requested.set(true);
            }
            Err(action) => log::debug!("frame dropped: {action:?}"),
        }
    }
}

/// Keeps the window in sync with the `fullscreen` and `window_maximized`
/// settings.
fn register_window_callbacks(inner: &EngineInner) {
    let mut tokens = inner.callbacks.borrow_mut();

    let window = Arc::clone(&inner.window);
    tokens.push(inner.settings.register_changed_callback("fullscreen", move |_, value| {
        let fullscreen = crate::settings::parse_bool(value).unwrap_or(false);
        window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }));

    let window = Arc::clone(&inner.window);
    tokens.push(inner.settings.register_changed_callback("window_maximized", move |_, value| {
        // A fullscreen window keeps its mode; the flag applies once it leaves.
        if window.fullscreen().is_none() {
            window.set_maximized(crate::settings::parse_bool(value).unwrap_or(false));
        }
    }));
}

/// Borrows the shadow renderer held in `slot`. The slot itself is only read
/// long enough to clone the handle.
fn lend_shadow_renderer<R>(
    slot: &RefCell<Option<SharedShadowRenderer>>,
    f: impl FnOnce(&mut dyn ShadowRenderer) -> R,
) -> Option<R> {
    let shadow = slot.borrow().clone()?;
    let Ok(mut renderer) = shadow.try_borrow_mut() else {
        panic!("RenderingEngine::with_shadow_renderer: shadow renderer is already borrowed");
    };
    let result = f(&mut *renderer);
    Some(result)
}
