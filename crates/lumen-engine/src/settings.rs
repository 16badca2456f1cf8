//! Runtime key/value settings.
//!
//! Values are strings; typed getters parse on read and fall back to the
//! registered default when a value is missing or malformed. Change callbacks
//! are keyed by setting name and run after the store is updated.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Change callback. Receives the setting name and its new value.
pub type SettingChangedCallback = Rc<dyn Fn(&str, &str)>;

/// Handle returned by [`Settings::register_changed_callback`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CallbackToken(u64);

/// Defaults every engine setting falls back to.
const DEFAULTS: &[(&str, &str)] = &[
    ("screen_w", "1024"),
    ("screen_h", "600"),
    ("fullscreen", "false"),
    ("window_maximized", "false"),
    ("autosave_screensize", "true"),
    ("fps_max", "60"),
    ("fps_max_unfocused", "20"),
    ("gui_scaling", "1.0"),
    ("display_density_factor", "1.0"),
    ("3d_mode", "none"),
    ("video_driver", ""),
    ("vsync", "false"),
    ("menu_clouds", "true"),
];

struct Callback {
    token: CallbackToken,
    name: String,
    f: SettingChangedCallback,
}

pub struct Settings {
    values: RefCell<HashMap<String, String>>,
    defaults: HashMap<String, String>,
    callbacks: RefCell<Vec<Callback>>,
    next_token: Cell<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Creates a store with the engine defaults.
    pub fn new() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            defaults: DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            callbacks: RefCell::new(Vec::new()),
            next_token: Cell::new(1),
        }
    }

    /// Parses `key = value` lines. Blank lines and `#` comments are skipped.
    pub fn from_conf_str(src: &str) -> Self {
        let settings = Self::new();
        for (lineno, line) in src.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((k, v)) => {
                    settings
                        .values
                        .borrow_mut()
                        .insert(k.trim().to_string(), v.trim().to_string());
                }
                None => log::warn!("settings: ignoring malformed line {}: {line:?}", lineno + 1),
            }
        }
        settings
    }

    /// Raw value, or the default when unset. `None` for unknown keys.
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(v) = self.values.borrow().get(name) {
            return Some(v.clone());
        }
        self.defaults.get(name).cloned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name) || self.defaults.contains_key(name)
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.parse_or_default(name, parse_bool).unwrap_or(false)
    }

    pub fn get_f32(&self, name: &str) -> f32 {
        self.parse_or_default(name, |s| s.parse::<f32>().ok().filter(|v| v.is_finite()))
            .unwrap_or(0.0)
    }

    pub fn get_u32(&self, name: &str) -> u32 {
        self.parse_or_default(name, |s| s.parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// `get_f32` clamped into `min..=max`.
    pub fn get_f32_clamped(&self, name: &str, min: f32, max: f32) -> f32 {
        self.get_f32(name).clamp(min, max)
    }

    /// Stores `value` and notifies the callbacks registered for `name`.
    pub fn set(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.clone());

        // Callbacks may read or write settings, so no borrow is held while they run.
        let targets: Vec<SettingChangedCallback> = self
            .callbacks
            .borrow()
            .iter()
            .filter(|c| c.name == name)
            .map(|c| Rc::clone(&c.f))
            .collect();

        for f in targets {
            f(name, &value);
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set(name, if value { "true" } else { "false" });
    }

    pub fn register_changed_callback(
        &self,
        name: &str,
        f: impl Fn(&str, &str) + 'static,
    ) -> CallbackToken {
        let token = CallbackToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.callbacks.borrow_mut().push(Callback {
            token,
            name: name.to_string(),
            f: Rc::new(f),
        });
        token
    }

    /// Removes a callback. Returns false if the token was already gone.
    pub fn deregister_changed_callback(&self, token: CallbackToken) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|c| c.token != token);
        callbacks.len() != before
    }

    fn parse_or_default<T>(&self, name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        if let Some(v) = self.values.borrow().get(name) {
            match parse(v) {
                Some(parsed) => return Some(parsed),
                None => log::warn!("settings: invalid value {v:?} for '{name}', using default"),
            }
        }
        self.defaults.get(name).and_then(|v| parse(v))
    }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── getters ───────────────────────────────────────────────────────────

    #[test]
    fn defaults_apply_when_unset() {
        let s = Settings::new();
        assert_eq!(s.get_u32("screen_w"), 1024);
        assert_eq!(s.get_u32("screen_h"), 600);
        assert!(!s.get_bool("fullscreen"));
        assert_eq!(s.get("3d_mode").as_deref(), Some("none"));
        assert_eq!(s.get("no_such_key"), None);
    }

    #[test]
    fn malformed_values_fall_back_to_default() {
        let s = Settings::new();
        s.set("fps_max", "fast");
        assert_eq!(s.get_u32("fps_max"), 60);
        s.set("gui_scaling", "NaN");
        assert_eq!(s.get_f32("gui_scaling"), 1.0);
    }

    #[test]
    fn bool_accepts_common_spellings() {
        let s = Settings::new();
        for v in ["true", "1", "yes", "ON"] {
            s.set("fullscreen", v);
            assert!(s.get_bool("fullscreen"), "{v}");
        }
        s.set("fullscreen", "0");
        assert!(!s.get_bool("fullscreen"));
    }

    #[test]
    fn clamped_getter() {
        let s = Settings::new();
        s.set("gui_scaling", "100");
        assert_eq!(s.get_f32_clamped("gui_scaling", 0.5, 20.0), 20.0);
        s.set("gui_scaling", "0.1");
        assert_eq!(s.get_f32_clamped("gui_scaling", 0.5, 20.0), 0.5);
    }

    #[test]
    fn conf_str_parsing() {
        let s = Settings::from_conf_str("# comment\nscreen_w = 800\n\nbogus line\nfullscreen=true\n");
        assert_eq!(s.get_u32("screen_w"), 800);
        assert!(s.get_bool("fullscreen"));
        assert!(!s.exists("bogus line"));
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    #[test]
    fn callback_fires_for_its_name_only() {
        let s = Settings::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&hits);
        s.register_changed_callback("fullscreen", move |name, value| {
            sink.borrow_mut().push(format!("{name}={value}"));
        });

        s.set("screen_w", "640");
        s.set_bool("fullscreen", true);
        assert_eq!(*hits.borrow(), vec!["fullscreen=true".to_string()]);
    }

    #[test]
    fn callback_sees_updated_store_and_may_write() {
        let s = Rc::new(Settings::new());
        let weak = Rc::downgrade(&s);
        s.register_changed_callback("window_maximized", move |_, _| {
            if let Some(s) = weak.upgrade() {
                assert!(s.get_bool("window_maximized"));
                s.set("screen_w", "1");
            }
        });
        s.set_bool("window_maximized", true);
        assert_eq!(s.get_u32("screen_w"), 1);
    }

    #[test]
    fn deregistered_callback_is_silent() {
        let s = Settings::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let token = s.register_changed_callback("fps_max", move |_, _| c.set(c.get() + 1));

        s.set("fps_max", "30");
        assert!(s.deregister_changed_callback(token));
        assert!(!s.deregister_changed_callback(token));
        s.set("fps_max", "45");
        assert_eq!(count.get(), 1);
    }
}
