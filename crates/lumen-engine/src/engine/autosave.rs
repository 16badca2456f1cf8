use crate::coords::Dimension;
use crate::settings::Settings;

/// Window state observed at shutdown.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowState {
    pub size: Dimension,
    pub maximized: bool,
    pub fullscreen: bool,
}

/// Settings to write back so the next start reopens the window as it was left.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct AutosaveUpdate {
    pub window_maximized: Option<bool>,
    pub screen_size: Option<Dimension>,
}

impl AutosaveUpdate {
    /// Compares `now` with the state the window was opened in.
    ///
    /// Unchanged values are not written, so defaults stay defaults. The size
    /// of a maximized or fullscreen window is not the user's choice and is
    /// never saved.
    pub fn compute(initial_size: Dimension, initial_maximized: bool, now: WindowState) -> Self {
        let mut update = Self::default();
        if now.maximized != initial_maximized {
            update.window_maximized = Some(now.maximized);
        }
        if now.maximized || now.fullscreen {
            return update;
        }
        if now.size.width > 0 && now.size.height > 0 && now.size != initial_size {
            update.screen_size = Some(now.size);
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self.window_maximized.is_none() && self.screen_size.is_none()
    }

    pub fn apply(&self, settings: &Settings) {
        if let Some(maximized) = self.window_maximized {
            settings.set_bool("window_maximized", maximized);
        }
        if let Some(size) = self.screen_size {
            settings.set("screen_w", size.width.to_string());
            settings.set("screen_h", size.height.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: Dimension = Dimension::new(1024, 600);

    fn state(w: u32, h: u32, maximized: bool, fullscreen: bool) -> WindowState {
        WindowState {
            size: Dimension::new(w, h),
            maximized,
            fullscreen,
        }
    }

    #[test]
    fn unchanged_window_writes_nothing() {
        assert!(AutosaveUpdate::compute(INITIAL, false, state(1024, 600, false, false)).is_empty());
    }

    #[test]
    fn resized_window_saves_size() {
        let u = AutosaveUpdate::compute(INITIAL, false, state(800, 500, false, false));
        assert_eq!(u.screen_size, Some(Dimension::new(800, 500)));
        assert_eq!(u.window_maximized, None);
    }

    #[test]
    fn maximized_window_saves_flag_but_not_size() {
        let u = AutosaveUpdate::compute(INITIAL, false, state(1920, 1080, true, false));
        assert_eq!(u.window_maximized, Some(true));
        assert_eq!(u.screen_size, None);
    }

    #[test]
    fn fullscreen_and_zero_sizes_are_ignored() {
        assert!(AutosaveUpdate::compute(INITIAL, false, state(1920, 1080, false, true)).is_empty());
        assert!(AutosaveUpdate::compute(INITIAL, false, state(0, 0, false, false)).is_empty());
    }

    #[test]
    fn apply_writes_settings() {
        let settings = Settings::new();
        AutosaveUpdate {
            window_maximized: Some(false),
            screen_size: Some(Dimension::new(640, 480)),
        }
        .apply(&settings);
        assert_eq!(settings.get_u32("screen_w"), 640);
        assert_eq!(settings.get_u32("screen_h"), 480);
        assert!(!settings.get_bool("window_maximized"));
    }
}
