use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, PointerType, TouchPhase};

/// Input state fed by the engine's event pump.
///
/// Holds "is down" information, pointer position and focus, plus the set of
/// keys pressed since the last [`clear_frame`](Self::clear_frame).
/// Shared with client code as `Rc<RefCell<EventReceiver>>`.
#[derive(Debug)]
pub struct EventReceiver {
    focused: bool,
    pointer_pos: Option<(f32, f32)>,
    last_pointer_type: PointerType,
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    active_touches: HashSet<u64>,
}

impl Default for EventReceiver {
    fn default() -> Self {
        Self {
            // A freshly opened window normally has focus; the platform reports
            // `Focused(false)` otherwise.
            focused: true,
            pointer_pos: None,
            last_pointer_type: PointerType::default(),
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            active_touches: HashSet::new(),
        }
    }
}

impl EventReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one translated event.
    pub fn on_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoid stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                    self.active_touches.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((x, y));
                // Touch platforms also synthesize cursor moves; keep the touch
                // attribution while a contact is down.
                if self.active_touches.is_empty() {
                    self.last_pointer_type = PointerType::Mouse;
                }
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::MouseButton { .. } => {
                if self.active_touches.is_empty() {
                    self.last_pointer_type = PointerType::Mouse;
                }
            }

            InputEvent::Touch { id, phase, x, y } => {
                self.last_pointer_type = PointerType::Touch;
                self.pointer_pos = Some((x, y));
                match phase {
                    TouchPhase::Started | TouchPhase::Moved => {
                        self.active_touches.insert(id);
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.active_touches.remove(&id);
                    }
                }
            }

            InputEvent::Key { key, state, repeat } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) && !repeat {
                        self.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },
        }
    }

    /// Forgets per-frame transitions. Called once per rendered frame.
    pub fn clear_frame(&mut self) {
        self.keys_pressed.clear();
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True if `key` went down since the last [`clear_frame`](Self::clear_frame).
    pub fn was_key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn pointer_pos(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }

    pub fn last_pointer_type(&self) -> PointerType {
        self.last_pointer_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    fn touch(id: u64, phase: TouchPhase) -> InputEvent {
        InputEvent::Touch { id, phase, x: 5.0, y: 6.0 }
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn key_press_and_release() {
        let mut r = EventReceiver::new();
        r.on_event(&key(Key::Escape, KeyState::Pressed));
        assert!(r.is_key_down(Key::Escape));
        assert!(r.was_key_pressed(Key::Escape));

        r.on_event(&key(Key::Escape, KeyState::Released));
        assert!(!r.is_key_down(Key::Escape));
        // Transition survives until the frame is cleared.
        assert!(r.was_key_pressed(Key::Escape));
        r.clear_frame();
        assert!(!r.was_key_pressed(Key::Escape));
    }

    #[test]
    fn repeat_does_not_count_as_press() {
        let mut r = EventReceiver::new();
        r.on_event(&InputEvent::Key { key: Key::W, state: KeyState::Pressed, repeat: true });
        assert!(r.is_key_down(Key::W));
        assert!(!r.was_key_pressed(Key::W));
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut r = EventReceiver::new();
        assert!(r.is_focused());
        r.on_event(&key(Key::A, KeyState::Pressed));
        r.on_event(&InputEvent::Focused(false));
        assert!(!r.is_focused());
        assert!(!r.is_key_down(Key::A));
    }

    // ── pointer type ──────────────────────────────────────────────────────

    #[test]
    fn pointer_type_defaults_to_mouse() {
        assert_eq!(EventReceiver::new().last_pointer_type(), PointerType::Mouse);
    }

    #[test]
    fn touch_switches_pointer_type() {
        let mut r = EventReceiver::new();
        r.on_event(&touch(1, TouchPhase::Started));
        assert_eq!(r.last_pointer_type(), PointerType::Touch);
        assert_eq!(r.pointer_pos(), Some((5.0, 6.0)));
    }

    #[test]
    fn synthesized_cursor_moves_keep_touch_while_contact_down() {
        let mut r = EventReceiver::new();
        r.on_event(&touch(1, TouchPhase::Started));
        r.on_event(&InputEvent::PointerMoved { x: 1.0, y: 1.0 });
        assert_eq!(r.last_pointer_type(), PointerType::Touch);

        r.on_event(&touch(1, TouchPhase::Ended));
        r.on_event(&InputEvent::PointerMoved { x: 2.0, y: 2.0 });
        assert_eq!(r.last_pointer_type(), PointerType::Mouse);
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut r = EventReceiver::new();
        r.on_event(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        r.on_event(&InputEvent::PointerLeft);
        assert_eq!(r.pointer_pos(), None);
    }
}
