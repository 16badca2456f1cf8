/// Keyboard key identifier.
///
/// Only the keys the engine and its clients react to are named. Everything
/// else maps to `Key::Other` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    // Movement / common bindings
    W,
    A,
    S,
    D,

    F11,

    /// Platform-dependent key not represented here.
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Kind of device that produced the most recent pointer input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Unknown,
}

/// Touch contact phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Platform-agnostic input events, translated from window system events.
///
/// Positions are in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        repeat: bool,
    },

    PointerMoved {
        x: f32,
        y: f32,
    },

    /// Pointer left the window surface.
    PointerLeft,

    MouseButton {
        pressed: bool,
    },

    Touch {
        id: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
    },

    /// Window focus change.
    Focused(bool),
}
