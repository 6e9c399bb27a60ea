/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    KeyF,
    KeyR,
    KeyC,
    KeyV,
    Shift,
    Control,
    Escape,
    MouseLeft,
    MouseRight,
}

/// Transition reported for a key or mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    /// Auto-repeat while held; never changes held state
    Repeat,
}

/// Discrete input produced by the window layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { button: Button, action: KeyAction },
    /// Cursor position in physical pixels, origin top-left
    CursorMoved { x: f64, y: f64 },
    MouseButton { button: Button, action: KeyAction },
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}
