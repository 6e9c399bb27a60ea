use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller, InputEvent, KeyAction};

/// Adapter that turns Winit window events into `InputEvent`s
/// and keeps the held-button set for the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Last cursor position (relative to window, top-left origin)
    mouse_position: Option<(f64, f64)>,
}

impl WinitController {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pressed_vec: Vec::new(),
            mouse_position: None,
        }
    }

    /// Translate a Winit WindowEvent, updating held state.
    /// Returns None for events the scene does not consume.
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                let action = Self::to_action(event.state, event.repeat);
                self.record(button, action);
                Some(InputEvent::Key { button, action })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = Self::mouse_button_to_button(*button)?;
                let action = Self::to_action(*state, false);
                self.record(button, action);
                Some(InputEvent::MouseButton { button, action })
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Some((position.x, position.y));
                Some(InputEvent::CursorMoved {
                    x: position.x,
                    y: position.y,
                })
            }
            _ => None,
        }
    }

    /// Get current mouse position (if available)
    pub fn mouse_position(&self) -> Option<(f64, f64)> {
        self.mouse_position
    }

    fn record(&mut self, button: Button, action: KeyAction) {
        match action {
            KeyAction::Press => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                }
            }
            KeyAction::Release => {
                if self.pressed_keys.remove(&button) {
                    self.pressed_vec.retain(|&b| b != button);
                }
            }
            KeyAction::Repeat => {}
        }
    }

    fn to_action(state: ElementState, repeat: bool) -> KeyAction {
        match (state, repeat) {
            (ElementState::Pressed, false) => KeyAction::Press,
            (ElementState::Pressed, true) => KeyAction::Repeat,
            (ElementState::Released, _) => KeyAction::Release,
        }
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::KeyQ => Some(Button::KeyQ),
            KeyCode::KeyE => Some(Button::KeyE),
            KeyCode::KeyF => Some(Button::KeyF),
            KeyCode::KeyR => Some(Button::KeyR),
            KeyCode::KeyC => Some(Button::KeyC),
            KeyCode::KeyV => Some(Button::KeyV),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Button::Control),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}
