use log::warn;
use winit::window::{CursorGrabMode, Window};

/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True while the window is minimized or not yet laid out
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Cursor presentation requested by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Visible and free to leave the window
    #[default]
    Normal,
    /// Hidden and confined to the window while mouse-look is engaged
    Captured,
}

/// Side effect the scene asks the window layer to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    SetCursor(CursorMode),
    Close,
}

/// Window abstraction - the part of the platform window the scene drives
pub trait WindowContext {
    /// Get window dimensions in physical pixels
    fn dimensions(&self) -> WindowDimensions;

    /// Apply a cursor mode
    fn set_cursor_mode(&self, mode: CursorMode);

    /// Request the window to redraw
    fn request_redraw(&self);
}

impl WindowContext for Window {
    fn dimensions(&self) -> WindowDimensions {
        let size = self.inner_size();
        WindowDimensions::new(size.width, size.height)
    }

    fn set_cursor_mode(&self, mode: CursorMode) {
        match mode {
            CursorMode::Captured => {
                // Not every platform supports confining; fall back to locking
                let grabbed = self
                    .set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_| self.set_cursor_grab(CursorGrabMode::Locked));
                if let Err(e) = grabbed {
                    warn!("Could not capture cursor: {}", e);
                }
                self.set_cursor_visible(false);
            }
            CursorMode::Normal => {
                if let Err(e) = self.set_cursor_grab(CursorGrabMode::None) {
                    warn!("Could not release cursor: {}", e);
                }
                self.set_cursor_visible(true);
            }
        }
    }

    fn request_redraw(&self) {
        Window::request_redraw(self);
    }
}
