pub mod clock;
pub mod controller;
pub mod input_adapter;
pub mod window;

pub use clock::{Clock, FpsCounter};
pub use controller::{Button, Controller, InputEvent, KeyAction};
pub use input_adapter::WinitController;
pub use window::{CursorMode, WindowContext, WindowDimensions, WindowRequest};
