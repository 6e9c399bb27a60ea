//! Free-fly, tracking and point-at cameras.
//!
//! One `Camera` type serves all three roles; the role is decided by which
//! operations the owner calls each frame. Mouse-look ("aiming") is entered
//! only through `update_mouse_button`, so a camera that never receives mouse
//! buttons never aims.
//!
//! Orientation convention: the view matrix is
//! `rotation_x(pitch) * rotation_y(yaw) * translation(-position)` and the
//! camera looks down its local -Z axis.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, TAU};

use crate::core::{Button, CursorMode, KeyAction};
use crate::math::transform::{perspective_projection, rotation_x, rotation_y, translation};

pub const MOVEMENT_PER_SECOND: f32 = 1.0;
pub const SPEED_UP_FACTOR: f32 = 5.0;
pub const SLOW_DOWN_FACTOR: f32 = 0.2;
/// Radians of rotation per pixel of cursor travel
pub const MOUSE_SENSITIVITY: f32 = 0.01;
/// Pitch stays this far away from straight up or down
pub const PITCH_MARGIN: f32 = 0.1;
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - PITCH_MARGIN;
pub const FOV_Y: f32 = FRAC_PI_3;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
pub const TRACKING_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const LOOK_BUTTON: Button = Button::MouseRight;

/// Held movement intent, as an immutable snapshot or as a camera's live flags
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub speed_up: bool,
    pub slow_down: bool,
}

impl MovementState {
    /// Distance covered along each held axis in `dt` seconds.
    /// Both modifiers may apply at once.
    pub fn distance(&self, dt: f32) -> f32 {
        let mut dist = MOVEMENT_PER_SECOND * dt;
        if self.speed_up {
            dist *= SPEED_UP_FACTOR;
        }
        if self.slow_down {
            dist *= SLOW_DOWN_FACTOR;
        }
        dist
    }

    /// Camera-local axes of every held direction. Diagonals are not normalized.
    fn local_axes(&self) -> impl Iterator<Item = Vec3> {
        [
            (self.forward, Vec3::Z),
            (self.backward, Vec3::NEG_Z),
            (self.left, Vec3::X),
            (self.right, Vec3::NEG_X),
            (self.up, Vec3::NEG_Y),
            (self.down, Vec3::Y),
        ]
        .into_iter()
        .filter_map(|(held, axis)| held.then_some(axis))
    }

    fn flag_mut(&mut self, button: Button) -> Option<&mut bool> {
        match button {
            Button::KeyW => Some(&mut self.forward),
            Button::KeyS => Some(&mut self.backward),
            Button::KeyA => Some(&mut self.left),
            Button::KeyD => Some(&mut self.right),
            Button::KeyE => Some(&mut self.up),
            Button::KeyQ => Some(&mut self.down),
            Button::Shift => Some(&mut self.speed_up),
            Button::Control => Some(&mut self.slow_down),
            _ => None,
        }
    }
}

/// Wrap into [0, 2π) from either direction.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    pitch: f32,
    yaw: f32,
    aiming: bool,
    movement: MovementState,
    last_cursor: (f32, f32),
    cursor_mode: CursorMode,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            aiming: false,
            movement: MovementState::default(),
            last_cursor: (0.0, 0.0),
            cursor_mode: CursorMode::Normal,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn movement(&self) -> MovementState {
        self.movement
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Rotation taking camera-local vectors into world space
    /// (inverse of the view rotation).
    fn camera_to_world(&self) -> Mat4 {
        rotation_y(-self.yaw) * rotation_x(-self.pitch)
    }

    /// World-space view direction
    pub fn forward(&self) -> Vec3 {
        self.camera_to_world().transform_vector3(Vec3::NEG_Z)
    }

    /// Move using the camera's own held flags.
    pub fn update_state(&mut self, dt: f32) {
        self.step(self.movement, dt);
    }

    /// Move by an explicit intent snapshot; the live flags are not consulted.
    pub fn step(&mut self, intent: MovementState, dt: f32) {
        let distance = intent.distance(dt);
        let to_world = self.camera_to_world();
        for axis in intent.local_axes() {
            self.position -= to_world.transform_vector3(axis * distance);
        }
    }

    /// Rigidly follow `target` at a fixed offset.
    pub fn track(&mut self, target: Vec3) {
        self.position = target + TRACKING_OFFSET;
    }

    /// Face `target` from the current position.
    ///
    /// `target` must differ from the camera position; otherwise pitch and yaw
    /// become NaN.
    pub fn point_at(&mut self, target: Vec3) {
        let direction = (target - self.position).normalize();
        self.pitch = -direction.y.asin();
        self.yaw = wrap_angle(direction.z.atan2(direction.x) + FRAC_PI_2);
    }

    /// Drop all held input and leave mouse-look.
    pub fn reset_state(&mut self) {
        self.movement = MovementState::default();
        self.aiming = false;
        self.cursor_mode = CursorMode::Normal;
    }

    pub fn view_matrix(&self) -> Mat4 {
        rotation_x(self.pitch) * rotation_y(self.yaw) * translation(-self.position)
    }

    /// Projection-view matrix in OpenGL clip space.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        perspective_projection(FOV_Y, aspect, NEAR_PLANE, FAR_PLANE) * self.view_matrix()
    }

    pub fn update_key_action(&mut self, button: Button, action: KeyAction) {
        let held = match action {
            KeyAction::Press => true,
            KeyAction::Release => false,
            KeyAction::Repeat => return,
        };
        if let Some(flag) = self.movement.flag_mut(button) {
            *flag = held;
        }
    }

    /// Cursor position in pixels, origin top-left.
    pub fn update_mouse_movement(&mut self, x: f64, y: f64) {
        let (x, y) = (x as f32, y as f32);
        if self.aiming {
            let dx = x - self.last_cursor.0;
            let dy = y - self.last_cursor.1;

            self.yaw = wrap_angle(self.yaw + dx * MOUSE_SENSITIVITY);
            self.pitch = (self.pitch + dy * MOUSE_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.last_cursor = (x, y);
    }

    /// Toggle mouse-look on a look-button press.
    /// Returns the cursor mode the window must switch to, if it changed.
    pub fn update_mouse_button(&mut self, button: Button, action: KeyAction) -> Option<CursorMode> {
        if button != LOOK_BUTTON || action != KeyAction::Press {
            return None;
        }

        self.aiming = !self.aiming;
        if self.aiming {
            self.cursor_mode = CursorMode::Captured;
        } else {
            self.reset_state();
        }
        Some(self.cursor_mode)
    }
}
