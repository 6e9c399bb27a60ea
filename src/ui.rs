//! Heads-up display buttons.
//!
//! Rectangles live in framebuffer pixels with the origin at the bottom-left
//! corner. Cursor input arrives with a top-left origin and is flipped on the
//! way in.

use glam::{Vec2, Vec4};
use std::fmt;

use crate::core::{Button, KeyAction};
use crate::frame::World;

const MARGIN: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Inclusive on every edge
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Where a button sits relative to the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    BottomCentreLeft,
    BottomCentreRight,
}

impl Anchor {
    pub fn rect(self, fb_width: f32, fb_height: f32) -> ScreenRect {
        match self {
            Anchor::TopLeft => {
                let (width, height) = (160.0, 50.0);
                ScreenRect::new(
                    Vec2::new(MARGIN, fb_height - MARGIN - height),
                    Vec2::new(MARGIN + width, fb_height - MARGIN),
                )
            }
            Anchor::BottomCentreLeft => {
                let (width, height) = (140.0, 60.0);
                let centre = fb_width / 2.0;
                ScreenRect::new(
                    Vec2::new(centre - MARGIN - width, MARGIN),
                    Vec2::new(centre - MARGIN, MARGIN + height),
                )
            }
            Anchor::BottomCentreRight => {
                let (width, height) = (140.0, 60.0);
                let centre = fb_width / 2.0;
                ScreenRect::new(
                    Vec2::new(centre + MARGIN, MARGIN),
                    Vec2::new(centre + MARGIN + width, MARGIN + height),
                )
            }
        }
    }
}

/// Action a button performs on the world when clicked
pub trait Command {
    fn invoke(&self, world: &mut World);
}

impl<F> Command for F
where
    F: Fn(&mut World),
{
    fn invoke(&self, world: &mut World) {
        self(world)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

/// Colours are RGBA
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub idle: Vec4,
    pub hovered: Vec4,
    pub pressed: Vec4,
    pub border_width: f32,
    pub border_color: Vec4,
}

/// Live value appended to a button's label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readout {
    Altitude,
}

/// What the renderer needs to paint one button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub rect: ScreenRect,
    pub fill: Vec4,
    pub border_width: f32,
    pub border_color: Vec4,
    pub caption: String,
}

pub struct HudButton {
    label: String,
    anchor: Anchor,
    style: ButtonStyle,
    readout: Option<Readout>,
    command: Box<dyn Command>,
    rect: ScreenRect,
    framebuffer: Vec2,
    state: ButtonState,
}

impl HudButton {
    pub fn new(
        label: impl Into<String>,
        anchor: Anchor,
        style: ButtonStyle,
        command: impl Command + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            anchor,
            style,
            readout: None,
            command: Box::new(command),
            rect: ScreenRect::default(),
            framebuffer: Vec2::ZERO,
            state: ButtonState::Idle,
        }
    }

    pub fn with_readout(mut self, readout: Readout) -> Self {
        self.readout = Some(readout);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Re-anchor for a new framebuffer size. Returns true if anything changed.
    pub fn update_size(&mut self, fb_width: f32, fb_height: f32) -> bool {
        let framebuffer = Vec2::new(fb_width, fb_height);
        if framebuffer == self.framebuffer {
            return false;
        }
        self.framebuffer = framebuffer;
        self.rect = self.anchor.rect(fb_width, fb_height);
        true
    }

    /// Cursor position with a top-left origin
    pub fn update_mouse_move(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, self.framebuffer.y - y);
        if self.rect.contains(point) {
            if self.state != ButtonState::Pressed {
                self.state = ButtonState::Hovered;
            }
        } else {
            // Leaving cancels a press in progress
            self.state = ButtonState::Idle;
        }
    }

    /// Returns true when a left click completes inside the button.
    pub fn update_mouse_press(&mut self, button: Button, action: KeyAction) -> bool {
        if self.state == ButtonState::Idle || button != Button::MouseLeft {
            return false;
        }
        match action {
            KeyAction::Press => {
                self.state = ButtonState::Pressed;
                false
            }
            KeyAction::Release => {
                self.state = ButtonState::Hovered;
                true
            }
            KeyAction::Repeat => false,
        }
    }

    pub fn trigger(&self, world: &mut World) {
        self.command.invoke(world);
    }

    pub fn fill_color(&self) -> Vec4 {
        match self.state {
            ButtonState::Idle => self.style.idle,
            ButtonState::Hovered => self.style.hovered,
            ButtonState::Pressed => self.style.pressed,
        }
    }

    pub fn caption(&self, world: &World) -> String {
        match self.readout {
            Some(Readout::Altitude) => format!("{}{:.2}", self.label, world.vehicle.altitude()),
            None => self.label.clone(),
        }
    }

    pub fn view(&self, world: &World) -> ButtonView {
        ButtonView {
            rect: self.rect,
            fill: self.fill_color(),
            border_width: self.style.border_width,
            border_color: self.style.border_color,
            caption: self.caption(world),
        }
    }
}

impl fmt::Debug for HudButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HudButton")
            .field("label", &self.label)
            .field("anchor", &self.anchor)
            .field("rect", &self.rect)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Altitude readout, launch and reset
pub fn default_hud() -> Vec<HudButton> {
    let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
    let white = Vec4::ONE;
    let readout_blue = Vec4::new(0.0, 0.0, 1.0, 0.2);

    let altitude = HudButton::new(
        "Altitude: ",
        Anchor::TopLeft,
        ButtonStyle {
            idle: readout_blue,
            hovered: readout_blue,
            pressed: readout_blue,
            border_width: 1.0,
            border_color: black,
        },
        |_: &mut World| {},
    )
    .with_readout(Readout::Altitude);

    let launch = HudButton::new(
        "Launch",
        Anchor::BottomCentreLeft,
        ButtonStyle {
            idle: Vec4::new(0.0, 1.0, 0.0, 0.5),
            hovered: Vec4::new(0.0, 1.0, 0.0, 1.0),
            pressed: white,
            border_width: 3.0,
            border_color: black,
        },
        |world: &mut World| world.vehicle.toggle_run(),
    );

    let reset = HudButton::new(
        "Reset",
        Anchor::BottomCentreRight,
        ButtonStyle {
            idle: Vec4::new(1.0, 0.0, 0.0, 0.5),
            hovered: Vec4::new(1.0, 0.0, 0.0, 1.0),
            pressed: white,
            border_width: 3.0,
            border_color: black,
        },
        |world: &mut World| world.vehicle.reset(),
    );

    vec![altitude, launch, reset]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_button() -> HudButton {
        let mut button = HudButton::new(
            "Test",
            Anchor::BottomCentreLeft,
            ButtonStyle {
                idle: Vec4::ZERO,
                hovered: Vec4::ONE,
                pressed: Vec4::splat(0.5),
                border_width: 1.0,
                border_color: Vec4::ZERO,
            },
            |_: &mut World| {},
        );
        button.update_size(800.0, 600.0);
        button
    }

    #[test]
    fn test_anchor_layouts() {
        let top_left = Anchor::TopLeft.rect(800.0, 600.0);
        assert_eq!(top_left.min, Vec2::new(40.0, 510.0));
        assert_eq!(top_left.max, Vec2::new(200.0, 560.0));

        let left = Anchor::BottomCentreLeft.rect(800.0, 600.0);
        assert_eq!(left.min, Vec2::new(220.0, 40.0));
        assert_eq!(left.max, Vec2::new(360.0, 100.0));

        let right = Anchor::BottomCentreRight.rect(800.0, 600.0);
        assert_eq!(right.min, Vec2::new(440.0, 40.0));
        assert_eq!(right.size(), Vec2::new(140.0, 60.0));
    }

    #[test]
    fn test_update_size_only_on_change() {
        let mut button = sized_button();
        assert!(!button.update_size(800.0, 600.0));
        assert!(button.update_size(1024.0, 600.0));
        assert_eq!(button.rect(), Anchor::BottomCentreLeft.rect(1024.0, 600.0));
    }

    #[test]
    fn test_hover_flips_cursor_y() {
        let mut button = sized_button();
        // Bottom-left (220, 40) is y = 560 from the top
        button.update_mouse_move(220.0, 560.0);
        assert_eq!(button.state(), ButtonState::Hovered);

        button.update_mouse_move(220.0, 40.0);
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn test_click_fires_on_release_inside() {
        let mut button = sized_button();
        button.update_mouse_move(300.0, 530.0);

        assert!(!button.update_mouse_press(Button::MouseLeft, KeyAction::Press));
        assert_eq!(button.state(), ButtonState::Pressed);
        assert_eq!(button.fill_color(), Vec4::splat(0.5));

        assert!(button.update_mouse_press(Button::MouseLeft, KeyAction::Release));
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_leaving_cancels_press() {
        let mut button = sized_button();
        button.update_mouse_move(300.0, 530.0);
        button.update_mouse_press(Button::MouseLeft, KeyAction::Press);
        button.update_mouse_move(0.0, 0.0);

        assert_eq!(button.state(), ButtonState::Idle);
        assert!(!button.update_mouse_press(Button::MouseLeft, KeyAction::Release));
    }

    #[test]
    fn test_right_button_is_ignored() {
        let mut button = sized_button();
        button.update_mouse_move(300.0, 530.0);
        assert!(!button.update_mouse_press(Button::MouseRight, KeyAction::Release));
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_default_hud_labels() {
        let labels: Vec<String> = default_hud().iter().map(|b| b.label().to_string()).collect();
        assert_eq!(labels, vec!["Altitude: ", "Launch", "Reset"]);
    }
}
