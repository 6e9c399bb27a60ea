//! Per-frame orchestration: input routing, update order, viewport layout.
//!
//! The orchestrator owns every piece of mutable scene state. Window side
//! effects are never performed here; they are returned as `WindowRequest`s
//! for the platform layer to apply.

use anyhow::Result;
use glam::{Mat4, Vec3};
use log::{debug, info};

use crate::camera::Camera;
use crate::config::Config;
use crate::core::{Button, CursorMode, KeyAction, WindowRequest};
use crate::scene::{Drawable, Lighting, MeshId, StaticScene};
use crate::ui::{default_hud, ButtonView, HudButton};
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraId {
    FirstPerson,
    Tracking,
    Grounded,
}

impl CameraId {
    pub const ALL: [CameraId; 3] = [CameraId::FirstPerson, CameraId::Tracking, CameraId::Grounded];

    /// Cycle order: first-person, tracking, grounded, first-person
    pub fn next(self) -> Self {
        match self {
            CameraId::FirstPerson => CameraId::Tracking,
            CameraId::Tracking => CameraId::Grounded,
            CameraId::Grounded => CameraId::FirstPerson,
        }
    }
}

/// The three cameras, addressable by id
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub first_person: Camera,
    pub tracking: Camera,
    pub grounded: Camera,
}

impl CameraRig {
    pub fn new(first_person: Vec3, tracking: Vec3, grounded: Vec3) -> Self {
        Self {
            first_person: Camera::new(first_person),
            tracking: Camera::new(tracking),
            grounded: Camera::new(grounded),
        }
    }

    pub fn get(&self, id: CameraId) -> &Camera {
        match id {
            CameraId::FirstPerson => &self.first_person,
            CameraId::Tracking => &self.tracking,
            CameraId::Grounded => &self.grounded,
        }
    }

    pub fn get_mut(&mut self, id: CameraId) -> &mut Camera {
        match id {
            CameraId::FirstPerson => &mut self.first_person,
            CameraId::Tracking => &mut self.tracking,
            CameraId::Grounded => &mut self.grounded,
        }
    }
}

/// Which camera each viewport shows. The right viewport only exists in
/// split-screen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSelection {
    pub left: CameraId,
    pub right: CameraId,
    pub split_screen: bool,
}

impl Default for ViewportSelection {
    fn default() -> Self {
        Self {
            left: CameraId::FirstPerson,
            right: CameraId::FirstPerson,
            split_screen: false,
        }
    }
}

impl ViewportSelection {
    pub fn cycle_left(self) -> Self {
        Self {
            left: self.left.next(),
            ..self
        }
    }

    pub fn cycle_right(self) -> Self {
        Self {
            right: self.right.next(),
            ..self
        }
    }

    pub fn toggle_split(self) -> Self {
        Self {
            split_screen: !self.split_screen,
            ..self
        }
    }

    /// True if `id` is on screen in some viewport
    pub fn shows(&self, id: CameraId) -> bool {
        self.left == id || (self.split_screen && self.right == id)
    }

    /// Cameras in viewport order, left first
    pub fn visible(&self) -> Vec<CameraId> {
        if self.split_screen {
            vec![self.left, self.right]
        } else {
            vec![self.left]
        }
    }
}

/// State that HUD commands act on
#[derive(Debug, Clone)]
pub struct World {
    pub vehicle: Vehicle,
    pub scene: StaticScene,
}

impl World {
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            scene: StaticScene::new(),
        }
    }

    /// Static drawables followed by the vehicle
    pub fn drawables(&self) -> Vec<Drawable> {
        let mut drawables = self.scene.drawables().to_vec();
        drawables.push(Drawable {
            mesh: MeshId::Vehicle,
            model: self.vehicle.model_matrix(),
            normal: self.vehicle.normal_matrix(),
        });
        drawables
    }
}

/// Pixel rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Everything needed to draw one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    pub camera: CameraId,
    pub viewport: Viewport,
    /// Projection-view matrix in OpenGL clip space
    pub projection: Mat4,
    pub eye: Vec3,
    pub lighting: Lighting,
}

/// One frame's worth of render input
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub framebuffer: (u32, u32),
    pub views: Vec<ViewFrame>,
    pub drawables: Vec<Drawable>,
    pub hud: Vec<ButtonView>,
}

/// Consumer of frame plans
pub trait SceneRenderer {
    fn render(&mut self, plan: &FramePlan) -> Result<()>;
}

#[derive(Debug)]
pub struct Orchestrator {
    rig: CameraRig,
    selection: ViewportSelection,
    world: World,
    hud: Vec<HudButton>,
    lighting: Lighting,
}

impl Orchestrator {
    pub fn new(rig: CameraRig, world: World, hud: Vec<HudButton>) -> Self {
        Self {
            rig,
            selection: ViewportSelection::default(),
            world,
            hud,
            lighting: Lighting::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let cameras = &config.cameras;
        let rig = CameraRig::new(
            Vec3::from_array(cameras.first_person),
            Vec3::from_array(cameras.tracking),
            Vec3::from_array(cameras.grounded),
        );
        let vehicle = Vehicle::new(config.vehicle_position(), config.vehicle.kx, config.vehicle.ky);
        let hud = if config.show_ui { default_hud() } else { Vec::new() };

        let mut orchestrator = Self::new(rig, World::new(vehicle), hud);
        orchestrator.selection.split_screen = config.split_screen;
        orchestrator
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn selection(&self) -> ViewportSelection {
        self.selection
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hud(&self) -> &[HudButton] {
        &self.hud
    }

    fn first_person_visible(&self) -> bool {
        self.selection.shows(CameraId::FirstPerson)
    }

    pub fn handle_key(
        &mut self,
        button: Button,
        action: KeyAction,
        shift_held: bool,
    ) -> Vec<WindowRequest> {
        let mut requests = Vec::new();

        if action == KeyAction::Press {
            match button {
                Button::Escape => {
                    requests.push(WindowRequest::Close);
                    return requests;
                }
                Button::KeyV => {
                    self.selection = self.selection.toggle_split();
                    info!(
                        "Split screen {}",
                        if self.selection.split_screen { "on" } else { "off" }
                    );
                }
                Button::KeyC => {
                    self.selection = if shift_held {
                        self.selection.cycle_right()
                    } else {
                        self.selection.cycle_left()
                    };
                    info!(
                        "Viewports: left {:?}, right {:?}",
                        self.selection.left, self.selection.right
                    );
                }
                _ => {}
            }

            // Free-fly camera shown nowhere: drop held input and mouse-look
            let layout_changed = matches!(button, Button::KeyV | Button::KeyC);
            if layout_changed && !self.first_person_visible() {
                self.rig.first_person.reset_state();
                requests.push(WindowRequest::SetCursor(CursorMode::Normal));
            }
        }

        if self.first_person_visible() {
            self.rig.first_person.update_key_action(button, action);
        }
        self.world.vehicle.update_key_action(button, action);

        requests
    }

    /// Cursor position in pixels, origin top-left
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.rig.first_person.update_mouse_movement(x, y);
        for button in &mut self.hud {
            button.update_mouse_move(x as f32, y as f32);
        }
    }

    pub fn handle_mouse_button(&mut self, button: Button, action: KeyAction) -> Vec<WindowRequest> {
        let mut requests = Vec::new();

        if self.first_person_visible() {
            if let Some(mode) = self.rig.first_person.update_mouse_button(button, action) {
                debug!("Mouse-look cursor mode {:?}", mode);
                requests.push(WindowRequest::SetCursor(mode));
            }
        }

        let Self { hud, world, .. } = self;
        for hud_button in hud.iter_mut() {
            if hud_button.update_mouse_press(button, action) {
                info!("HUD button '{}' clicked", hud_button.label().trim_end());
                hud_button.trigger(world);
            }
        }

        requests
    }

    /// Advance the simulation. Cameras that follow the vehicle see its
    /// position from this same update.
    pub fn update(&mut self, dt: f32) {
        self.world.vehicle.advance(dt);
        self.rig.first_person.update_state(dt);

        let target = self.world.vehicle.position();
        self.rig.tracking.track(target);
        self.rig.grounded.point_at(target);
    }

    /// Lay out the frame. `None` while the framebuffer has no area.
    pub fn plan(&mut self, fb_width: u32, fb_height: u32) -> Option<FramePlan> {
        if fb_width == 0 || fb_height == 0 {
            return None;
        }
        let (width, height) = (fb_width as f32, fb_height as f32);

        for button in &mut self.hud {
            button.update_size(width, height);
        }

        let visible = self.selection.visible();
        let view_width = width / visible.len() as f32;
        let lights = self.world.vehicle.lights();

        let views = visible
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                let viewport = Viewport {
                    x: i as f32 * view_width,
                    y: 0.0,
                    width: view_width,
                    height,
                };
                let camera = self.rig.get(id);
                ViewFrame {
                    camera: id,
                    viewport,
                    projection: camera.projection(viewport.aspect()),
                    eye: camera.position(),
                    lighting: self.lighting.viewed_from(camera.position(), lights),
                }
            })
            .collect();

        Some(FramePlan {
            framebuffer: (fb_width, fb_height),
            views,
            drawables: self.world.drawables(),
            hud: self.hud.iter().map(|b| b.view(&self.world)).collect(),
        })
    }

    /// Plan the frame and hand it to `renderer`. Skips zero-area frames.
    pub fn render<R: SceneRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        fb_width: u32,
        fb_height: u32,
    ) -> Result<()> {
        match self.plan(fb_width, fb_height) {
            Some(plan) => renderer.render(&plan),
            None => Ok(()),
        }
    }
}
