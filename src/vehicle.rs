//! Launch animation for the spaceship.
//!
//! The trajectory is a closed-form function of elapsed time:
//! `initial + (kx·t³, ky·t², 0)`, with the hull rotated about z so it points
//! along the path tangent.

use glam::{Mat3, Mat4, Vec3};
use log::info;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::core::{Button, KeyAction};
use crate::math::transform::{
    normal_matrix, rotation_y, rotation_z, scaling, transform_point, translation,
};
use crate::mesh::{Material, MeshData};
use crate::scene::PointLight;
use crate::shapes::{cone, cylinder, sphere};

pub const DEFAULT_INITIAL_POSITION: Vec3 = Vec3::new(-5.0, 0.1, 3.5);
pub const DEFAULT_KX: f32 = 0.005;
pub const DEFAULT_KY: f32 = 0.08;

/// Mesh units to world units
const MESH_SCALE: f32 = 0.04;
const SUBDIVS: usize = 32;

const LIGHT_OFFSETS: [Vec3; 3] = [
    Vec3::new(0.21, -0.02, 0.0),
    Vec3::new(-0.21, -0.02, 0.0),
    Vec3::new(0.0, 0.45, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// At the launch pad, time zero
    Reset,
    Running,
    /// Stopped mid-flight; launching again resumes from the same time
    Paused,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    initial_position: Vec3,
    kx: f32,
    ky: f32,
    time: f32,
    running: bool,
    position: Vec3,
    rotation: f32,
    model: Mat4,
    normal: Mat3,
}

impl Vehicle {
    pub fn new(initial_position: Vec3, kx: f32, ky: f32) -> Self {
        let mut vehicle = Self {
            initial_position,
            kx,
            ky,
            time: 0.0,
            running: false,
            position: initial_position,
            rotation: 0.0,
            model: Mat4::IDENTITY,
            normal: Mat3::IDENTITY,
        };
        vehicle.reset();
        vehicle
    }

    pub fn state(&self) -> AnimationState {
        match (self.running, self.time > 0.0) {
            (true, _) => AnimationState::Running,
            (false, true) => AnimationState::Paused,
            (false, false) => AnimationState::Reset,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Rotation about z in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Height gained since the pad
    pub fn altitude(&self) -> f32 {
        self.position.y - self.initial_position.y
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    pub fn normal_matrix(&self) -> Mat3 {
        self.normal
    }

    /// Advance the flight by `dt` seconds. No-op unless running.
    pub fn advance(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        self.time += dt;
        let t = self.time;
        self.position =
            self.initial_position + Vec3::new(self.kx * t * t * t, self.ky * t * t, 0.0);

        let dx = 3.0 * self.kx * t * t;
        let dy = 2.0 * self.ky * t;
        // The tangent vanishes at t = 0; upright is its limit from above
        self.rotation = if dx == 0.0 && dy == 0.0 {
            0.0
        } else {
            dy.atan2(dx) - FRAC_PI_2
        };

        self.update_matrices();
    }

    /// Launch, pause or resume
    pub fn toggle_run(&mut self) {
        self.running = !self.running;
        info!(
            "Vehicle {} at t={:.2}s",
            if self.running { "launched" } else { "paused" },
            self.time
        );
    }

    /// Back to the pad, stopped
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.position = self.initial_position;
        self.rotation = 0.0;
        self.running = false;
        self.update_matrices();
    }

    fn update_matrices(&mut self) {
        self.model = translation(self.position) * rotation_z(self.rotation);
        self.normal = normal_matrix(&self.model);
    }

    pub fn update_key_action(&mut self, button: Button, action: KeyAction) {
        if action != KeyAction::Press {
            return;
        }
        match button {
            Button::KeyF => self.toggle_run(),
            Button::KeyR => {
                self.reset();
                info!("Vehicle reset");
            }
            _ => {}
        }
    }

    /// World-space positions of the three hull lights
    pub fn light_positions(&self) -> [Vec3; 3] {
        LIGHT_OFFSETS.map(|offset| transform_point(&self.model, offset))
    }

    pub fn lights(&self) -> [PointLight; 3] {
        let ambient = [Vec3::X, Vec3::Y, Vec3::Z].map(|c| c / 1000.0);
        let diffuse = [
            Vec3::new(1.0, 0.2, 0.2),
            Vec3::new(0.2, 1.0, 0.2),
            Vec3::new(0.2, 0.2, 1.0),
        ];
        let positions = self.light_positions();
        [0, 1, 2].map(|i| PointLight {
            position: positions[i],
            ambient: ambient[i],
            diffuse: diffuse[i],
        })
    }

    /// Hull geometry in model space, upright along +y
    pub fn build_mesh() -> MeshData {
        let hull = Material::uniform(Vec3::splat(0.1), 100.0);
        let central_body = rotation_z(FRAC_PI_2) * scaling(2.0, 5.0, 5.0);
        let leg = translation(Vec3::new(2.0, 0.0, 0.0))
            * rotation_z(-FRAC_PI_2)
            * scaling(2.0, 0.1, 0.1);

        let parts = [
            cylinder(true, SUBDIVS, &central_body, hull),
            cylinder(
                false,
                SUBDIVS,
                &(translation(Vec3::new(0.0, 2.0, 0.0)) * central_body * scaling(0.5, 0.8, 0.81)),
                hull,
            ),
            cone(
                true,
                SUBDIVS,
                &(translation(Vec3::new(0.0, 3.0, 0.0)) * central_body * scaling(0.5, 1.0, 1.0)),
                hull,
            ),
            cone(
                true,
                SUBDIVS,
                &(translation(Vec3::new(0.0, 1.0, 0.0)) * central_body * scaling(0.5, 1.6, 1.6)),
                hull,
            ),
            cone(
                false,
                SUBDIVS,
                &(central_body * rotation_z(PI) * scaling(0.5, 1.0, 1.0)),
                hull,
            ),
            cylinder(true, SUBDIVS, &leg, hull),
            cylinder(true, SUBDIVS, &(rotation_y(TAU / 3.0) * leg), hull),
            cylinder(true, SUBDIVS, &(rotation_y(2.0 * TAU / 3.0) * leg), hull),
            sphere(
                2,
                &(translation(Vec3::new(0.0, 5.0, 0.0)) * scaling(0.5, 0.5, 0.5)),
                hull,
            ),
            sphere(
                2,
                &(translation(Vec3::new(0.0, 8.0, 0.0)) * scaling(0.5, 2.0, 0.5)),
                hull,
            ),
            cylinder(
                true,
                SUBDIVS,
                &(translation(Vec3::new(0.0, 4.0, 0.0))
                    * rotation_z(FRAC_PI_2)
                    * scaling(2.0, 0.05, 0.05)),
                hull,
            ),
        ];

        parts
            .iter()
            .fold(MeshData::new(), |mesh, part| mesh.concatenate(part))
            .scale_positions(MESH_SCALE)
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_POSITION, DEFAULT_KX, DEFAULT_KY)
    }
}
