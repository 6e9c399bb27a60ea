use glam::{Mat3, Mat4, Vec3};

use crate::math::transform::{normal_matrix, rotation_y, rotation_z, scaling, translation};
use crate::mesh::{Material, MeshData};
use crate::shapes::{cylinder, ground_plane};
use crate::vehicle::Vehicle;

/// Half the side length of the square ground
pub const GROUND_HALF_EXTENT: f32 = 30.0;

/// Point light with separate ambient and diffuse colours
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
}

/// Meshes the renderer uploads once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Ground,
    LaunchPad,
    Vehicle,
}

impl MeshId {
    pub const ALL: [MeshId; 3] = [MeshId::Ground, MeshId::LaunchPad, MeshId::Vehicle];

    /// Model-space geometry for this mesh
    pub fn build(self) -> MeshData {
        match self {
            MeshId::Ground => ground_plane(GROUND_HALF_EXTENT, ground_material()),
            MeshId::LaunchPad => launch_pad_mesh(),
            MeshId::Vehicle => Vehicle::build_mesh(),
        }
    }
}

/// One mesh instance placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub mesh: MeshId,
    pub model: Mat4,
    pub normal: Mat3,
}

impl Drawable {
    pub fn new(mesh: MeshId, model: Mat4) -> Self {
        Self {
            mesh,
            model,
            normal: normal_matrix(&model),
        }
    }
}

fn ground_material() -> Material {
    Material {
        ambient: Vec3::new(0.45, 0.38, 0.3),
        diffuse: Vec3::new(0.45, 0.38, 0.3),
        specular: Vec3::splat(0.02),
        shininess: 4.0,
        emissive: Vec3::ZERO,
    }
}

/// Concrete slab on four short posts, upright along +y
fn launch_pad_mesh() -> MeshData {
    let concrete = Material::uniform(Vec3::splat(0.35), 16.0);
    let hazard = Material {
        emissive: Vec3::new(0.05, 0.03, 0.0),
        ..Material::uniform(Vec3::new(0.9, 0.6, 0.1), 32.0)
    };
    let upright = rotation_z(std::f32::consts::FRAC_PI_2);

    let slab = cylinder(
        true,
        48,
        &(translation(Vec3::new(0.0, 0.05, 0.0)) * upright * scaling(0.05, 0.6, 0.6)),
        concrete,
    );
    let ring = cylinder(
        false,
        48,
        &(translation(Vec3::new(0.0, 0.05, 0.0)) * upright * scaling(0.051, 0.62, 0.62)),
        hazard,
    );

    (0..4)
        .map(|i| {
            let post = rotation_y(i as f32 * std::f32::consts::FRAC_PI_2)
                * translation(Vec3::new(0.45, 0.0, 0.0))
                * upright
                * scaling(0.05, 0.04, 0.04);
            cylinder(true, 12, &post, concrete)
        })
        .fold(slab.concatenate(&ring), |mesh, post| mesh.concatenate(&post))
}

/// Ground and the two launch pads; nothing here moves
#[derive(Debug, Clone)]
pub struct StaticScene {
    drawables: Vec<Drawable>,
}

impl StaticScene {
    pub fn new() -> Self {
        let pads = [
            translation(Vec3::new(5.0, 0.0, -5.0)) * rotation_y(1.0),
            translation(Vec3::new(-5.0, 0.0, 3.5)) * rotation_y(-0.5),
        ];

        let mut drawables = vec![Drawable::new(MeshId::Ground, Mat4::IDENTITY)];
        drawables.extend(pads.iter().map(|model| Drawable::new(MeshId::LaunchPad, *model)));
        Self { drawables }
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }
}

impl Default for StaticScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Global directional light plus the vehicle's point lights, as seen from
/// one viewpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub viewpoint: Vec3,
    pub point_lights: [PointLight; 3],
}

impl Lighting {
    pub fn new() -> Self {
        Self {
            direction: Vec3::new(0.0, 1.0, -1.0).normalize(),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::new(0.9, 0.9, 0.6),
            viewpoint: Vec3::ZERO,
            point_lights: [PointLight::default(); 3],
        }
    }

    /// Same global light, seen from `viewpoint` with the given point lights
    pub fn viewed_from(&self, viewpoint: Vec3, point_lights: [PointLight; 3]) -> Self {
        Self {
            viewpoint,
            point_lights,
            ..*self
        }
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::transform_point;

    #[test]
    fn test_static_scene_has_ground_and_two_pads() {
        let scene = StaticScene::new();
        let meshes: Vec<MeshId> = scene.drawables().iter().map(|d| d.mesh).collect();
        assert_eq!(meshes, vec![MeshId::Ground, MeshId::LaunchPad, MeshId::LaunchPad]);
    }

    #[test]
    fn test_pads_are_placed_at_their_sites() {
        let scene = StaticScene::new();
        let origins: Vec<Vec3> = scene.drawables()[1..]
            .iter()
            .map(|d| transform_point(&d.model, Vec3::ZERO))
            .collect();
        assert!(origins[0].abs_diff_eq(Vec3::new(5.0, 0.0, -5.0), 1e-6));
        assert!(origins[1].abs_diff_eq(Vec3::new(-5.0, 0.0, 3.5), 1e-6));
    }

    #[test]
    fn test_every_mesh_builds_whole_triangles() {
        for id in MeshId::ALL {
            let mesh = id.build();
            assert!(!mesh.is_empty(), "{:?} is empty", id);
            assert_eq!(mesh.len() % 3, 0);
            assert_eq!(mesh.normals.len(), mesh.len());
            assert_eq!(mesh.materials.len(), mesh.len());
        }
    }

    #[test]
    fn test_lighting_viewed_from_keeps_global_light() {
        let base = Lighting::new();
        let lights = [PointLight {
            position: Vec3::ONE,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
        }; 3];
        let view = base.viewed_from(Vec3::new(1.0, 2.0, 3.0), lights);

        assert_eq!(view.direction, base.direction);
        assert_eq!(view.viewpoint, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(view.point_lights[2].position, Vec3::ONE);
        assert!((base.direction.length() - 1.0).abs() < 1e-6);
    }
}
