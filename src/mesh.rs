use glam::{Mat4, Vec3};

use crate::math::transform::{normal_matrix, transform_point};

/// Blinn-Phong surface parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    pub emissive: Vec3,
}

impl Material {
    /// Same colour for ambient, diffuse and specular terms, no emission
    pub const fn uniform(color: Vec3, shininess: f32) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            specular: color,
            shininess,
            emissive: Vec3::ZERO,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::uniform(Vec3::splat(0.5), 32.0)
    }
}

/// Interleaved vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub emissive: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32x3,
        5 => Float32,
        6 => Float32x3,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Non-indexed triangle soup.
///
/// `positions`, `normals` and `materials` are parallel: entry `i` of each
/// describes vertex `i`, and every three consecutive vertices form a triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub materials: Vec<Material>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positions and normals sharing one material
    pub fn with_material(positions: Vec<Vec3>, normals: Vec<Vec3>, material: Material) -> Self {
        let materials = vec![material; positions.len()];
        Self {
            positions,
            normals,
            materials,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Append `other` after `self`
    pub fn concatenate(mut self, other: &MeshData) -> Self {
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.materials.extend_from_slice(&other.materials);
        self
    }

    /// Bake `transform` into the geometry. Positions go through the full
    /// matrix, normals through its normal matrix and are renormalized.
    pub fn pre_transform(mut self, transform: &Mat4) -> Self {
        let normals = normal_matrix(transform);
        for p in &mut self.positions {
            *p = transform_point(transform, *p);
        }
        for n in &mut self.normals {
            *n = (normals * *n).normalize_or_zero();
        }
        self
    }

    /// Scale positions only, leaving normals untouched
    pub fn scale_positions(mut self, factor: f32) -> Self {
        for p in &mut self.positions {
            *p *= factor;
        }
        self
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.materials)
            .map(|((p, n), m)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
                ambient: m.ambient.to_array(),
                diffuse: m.diffuse.to_array(),
                specular: m.specular.to_array(),
                shininess: m.shininess,
                emissive: m.emissive.to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::{scaling, translation};

    fn triangle() -> MeshData {
        MeshData::with_material(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec3::Z; 3],
            Material::default(),
        )
    }

    #[test]
    fn test_vertex_is_nineteen_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 19 * 4);
    }

    #[test]
    fn test_concatenate_keeps_order() {
        let a = triangle();
        let b = triangle().pre_transform(&translation(Vec3::new(0.0, 0.0, 2.0)));
        let joined = a.clone().concatenate(&b);

        assert_eq!(joined.len(), 6);
        assert_eq!(joined.triangle_count(), 2);
        assert_eq!(&joined.positions[..3], &a.positions[..]);
        assert_eq!(joined.positions[3], Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_pre_transform_moves_positions_not_normals() {
        let moved = triangle().pre_transform(&translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(moved.positions[1], Vec3::new(2.0, 2.0, 3.0));
        assert!(moved.normals[0].abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_pre_transform_normals_stay_unit_under_scale() {
        let mesh = MeshData::with_material(
            vec![Vec3::ZERO; 3],
            vec![Vec3::new(1.0, 1.0, 0.0).normalize(); 3],
            Material::default(),
        )
        .pre_transform(&scaling(4.0, 1.0, 1.0));

        let n = mesh.normals[0];
        assert!((n.length() - 1.0).abs() < 1e-5);
        // Stretching x flattens the surface toward the y axis
        assert!(n.y > n.x);
    }

    #[test]
    fn test_vertices_interleave_material() {
        let material = Material::uniform(Vec3::new(0.1, 0.2, 0.3), 100.0);
        let mesh = MeshData::with_material(vec![Vec3::ONE], vec![Vec3::Y], material);
        let vertices = mesh.vertices();

        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].position, [1.0, 1.0, 1.0]);
        assert_eq!(vertices[0].diffuse, [0.1, 0.2, 0.3]);
        assert_eq!(vertices[0].shininess, 100.0);
    }
}
