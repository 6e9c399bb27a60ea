//! Procedural primitives. Every generator builds a unit shape along the
//! x axis (or centred on the origin for spheres and planes), then bakes
//! `transform` into it.
//!
//! ```
//! use glam::Mat4;
//! use spaceport::mesh::Material;
//! use spaceport::shapes::cylinder;
//!
//! let mesh = cylinder(true, 16, &Mat4::IDENTITY, Material::default());
//! assert_eq!(mesh.triangle_count(), 4 * 16);
//! ```

use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

use crate::mesh::{Material, MeshData};

// ============================================================================
// Round primitives
// ============================================================================

/// Points on the unit circle in the yz plane, from angle 0 through 2π,
/// paired as (previous, current) segments.
fn ring_segments(subdivs: usize) -> impl Iterator<Item = (Vec3, Vec3)> {
    let point = move |i: usize| {
        let angle = i as f32 / subdivs as f32 * TAU;
        Vec3::new(0.0, angle.sin(), angle.cos())
    };
    (0..subdivs).map(move |i| (point(i), point(i + 1)))
}

/// Unit cylinder from x = 0 to x = 1 with radius 1
pub fn cylinder(capped: bool, subdivs: usize, transform: &Mat4, material: Material) -> MeshData {
    let per_segment = if capped { 12 } else { 6 };
    let mut positions = Vec::with_capacity(per_segment * subdivs);
    let mut normals = Vec::with_capacity(per_segment * subdivs);

    for (prev, next) in ring_segments(subdivs) {
        // Side normals point out from the axis
        positions.extend([prev, prev + Vec3::X, next]);
        normals.extend([prev, prev, next]);

        positions.extend([next, prev + Vec3::X, next + Vec3::X]);
        normals.extend([next, prev, next]);

        if capped {
            positions.extend([Vec3::ZERO, prev, next]);
            normals.extend([Vec3::NEG_X; 3]);

            positions.extend([Vec3::X, next + Vec3::X, prev + Vec3::X]);
            normals.extend([Vec3::X; 3]);
        }
    }

    MeshData::with_material(positions, normals, material).pre_transform(transform)
}

/// Unit cone with its base circle at x = 0 and apex at (1, 0, 0)
pub fn cone(capped: bool, subdivs: usize, transform: &Mat4, material: Material) -> MeshData {
    let per_segment = if capped { 6 } else { 3 };
    let mut positions = Vec::with_capacity(per_segment * subdivs);
    let mut normals = Vec::with_capacity(per_segment * subdivs);

    for (prev, next) in ring_segments(subdivs) {
        // Slant normals lean 45 degrees toward the apex; the apex takes the
        // face normal of its segment
        let mid = ((prev + next) * 0.5).normalize_or_zero();
        positions.extend([Vec3::X, next, prev]);
        normals.extend([
            (Vec3::X + mid).normalize(),
            (Vec3::X + next).normalize(),
            (Vec3::X + prev).normalize(),
        ]);

        if capped {
            positions.extend([Vec3::ZERO, prev, next]);
            normals.extend([Vec3::NEG_X; 3]);
        }
    }

    MeshData::with_material(positions, normals, material).pre_transform(transform)
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [2, 1, 0],
    [1, 2, 3],
    [5, 4, 3],
    [4, 8, 3],
    [7, 6, 0],
    [6, 9, 0],
    [11, 10, 4],
    [10, 11, 6],
    [9, 5, 2],
    [5, 9, 11],
    [8, 7, 1],
    [7, 8, 10],
    [2, 5, 3],
    [8, 1, 3],
    [9, 2, 0],
    [1, 7, 0],
    [11, 9, 6],
    [7, 10, 6],
    [5, 11, 4],
    [10, 8, 4],
];

fn icosahedron_points() -> Vec<Vec3> {
    let phi = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let a = 1.0 / (1.0 + 1.0 / (phi * phi)).sqrt();
    let b = a / phi;

    vec![
        Vec3::new(0.0, b, -a),
        Vec3::new(b, a, 0.0),
        Vec3::new(-b, a, 0.0),
        Vec3::new(0.0, b, a),
        Vec3::new(0.0, -b, a),
        Vec3::new(-a, 0.0, b),
        Vec3::new(0.0, -b, -a),
        Vec3::new(a, 0.0, -b),
        Vec3::new(a, 0.0, b),
        Vec3::new(-a, 0.0, -b),
        Vec3::new(b, -a, 0.0),
        Vec3::new(-b, -a, 0.0),
    ]
}

/// Unit sphere made by splitting every icosahedron face into four,
/// `subdiv_loops` times, and projecting new points onto the sphere.
pub fn sphere(subdiv_loops: usize, transform: &Mat4, material: Material) -> MeshData {
    let mut points = icosahedron_points();
    let mut faces = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..subdiv_loops {
        let mut next_faces = Vec::with_capacity(faces.len() * 4);
        for [i0, i1, i2] in faces {
            let (v0, v1, v2) = (points[i0], points[i1], points[i2]);
            let m01 = points.len();
            points.push(((v0 + v1) * 0.5).normalize());
            points.push(((v1 + v2) * 0.5).normalize());
            points.push(((v2 + v0) * 0.5).normalize());
            let (m12, m20) = (m01 + 1, m01 + 2);

            next_faces.push([i0, m01, m20]);
            next_faces.push([i1, m12, m01]);
            next_faces.push([i2, m20, m12]);
            next_faces.push([m01, m12, m20]);
        }
        faces = next_faces;
    }

    let positions: Vec<Vec3> = faces
        .iter()
        .flat_map(|face| face.map(|i| points[i]))
        .collect();
    // On a unit sphere the normal is the position
    let normals = positions.clone();

    MeshData::with_material(positions, normals, material).pre_transform(transform)
}

// ============================================================================
// Flat primitives
// ============================================================================

/// Square in the y = 0 plane facing up, spanning ±`half_extent` in x and z
pub fn ground_plane(half_extent: f32, material: Material) -> MeshData {
    let h = half_extent;
    let corners = [
        Vec3::new(-h, 0.0, -h),
        Vec3::new(-h, 0.0, h),
        Vec3::new(h, 0.0, h),
        Vec3::new(h, 0.0, -h),
    ];
    let positions = vec![
        corners[0], corners[1], corners[2],
        corners[0], corners[2], corners[3],
    ];
    MeshData::with_material(positions, vec![Vec3::Y; 6], material)
}
