//! Matrix factories and algebra for the render pipeline.
//!
//! Matrices are read with row/column semantics: `element(m, i, j)` is row `i`,
//! column `j`. Storage is glam's column-major layout, so the GPU upload path
//! needs no transpose. Products apply right-to-left: in `a * b * v`, `b` acts
//! on `v` first.

use glam::{Mat3, Mat4, Vec3};

/// Remaps OpenGL clip depth [-1, 1] to the [0, 1] range wgpu rasterizes.
pub const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.5, 0.0, //
    0.0, 0.0, 0.5, 1.0, //
]);

/// Build a matrix from its rows, top row first.
pub fn from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&rows).transpose()
}

/// Element at row `row`, column `col`.
pub fn element(m: &Mat4, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    from_rows([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    from_rows([
        [c, -s, 0.0, 0.0],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn translation(offset: Vec3) -> Mat4 {
    from_rows([
        [1.0, 0.0, 0.0, offset.x],
        [0.0, 1.0, 0.0, offset.y],
        [0.0, 0.0, 1.0, offset.z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
    from_rows([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-handed perspective projection into OpenGL clip space.
///
/// Camera-space depth `-near` lands on NDC z = -1 and `-far` on NDC z = +1;
/// the bottom row writes `w = -z` for the perspective divide.
///
/// Requires `0 < fov_y < PI`, `aspect > 0` and `0 < near < far`. Nothing is
/// checked: out-of-range arguments produce non-finite entries.
pub fn perspective_projection(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let sy = 1.0 / (fov_y * 0.5).tan();
    let sx = sy / aspect;
    let a = (far + near) / (near - far);
    let b = 2.0 * far * near / (near - far);

    from_rows([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, a, b],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// General 4x4 inverse. The matrix must be invertible; a singular input
/// yields NaN/Inf entries rather than an error.
pub fn invert(m: &Mat4) -> Mat4 {
    m.inverse()
}

pub fn transpose(m: &Mat4) -> Mat4 {
    m.transpose()
}

/// Upper-left 3x3 of the inverse-transpose, for carrying surface normals
/// through `model` under non-uniform scaling.
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(transpose(&invert(model)))
}

/// Multiply a point (w = 1) and divide by the resulting w.
pub fn transform_point(m: &Mat4, point: Vec3) -> Vec3 {
    let p = *m * point.extend(1.0);
    p.truncate() / p.w
}
