//! 4x4 matrices.
//!
//! Layout is column-major: the element at `(row, col)` is stored at index
//! `col * 4 + row`, which is what the GPU uniform buffers expect, so matrices
//! upload without a transpose. The array literals in the builders below are
//! therefore written one *column* per line. Anything that reads these arrays
//! as row-major silently transposes every transform.
//!
//! Points are column vectors and transforms compose right to left:
//! `a * b` applies `b` first.

use crate::vector::{cross, dot, normalized, sub, Vector3};
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4(pub [f32; 16]);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Symmetric perspective frustum with OpenGL clip depth (`[-1, 1]` after
    /// the perspective divide). Requires `0 < near < far`.
    #[rustfmt::skip]
    pub fn perspective(fovy_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fovy_deg.to_radians() * 0.5).tan();
        let range_inv = 1.0 / (near - far);
        Self([
            f / aspect, 0.0, 0.0,                            0.0,
            0.0,        f,   0.0,                            0.0,
            0.0,        0.0, (near + far) * range_inv,      -1.0,
            0.0,        0.0, 2.0 * near * far * range_inv,   0.0,
        ])
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    ///
    /// `up` must not be parallel to `eye - center`, otherwise the basis
    /// degenerates and the result is NaN.
    #[rustfmt::skip]
    pub fn look_at(eye: Vector3, center: Vector3, up: Vector3) -> Self {
        let z = normalized(sub(eye, center));
        let x = normalized(cross(up, z));
        let y = normalized(cross(z, x));

        let dx = -dot(x, eye);
        let dy = -dot(y, eye);
        let dz = -dot(z, eye);

        Self([
            x[0], y[0], z[0], 0.0,
            x[1], y[1], z[1], 0.0,
            x[2], y[2], z[2], 0.0,
            dx,   dy,   dz,   1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_x(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        Self([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_y(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        Self([
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_z(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        Self([
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Self {
        Self([
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            tx,  ty,  tz,  1.0,
        ])
    }

    /// Element at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    /// `self * rhs` into a fresh matrix.
    pub fn multiply(&self, rhs: &Matrix4) -> Matrix4 {
        let mut out = Matrix4([0.0; 16]);
        multiply_into(self, rhs, &mut out);
        out
    }

    /// Matrix times column vector `[x, y, z, w]`.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|col| self.at(row, col) * v[col]).sum();
        }
        out
    }

    /// Columns as nested arrays, the shape uniform structs store.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let m = &self.0;
        [
            [m[0], m[1], m[2], m[3]],
            [m[4], m[5], m[6], m[7]],
            [m[8], m[9], m[10], m[11]],
            [m[12], m[13], m[14], m[15]],
        ]
    }
}

/// Writes `a * b` into `out`, overwriting it.
///
/// `out[col][row] = Σ_k a[k][row] * b[col][k]`. Since `out` is borrowed
/// mutably it can never alias `a` or `b`.
pub fn multiply_into(a: &Matrix4, b: &Matrix4, out: &mut Matrix4) {
    for row in 0..4 {
        for col in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a.0[k * 4 + row] * b.0[col * 4 + k];
            }
            out.0[col * 4 + row] = sum;
        }
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Self(m.to_cols_array())
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array(&m.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn assert_close(a: &Matrix4, b: &Matrix4, eps: f32) {
        for (i, (x, y)) in a.0.iter().zip(b.0.iter()).enumerate() {
            assert!((x - y).abs() <= eps, "element {i}: {x} vs {y}");
        }
    }

    #[test]
    fn zero_rotations_are_identity() {
        assert_eq!(Matrix4::rotation_x(0.0), Matrix4::identity());
        assert_eq!(Matrix4::rotation_y(0.0), Matrix4::identity());
        assert_eq!(Matrix4::rotation_z(0.0), Matrix4::identity());
    }

    #[test]
    fn rotation_x_quarter_turn_maps_y_to_z() {
        let p = Matrix4::rotation_x(PI / 180.0 * 90.0).transform([0.0, 1.0, 0.0, 1.0]);
        assert!(p[0].abs() < 1e-6);
        assert!(p[1].abs() < 1e-6);
        assert!((p[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_z_quarter_turn_maps_x_to_y() {
        let p = Matrix4::rotation_z(PI / 2.0).transform([1.0, 0.0, 0.0, 1.0]);
        assert!(p[0].abs() < 1e-6);
        assert!((p[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_y_quarter_turn_maps_z_to_x() {
        let p = Matrix4::rotation_y(PI / 2.0).transform([0.0, 0.0, 1.0, 1.0]);
        assert!((p[0] - 1.0).abs() < 1e-6);
        assert!(p[2].abs() < 1e-6);
    }

    #[test]
    fn translation_is_last_column() {
        let t = Matrix4::translation(1.0, 2.0, 3.0);
        assert_eq!(t.at(0, 3), 1.0);
        assert_eq!(t.at(1, 3), 2.0);
        assert_eq!(t.at(2, 3), 3.0);
        assert_eq!(t.transform([0.0, 0.0, 0.0, 1.0]), [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        // Scale, then translate.
        let m = Matrix4::translation(1.0, 0.0, 0.0) * Matrix4::scaling(2.0, 2.0, 2.0);
        assert_eq!(m.transform([1.0, 1.0, 1.0, 1.0]), [3.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn multiply_into_overwrites_output() {
        let mut out = Matrix4([7.0; 16]);
        multiply_into(&Matrix4::identity(), &Matrix4::scaling(2.0, 3.0, 4.0), &mut out);
        assert_eq!(out, Matrix4::scaling(2.0, 3.0, 4.0));
    }

    #[test]
    fn perspective_keeps_forward_point_in_clip_volume() {
        let p = Matrix4::perspective(60.0, 1.0, 0.1, 100.0);
        let clip = p.transform([0.0, 0.0, -1.0, 1.0]);
        assert!(clip[3] > 0.0);
        let depth = clip[2] / clip[3];
        assert!((-1.0..=1.0).contains(&depth), "depth {depth}");
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_clip_bounds() {
        let p = Matrix4::perspective(60.0, 1.5, 0.1, 100.0);
        let near = p.transform([0.0, 0.0, -0.1, 1.0]);
        let far = p.transform([0.0, 0.0, -100.0, 1.0]);
        assert!((near[2] / near[3] + 1.0).abs() < 1e-4);
        assert!((far[2] / far[3] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn perspective_matches_glam_gl_convention() {
        let ours = Matrix4::perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
        let theirs = glam::Mat4::perspective_rh_gl(60f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        assert_close(&ours, &theirs.into(), 1e-5);
    }

    #[test]
    fn look_at_matches_glam() {
        let eye = [0.0, 0.8, 2.5];
        let ours = Matrix4::look_at(eye, [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let theirs = glam::Mat4::look_at_rh(
            glam::Vec3::from(eye),
            glam::Vec3::ZERO,
            glam::Vec3::Y,
        );
        assert_close(&ours, &theirs.into(), 1e-5);
    }

    #[test]
    fn look_at_moves_eye_to_origin_and_center_down_negative_z() {
        let eye = [0.0, 0.8, 2.5];
        let view = Matrix4::look_at(eye, [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);

        let e = view.transform([eye[0], eye[1], eye[2], 1.0]);
        assert!(e[..3].iter().all(|c| c.abs() < 1e-5));

        let c = view.transform([0.0, 0.0, 0.0, 1.0]);
        let dist = (0.8f32 * 0.8 + 2.5 * 2.5).sqrt();
        assert!(c[0].abs() < 1e-5);
        assert!(c[1].abs() < 1e-5);
        assert!((c[2] + dist).abs() < 1e-5);
    }

    #[test]
    fn look_at_with_parallel_up_is_nan() {
        let view = Matrix4::look_at([0.0, 2.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(view.0.iter().any(|v| v.is_nan()));
    }

    #[test]
    fn glam_round_trip_preserves_layout() {
        let m = Matrix4::translation(4.0, 5.0, 6.0) * Matrix4::rotation_x(0.3);
        let g: glam::Mat4 = m.into();
        assert_eq!(g.w_axis.x, 4.0);
        assert_eq!(Matrix4::from(g), m);
    }

    #[test]
    fn cols_array_2d_groups_by_column() {
        let cols = Matrix4::translation(1.0, 2.0, 3.0).to_cols_array_2d();
        assert_eq!(cols[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
