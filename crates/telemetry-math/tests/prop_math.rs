//! Property tests for the matrix algebra.

use proptest::prelude::*;
use telemetry_math::matrix::multiply_into;
use telemetry_math::Matrix4;

fn arb_matrix() -> impl Strategy<Value = Matrix4> {
    prop::array::uniform16(-2.0f32..2.0).prop_map(Matrix4)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    /// (AB)C == A(BC) within float tolerance.
    #[test]
    fn multiply_is_associative(a in arb_matrix(), b in arb_matrix(), c in arb_matrix()) {
        let left = (a * b) * c;
        let right = a * (b * c);
        for i in 0..16 {
            prop_assert!(close(left.0[i], right.0[i]), "element {}: {} vs {}", i, left.0[i], right.0[i]);
        }
    }

    #[test]
    fn identity_is_left_and_right_neutral(a in arb_matrix()) {
        prop_assert_eq!(Matrix4::identity() * a, a);
        prop_assert_eq!(a * Matrix4::identity(), a);
    }

    /// The buffer-reusing variant agrees with the allocating one.
    #[test]
    fn multiply_into_matches_multiply(a in arb_matrix(), b in arb_matrix()) {
        let mut out = Matrix4::identity();
        multiply_into(&a, &b, &mut out);
        prop_assert_eq!(out, a.multiply(&b));
    }

    #[test]
    fn multiply_matches_glam(a in arb_matrix(), b in arb_matrix()) {
        let ours = a * b;
        let theirs = Matrix4::from(glam::Mat4::from(a) * glam::Mat4::from(b));
        for i in 0..16 {
            prop_assert!(close(ours.0[i], theirs.0[i]));
        }
    }

    /// Rotations preserve vector length.
    #[test]
    fn rotations_are_rigid(rad in -6.3f32..6.3, x in -5.0f32..5.0, y in -5.0f32..5.0, z in -5.0f32..5.0) {
        let len = (x * x + y * y + z * z).sqrt();
        for m in [Matrix4::rotation_x(rad), Matrix4::rotation_y(rad), Matrix4::rotation_z(rad)] {
            let p = m.transform([x, y, z, 1.0]);
            let rotated = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            prop_assert!(close(len, rotated));
            prop_assert_eq!(p[3], 1.0);
        }
    }
}
