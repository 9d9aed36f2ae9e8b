/// A 3-component vector `[x, y, z]`.
pub type Vector3 = [f32; 3];

/// Scale `v` to unit length in place.
///
/// A zero-length input produces NaN components. Callers pass validated,
/// non-zero vectors; the NaNs are left to surface rather than masked.
pub fn normalize(v: &mut Vector3) {
    let inv_len = 1.0 / length(*v);
    v[0] *= inv_len;
    v[1] *= inv_len;
    v[2] *= inv_len;
}

/// Copying variant of [`normalize`].
pub fn normalized(mut v: Vector3) -> Vector3 {
    normalize(&mut v);
    v
}

pub fn length(v: Vector3) -> f32 {
    dot(v, v).sqrt()
}

pub fn dot(a: Vector3, b: Vector3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vector3, b: Vector3) -> Vector3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// `a - b`.
pub fn sub(a: Vector3, b: Vector3) -> Vector3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_scales_to_unit_length() {
        let mut v = [3.0, 0.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[2] - 0.8).abs() < 1e-6);
        assert!((length(v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector_propagates_nan() {
        let mut v = [0.0, 0.0, 0.0];
        normalize(&mut v);
        assert!(v.iter().all(|c| c.is_nan()));
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
    }
}
