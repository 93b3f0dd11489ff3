use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Rotate a world-frame vector into the body frame of `orientation`.
#[inline]
pub fn to_body_frame(v: &Vector3<f64>, orientation: &UnitQuaternion<f64>) -> Vector3<f64> {
    orientation.inverse_transform_vector(v)
}

/// Rotate a body-frame vector into the world frame.
#[inline]
pub fn to_world_frame(v: &Vector3<f64>, orientation: &UnitQuaternion<f64>) -> Vector3<f64> {
    orientation.transform_vector(v)
}

/// Scales `v` down to `max_norm` when it is longer. Returns true if clipped.
pub fn clip_norm(v: &mut Vector3<f64>, max_norm: f64) -> bool {
    let norm_sq = v.norm_squared();
    if norm_sq > max_norm * max_norm {
        *v *= max_norm / norm_sq.sqrt();
        true
    } else {
        false
    }
}

/// Relative comparison with absolute floor, matching float tolerance checks.
#[inline]
pub fn is_approximately_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

/// Sign with `sign(0) == 0`.
#[inline]
pub fn sgn(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Inverse of an inertia tensor, or `None` unless it is finite, symmetric and
/// positive definite.
pub fn inertia_inverse(inertia: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    if inertia.iter().any(|v| !v.is_finite()) || !is_matrix_symmetric(inertia) {
        return None;
    }
    // cholesky reads the lower triangle only
    (*inertia).cholesky().map(|factor| factor.inverse())
}

/// Check if matrix is symmetric
fn is_matrix_symmetric(mat: &Matrix3<f64>) -> bool {
    const EPSILON: f64 = 1e-10;
    for i in 0..3 {
        for j in 0..3 {
            if (mat[(i, j)] - mat[(j, i)]).abs() > EPSILON {
                return false;
            }
        }
    }
    true
}
