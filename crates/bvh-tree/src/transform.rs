//! Rigid transform checks.
//!
//! Node radii are carried unchanged through every transform, so hierarchies
//! may only be placed with rotations and translations.

use nalgebra::{Matrix3, Matrix4, RowVector4};

/// Default tolerance for [`is_rigid_transform`].
pub const RIGID_EPSILON: f32 = 1e-4;

/// Returns `true` if `transform` is a rotation followed by a translation.
///
/// The bottom row must be `(0, 0, 0, 1)` and the upper-left 3×3 block must be
/// orthonormal with determinant +1, all within `epsilon`.
pub fn is_rigid_transform(transform: &Matrix4<f32>, epsilon: f32) -> bool {
    let bottom: RowVector4<f32> = transform.fixed_view::<1, 4>(3, 0).into_owned();
    if !bottom.relative_eq(&RowVector4::new(0.0, 0.0, 0.0, 1.0), epsilon, epsilon) {
        return false;
    }

    let linear: Matrix3<f32> = transform.fixed_view::<3, 3>(0, 0).into_owned();
    (linear.transpose() * linear).relative_eq(&Matrix3::identity(), epsilon, epsilon)
        && (linear.determinant() - 1.0).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

    #[test]
    fn identity_is_rigid() {
        assert!(is_rigid_transform(&Matrix4::identity(), RIGID_EPSILON));
    }

    #[test]
    fn rotation_and_translation_are_rigid() {
        let iso = Isometry3::from_parts(
            Translation3::new(3.0, -1.0, 2.0),
            UnitQuaternion::from_euler_angles(0.3, 1.1, -0.7),
        );
        assert!(is_rigid_transform(&iso.to_homogeneous(), RIGID_EPSILON));
    }

    #[test]
    fn scaling_is_not_rigid() {
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        assert!(!is_rigid_transform(&scale, RIGID_EPSILON));
        assert!(!is_rigid_transform(&Matrix4::new_scaling(1.5), RIGID_EPSILON));
    }

    #[test]
    fn reflection_is_not_rigid() {
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));
        assert!(!is_rigid_transform(&mirror, RIGID_EPSILON));
    }

    #[test]
    fn projective_row_is_not_rigid() {
        let mut m = Matrix4::identity();
        m[(3, 2)] = 0.5;
        assert!(!is_rigid_transform(&m, RIGID_EPSILON));
    }
}
