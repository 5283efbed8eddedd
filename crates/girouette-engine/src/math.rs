//! Math types and fixed-function-style matrix constructors.
//!
//! Matrices follow the classic GL conventions: right-handed eye space looking
//! down -Z, projection matrices producing -1..1 clip depth. wgpu consumes
//! 0..1 clip depth, so [`depth_remap`] must be applied once at upload time
//! instead of being baked into stored projection matrices.

pub use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// 4x4 matrix type.
pub type Mat4 = Matrix4<f32>;

/// 3D vector type.
pub type Vec3 = Vector3<f32>;

/// Perspective frustum matrix, `glFrustum` layout.
///
/// Requires `near > 0` and `far > near`; a symmetric frustum is obtained with
/// `left = -right`, `bottom = -top`.
#[rustfmt::skip]
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(near > 0.0 && far > near);
    let rl = right - left;
    let tb = top - bottom;
    let fndist = far - near;

    Mat4::new(
        2.0 * near / rl, 0.0,             (right + left) / rl,   0.0,
        0.0,             2.0 * near / tb, (top + bottom) / tb,   0.0,
        0.0,             0.0,             -(far + near) / fndist, -2.0 * far * near / fndist,
        0.0,             0.0,             -1.0,                  0.0,
    )
}

/// Orthographic projection matrix, `glOrtho` layout.
#[rustfmt::skip]
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = right - left;
    let tb = top - bottom;
    let fndist = far - near;

    Mat4::new(
        2.0 / rl, 0.0,      0.0,           -(right + left) / rl,
        0.0,      2.0 / tb, 0.0,           -(top + bottom) / tb,
        0.0,      0.0,      -2.0 / fndist, -(far + near) / fndist,
        0.0,      0.0,      0.0,           1.0,
    )
}

/// Right-handed look-at view matrix (`gluLookAt` semantics).
#[rustfmt::skip]
pub fn look_at(eye: Point3<f32>, target: Point3<f32>, up: Vec3) -> Mat4 {
    let forward = (target - eye).normalize();
    let side = forward.cross(&up).normalize();
    let cam_up = side.cross(&forward);

    let rotation = Mat4::new(
        side.x,     side.y,     side.z,     0.0,
        cam_up.x,   cam_up.y,   cam_up.z,   0.0,
        -forward.x, -forward.y, -forward.z, 0.0,
        0.0,        0.0,        0.0,        1.0,
    );

    rotation * Mat4::new_translation(&-eye.coords)
}

/// Rotation of `angle_deg` degrees about `axis` (`glRotate` semantics).
pub fn rotation_deg(angle_deg: f32, axis: Vec3) -> Mat4 {
    Mat4::from_axis_angle(&Unit::new_normalize(axis), angle_deg.to_radians())
}

/// Translation by `v`.
pub fn translation(v: Vec3) -> Mat4 {
    Mat4::new_translation(&v)
}

/// Non-uniform scaling by `v`.
pub fn scaling(v: Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(&v)
}

/// Clip-space correction mapping GL-style -1..1 depth to wgpu's 0..1.
///
/// Multiply the projection matrix by this on the left when writing uniforms:
/// `depth_remap() * projection`.
#[rustfmt::skip]
pub fn depth_remap() -> Mat4 {
    Mat4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn frustum_matches_gl_reference() {
        // Symmetric frustum used by the demo.
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 100.0);

        assert_relative_eq!(m[(0, 0)], 2.0, epsilon = EPSILON);
        assert_relative_eq!(m[(1, 1)], 2.0, epsilon = EPSILON);
        assert_relative_eq!(m[(2, 2)], -102.0 / 98.0, epsilon = EPSILON);
        assert_relative_eq!(m[(2, 3)], -400.0 / 98.0, epsilon = EPSILON);
        assert_relative_eq!(m[(3, 2)], -1.0, epsilon = EPSILON);
        assert_relative_eq!(m[(3, 3)], 0.0, epsilon = EPSILON);
        assert_relative_eq!(m[(0, 2)], 0.0, epsilon = EPSILON);
        assert_relative_eq!(m[(1, 2)], 0.0, epsilon = EPSILON);
    }

    #[test]
    fn frustum_off_center_terms() {
        let m = frustum(0.0, 2.0, -1.0, 3.0, 1.0, 10.0);
        assert_relative_eq!(m[(0, 2)], 1.0, epsilon = EPSILON); // (r+l)/(r-l)
        assert_relative_eq!(m[(1, 2)], 0.5, epsilon = EPSILON); // (t+b)/(t-b)
    }

    #[test]
    fn ortho_maps_volume_corners() {
        let m = ortho(-1.0, 1.0, -1.0, 1.0, 0.0, 100.0);
        // Near plane center maps to z = -1, far plane center to z = +1.
        let near = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let far = m * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert_relative_eq!(near.z, -1.0, epsilon = EPSILON);
        assert_relative_eq!(far.z, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn look_at_down_z_is_pure_translation() {
        // Eye on +Z looking at the origin with +Y up: no rotation involved.
        let m = look_at(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vec3::y(),
        );
        let expected = Mat4::new_translation(&Vec3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(m, expected, epsilon = EPSILON);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let eye = Point3::new(1.0, 2.0, 3.0);
        let m = look_at(eye, Point3::origin(), Vec3::y());
        let mapped = m.transform_point(&eye);
        assert_relative_eq!(mapped, Point3::origin(), epsilon = EPSILON);
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let m = rotation_deg(90.0, Vec3::y());
        let mapped = m.transform_vector(&Vec3::x());
        assert_relative_eq!(mapped, -Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn rotation_full_turn_is_identity() {
        let m = rotation_deg(360.0, Vec3::y());
        assert_relative_eq!(m, Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn depth_remap_rescales_clip_z() {
        let m = depth_remap();
        let near = m * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = m * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(near.z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(far.z, 1.0, epsilon = EPSILON);
    }
}
