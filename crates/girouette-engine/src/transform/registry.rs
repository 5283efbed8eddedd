use std::collections::HashMap;

use crate::math::{self, Mat4, Point3, Vec3};

/// Registry of named 4x4 matrices with one "bound" mutation target.
///
/// Composition operations multiply the bound matrix on the right
/// (`bound = bound * M`), matching fixed-function matrix-stack semantics.
/// Mutating while nothing is bound is a silent no-op, as is binding or
/// reading a name that was never created.
#[derive(Debug, Default)]
pub struct MatrixRegistry {
    matrices: HashMap<String, Mat4>,
    bound: Option<String>,
}

impl MatrixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with an identity value.
    ///
    /// Re-registering an existing name keeps its current value.
    pub fn create(&mut self, name: &str) {
        if self.matrices.contains_key(name) {
            log::warn!("matrix {name:?} already registered; keeping its value");
            return;
        }
        self.matrices.insert(name.to_owned(), Mat4::identity());
    }

    /// Selects `name` as the target of subsequent mutations.
    ///
    /// Matrices bound earlier keep their values; only the selection changes.
    pub fn bind(&mut self, name: &str) {
        if !self.matrices.contains_key(name) {
            log::debug!("bind of unregistered matrix {name:?} ignored");
            return;
        }
        self.bound = Some(name.to_owned());
    }

    /// Name of the currently bound matrix, if any.
    pub fn bound_name(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    /// Resets the bound matrix to identity.
    pub fn load_identity(&mut self) {
        self.with_bound(|m| *m = Mat4::identity());
    }

    /// Composes the bound matrix with `m` on the right.
    pub fn compose(&mut self, m: Mat4) {
        self.with_bound(|bound| *bound *= m);
    }

    /// Composes with a perspective frustum (see [`math::frustum`]).
    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.compose(math::frustum(left, right, bottom, top, near, far));
    }

    /// Composes with an orthographic projection (see [`math::ortho`]).
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.compose(math::ortho(left, right, bottom, top, near, far));
    }

    /// Composes with a look-at view transform.
    pub fn look_at(&mut self, eye: Point3<f32>, target: Point3<f32>, up: Vec3) {
        self.compose(math::look_at(eye, target, up));
    }

    /// Composes with a rotation of `angle_deg` degrees about `axis`.
    pub fn rotate_deg(&mut self, angle_deg: f32, axis: Vec3) {
        self.compose(math::rotation_deg(angle_deg, axis));
    }

    /// Composes with a translation.
    pub fn translate(&mut self, v: Vec3) {
        self.compose(math::translation(v));
    }

    /// Composes with a non-uniform scaling.
    pub fn scale(&mut self, v: Vec3) {
        self.compose(math::scaling(v));
    }

    /// Reads a matrix by name. Unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<&Mat4> {
        self.matrices.get(name)
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Drops every matrix and the current binding.
    pub fn clear(&mut self) {
        self.matrices.clear();
        self.bound = None;
    }

    fn with_bound(&mut self, f: impl FnOnce(&mut Mat4)) {
        let Some(name) = self.bound.as_deref() else {
            log::debug!("matrix mutation with no bound matrix ignored");
            return;
        };
        if let Some(m) = self.matrices.get_mut(name) {
            f(m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn registry() -> MatrixRegistry {
        let mut reg = MatrixRegistry::new();
        reg.create("projectionMatrix");
        reg.create("modelMatrix");
        reg.create("viewMatrix");
        reg
    }

    // ── bind-then-mutate discipline ───────────────────────────────────────

    #[test]
    fn mutation_targets_most_recently_bound() {
        let mut reg = registry();

        reg.bind("viewMatrix");
        reg.load_identity();
        reg.bind("modelMatrix");
        reg.rotate_deg(90.0, Vec3::y());

        let view = *reg.get("viewMatrix").unwrap();
        let model = *reg.get("modelMatrix").unwrap();

        assert_relative_eq!(view, Mat4::identity(), epsilon = EPSILON);
        assert_relative_eq!(model, math::rotation_deg(90.0, Vec3::y()), epsilon = EPSILON);
    }

    #[test]
    fn rebinding_does_not_touch_earlier_matrices() {
        let mut reg = registry();

        reg.bind("modelMatrix");
        reg.translate(Vec3::new(1.0, 2.0, 3.0));
        let before = *reg.get("modelMatrix").unwrap();

        reg.bind("viewMatrix");
        reg.scale(Vec3::new(2.0, 2.0, 2.0));

        assert_relative_eq!(*reg.get("modelMatrix").unwrap(), before, epsilon = EPSILON);
    }

    #[test]
    fn mutation_without_binding_is_a_no_op() {
        let mut reg = registry();
        reg.rotate_deg(45.0, Vec3::y());

        for name in ["projectionMatrix", "modelMatrix", "viewMatrix"] {
            assert_relative_eq!(*reg.get(name).unwrap(), Mat4::identity(), epsilon = EPSILON);
        }
    }

    #[test]
    fn binding_unknown_name_keeps_previous_target() {
        let mut reg = registry();
        reg.bind("modelMatrix");
        reg.bind("no-such-matrix");
        assert_eq!(reg.bound_name(), Some("modelMatrix"));
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn compose_is_right_multiplication() {
        let mut reg = registry();
        let t = math::translation(Vec3::new(1.0, 0.0, 0.0));
        let r = math::rotation_deg(90.0, Vec3::y());

        reg.bind("modelMatrix");
        reg.translate(Vec3::new(1.0, 0.0, 0.0));
        reg.rotate_deg(90.0, Vec3::y());

        assert_relative_eq!(*reg.get("modelMatrix").unwrap(), t * r, epsilon = EPSILON);
    }

    #[test]
    fn projection_setup_matches_frustum() {
        let mut reg = registry();
        reg.bind("projectionMatrix");
        reg.load_identity();
        reg.frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 100.0);

        assert_relative_eq!(
            *reg.get("projectionMatrix").unwrap(),
            math::frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 100.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn load_identity_resets_accumulated_transform() {
        let mut reg = registry();
        reg.bind("viewMatrix");
        reg.look_at(Point3::new(0.0, 0.0, 3.0), Point3::origin(), Vec3::y());
        reg.load_identity();
        assert_relative_eq!(*reg.get("viewMatrix").unwrap(), Mat4::identity(), epsilon = EPSILON);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn create_existing_name_keeps_value() {
        let mut reg = registry();
        reg.bind("modelMatrix");
        reg.translate(Vec3::new(5.0, 0.0, 0.0));
        let before = *reg.get("modelMatrix").unwrap();

        reg.create("modelMatrix");
        assert_relative_eq!(*reg.get("modelMatrix").unwrap(), before, epsilon = EPSILON);
    }

    #[test]
    fn get_unknown_name_is_none() {
        let reg = registry();
        assert!(reg.get("normalMatrix").is_none());
    }

    #[test]
    fn clear_empties_registry_and_binding() {
        let mut reg = registry();
        reg.bind("modelMatrix");
        reg.clear();

        assert!(reg.is_empty());
        assert_eq!(reg.bound_name(), None);
        assert!(reg.get("modelMatrix").is_none());
    }
}
