use std::cell::Cell;

use glam::Mat4;

/// Perspective camera with a lazily cached projection matrix.
///
/// The projection uses only a near clip distance: an infinite-far-plane,
/// reversed-depth formulation. Setters invalidate the cache and never
/// recompute eagerly; `projection()` recomputes on the next read.
#[derive(Debug)]
pub struct Camera {
    fov_y: f32,
    near: f32,
    aspect: f32,
    cached: Cell<Option<Mat4>>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(60.0_f32.to_radians(), 0.15)
    }
}

impl Camera {
    pub fn new(fov_y: f32, near: f32) -> Self {
        Self {
            fov_y,
            near,
            aspect: 1.0,
            cached: Cell::new(None),
        }
    }

    /// The cached projection, recomputed only after an invalidating
    /// mutation. Repeated calls return the identical matrix.
    pub fn projection(&self) -> Mat4 {
        if let Some(cached) = self.cached.get() {
            return cached;
        }
        let projection = Mat4::perspective_infinite_reverse_rh(self.fov_y, self.aspect, self.near);
        self.cached.set(Some(projection));
        projection
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.cached.set(None);
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.set_aspect(width as f32 / height as f32);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn near(&self) -> f32 {
        self.near
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_reads_return_identical_matrix() {
        let camera = Camera::default();
        let a = camera.projection();
        let b = camera.projection();
        assert_eq!(a, b);
    }

    #[test]
    fn aspect_mutation_rescales_horizontal_term() {
        let mut camera = Camera::default();
        camera.set_aspect(2.0);
        let before = camera.projection();
        camera.set_aspect(4.0);
        let after = camera.projection();
        // x scale is f/aspect, so halving comes from doubling the aspect.
        assert!((before.x_axis.x / after.x_axis.x - 2.0).abs() < 1e-6);
        // The vertical term only depends on the FOV.
        assert_eq!(before.y_axis.y, after.y_axis.y);
    }

    #[test]
    fn set_size_derives_aspect() {
        let mut camera = Camera::default();
        camera.set_size(1280, 720);
        assert!((camera.aspect() - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn projection_is_infinite_reversed_depth() {
        let camera = Camera::new(60.0_f32.to_radians(), 0.15);
        let m = camera.projection();
        // No far plane: the z column carries only the -1 perspective term,
        // and w.z holds the near distance.
        assert_eq!(m.z_axis.x, 0.0);
        assert_eq!(m.z_axis.y, 0.0);
        assert_eq!(m.z_axis.z, 0.0);
        assert_eq!(m.z_axis.w, -1.0);
        assert!((m.w_axis.z - 0.15).abs() < 1e-6);
        assert_eq!(m.w_axis.w, 0.0);
    }
}
