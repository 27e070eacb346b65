use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::{Camera, Transform};

/// The per-frame constants record: one of these lives in every frame
/// slot's constant buffer, written once per tick.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraConstants {
    pub transform: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraConstants {
    pub const SIZE: u64 = std::mem::size_of::<CameraConstants>() as u64;

    pub fn new(camera: &Camera, view: &Transform) -> Self {
        let matrix: Mat4 = camera.projection() * view.view_matrix();
        Self {
            transform: matrix.to_cols_array_2d(),
            position: view.position.extend(0.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn record_is_densely_packed() {
        assert_eq!(CameraConstants::SIZE, 80);
    }

    #[test]
    fn position_is_carried_with_zero_w() {
        let camera = Camera::default();
        let view = Transform {
            rotation: Vec2::ZERO,
            position: Vec3::new(1.0, 2.0, 3.0),
        };
        let constants = CameraConstants::new(&camera, &view);
        assert_eq!(constants.position, [1.0, 2.0, 3.0, 0.0]);
    }
}
