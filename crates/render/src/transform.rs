use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// View transform: yaw/pitch rotation in degrees plus a world position.
///
/// `view_matrix()` is the rotation applied after translating the world by
/// the negated position, the usual camera view construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// (yaw, pitch) in degrees.
    pub rotation: Vec2,
    pub position: Vec3,
}

impl Transform {
    pub fn rotation_matrix(&self) -> Mat4 {
        let (sy, cy) = self.rotation.x.to_radians().sin_cos();
        let (sp, cp) = self.rotation.y.to_radians().sin_cos();

        Mat4::from_cols(
            Vec4::new(cy, sp * sy, -cp * sy, 0.0),
            Vec4::new(0.0, cp, sp, 0.0),
            Vec4::new(sy, -sp * cy, cp * cy, 0.0),
            Vec4::W,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.rotation_matrix() * Mat4::from_translation(-self.position)
    }

    /// World-space +Y basis vector of the rotated frame.
    pub fn up(&self) -> Vec3 {
        self.axis(Vec3::Y)
    }

    /// World-space +Z basis vector of the rotated frame. The camera looks
    /// along the negation of this.
    pub fn forward(&self) -> Vec3 {
        self.axis(Vec3::Z)
    }

    /// World-space +X basis vector of the rotated frame.
    pub fn right(&self) -> Vec3 {
        self.axis(Vec3::X)
    }

    fn axis(&self, v: Vec3) -> Vec3 {
        Mat3::from_mat4(self.rotation_matrix()).transpose() * v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn identity_transform_has_canonical_basis() {
        let t = Transform::default();
        assert!(close(t.right(), Vec3::X));
        assert!(close(t.up(), Vec3::Y));
        assert!(close(t.forward(), Vec3::Z));
        assert_eq!(t.view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn yaw_quarter_turn_swings_forward_onto_x() {
        let t = Transform {
            rotation: Vec2::new(90.0, 0.0),
            position: Vec3::ZERO,
        };
        assert!(close(t.forward(), -Vec3::X));
        assert!(close(t.right(), Vec3::Z));
    }

    #[test]
    fn view_matrix_negates_position() {
        let t = Transform {
            rotation: Vec2::ZERO,
            position: Vec3::new(1.0, 2.0, 3.0),
        };
        let eye = t.view_matrix() * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert!((eye.truncate()).length() < 1e-6);
    }

    #[test]
    fn basis_stays_orthonormal_under_rotation() {
        let t = Transform {
            rotation: Vec2::new(33.0, -21.0),
            position: Vec3::ZERO,
        };
        assert!((t.forward().length() - 1.0).abs() < 1e-5);
        assert!(t.forward().dot(t.right()).abs() < 1e-5);
        assert!(t.forward().dot(t.up()).abs() < 1e-5);
    }
}
