//! Decomposed transformation: position, rotation and scale.

use cgmath::One;

/// An entity's placement in the world.
///
/// Kept decomposed so that scripts can translate an entity without
/// accumulating floating point drift in the rotation or scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Matrix4, Rotation3, SquareMatrix, Vector3, Vector4};

    use super::*;

    #[test]
    fn identity_matrix() {
        assert_eq!(Instance::new().to_matrix(), Matrix4::identity());
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let instance = Instance {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: cgmath::Quaternion::from_angle_z(Deg(90.0)),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let p = instance.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> moved (1,4,3)
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 4.0).abs() < 1e-5);
        assert!((p.z - 3.0).abs() < 1e-5);
    }
}
