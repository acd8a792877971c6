#![forbid(unsafe_op_in_unsafe_fn)]

use glam::{Mat3, Mat4, Quat, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Camera placement in world space. Forward is -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraRig {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraRig {
    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            rotation: look_at_rotation(position, target, up),
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// World -> view.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation.conjugate()) * Mat4::from_translation(-self.position)
    }

    /// View -> world.
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)
    }

    /// Swings the rig around `pivot` about world +Y, keeping it aimed at the pivot.
    pub fn orbit(&mut self, pivot: Vec3, radians: f32) {
        let spin = Quat::from_rotation_y(radians);
        self.position = pivot + spin * (self.position - pivot);
        self.rotation = (spin * self.rotation).normalize();
    }
}

fn look_at_rotation(position: Vec3, target: Vec3, up: Vec3) -> Quat {
    let f = (target - position).normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let z_axis = -f;
    let x_axis = [up, Vec3::Y, Vec3::X]
        .into_iter()
        .map(|u| u.cross(z_axis))
        .find(|x| x.length_squared() > 1e-8)
        .unwrap_or(Vec3::X)
        .normalize();
    let y_axis = z_axis.cross(x_axis).normalize();

    Quat::from_mat3(&Mat3::from_cols(x_axis, y_axis, z_axis))
}
