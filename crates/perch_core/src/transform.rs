//! World-space transform of a placed entity: position, orientation, scale.
//!
//! `Transform` is `Copy` and `Default`.  Placed entities only ever carry a
//! uniform scale (pinch gestures scale all three axes together), but the
//! field stays a `Vec3` so the matrix can be handed to a renderer as-is.

use glam::{Mat4, Quat, Vec3};

use crate::pose;

/// Where a placed entity sits in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Unit quaternion; alignment changes and rotate gestures write here.
    pub rotation: Quat,
    /// Scale factor (uniform for placed entities).
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// At the origin, unscaled, facing `rotation`.
    pub fn with_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Build the TRS matrix (`T * R * S`).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotate by `angle` radians around a world-space axis.
    pub fn rotate_world(&mut self, axis: Vec3, angle: f32) {
        self.rotation = pose::compose_world(self.rotation, Quat::from_axis_angle(axis, angle));
    }

    /// Rotate by `angle` radians around one of the transform's own axes.
    pub fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        self.rotation = pose::compose_local(self.rotation, Quat::from_axis_angle(axis, angle));
    }

    pub fn set_scale_uniform(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    /// The uniform scale (x component; all three are kept equal).
    #[inline]
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let mut t = Transform::with_rotation(Quat::from_rotation_y(FRAC_PI_2));
        t.position = Vec3::new(0.0, 0.0, -2.0);
        t.set_scale_uniform(2.0);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
    }

    #[test]
    fn local_rotation_follows_tilt() {
        let mut t = Transform::default();
        t.rotate_local(Vec3::X, -FRAC_PI_2);
        // after tilting forward, local +Z points up
        assert!((t.rotation * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-5));
        t.rotate_local(Vec3::Z, FRAC_PI_2);
        // spinning about the wall normal leaves it where it was
        assert!((t.rotation * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn world_rotation_after_tilt_turns_about_vertical() {
        let mut t = Transform::with_rotation(Quat::from_rotation_x(-FRAC_PI_2));
        t.rotate_world(Vec3::Y, FRAC_PI_2);
        // the tilted +Z still points up; a local spin would have moved it
        assert!((t.rotation * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn uniform_scale() {
        let mut t = Transform::default();
        t.set_scale_uniform(2.5);
        assert_eq!(t.uniform_scale(), 2.5);
        assert_eq!(t.scale, Vec3::splat(2.5));
    }
}
