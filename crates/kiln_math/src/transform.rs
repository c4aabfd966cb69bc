// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and
// inverse(); this adds what instancing primitives need on top.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 used by the transform wrapper primitives.
pub trait Mat4Ext {
    /// World-space box of a transformed box: the bounds of its eight
    /// transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;

    /// Rotation about +Y by `degrees`, counter-clockwise looking down -Y.
    fn rotation_y_degrees(degrees: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut corners = aabb.corners().into_iter().map(|c| self.transform_point3(c));
        let first = corners.next().unwrap_or(Vec3::ZERO);
        let (lo, hi) = corners.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
        Aabb::from_points(lo, hi)
    }

    fn rotation_y_degrees(degrees: f32) -> Mat4 {
        Mat4::from_rotation_y(degrees.to_radians())
    }
}
