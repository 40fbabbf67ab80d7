use glam::{Quat, Vec3};

/// Pulls the card's yaw rate back toward facing the camera.
///
/// `rotation.y` is the quaternion's y component, not an Euler angle. For small
/// yaw it is roughly half the angle, which is what the 0.25 default was tuned
/// against.
pub fn damp_yaw(angvel: Vec3, rotation: Quat, factor: f32) -> Vec3 {
    Vec3::new(angvel.x, angvel.y - rotation.y * factor, angvel.z)
}
