use glam::{Quat, Vec3};
use rapier3d::na;

pub(crate) fn vec3_to_na(v: Vec3) -> na::Vector3<f32> {
    na::Vector3::new(v.x, v.y, v.z)
}

pub(crate) fn vec3_to_point(v: Vec3) -> na::Point3<f32> {
    na::Point3::new(v.x, v.y, v.z)
}

pub(crate) fn na_to_vec3(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn point_to_vec3(p: &na::Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub(crate) fn na_to_quat(q: &na::UnitQuaternion<f32>) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternion_components_line_up() {
        let q = Quat::from_rotation_y(0.7);
        let na_q = na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), 0.7);
        assert!(na_to_quat(&na_q).abs_diff_eq(q, 1e-6));
    }

    #[test]
    fn vectors_round_trip() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(na_to_vec3(&vec3_to_na(v)), v);
        assert_eq!(point_to_vec3(&vec3_to_point(v)), v);
    }
}
