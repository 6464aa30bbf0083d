//! Observer distance from the camera to the plane.

use glam::{Mat4, Vec4};

/// Camera position in world space, recovered from a view matrix.
///
/// Returns the homogeneous point `inverse(view) * (0, 0, 0, 1)`.
pub fn camera_position_from_view(view: &Mat4) -> Vec4 {
    view.inverse() * Vec4::W
}

/// Euclidean distance between two homogeneous points.
pub fn observer_distance(camera: Vec4, target: Vec4) -> f32 {
    camera.distance(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_identity_view_is_at_origin() {
        assert_eq!(camera_position_from_view(&Mat4::IDENTITY), Vec4::W);
    }

    #[test]
    fn test_look_at_recovers_eye() {
        let eye = Vec3::new(0.0, 1.0, 4.0);
        let view = Mat4::look_at_rh(eye, Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let cam = camera_position_from_view(&view);
        assert!((cam.truncate() - eye).length() < 1e-5);
        assert!((cam.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_between_points() {
        let a = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let b = Vec4::new(3.0, 4.0, 0.0, 1.0);
        assert!((observer_distance(a, b) - 5.0).abs() < 1e-6);
    }
}
