use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Free-look camera using euler angles (pitch, yaw); roll stays zero.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// Pitch around X and yaw around Y, in radians.
    pub rotation: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.rotation.x.cos() * self.rotation.y.sin(),
            self.rotation.x.sin(),
            self.rotation.x.cos() * self.rotation.y.cos(),
        )
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(
            (self.rotation.y - FRAC_PI_2).sin(),
            0.0,
            (self.rotation.y - FRAC_PI_2).cos(),
        )
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Keeps pitch inside (-pi/2, pi/2) so forward never degenerates.
    pub fn clamp_pitch(&mut self) {
        self.rotation.x = self.rotation.x.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_y_radians: 70f32.to_radians(),
            near: 0.1,
            far: 500.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_looks_down_positive_z() {
        let cam = Camera::default();
        assert!(cam.forward().abs_diff_eq(Vec3::Z, 1e-6));
        assert!(cam.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.rotation.x = 2.0;
        cam.clamp_pitch();
        assert_eq!(cam.rotation.x, FRAC_PI_2);
        cam.rotation.x = -2.0;
        cam.clamp_pitch();
        assert_eq!(cam.rotation.x, -FRAC_PI_2);
    }

    #[test]
    fn view_proj_is_invertible() {
        let cam = Camera {
            position: Vec3::new(0.0, 8.0, -20.0),
            ..Camera::default()
        };
        let vp = cam.view_proj(16.0 / 9.0);
        let id = vp * vp.inverse();
        assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }
}
