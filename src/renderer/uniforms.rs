// renderer/uniforms.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_position: [0.0, 0.0, 0.0],
            _padding: 0.0,
        }
    }

    pub fn from_matrix(view_proj: Mat4, view_position: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view_position: view_position.to_array(),
            _padding: 0.0,
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen dimensions shared by the transparent and combine passes; both
/// flatten a pixel coordinate into a head-table index with `y * width + x`.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ScreenUniform {
    pub width: u32,
    pub height: u32,
    pub _padding: [u32; 2],
}

impl ScreenUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            _padding: [0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_uniform_is_80_bytes() {
        // mat4x4<f32> = 64 bytes, vec3<f32> = 12 bytes, padding = 4 bytes
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn screen_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
    }
}
