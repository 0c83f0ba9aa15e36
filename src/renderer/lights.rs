use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub const MAX_POINT_LIGHTS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct PointLightData {
    pub position: Vec3,
    pub color: Vec3,
    pub strength: f32,
}

#[derive(Clone, Default)]
pub struct LightsData {
    ambient: Vec3,
    point: Vec<PointLightData>,
}

impl LightsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ambient(&mut self, ambient: Vec3) {
        self.ambient = ambient;
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn add_point(&mut self, light: PointLightData) {
        self.point.push(light);
    }

    pub fn point_lights(&self) -> &[PointLightData] {
        &self.point
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 4],
    pub color_strength: [f32; 4],
}

impl PointLightRaw {
    pub fn from_data(data: &PointLightData) -> Self {
        Self {
            position: [data.position.x, data.position.y, data.position.z, 1.0],
            color_strength: [data.color.x, data.color.y, data.color.z, data.strength],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 3],
    pub count: u32,
    pub point: [PointLightRaw; MAX_POINT_LIGHTS],
}

impl LightsUniform {
    pub fn from_data(data: &LightsData) -> Self {
        let mut uniform = Self::zeroed();
        uniform.ambient = data.ambient().to_array();

        let count = data.point_lights().len().min(MAX_POINT_LIGHTS);
        if data.point_lights().len() > MAX_POINT_LIGHTS {
            log::warn!(
                "Scene has {} point lights; only the first {} are uploaded",
                data.point_lights().len(),
                MAX_POINT_LIGHTS
            );
        }

        for (raw, light) in uniform.point.iter_mut().zip(data.point_lights()) {
            *raw = PointLightRaw::from_data(light);
        }
        uniform.count = count as u32;
        uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lights_uniform_layout() {
        // vec3 + u32 header = 16 bytes, then 32 bytes per light
        assert_eq!(
            std::mem::size_of::<LightsUniform>(),
            16 + MAX_POINT_LIGHTS * 32
        );
    }

    #[test]
    fn uniform_counts_only_uploaded_lights() {
        let mut data = LightsData::new();
        data.set_ambient(Vec3::splat(0.05));
        data.add_point(PointLightData {
            position: Vec3::new(0.0, 5.0, 0.0),
            color: Vec3::ONE,
            strength: 5.0,
        });

        let uniform = LightsUniform::from_data(&data);
        assert_eq!(uniform.count, 1);
        assert_eq!(uniform.point[0].color_strength[3], 5.0);
        assert_eq!(uniform.point[1].color_strength[3], 0.0);
    }
}
