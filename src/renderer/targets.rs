use crate::renderer::Depth;

/// Offscreen color and depth produced by the opaque pass. The color is the
/// background the combine pass composites over; the depth rejects occluded
/// transparent fragments in the count and transparent passes.
pub struct OpaqueTarget {
    pub color_view: wgpu::TextureView,
    pub depth: Depth,
    pub width: u32,
    pub height: u32,
}

impl OpaqueTarget {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("OpaqueColor"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        Self {
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth: Depth::new(device, width, height),
            width: width.max(1),
            height: height.max(1),
        }
    }
}
