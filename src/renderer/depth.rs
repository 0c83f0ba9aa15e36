pub struct Depth {
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
}

impl Depth {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// The depth texture doubles as a sampled binding: the count and
    /// transparent passes read it for per-fragment rejection against the
    /// opaque scene while it stays attached read-only.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("OpaqueDepth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            view,
            format: Self::FORMAT,
        }
    }
}
