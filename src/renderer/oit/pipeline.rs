use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::renderer::internal::{CameraBuffer, LightsBuffer, ObjectsBuffer};
use crate::renderer::oit::{FragmentCounter, FragmentStore, HeadTable};
use crate::renderer::uniforms::ScreenUniform;
use crate::renderer::vertex::{QuadVertex, Vertex, FULLSCREEN_QUAD};
use crate::renderer::{Depth, OpaqueTarget, PipelineBuilder};

/// The four pass pipelines plus the OIT bind group layouts.
///
/// The count and transparent passes reuse the opaque pass's vertex stage
/// (shader sources are concatenated per pipeline) and differ only in what
/// their fragment stages do with the rasterized coverage.
pub(crate) struct OitPipelines {
    pub(crate) opaque: wgpu::RenderPipeline,
    pub(crate) count: wgpu::RenderPipeline,
    pub(crate) transparent: wgpu::RenderPipeline,
    pub(crate) combine: wgpu::RenderPipeline,

    pub(crate) count_layout: wgpu::BindGroupLayout,
    pub(crate) transparent_layout: wgpu::BindGroupLayout,
    pub(crate) combine_layout: wgpu::BindGroupLayout,

    pub(crate) quad_buffer: wgpu::Buffer,
    pub(crate) screen_buffer: wgpu::Buffer,
}

impl OitPipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera: &CameraBuffer,
        objects: &ObjectsBuffer,
        lights: &LightsBuffer,
    ) -> Self {
        let count_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("CountBindLayout"),
            entries: &[
                counter_entry(0),
                depth_texture_entry(1),
            ],
        });

        let transparent_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("TransparentBindLayout"),
                entries: &[
                    counter_entry(0),
                    depth_texture_entry(1),
                    storage_entry(2, false),
                    storage_entry(3, false),
                    screen_entry(4),
                ],
            });

        let combine_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("CombineBindLayout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                storage_entry(1, true),
                storage_entry(2, true),
                screen_entry(3),
            ],
        });

        let scene_src = include_str!("../../shader/scene.wgsl");
        let lighting_src = include_str!("../../shader/lighting.wgsl");

        let opaque_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("OpaqueShader"),
            source: wgpu::ShaderSource::Wgsl(
                format!(
                    "{}\n{}\n{}",
                    scene_src,
                    lighting_src,
                    include_str!("../../shader/opaque.wgsl")
                )
                .into(),
            ),
        });

        let count_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("CountShader"),
            source: wgpu::ShaderSource::Wgsl(
                format!("{}\n{}", scene_src, include_str!("../../shader/count.wgsl")).into(),
            ),
        });

        let transparent_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("TransparentShader"),
            source: wgpu::ShaderSource::Wgsl(
                format!(
                    "{}\n{}\n{}",
                    scene_src,
                    lighting_src,
                    include_str!("../../shader/transparent.wgsl")
                )
                .into(),
            ),
        });

        let combine_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("CombineShader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shader/combine.wgsl").into()),
        });

        let opaque_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("OpaquePipelineLayout"),
                bind_group_layouts: &[
                    &camera.bind_layout,
                    &objects.bind_layout,
                    &lights.bind_layout,
                ],
                push_constant_ranges: &[],
            });

        let count_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("CountPipelineLayout"),
                bind_group_layouts: &[&camera.bind_layout, &objects.bind_layout, &count_layout],
                push_constant_ranges: &[],
            });

        let transparent_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("TransparentPipelineLayout"),
                bind_group_layouts: &[
                    &camera.bind_layout,
                    &objects.bind_layout,
                    &lights.bind_layout,
                    &transparent_layout,
                ],
                push_constant_ranges: &[],
            });

        let combine_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("CombinePipelineLayout"),
                bind_group_layouts: &[&combine_layout],
                push_constant_ranges: &[],
            });

        let opaque = PipelineBuilder::new(device, &opaque_pipeline_layout, &opaque_shader)
            .with_label("OpaquePipeline")
            .with_vertex_buffer(Vertex::layout())
            .with_color_target(OpaqueTarget::COLOR_FORMAT, Some(wgpu::BlendState::REPLACE))
            .with_depth_stencil(Depth::FORMAT, true, wgpu::CompareFunction::Less)
            .build();

        // Depth writes stay off for both coverage passes so every
        // transparent fragment rasterizes; occlusion against the opaque
        // scene happens in the fragment shaders.
        let count = PipelineBuilder::new(device, &count_pipeline_layout, &count_shader)
            .with_label("CountPipeline")
            .with_vertex_buffer(Vertex::layout())
            .with_depth_stencil(Depth::FORMAT, false, wgpu::CompareFunction::Less)
            .build();

        let transparent =
            PipelineBuilder::new(device, &transparent_pipeline_layout, &transparent_shader)
                .with_label("TransparentPipeline")
                .with_vertex_buffer(Vertex::layout())
                .with_depth_stencil(Depth::FORMAT, false, wgpu::CompareFunction::Less)
                .build();

        let combine = PipelineBuilder::new(device, &combine_pipeline_layout, &combine_shader)
            .with_label("CombinePipeline")
            .with_vertex_buffer(QuadVertex::layout())
            .with_color_target(surface_format, Some(wgpu::BlendState::REPLACE))
            .build();

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("FullscreenQuad"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let screen = ScreenUniform::new(1, 1);
        let screen_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ScreenUniform"),
            contents: bytemuck::bytes_of(&screen),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            opaque,
            count,
            transparent,
            combine,
            count_layout,
            transparent_layout,
            combine_layout,
            quad_buffer,
            screen_buffer,
        }
    }

    pub(crate) fn update_screen(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        let screen = ScreenUniform::new(width, height);
        queue.write_buffer(&self.screen_buffer, 0, bytemuck::bytes_of(&screen));
    }

    pub(crate) fn count_bind_group(
        &self,
        device: &wgpu::Device,
        counter: &FragmentCounter,
        depth_view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("CountBindGroup"),
            layout: &self.count_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: counter.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(depth_view),
                },
            ],
        })
    }

    pub(crate) fn transparent_bind_group(
        &self,
        device: &wgpu::Device,
        counter: &FragmentCounter,
        depth_view: &wgpu::TextureView,
        heads: &HeadTable,
        store: &FragmentStore,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("TransparentBindGroup"),
            layout: &self.transparent_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: counter.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: heads.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: store.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: self.screen_buffer.as_entire_binding(),
                },
            ],
        })
    }

    pub(crate) fn combine_bind_group(
        &self,
        device: &wgpu::Device,
        opaque_color: &wgpu::TextureView,
        heads: &HeadTable,
        store: &FragmentStore,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("CombineBindGroup"),
            layout: &self.combine_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(opaque_color),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: heads.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: store.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.screen_buffer.as_entire_binding(),
                },
            ],
        })
    }
}

fn counter_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: Some(NonZeroU64::new(std::mem::size_of::<u32>() as u64).unwrap()),
        },
        count: None,
    }
}

fn depth_texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Depth,
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn screen_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(
                NonZeroU64::new(std::mem::size_of::<ScreenUniform>() as u64).unwrap(),
            ),
        },
        count: None,
    }
}
