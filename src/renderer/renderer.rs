// renderer/renderer.rs
use winit::{dpi::PhysicalSize, window::Window};

use crate::renderer::internal::{
    CameraBuffer, LightsBuffer, ObjectData, ObjectsBuffer, RenderContext,
};
use crate::renderer::oit::{padded_records, FragmentCounter, FragmentStore, HeadTable, OitPipelines};
use crate::renderer::uniforms::CameraUniform;
use crate::renderer::OpaqueTarget;
use crate::scene::{RenderObject, Scene};
use crate::settings::RenderSettings;

const INITIAL_OBJECTS_CAPACITY: u32 = 256;

/// Host-visible numbers from the frame just rendered.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Transparent fragments counted for this frame's camera and scene
    /// state, i.e. the record capacity the store was sized from.
    pub transparent_fragments: u32,
}

/// Fixed four-pass transparency renderer.
///
/// Every frame runs Opaque -> Count -> Resize -> Transparent -> Combine in
/// that order. The resize step between Count and Transparent reads the
/// fragment counter through a blocking fence and rebuilds the fragment
/// store to fit; the combine pass runs in its own submission so the
/// transparent pass's storage writes are visible when it walks the lists.
pub struct Renderer {
    context: RenderContext,
    camera_buffer: CameraBuffer,
    objects_buffer: ObjectsBuffer,
    lights_buffer: LightsBuffer,
    opaque_target: OpaqueTarget,
    counter: FragmentCounter,
    store: FragmentStore,
    heads: HeadTable,
    pipelines: OitPipelines,
    count_group: wgpu::BindGroup,
}

impl Renderer {
    pub async fn new(window: &Window, settings: &RenderSettings) -> Self {
        let size = window.inner_size();
        let context = RenderContext::new(window, size, settings).await;

        let camera_buffer = CameraBuffer::new(&context.device);
        let objects_buffer = ObjectsBuffer::new(&context.device, INITIAL_OBJECTS_CAPACITY);
        let lights_buffer = LightsBuffer::new(&context.device);

        let opaque_target =
            OpaqueTarget::new(&context.device, context.config.width, context.config.height);
        let counter = FragmentCounter::new(&context.device);
        let store = FragmentStore::new(&context.device);
        let heads = HeadTable::new(&context.device, context.config.width, context.config.height);

        let pipelines = OitPipelines::new(
            &context.device,
            context.config.format,
            &camera_buffer,
            &objects_buffer,
            &lights_buffer,
        );
        pipelines.update_screen(&context.queue, context.config.width, context.config.height);

        let count_group = pipelines.count_bind_group(
            &context.device,
            &counter,
            &opaque_target.depth.view,
        );

        Self {
            context,
            camera_buffer,
            objects_buffer,
            lights_buffer,
            opaque_target,
            counter,
            store,
            heads,
            pipelines,
            count_group,
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);

        // The head table is resolution-proportional and the depth/color
        // targets match the surface, so all of them are rebuilt together.
        self.opaque_target =
            OpaqueTarget::new(&self.context.device, new_size.width, new_size.height);
        self.heads = HeadTable::new(&self.context.device, new_size.width, new_size.height);
        self.pipelines
            .update_screen(&self.context.queue, new_size.width, new_size.height);
        self.count_group = self.pipelines.count_bind_group(
            &self.context.device,
            &self.counter,
            &self.opaque_target.depth.view,
        );
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.context.config.width as f32 / self.context.config.height.max(1) as f32
    }

    pub fn create_mesh(
        &self,
        vertices: &[crate::renderer::Vertex],
        indices: &[u32],
    ) -> crate::asset::Mesh {
        crate::asset::Mesh::from_vertices(&self.context.device, vertices, indices)
    }

    pub fn render(&mut self, scene: &Scene) -> Result<FrameStats, wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame uniform and object uploads
        let camera = scene.camera();
        let uniform = CameraUniform::from_matrix(
            camera.view_proj(self.aspect_ratio()),
            camera.position,
        );
        self.context
            .queue
            .write_buffer(&self.camera_buffer.buffer, 0, bytemuck::bytes_of(&uniform));
        self.lights_buffer.update(&self.context.queue, scene.lights());

        self.objects_buffer.begin_frame();
        for object in scene.opaque_objects().iter().chain(scene.transparent_objects()) {
            let _ = self
                .objects_buffer
                .push(ObjectData::new(object.transform.matrix(), object.color));
        }
        self.objects_buffer.flush(&self.context);

        let transparent_base = scene.opaque_objects().len() as u32;

        self.counter.reset(&self.context.queue);

        // Opaque pass, then the count pass over the same frame's depth
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("OpaqueCountEncoder"),
                });

        {
            let sky = scene.sky_color();
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("OpaquePass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.opaque_target.color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(sky.x),
                            g: f64::from(sky.y),
                            b: f64::from(sky.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.opaque_target.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.pipelines.opaque);
            rpass.set_bind_group(0, &self.camera_buffer.bind_group, &[]);
            rpass.set_bind_group(1, &self.objects_buffer.bind_group, &[]);
            rpass.set_bind_group(2, &self.lights_buffer.bind_group, &[]);
            draw_objects(&mut rpass, scene.opaque_objects(), 0);
        }

        {
            let mut rpass = encoder.begin_render_pass(&coverage_pass_descriptor(
                "CountPass",
                &self.opaque_target.depth.view,
            ));

            rpass.set_pipeline(&self.pipelines.count);
            rpass.set_bind_group(0, &self.camera_buffer.bind_group, &[]);
            rpass.set_bind_group(1, &self.objects_buffer.bind_group, &[]);
            rpass.set_bind_group(2, &self.count_group, &[]);
            draw_objects(&mut rpass, scene.transparent_objects(), transparent_base);
        }

        self.context.queue.submit(Some(encoder.finish()));

        // Resize-and-reset: the read blocks until the count pass finished.
        let counted = self.counter.read(&self.context.device, &self.context.queue);
        self.store
            .resize(&self.context.device, padded_records(counted));
        self.counter.reset(&self.context.queue);

        // The store was just reallocated, so its bind groups are per-frame.
        let transparent_group = self.pipelines.transparent_bind_group(
            &self.context.device,
            &self.counter,
            &self.opaque_target.depth.view,
            &self.heads,
            &self.store,
        );
        let combine_group = self.pipelines.combine_bind_group(
            &self.context.device,
            &self.opaque_target.color_view,
            &self.heads,
            &self.store,
        );

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("TransparentEncoder"),
                });
        self.heads.clear(&mut encoder);

        {
            let mut rpass = encoder.begin_render_pass(&coverage_pass_descriptor(
                "TransparentPass",
                &self.opaque_target.depth.view,
            ));

            rpass.set_pipeline(&self.pipelines.transparent);
            rpass.set_bind_group(0, &self.camera_buffer.bind_group, &[]);
            rpass.set_bind_group(1, &self.objects_buffer.bind_group, &[]);
            rpass.set_bind_group(2, &self.lights_buffer.bind_group, &[]);
            rpass.set_bind_group(3, &transparent_group, &[]);
            draw_objects(&mut rpass, scene.transparent_objects(), transparent_base);
        }

        // Submitting here is the barrier: the combine submission below may
        // not read the store or head table before these writes complete.
        self.context.queue.submit(Some(encoder.finish()));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("CombineEncoder"),
                });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("CombinePass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.pipelines.combine);
            rpass.set_bind_group(0, &combine_group, &[]);
            rpass.set_vertex_buffer(0, self.pipelines.quad_buffer.slice(..));
            rpass.draw(0..6, 0..1);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(FrameStats {
            transparent_fragments: counted,
        })
    }
}

/// Pass descriptor shared by the count and transparent passes: no color
/// output, opaque depth attached read-only. Identical rasterizer state is
/// what makes the two passes produce the same per-pixel coverage.
fn coverage_pass_descriptor<'a>(
    label: &'a str,
    depth_view: &'a wgpu::TextureView,
) -> wgpu::RenderPassDescriptor<'a> {
    wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_view,
            depth_ops: None,
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    }
}

fn draw_objects(rpass: &mut wgpu::RenderPass<'_>, objects: &[RenderObject], base_instance: u32) {
    for (i, object) in objects.iter().enumerate() {
        let mesh = object.mesh.as_ref();
        rpass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
        rpass.set_index_buffer(mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
        let instance = base_instance + i as u32;
        rpass.draw_indexed(0..mesh.index_count(), 0, instance..instance + 1);
    }
}
