//! [`RenderBackend`] over an open wgpu render pass.

use std::ops::Range;

use lodplane_lod::{RenderBackend, TextureHandle};
use lodplane_mesh::PlaneMesh;

use crate::buffer::PlaneMeshBuffer;
use crate::pipeline::{PlanePipeline, PlaneUniforms};
use crate::texture::TextureRegistry;

/// Bind group slot holding the tier texture.
const TEXTURE_GROUP: u32 = 1;

/// Records plane draw commands into `pass`.
///
/// The CPU mesh handed to [`RenderBackend::bind_mesh`] must be the one `mesh_buffer`
/// was uploaded from; the GPU copy is what gets bound.
pub struct WgpuPlaneBackend<'a, 'pass> {
    pass: &'a mut wgpu::RenderPass<'pass>,
    mesh_buffer: &'a PlaneMeshBuffer,
    textures: &'a TextureRegistry,
    draws: u32,
}

impl<'a, 'pass> WgpuPlaneBackend<'a, 'pass> {
    /// Set the pipeline and per-frame uniforms on `pass`.
    pub fn new(
        pass: &'a mut wgpu::RenderPass<'pass>,
        pipeline: &PlanePipeline,
        uniforms: &PlaneUniforms,
        mesh_buffer: &'a PlaneMeshBuffer,
        textures: &'a TextureRegistry,
    ) -> Self {
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, &uniforms.bind_group, &[]);
        Self {
            pass,
            mesh_buffer,
            textures,
            draws: 0,
        }
    }

    /// Draw calls recorded so far.
    pub fn draw_count(&self) -> u32 {
        self.draws
    }
}

impl RenderBackend for WgpuPlaneBackend<'_, '_> {
    fn bind_mesh(&mut self, mesh: &PlaneMesh) {
        if !self.mesh_buffer.matches(mesh) {
            log::warn!(
                "Uploaded plane buffer ({} vertices) does not match mesh ({} vertices)",
                self.mesh_buffer.vertex_count,
                mesh.vertex_count()
            );
        }
        self.mesh_buffer.bind(self.pass);
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if unit != 0 {
            log::warn!("Only texture unit 0 is supported, got {unit}");
        }
        self.pass
            .set_bind_group(TEXTURE_GROUP, self.textures.bind_group(texture), &[]);
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        self.mesh_buffer.draw_range(self.pass, indices);
        self.draws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferAllocator;
    use crate::pipeline::PLANE_SHADER_SOURCE;
    use lodplane_lod::{LodPlane, LodTier};

    #[test]
    fn test_backend_draws_selected_tier_offscreen() {
        let Some((device, queue)) = crate::create_test_device_queue() else {
            return;
        };
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let mut textures = TextureRegistry::new(&device, &queue);
        textures
            .register(&device, &queue, TextureHandle(1), &[200; 16], 2, 2)
            .unwrap();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test-plane-shader"),
            source: wgpu::ShaderSource::Wgsl(PLANE_SHADER_SOURCE.into()),
        });
        let pipeline =
            PlanePipeline::new(&device, &shader, format, None, textures.bind_group_layout());
        let uniforms = PlaneUniforms::new(&device, &pipeline);

        let mut plane = LodPlane::new(TextureHandle::NONE).unwrap();
        plane.set_texture_id(TextureHandle(1), 1).unwrap();
        let mesh_buffer = BufferAllocator::new(&device).create_plane_mesh("test", plane.mesh());

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test-target"),
            size: wgpu::Extent3d {
                width: 16,
                height: 16,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-encoder"),
        });

        let builder = crate::pass::RenderPassBuilder::new();
        {
            let mut pass = builder.create_render_pass(&mut encoder, &view);
            let mut backend =
                WgpuPlaneBackend::new(&mut pass, &pipeline, &uniforms, &mesh_buffer, &textures);
            let tier = plane.render(2.5, &mut backend);
            assert_eq!(tier, LodTier::Medium);
            assert_eq!(backend.draw_count(), 1);
        }
        queue.submit([encoder.finish()]);
    }
}
