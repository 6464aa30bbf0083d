//! GPU resources owned by the harness window.

use std::sync::Arc;

use lodplane_config::Config;
use lodplane_lod::{LodTier, TIER_COUNT};
use lodplane_mesh::PlaneMesh;
use lodplane_plugin::TextureUpdate;
use lodplane_render::{
    BufferAllocator, DepthBuffer, PLANE_SHADER_SOURCE, PlaneMeshBuffer, PlanePipeline,
    PlaneUniform, PlaneUniforms, RenderContext, ShaderLibrary, TextureError, TextureRegistry,
};
use tracing::{info, warn};

use crate::scene::{TIER_TEXTURES, checker_texture};

pub struct PlaneRenderer {
    pub gpu: RenderContext,
    pub pipeline: PlanePipeline,
    pub uniforms: PlaneUniforms,
    pub textures: TextureRegistry,
    pub mesh_buffer: PlaneMeshBuffer,
    pub depth: DepthBuffer,
}

impl PlaneRenderer {
    /// Compile the pipeline, upload `mesh` and register the tier checkers.
    pub fn new(
        gpu: RenderContext,
        config: &Config,
        shader_dir: Option<std::path::PathBuf>,
        mesh: &PlaneMesh,
    ) -> Result<Self, TextureError> {
        let mut shaders = ShaderLibrary::new();
        if let Some(dir) = shader_dir {
            shaders = shaders.with_shader_dir(dir);
        }
        let shader = shaders.load_or_embedded(&gpu.device, "plane", PLANE_SHADER_SOURCE);

        let mut textures = TextureRegistry::new(&gpu.device, &gpu.queue);
        let pipeline = PlanePipeline::new(
            &gpu.device,
            &shader,
            gpu.surface_format,
            Some(DepthBuffer::FORMAT),
            textures.bind_group_layout(),
        );
        let uniforms = PlaneUniforms::new(&gpu.device, &pipeline);

        let size = config.render.texture_size;
        for tier_index in 0..TIER_COUNT {
            let Some(tier) = LodTier::from_index(tier_index) else {
                continue;
            };
            let pixels = checker_texture(tier, size);
            textures.register(
                &gpu.device,
                &gpu.queue,
                TIER_TEXTURES[tier_index],
                &pixels,
                size,
                size,
            )?;
        }

        let mesh_buffer = BufferAllocator::new(&gpu.device).create_plane_mesh("lod-plane", mesh);
        let depth = DepthBuffer::new(
            &gpu.device,
            gpu.surface_config.width,
            gpu.surface_config.height,
        );

        info!(
            vertices = mesh_buffer.vertex_count,
            indices = mesh_buffer.index_count,
            textures = textures.len(),
            "Plane renderer ready"
        );

        Ok(Self {
            gpu,
            pipeline,
            uniforms,
            textures,
            mesh_buffer,
            depth,
        })
    }

    /// Replace the mesh buffers after the plane was rebuilt.
    pub fn upload_mesh(&mut self, mesh: &PlaneMesh) {
        self.mesh_buffer =
            BufferAllocator::new(&self.gpu.device).create_plane_mesh("lod-plane", mesh);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth.resize(&self.gpu.device, width, height);
    }

    pub fn write_uniform(&self, uniform: &PlaneUniform) {
        self.uniforms.write(&self.gpu.queue, uniform);
    }

    /// Push regenerated pixels for an animated texture.
    pub fn apply_texture_update(&mut self, update: &TextureUpdate) {
        if let Err(e) = self.textures.upload(
            &self.gpu.device,
            &self.gpu.queue,
            update.handle,
            &update.pixels,
            update.width,
            update.height,
        ) {
            warn!("Animated texture {} not uploaded: {e}", update.handle.raw());
        }
    }

    pub fn queue(&self) -> Arc<wgpu::Queue> {
        Arc::clone(&self.gpu.queue)
    }
}
