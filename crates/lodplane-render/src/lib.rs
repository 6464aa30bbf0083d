//! wgpu backend for the LOD plane.
//!
//! Owns the device context, mesh upload, the plane pipeline, the texture
//! registry and the [`RenderBackend`](lodplane_lod::RenderBackend) that drives a
//! render pass.

pub mod backend;
pub mod buffer;
pub mod depth;
pub mod error_log;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod texture;

pub use backend::WgpuPlaneBackend;
pub use buffer::{BufferAllocator, PlaneMeshBuffer, widen_indices};
pub use depth::DepthBuffer;
pub use error_log::{DEFAULT_ERROR_LOG_CAPACITY, GpuErrorLog};
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    install_error_handler,
};
pub use pass::{DEFAULT_CLEAR_COLOR, FrameEncoder, RenderPassBuilder};
pub use pipeline::{PLANE_SHADER_SOURCE, PlanePipeline, PlaneUniform, PlaneUniforms};
pub use shader::{ShaderError, ShaderLibrary};
pub use texture::{TEXTURE_FORMAT, TextureError, TextureRegistry, expected_byte_size};

#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: Default::default(),
                ..Default::default()
            })
            .await
            .ok()
    })
}
