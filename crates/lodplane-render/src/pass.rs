//! Render pass description and the per-frame encoder.
//!
//! [`RenderPassBuilder`] holds the clear values and attachments of the plane
//! pass. [`FrameEncoder`] owns one surface frame: passes are recorded into it
//! and [`FrameEncoder::submit`] presents.

use std::sync::Arc;

/// Clear colour used when the caller does not pick one (dark slate).
pub const DEFAULT_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.12,
    a: 1.0,
};

#[derive(Debug)]
struct DepthTarget {
    view: wgpu::TextureView,
    clear_value: f32,
}

/// Clear colour, optional depth attachment and debug label of a pass.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth: Option<DepthTarget>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(self, clear_color: wgpu::Color) -> Self {
        Self {
            clear_color,
            ..self
        }
    }

    /// Clear colour from a config-style `[r, g, b, a]` array.
    pub fn clear_rgba(self, [r, g, b, a]: [f64; 4]) -> Self {
        self.clear_color(wgpu::Color { r, g, b, a })
    }

    /// Attach `view` as the depth target, cleared to `clear_value`.
    pub fn depth(self, view: wgpu::TextureView, clear_value: f32) -> Self {
        Self {
            depth: Some(DepthTarget { view, clear_value }),
            ..self
        }
    }

    pub fn label(self, label: &'static str) -> Self {
        Self {
            label: Some(label),
            ..self
        }
    }

    pub(crate) fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let clear_and_store = |load| wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        };

        let color_attachments = [Some(wgpu::RenderPassColorAttachment {
            view: color_view,
            depth_slice: None,
            resolve_target: None,
            ops: clear_and_store(wgpu::LoadOp::Clear(self.clear_color)),
        })];

        let depth_stencil_attachment =
            self.depth
                .as_ref()
                .map(|target| wgpu::RenderPassDepthStencilAttachment {
                    view: &target.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(target.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &color_attachments,
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One acquired surface frame and the encoder recording into it.
///
/// Dropping an unsubmitted frame still submits and presents it, with a warning.
pub struct FrameEncoder {
    queue: Arc<wgpu::Queue>,
    pending: Option<(wgpu::CommandEncoder, wgpu::SurfaceTexture)>,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lodplane-frame"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            queue,
            pending: Some((encoder, surface_texture)),
            surface_view,
        }
    }

    /// Start a pass targeting the surface.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> Option<wgpu::RenderPass<'a>> {
        let (encoder, _) = self.pending.as_mut()?;
        Some(builder.create_render_pass(encoder, &self.surface_view))
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Submit recorded passes and present the frame.
    pub fn submit(mut self) {
        self.present();
    }

    fn present(&mut self) -> bool {
        let Some((encoder, surface_texture)) = self.pending.take() else {
            return false;
        };
        self.queue.submit([encoder.finish()]);
        surface_texture.present();
        true
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if self.present() {
            log::warn!("Frame dropped before submit(), presented anyway");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_color() {
        let builder = RenderPassBuilder::default();
        assert_eq!(builder.clear_color, DEFAULT_CLEAR_COLOR);
        assert!(builder.depth.is_none());
        assert!(builder.label.is_none());
    }

    #[test]
    fn test_clear_rgba_maps_components() {
        let builder = RenderPassBuilder::new().clear_rgba([0.1, 0.2, 0.3, 0.4]);
        assert_eq!(
            builder.clear_color,
            wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 0.4
            }
        );
    }

    #[test]
    fn test_builder_chain_keeps_earlier_settings() {
        let builder = RenderPassBuilder::new()
            .label("plane-pass")
            .clear_color(wgpu::Color::RED);
        assert_eq!(builder.label, Some("plane-pass"));
        assert_eq!(builder.clear_color, wgpu::Color::RED);
    }

    #[test]
    fn test_depth_target_is_recorded() {
        let Some((device, _queue)) = crate::create_test_device_queue() else {
            return;
        };
        let depth = crate::DepthBuffer::new(&device, 4, 4);
        let builder = RenderPassBuilder::new().depth(depth.view.clone(), 1.0);
        assert_eq!(builder.depth.map(|target| target.clear_value), Some(1.0));
    }
}
