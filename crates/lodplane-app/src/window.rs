//! Window creation and event handling via winit.
//!
//! [`AppState`] plays the host: it owns the window and GPU resources, feeds
//! the plugin host fresh matrices and time every frame, and uploads whatever
//! texture the host regenerates.

use std::path::PathBuf;
use std::sync::Arc;

use lodplane_config::Config;
use lodplane_lod::LodTier;
use lodplane_plugin::{DeviceEvent, DeviceKind, PluginHost};
use lodplane_render::{
    DepthBuffer, FrameEncoder, GpuErrorLog, PlaneUniform, RenderPassBuilder, SurfaceError,
    WgpuPlaneBackend, init_render_context_blocking,
};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::{MovementInput, ObserverCamera};
use crate::clock::FrameClock;
use crate::renderer::PlaneRenderer;
use crate::scene::{self, build_host};

/// Event id passed to the host's render callback.
pub const RENDER_EVENT_ID: i32 = 1;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

pub struct AppState {
    config: Config,
    config_dir: PathBuf,
    window: Option<Arc<Window>>,
    renderer: Option<PlaneRenderer>,
    host: PluginHost,
    camera: ObserverCamera,
    input: MovementInput,
    clock: FrameClock,
    gpu_errors: Arc<GpuErrorLog>,
    last_tier: Option<LodTier>,
}

impl AppState {
    /// Build the plugin host from `config`. Fails when the plane cannot be built.
    pub fn new(config: Config, config_dir: PathBuf) -> Result<Self, lodplane_plugin::HostError> {
        let host = build_host(&config)?;
        let camera = camera_from_config(&config, &host);
        Ok(Self {
            config,
            config_dir,
            window: None,
            renderer: None,
            host,
            camera,
            input: MovementInput::default(),
            clock: FrameClock::new(),
            gpu_errors: Arc::new(GpuErrorLog::default()),
            last_tier: None,
        })
    }

    fn initialize_renderer(&mut self, window: Arc<Window>) -> bool {
        let gpu = match init_render_context_blocking(
            window,
            self.config.window.vsync,
            Arc::clone(&self.gpu_errors),
        ) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                return false;
            }
        };

        let Some(plane) = self.host.plane() else {
            error!("Plugin host has no plane to upload");
            return false;
        };

        let shader_dir = Some(self.config_dir.join("shaders"));
        match PlaneRenderer::new(gpu, &self.config, shader_dir, plane.mesh()) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.host.on_graphics_device(DeviceKind::Wgpu, DeviceEvent::Initialize);
                true
            }
            Err(e) => {
                error!("Renderer setup failed: {e}");
                false
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let pressed = event.state == ElementState::Pressed;
        match event.physical_key {
            PhysicalKey::Code(KeyCode::ArrowUp) => self.input.toward = pressed,
            PhysicalKey::Code(KeyCode::ArrowDown) => self.input.away = pressed,
            PhysicalKey::Code(KeyCode::F5) if pressed && !event.repeat => self.reload_config(),
            PhysicalKey::Code(KeyCode::Escape) if pressed => {
                info!("Escape pressed, shutting down");
                event_loop.exit();
            }
            _ => {}
        }
    }

    /// Re-read `config.ron` and apply what changed. A new plane layout
    /// rebuilds the host and re-uploads the mesh.
    #[instrument(skip(self))]
    fn reload_config(&mut self) {
        let new_config = match self.config.reload(&self.config_dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("Config unchanged");
                return;
            }
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };

        let rebuild = new_config.plane != self.config.plane
            || new_config.render.plasma_tier != self.config.render.plasma_tier
            || new_config.render.texture_size != self.config.render.texture_size;
        if rebuild {
            match build_host(&new_config) {
                Ok(mut host) => {
                    if self.renderer.is_some() {
                        host.on_graphics_device(DeviceKind::Wgpu, DeviceEvent::Initialize);
                    }
                    self.host = host;
                    self.last_tier = None;
                    if let (Some(renderer), Some(plane)) = (&mut self.renderer, self.host.plane()) {
                        renderer.upload_mesh(plane.mesh());
                    }
                    info!(max_depth = new_config.plane.max_depth, "Plane rebuilt from config");
                }
                Err(e) => {
                    warn!("Keeping previous plane, new settings rejected: {e}");
                    return;
                }
            }
        }

        self.camera.set_speed(new_config.camera.speed);
        self.config = new_config;
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let time = self.clock.tick();
        self.camera.advance(self.input, time.delta);
        self.host.set_time(time.elapsed);

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let matrices = self.camera.frame_matrices(renderer.gpu.aspect_ratio());
        self.host.set_frame_matrices(matrices);
        renderer.write_uniform(&PlaneUniform::new(
            &matrices.model,
            &matrices.view,
            &matrices.projection,
        ));

        let surface_texture = match renderer.gpu.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Lost) => {
                let config = &renderer.gpu.surface_config;
                let (width, height) = (config.width, config.height);
                renderer.resize(width, height);
                return;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                return;
            }
        };

        let mut frame =
            FrameEncoder::new(&renderer.gpu.device, renderer.queue(), surface_texture);
        let pass_builder = RenderPassBuilder::new()
            .clear_rgba(self.config.render.clear_color)
            .depth(renderer.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("lod-plane-pass");

        let report = {
            let Some(mut pass) = frame.begin_render_pass(&pass_builder) else {
                return;
            };
            let mut backend = WgpuPlaneBackend::new(
                &mut pass,
                &renderer.pipeline,
                &renderer.uniforms,
                &renderer.mesh_buffer,
                &renderer.textures,
            );
            self.host.render_event(RENDER_EVENT_ID, &mut backend)
        };

        if let Some(report) = report {
            if self.last_tier != Some(report.tier) {
                info!(
                    tier = ?report.tier,
                    distance = report.distance,
                    "LOD tier changed"
                );
                self.last_tier = Some(report.tier);
            }
            if let Some(update) = &report.texture_update {
                renderer.apply_texture_update(update);
            }
        }

        frame.submit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        if !self.initialize_renderer(Arc::clone(&window)) {
            event_loop.exit();
            return;
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size.width, new_size.height);
                    debug!("Resized to {}x{}", new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.host.on_graphics_device(DeviceKind::Wgpu, DeviceEvent::Shutdown);
        info!(
            frames = self.clock.frame_count(),
            uptime_secs = self.clock.uptime().as_secs_f32(),
            "Exiting"
        );
        if !self.gpu_errors.is_empty() {
            error!("GPU errors during session:\n{}", self.gpu_errors.joined());
        }
    }
}

/// Camera aimed at the plane centroid, starting at the configured distance.
fn camera_from_config(config: &Config, host: &PluginHost) -> ObserverCamera {
    let target = host
        .plane()
        .map_or(glam::Vec3::Y, |plane| plane.centroid().truncate());
    ObserverCamera::new(
        target,
        config.camera.start_distance,
        config.camera.speed,
        config.camera.fov_y_degrees,
    )
}

/// Errors that stop the harness before the first frame.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("plugin setup failed: {0}")]
    Host(#[from] lodplane_plugin::HostError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Create the event loop and run until the window closes.
#[instrument(skip(config))]
pub fn run(config: Config, config_dir: PathBuf) -> Result<(), RunError> {
    let tiers = scene::TIER_TEXTURES.map(|handle| handle.raw());
    info!(?tiers, plasma_tier = ?config.render.plasma_tier, "Starting LOD plane harness");

    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, config_dir)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
