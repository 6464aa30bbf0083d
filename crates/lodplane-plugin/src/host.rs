//! The plugin host: explicit render context in place of process-wide state.

use glam::{Mat4, Vec4};
use lodplane_lod::{
    LodPlane, LodTier, RenderBackend, TextureHandle, camera_position_from_view, observer_distance,
};
use lodplane_mesh::MeshBuildOptions;

use crate::device::{DeviceEvent, DeviceKind};
use crate::error::HostError;
use crate::plasma::generate_plasma;

/// Options for [`PluginHost::init_plugin`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostOptions {
    pub mesh: MeshBuildOptions,
    /// Texture bound to every tier until the host replaces it.
    pub initial_texture: TextureHandle,
}

/// Transforms pushed by the host, plus the camera position derived from the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec4,
}

impl FrameMatrices {
    /// Build from three column-major 4×4 arrays.
    pub fn from_column_major(model: &[f32; 16], view: &[f32; 16], projection: &[f32; 16]) -> Self {
        Self::new(
            Mat4::from_cols_array(model),
            Mat4::from_cols_array(view),
            Mat4::from_cols_array(projection),
        )
    }

    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model,
            view,
            projection,
            camera_position: camera_position_from_view(&view),
        }
    }
}

impl Default for FrameMatrices {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// A host texture whose pixels the plugin regenerates every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimatedTexture {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

/// Fresh RGBA8 pixels for an animated texture, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureUpdate {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// What one render event did.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub tier: LodTier,
    pub distance: f32,
    /// Pixels the caller should upload to the animated texture, if one is set.
    pub texture_update: Option<TextureUpdate>,
}

/// Per-frame render context for the LOD plane.
#[derive(Default)]
pub struct PluginHost {
    plane: Option<LodPlane>,
    device: Option<DeviceKind>,
    matrices: FrameMatrices,
    time: f32,
    animated: Option<AnimatedTexture>,
    last_tier: Option<LodTier>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the plane. Calling again rebuilds it and drops earlier texture bindings.
    pub fn init_plugin(&mut self, options: HostOptions) -> Result<(), HostError> {
        let plane = LodPlane::with_options(options.mesh, options.initial_texture)?;
        if self.plane.replace(plane).is_some() {
            log::info!("LOD plane rebuilt");
        } else {
            log::info!("LOD plane initialised");
        }
        self.last_tier = None;
        Ok(())
    }

    /// React to a device lifecycle event. Unsupported devices leave the host not ready.
    pub fn on_graphics_device(&mut self, kind: DeviceKind, event: DeviceEvent) {
        if !kind.is_supported() {
            log::warn!("Ignoring unsupported graphics device {kind:?} ({event:?})");
            self.device = None;
            return;
        }

        if event.leaves_device_usable() {
            log::info!("Graphics device {kind:?} ready ({event:?})");
            self.device = Some(kind);
        } else {
            log::info!("Graphics device {kind:?} unavailable ({event:?})");
            self.device = None;
        }
    }

    /// Store the frame transforms and recompute the camera position.
    pub fn set_matrices(&mut self, model: &[f32; 16], view: &[f32; 16], projection: &[f32; 16]) {
        self.matrices = FrameMatrices::from_column_major(model, view, projection);
    }

    /// Same as [`set_matrices`](Self::set_matrices) for callers that already hold `Mat4`s.
    pub fn set_frame_matrices(&mut self, matrices: FrameMatrices) {
        self.matrices = matrices;
    }

    /// Bind `texture` to `tier`. An out-of-range tier is logged and returned.
    pub fn set_plane_texture(
        &mut self,
        texture: TextureHandle,
        tier: usize,
    ) -> Result<(), HostError> {
        let plane = self.plane.as_mut().ok_or(HostError::NotInitialized)?;
        plane.set_texture_id(texture, tier).map_err(|e| {
            log::error!("set_plane_texture({}, {tier}) failed: {e}", texture.raw());
            HostError::from(e)
        })
    }

    /// Seconds since the host started, used to animate the plasma texture.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Register the texture to refill with plasma every frame.
    pub fn set_animated_texture(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
    ) -> Result<(), HostError> {
        if width == 0 || height == 0 {
            return Err(HostError::EmptyTexture { width, height });
        }
        log::debug!("Animated texture {} ({width}x{height})", handle.raw());
        self.animated = Some(AnimatedTexture {
            handle,
            width,
            height,
        });
        Ok(())
    }

    pub fn clear_animated_texture(&mut self) {
        self.animated = None;
    }

    /// Draw one frame. Does nothing until a supported device is ready and the
    /// plane exists.
    pub fn render_event(
        &mut self,
        event_id: i32,
        backend: &mut impl RenderBackend,
    ) -> Option<FrameReport> {
        if self.device.is_none() {
            log::trace!("Render event {event_id} skipped: no usable device");
            return None;
        }
        let plane = self.plane.as_ref()?;

        let distance = observer_distance(self.matrices.camera_position, plane.centroid());
        let tier = plane.render(distance, backend);
        if self.last_tier != Some(tier) {
            log::debug!("Tier {:?} -> {tier:?} at distance {distance:.3}", self.last_tier);
            self.last_tier = Some(tier);
        }

        let texture_update = self.animated.map(|animated| TextureUpdate {
            handle: animated.handle,
            width: animated.width,
            height: animated.height,
            pixels: generate_plasma(animated.width, animated.height, self.time),
        });

        Some(FrameReport {
            tier,
            distance,
            texture_update,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.device.is_some() && self.plane.is_some()
    }

    pub fn device(&self) -> Option<DeviceKind> {
        self.device
    }

    pub fn plane(&self) -> Option<&LodPlane> {
        self.plane.as_ref()
    }

    pub fn matrices(&self) -> &FrameMatrices {
        &self.matrices
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn animated_texture(&self) -> Option<AnimatedTexture> {
        self.animated
    }
}
