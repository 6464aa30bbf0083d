//! Host-facing glue for the LOD plane.
//!
//! A [`PluginHost`] holds the per-frame render context explicitly: the
//! matrices last pushed by the host, the derived camera position, device
//! readiness, elapsed time, and the optional animated texture. The host calls
//! [`PluginHost::render_event`] once per frame with a [`lodplane_lod::RenderBackend`].

mod device;
mod error;
mod host;
mod plasma;

pub use device::{DeviceEvent, DeviceKind};
pub use error::HostError;
pub use host::{AnimatedTexture, FrameMatrices, FrameReport, HostOptions, PluginHost, TextureUpdate};
pub use plasma::{PLASMA_SPEED, fill_plasma, generate_plasma, plasma_value};
