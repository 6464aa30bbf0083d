//! GPU textures keyed by host texture handle.
//!
//! The host refers to textures only by [`TextureHandle`]. The registry maps each
//! registered handle to a texture and a ready-to-bind [`wgpu::BindGroup`]. A
//! handle that was never registered, including [`TextureHandle::NONE`], binds a
//! 1×1 white fallback so drawing never fails for want of a texture.

use std::collections::HashMap;

use lodplane_lod::TextureHandle;

/// Pixel format of every registered texture: 4 bytes per texel.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const BYTES_PER_TEXEL: u32 = 4;

/// Errors that can occur while registering or updating a texture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextureError {
    /// Pixel data length doesn't match the expected size for the given dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Handle 0 means "no texture" and cannot be registered.
    #[error("texture handle 0 is reserved")]
    ReservedHandle,

    /// An update named a handle that was never registered.
    #[error("texture handle {0} is not registered")]
    NotRegistered(u32),
}

/// A registered texture with its view and bind group.
pub struct RegisteredTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
}

/// Handle-keyed texture store with a shared sampler and bind group layout.
pub struct TextureRegistry {
    textures: HashMap<TextureHandle, RegisteredTexture>,
    fallback: RegisteredTexture,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TextureRegistry {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("plane-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane-texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let fallback = create_texture(
            device,
            queue,
            &bind_group_layout,
            &sampler,
            "fallback-white",
            &[u8::MAX; BYTES_PER_TEXEL as usize],
            1,
            1,
        );

        Self {
            textures: HashMap::new(),
            fallback,
            sampler,
            bind_group_layout,
        }
    }

    /// Layout for group 1 of the plane pipeline.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Create (or replace) the texture stored under `handle` from RGBA8 pixels.
    pub fn register(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: TextureHandle,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), TextureError> {
        if handle == TextureHandle::NONE {
            return Err(TextureError::ReservedHandle);
        }
        validate_dimensions(width, height)?;
        validate_data_size(data, width, height)?;

        let label = format!("plane-texture-{}", handle.raw());
        let registered = create_texture(
            device,
            queue,
            &self.bind_group_layout,
            &self.sampler,
            &label,
            data,
            width,
            height,
        );

        if self.textures.insert(handle, registered).is_some() {
            log::info!("Replaced texture {} ({width}x{height})", handle.raw());
        } else {
            log::info!("Registered texture {} ({width}x{height})", handle.raw());
        }
        Ok(())
    }

    /// Overwrite the pixels of a registered texture. Dimensions must not change.
    pub fn write(
        &self,
        queue: &wgpu::Queue,
        handle: TextureHandle,
        data: &[u8],
    ) -> Result<(), TextureError> {
        let registered = self
            .textures
            .get(&handle)
            .ok_or(TextureError::NotRegistered(handle.raw()))?;
        let (width, height) = registered.dimensions;
        validate_data_size(data, width, height)?;
        write_pixels(queue, &registered.texture, data, width, height);
        Ok(())
    }

    /// Write in place when the handle already holds a texture of this size,
    /// otherwise (re)register it.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: TextureHandle,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), TextureError> {
        match self.dimensions(handle) {
            Some(dimensions) if dimensions == (width, height) => self.write(queue, handle, data),
            _ => self.register(device, queue, handle, data, width, height),
        }
    }

    /// Bind group for `handle`, or the white fallback when it is unknown.
    pub fn bind_group(&self, handle: TextureHandle) -> &wgpu::BindGroup {
        self.textures
            .get(&handle)
            .map_or(&self.fallback.bind_group, |t| &t.bind_group)
    }

    pub fn dimensions(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle).map(|t| t.dimensions)
    }

    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(&handle)
    }

    /// Drop a texture. Later binds of `handle` use the fallback.
    pub fn remove(&mut self, handle: TextureHandle) -> bool {
        self.textures.remove(&handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    data: &[u8],
    width: u32,
    height: u32,
) -> RegisteredTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_pixels(queue, &texture, data, width, height);

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}-bind-group")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    RegisteredTexture {
        texture,
        view,
        bind_group,
        dimensions: (width, height),
    }
}

fn write_pixels(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    data: &[u8],
    width: u32,
    height: u32,
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * BYTES_PER_TEXEL),
            rows_per_image: None,
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Byte length of a tightly packed RGBA8 image.
pub fn expected_byte_size(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_TEXEL as usize
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = expected_byte_size(width, height);
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}
