use lodplane_lod::LodError;

/// Errors surfaced to the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// A call that needs the plane arrived before `init_plugin`.
    #[error("plugin not initialised")]
    NotInitialized,

    #[error(transparent)]
    Lod(#[from] LodError),

    /// The animated texture must have non-zero dimensions.
    #[error("animated texture must be non-empty, got {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },

    /// A destination buffer cannot hold the requested image.
    #[error("buffer of {actual} bytes cannot hold {height} rows of stride {stride}")]
    BufferTooSmall {
        actual: usize,
        stride: usize,
        height: u32,
    },
}
