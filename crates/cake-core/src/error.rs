use thiserror::Error;

/// Failures while building the procedural textures at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture size must be non-zero")]
    ZeroSize,
    #[error("texture size {size} exceeds the {max} texel limit")]
    TooLarge { size: u32, max: u32 },
    #[error("pixel buffer of {len} bytes does not match a {size}x{size} RGBA image")]
    BufferMismatch { size: u32, len: usize },
}

/// Failures while linking WGSL modules into one program.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("shader module `{module}` requires `{symbol}`, which no earlier module provides")]
    MissingSymbol { module: String, symbol: String },
    #[error("symbol `{symbol}` is provided by both `{first}` and `{second}`")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },
    #[error("no shader modules to compose")]
    Empty,
}
