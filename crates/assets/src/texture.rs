use crate::AssetError;
use std::path::Path;

/// Decoded RGBA8 pixels, ready for GPU upload.
///
/// Uploading consumes the value so the CPU copy is released as soon as the
/// texture lives on the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!("decoded {} ({width}x{height})", path.display());
        Ok(Self {
            rgba: rgba.into_raw(),
            width,
            height,
        })
    }
}
