//! Image loading utilities for texture data
//!
//! Provides PNG loading for uncompressed textures; DDS files go through
//! [`crate::assets::dds`] instead.

use std::path::Path;
use crate::assets::AssetError;

/// Loaded image data ready for GPU upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data, bottom row first
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);
        if !path_ref.is_file() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image {}: {}", path_ref.display(), e)))?;

        let image = Self::from_dynamic(img);
        log::info!("Loaded image {}x{} from {:?}", image.width, image.height, path_ref);
        Ok(image)
    }

    /// Load image from memory (useful for embedded resources)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image from bytes: {}", e)))?;
        Ok(Self::from_dynamic(img))
    }

    fn from_dynamic(img: image::DynamicImage) -> Self {
        // OpenGL samples row 0 at V = 0, the bottom of the texture
        let rgba_img = img.flipv().to_rgba8();
        let (width, height) = rgba_img.dimensions();
        Self {
            data: rgba_img.into_raw(),
            width,
            height,
        }
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
