//! Asset loading
//!
//! File-format parsers for meshes and textures. Nothing here touches the GPU;
//! uploads happen in [`crate::render`].

pub mod obj_loader;
pub mod dds;
pub mod image_loader;

pub use obj_loader::{ObjLoader, ObjOptions, ObjError};
pub use dds::{DdsImage, DdsError, DxtFormat, MipLevel};
pub use image_loader::ImageData;

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset loading failed
    #[error("Asset loading failed: {0}")]
    LoadFailed(String),
}
