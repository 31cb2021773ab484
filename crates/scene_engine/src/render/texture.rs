//! 2D textures loaded from DDS or common image files

use super::backend::{GraphicsApi, RenderError, TextureHandle};
use crate::assets::{AssetError, DdsError, DdsImage, ImageData};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Texture loading errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// File could not be read
    #[error("Failed to read texture {path}: {source}")]
    Io {
        /// Offending file
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed DDS file
    #[error("Invalid DDS texture {path}: {source}")]
    Dds {
        /// Offending file
        path: String,
        /// Parse failure
        source: DdsError,
    },

    /// Image decoding failed
    #[error(transparent)]
    Image(#[from] AssetError),

    /// GPU object creation failed
    #[error(transparent)]
    Backend(#[from] RenderError),
}

/// GPU texture, deleted on drop
pub struct Texture {
    api: Rc<dyn GraphicsApi>,
    handle: TextureHandle,
    width: u32,
    height: u32,
    mip_levels: usize,
}

impl Texture {
    /// Load `path` and upload it
    ///
    /// `.dds` files (any case) upload every DXT-compressed mip level as
    /// stored; everything else is decoded to RGBA8 and mipmapped on the GPU.
    pub fn load<P: AsRef<Path>>(api: Rc<dyn GraphicsApi>, path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let is_dds = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("dds"));

        if is_dds {
            let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let image = DdsImage::parse(&bytes).map_err(|source| TextureError::Dds {
                path: path.display().to_string(),
                source,
            })?;
            log::info!(
                "Loaded DDS {:?} {}x{} ({:?}, {} levels)",
                path,
                image.width,
                image.height,
                image.format,
                image.levels.len()
            );
            Self::from_dds(api, &image)
        } else {
            let image = ImageData::from_file(path)?;
            Self::from_rgba(api, &image)
        }
    }

    /// Upload a parsed DDS image
    pub fn from_dds(api: Rc<dyn GraphicsApi>, image: &DdsImage) -> Result<Self, TextureError> {
        let handle = api.create_texture()?;
        let format = image.format.gl_internal_format();
        for (level, mip) in image.levels.iter().enumerate() {
            api.upload_compressed_level(
                handle,
                format,
                level as i32,
                mip.width,
                mip.height,
                image.level_data(mip),
            );
        }
        Ok(Self {
            api,
            handle,
            width: image.width,
            height: image.height,
            mip_levels: image.levels.len(),
        })
    }

    /// Upload decoded RGBA8 pixels
    pub fn from_rgba(api: Rc<dyn GraphicsApi>, image: &ImageData) -> Result<Self, TextureError> {
        let handle = api.create_texture()?;
        api.upload_rgba8(handle, image.width, image.height, &image.data);
        Ok(Self {
            api,
            handle,
            width: image.width,
            height: image.height,
            mip_levels: 1,
        })
    }

    /// Always true; a `Texture` only exists after a successful upload
    pub fn is_loaded(&self) -> bool {
        true
    }

    /// Bind to texture unit `unit`
    pub fn bind(&self, unit: u32) {
        self.api.bind_texture(unit, self.handle);
    }

    /// GL texture name
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Top level size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of uploaded levels (1 for mipmapped RGBA uploads)
    pub fn mip_levels(&self) -> usize {
        self.mip_levels
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.api.delete_texture(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::dds::tests::build_dds;
    use crate::assets::dds::GL_COMPRESSED_RGBA_S3TC_DXT5_EXT;
    use crate::render::headless::{GlCall, HeadlessApi};

    #[test]
    fn test_dds_uploads_every_level() {
        let api = Rc::new(HeadlessApi::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crate.DDS");
        // 8x8 DXT5: 64 + 16 + 16 + 16
        std::fs::write(&path, build_dds(8, 8, 4, b"DXT5", 112)).unwrap();

        let texture = Texture::load(api.clone(), &path).unwrap();
        assert_eq!(texture.size(), (8, 8));
        assert_eq!(texture.mip_levels(), 4);

        let uploads: Vec<_> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::UploadCompressed { format, level, width, bytes, .. } => {
                    Some((format, level, width, bytes))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            uploads,
            vec![
                (GL_COMPRESSED_RGBA_S3TC_DXT5_EXT, 0, 8, 64),
                (GL_COMPRESSED_RGBA_S3TC_DXT5_EXT, 1, 4, 16),
                (GL_COMPRESSED_RGBA_S3TC_DXT5_EXT, 2, 2, 16),
                (GL_COMPRESSED_RGBA_S3TC_DXT5_EXT, 3, 1, 16),
            ]
        );
    }

    #[test]
    fn test_png_goes_through_rgba_upload() {
        let api = Rc::new(HeadlessApi::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        image::RgbaImage::new(4, 2).save(&path).unwrap();

        let texture = Texture::load(api.clone(), &path).unwrap();
        assert!(texture.is_loaded());
        assert!(api
            .calls()
            .contains(&GlCall::UploadRgba8 { texture: texture.handle().raw().get(), width: 4, height: 2 }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let api = Rc::new(HeadlessApi::new());
        let result = Texture::load(api.clone(), "/nonexistent/texture.dds");
        assert!(matches!(result, Err(TextureError::Io { .. })));
        assert_eq!(api.live_textures(), 0);
    }

    #[test]
    fn test_bad_fourcc_is_reported() {
        let api = Rc::new(HeadlessApi::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.dds");
        std::fs::write(&path, build_dds(4, 4, 1, b"ATI2", 16)).unwrap();

        match Texture::load(api, &path) {
            Err(TextureError::Dds { source: DdsError::UnsupportedFormat(name), .. }) => {
                assert_eq!(name, "ATI2");
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.size())),
        }
    }

    #[test]
    fn test_drop_deletes_texture() {
        let api = Rc::new(HeadlessApi::new());
        let image = ImageData::solid_color(2, 2, [255, 255, 255, 255]);
        let texture = Texture::from_rgba(api.clone(), &image).unwrap();
        texture.bind(0);
        drop(texture);
        assert_eq!(api.live_textures(), 0);
    }
}
