//! DirectDraw Surface (DDS) parsing for S3TC compressed textures
//!
//! Only the subset produced by common exporters is understood: a 124-byte
//! header followed by DXT1, DXT3 or DXT5 blocks for every mip level.

use thiserror::Error;

const MAGIC: &[u8; 4] = b"DDS ";
const HEADER_SIZE: usize = 124;

const FOURCC_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
const FOURCC_DXT3: u32 = u32::from_le_bytes(*b"DXT3");
const FOURCC_DXT5: u32 = u32::from_le_bytes(*b"DXT5");

/// `GL_COMPRESSED_RGBA_S3TC_DXT1_EXT`
pub const GL_COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;
/// `GL_COMPRESSED_RGBA_S3TC_DXT3_EXT`
pub const GL_COMPRESSED_RGBA_S3TC_DXT3_EXT: u32 = 0x83F2;
/// `GL_COMPRESSED_RGBA_S3TC_DXT5_EXT`
pub const GL_COMPRESSED_RGBA_S3TC_DXT5_EXT: u32 = 0x83F3;

/// DDS parsing errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DdsError {
    /// File does not start with `"DDS "`
    #[error("Not a DDS file (bad magic)")]
    BadMagic,

    /// Fewer than 128 bytes of magic + header
    #[error("Truncated DDS header: {0} bytes")]
    TruncatedHeader(usize),

    /// Compression other than DXT1/3/5
    #[error("Unsupported DDS pixel format '{0}'")]
    UnsupportedFormat(String),

    /// A mip level extends past the end of the file
    #[error("Truncated DDS data: mip level {level} needs {needed} bytes, {available} available")]
    TruncatedData {
        /// Mip level that could not be read
        level: u32,
        /// Bytes required for that level
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Level dimensions whose byte size does not fit in memory
    #[error("DDS mip level {level} of {width}x{height} is too large")]
    LevelTooLarge {
        /// Mip level that overflowed
        level: u32,
        /// Level width in pixels
        width: u32,
        /// Level height in pixels
        height: u32,
    },
}

/// Block-compression formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DxtFormat {
    /// BC1, 8 bytes per 4x4 block
    Dxt1,
    /// BC2, 16 bytes per 4x4 block
    Dxt3,
    /// BC3, 16 bytes per 4x4 block
    Dxt5,
}

impl DxtFormat {
    fn from_fourcc(fourcc: u32) -> Result<Self, DdsError> {
        match fourcc {
            FOURCC_DXT1 => Ok(Self::Dxt1),
            FOURCC_DXT3 => Ok(Self::Dxt3),
            FOURCC_DXT5 => Ok(Self::Dxt5),
            other => Err(DdsError::UnsupportedFormat(
                String::from_utf8_lossy(&other.to_le_bytes()).into_owned(),
            )),
        }
    }

    /// Bytes per 4x4 block
    pub fn block_size(self) -> usize {
        match self {
            Self::Dxt1 => 8,
            Self::Dxt3 | Self::Dxt5 => 16,
        }
    }

    /// Colour components (DXT1 carries no real alpha)
    pub fn components(self) -> u32 {
        match self {
            Self::Dxt1 => 3,
            Self::Dxt3 | Self::Dxt5 => 4,
        }
    }

    /// OpenGL internal format enum
    pub fn gl_internal_format(self) -> u32 {
        match self {
            Self::Dxt1 => GL_COMPRESSED_RGBA_S3TC_DXT1_EXT,
            Self::Dxt3 => GL_COMPRESSED_RGBA_S3TC_DXT3_EXT,
            Self::Dxt5 => GL_COMPRESSED_RGBA_S3TC_DXT5_EXT,
        }
    }
}

/// One mip level inside the image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
    /// Byte range of the level inside [`DdsImage::data`]
    pub range: std::ops::Range<usize>,
}

/// A parsed DDS image
#[derive(Debug, Clone)]
pub struct DdsImage {
    /// Top level width
    pub width: u32,
    /// Top level height
    pub height: u32,
    /// Compression format
    pub format: DxtFormat,
    /// Mip chain, largest first
    pub levels: Vec<MipLevel>,
    /// Compressed payload following the header
    pub data: Vec<u8>,
}

fn read_u32(header: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ])
}

impl DdsImage {
    /// Parse a complete DDS file held in memory
    pub fn parse(bytes: &[u8]) -> Result<Self, DdsError> {
        if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
            return Err(DdsError::BadMagic);
        }
        if bytes.len() < MAGIC.len() + HEADER_SIZE {
            return Err(DdsError::TruncatedHeader(bytes.len()));
        }

        let header = &bytes[MAGIC.len()..MAGIC.len() + HEADER_SIZE];
        let height = read_u32(header, 8);
        let width = read_u32(header, 12);
        let mip_map_count = read_u32(header, 24).max(1);
        let format = DxtFormat::from_fourcc(read_u32(header, 80))?;

        let payload = &bytes[MAGIC.len() + HEADER_SIZE..];
        let block_size = format.block_size();

        let mut levels = Vec::new();
        let (mut level_width, mut level_height) = (width, height);
        let mut offset: usize = 0;

        for level in 0..mip_map_count {
            if level_width == 0 && level_height == 0 {
                break;
            }
            let w = level_width.max(1);
            let h = level_height.max(1);
            let blocks_wide = (w as usize).div_ceil(4);
            let blocks_high = (h as usize).div_ceil(4);
            let size = blocks_wide
                .checked_mul(blocks_high)
                .and_then(|blocks| blocks.checked_mul(block_size))
                .ok_or(DdsError::LevelTooLarge { level, width: w, height: h })?;
            let end = offset
                .checked_add(size)
                .ok_or(DdsError::LevelTooLarge { level, width: w, height: h })?;

            if end > payload.len() {
                return Err(DdsError::TruncatedData {
                    level,
                    needed: size,
                    available: payload.len().saturating_sub(offset),
                });
            }

            levels.push(MipLevel { width: w, height: h, range: offset..end });
            offset = end;
            level_width /= 2;
            level_height /= 2;
        }

        log::debug!(
            "Parsed DDS {}x{} {:?} with {} mip level(s)",
            width,
            height,
            format,
            levels.len()
        );

        Ok(Self {
            width,
            height,
            format,
            levels,
            data: payload[..offset].to_vec(),
        })
    }

    /// Compressed bytes of one level
    pub fn level_data(&self, level: &MipLevel) -> &[u8] {
        &self.data[level.range.clone()]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a DDS file with the given geometry and a zero-filled payload
    pub(crate) fn build_dds(width: u32, height: u32, mips: u32, fourcc: &[u8; 4], payload_len: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&124u32.to_le_bytes());
        header[8..12].copy_from_slice(&height.to_le_bytes());
        header[12..16].copy_from_slice(&width.to_le_bytes());
        header[24..28].copy_from_slice(&mips.to_le_bytes());
        header[80..84].copy_from_slice(fourcc);
        bytes.extend_from_slice(&header);
        bytes.extend(std::iter::repeat(0xAB).take(payload_len));
        bytes
    }

    #[test]
    fn test_dxt1_mip_chain() {
        // 8x8: 4 blocks * 8 = 32, 4x4: 8, 2x2: 8, 1x1: 8
        let bytes = build_dds(8, 8, 4, b"DXT1", 56);
        let image = DdsImage::parse(&bytes).unwrap();

        assert_eq!(image.format, DxtFormat::Dxt1);
        assert_eq!(image.format.components(), 3);
        let sizes: Vec<usize> = image.levels.iter().map(|l| l.range.len()).collect();
        assert_eq!(sizes, vec![32, 8, 8, 8]);
        assert_eq!(image.levels[3].width, 1);
        assert_eq!(image.level_data(&image.levels[1]).len(), 8);
    }

    #[test]
    fn test_dxt5_uses_sixteen_byte_blocks() {
        let bytes = build_dds(4, 4, 1, b"DXT5", 16);
        let image = DdsImage::parse(&bytes).unwrap();
        assert_eq!(image.format.gl_internal_format(), GL_COMPRESSED_RGBA_S3TC_DXT5_EXT);
        assert_eq!(image.levels.len(), 1);
        assert_eq!(image.data.len(), 16);
    }

    #[test]
    fn test_zero_mip_count_means_one_level() {
        let bytes = build_dds(4, 4, 0, b"DXT3", 16);
        let image = DdsImage::parse(&bytes).unwrap();
        assert_eq!(image.levels.len(), 1);
    }

    #[test]
    fn test_non_square_chain_clamps_to_one() {
        // 8x2 -> 4x1 -> 2x1 (0 height clamps) -> 1x1
        let bytes = build_dds(8, 2, 4, b"DXT1", 16 + 8 + 8 + 8);
        let image = DdsImage::parse(&bytes).unwrap();
        let dims: Vec<(u32, u32)> = image.levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = build_dds(4, 4, 1, b"DXT1", 8);
        bytes[0] = b'X';
        assert_eq!(DdsImage::parse(&bytes).unwrap_err(), DdsError::BadMagic);
    }

    #[test]
    fn test_rejects_truncated_header() {
        let bytes = build_dds(4, 4, 1, b"DXT1", 8);
        assert!(matches!(DdsImage::parse(&bytes[..60]), Err(DdsError::TruncatedHeader(60))));
    }

    #[test]
    fn test_rejects_unsupported_fourcc() {
        let bytes = build_dds(4, 4, 1, b"DXT2", 16);
        assert_eq!(
            DdsImage::parse(&bytes).unwrap_err(),
            DdsError::UnsupportedFormat("DXT2".to_string())
        );
    }

    #[test]
    fn test_huge_dimensions_are_an_error() {
        let bytes = build_dds(u32::MAX, u32::MAX, 1, b"DXT5", 16);
        let result = std::panic::catch_unwind(|| DdsImage::parse(&bytes));
        assert_eq!(
            result.expect("parsing must not panic").unwrap_err(),
            DdsError::LevelTooLarge { level: 0, width: u32::MAX, height: u32::MAX }
        );
    }

    #[test]
    fn test_huge_mip_count_stops_at_one_by_one() {
        // 4x4 -> 2x2 -> 1x1, then both dimensions hit zero
        let bytes = build_dds(4, 4, u32::MAX, b"DXT1", 24);
        let image = DdsImage::parse(&bytes).unwrap();
        assert_eq!(image.levels.len(), 3);
        assert_eq!(image.data.len(), 24);
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let bytes = build_dds(8, 8, 2, b"DXT1", 33);
        match DdsImage::parse(&bytes) {
            Err(DdsError::TruncatedData { level, needed, available }) => {
                assert_eq!((level, needed, available), (1, 8, 1));
            }
            other => panic!("expected truncated data, got {other:?}"),
        }
    }
}
