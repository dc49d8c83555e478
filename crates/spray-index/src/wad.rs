//! WAD3 spray container encoding and decoding.
//!
//! A spray container is a WAD3 archive holding a single miptex lump:
//!
//! ```text
//! header   "WAD3" | i32 lump count | i32 directory offset
//! miptex   name[16] | u32 width | u32 height | u32 mip offsets[4]
//!          mip 0..3 index data | u16 palette size (256) | RGB palette | 2 pad
//! dirent   i32 offset | i32 disk size | i32 size | u8 type | u8 compression
//!          | u16 pad | name[16]
//! ```
//!
//! All integers are little-endian. The lump name carries the decal mode: a
//! leading `{` marks a transparent decal (index 255 is see-through), a plain
//! name marks a gradient decal.

use std::fmt;
use std::io::{self, Write};

use crate::output::IndexedImage;
use crate::palette::{Palette, PALETTE_SIZE};

/// File magic.
pub const WAD_MAGIC: [u8; 4] = *b"WAD3";

/// Lump type of a miptex entry.
pub const LUMP_TYPE_MIPTEX: u8 = 0x43;

/// Lump name used for quantized sprays with a transparent index.
pub const TRANSPARENT_LUMP_NAME: &str = "{LOGO";

/// Lump name used for sprays that keep their source palette.
pub const GRADIENT_LUMP_NAME: &str = "LOGO";

/// Number of mip levels stored per texture.
pub const MIP_LEVELS: usize = 4;

const NAME_LEN: usize = 16;
const HEADER_LEN: usize = 12;
const MIPTEX_HEADER_LEN: usize = NAME_LEN + 4 + 4 + 4 * MIP_LEVELS;
const DIRENT_LEN: usize = 32;
const PALETTE_TRAILER_LEN: usize = 2 + PALETTE_SIZE * 3 + 2;

/// Error returned when a container cannot be written or read.
#[derive(Debug)]
pub enum WadError {
    /// Writing to the sink failed
    Io(io::Error),
    /// The texture does not fit the 32-bit offsets of the format
    TooLarge {
        width: u32,
        height: u32,
    },
    /// The data ended before `needed` bytes were available
    Truncated {
        needed: usize,
        len: usize,
    },
    /// The file does not start with `WAD3`
    BadMagic([u8; 4]),
    /// The directory holds no lumps
    NoLumps,
    /// The first lump is not a miptex
    UnsupportedLumpType(u8),
    /// The lump is stored compressed
    Compressed(u8),
    /// A header field points outside the data
    InvalidOffset {
        field: &'static str,
        value: i64,
    },
    /// The texture has a zero dimension
    ZeroDimensions {
        width: u32,
        height: u32,
    },
    /// The palette does not hold 256 entries
    PaletteSize(u16),
}

impl fmt::Display for WadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WadError::Io(err) => write!(f, "write failed: {}", err),
            WadError::TooLarge { width, height } => {
                write!(f, "texture {}x{} is too large for a WAD3 lump", width, height)
            }
            WadError::Truncated { needed, len } => {
                write!(f, "container truncated: need {} bytes, have {}", needed, len)
            }
            WadError::BadMagic(magic) => {
                write!(f, "not a WAD3 file (magic {:?})", String::from_utf8_lossy(magic))
            }
            WadError::NoLumps => write!(f, "container has no lumps"),
            WadError::UnsupportedLumpType(kind) => {
                write!(f, "unsupported lump type 0x{:02x}", kind)
            }
            WadError::Compressed(mode) => write!(f, "compressed lumps are not supported ({})", mode),
            WadError::InvalidOffset { field, value } => {
                write!(f, "invalid {}: {}", field, value)
            }
            WadError::ZeroDimensions { width, height } => {
                write!(f, "texture has zero dimension: {}x{}", width, height)
            }
            WadError::PaletteSize(count) => {
                write!(f, "palette holds {} entries, expected {}", count, PALETTE_SIZE)
            }
        }
    }
}

impl std::error::Error for WadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WadError {
    fn from(err: io::Error) -> Self {
        WadError::Io(err)
    }
}

/// A miptex lump read back from a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadLump {
    /// Lump name as stored in the directory
    pub name: String,
    /// Level 0 indices, palette and mode flag
    pub image: IndexedImage,
    /// Mip levels 1 to 3
    pub mips: Vec<Vec<u8>>,
}

/// Lump name for `image`'s decal mode.
pub fn lump_name(image: &IndexedImage) -> &'static str {
    if image.gradient_decal() {
        GRADIENT_LUMP_NAME
    } else {
        TRANSPARENT_LUMP_NAME
    }
}

/// Dimensions of mip `level` (0 is full size).
#[inline]
pub fn mip_dimensions(width: u32, height: u32, level: usize) -> (u32, u32) {
    (width >> level, height >> level)
}

/// Point-sample `indices` down to mip `level`.
///
/// Takes the top-left pixel of every `2^level` block so palette indices are
/// never blended.
pub fn mip_level(indices: &[u8], width: u32, height: u32, level: usize) -> Vec<u8> {
    let (mw, mh) = mip_dimensions(width, height, level);
    let width = width as usize;
    let mut out = Vec::with_capacity(mw as usize * mh as usize);
    for y in 0..mh as usize {
        let row = (y << level) * width;
        for x in 0..mw as usize {
            out.push(indices[row + (x << level)]);
        }
    }
    out
}

/// Serialize `image` into a complete container.
///
/// # Errors
///
/// Returns [`WadError::TooLarge`] when an offset would not fit the format's
/// signed 32-bit fields.
pub fn to_wad_bytes(image: &IndexedImage) -> Result<Vec<u8>, WadError> {
    let (width, height) = (image.width(), image.height());
    let too_large = || WadError::TooLarge { width, height };

    let mips: Vec<Vec<u8>> = (0..MIP_LEVELS)
        .map(|level| {
            if level == 0 {
                image.indices().to_vec()
            } else {
                mip_level(image.indices(), width, height, level)
            }
        })
        .collect();

    let mip_bytes: usize = mips.iter().map(Vec::len).sum();
    let lump_len = MIPTEX_HEADER_LEN + mip_bytes + PALETTE_TRAILER_LEN;
    let directory_offset = HEADER_LEN + lump_len;
    let total = directory_offset + DIRENT_LEN;
    let lump_len_i32 = i32::try_from(lump_len).map_err(|_| too_large())?;
    let directory_offset_i32 = i32::try_from(directory_offset).map_err(|_| too_large())?;

    let mut out = Vec::with_capacity(total);

    // Header
    out.extend_from_slice(&WAD_MAGIC);
    push_i32_le(&mut out, 1);
    push_i32_le(&mut out, directory_offset_i32);

    // Miptex
    let name = lump_name(image);
    push_name(&mut out, name);
    push_u32_le(&mut out, width);
    push_u32_le(&mut out, height);
    let mut offset = MIPTEX_HEADER_LEN;
    for mip in &mips {
        push_u32_le(&mut out, offset as u32);
        offset += mip.len();
    }
    for mip in &mips {
        out.extend_from_slice(mip);
    }
    push_u16_le(&mut out, PALETTE_SIZE as u16);
    out.extend_from_slice(&image.palette().to_rgb_bytes());
    push_u16_le(&mut out, 0);

    // Directory
    push_i32_le(&mut out, HEADER_LEN as i32);
    push_i32_le(&mut out, lump_len_i32);
    push_i32_le(&mut out, lump_len_i32);
    out.push(LUMP_TYPE_MIPTEX);
    out.push(0);
    push_u16_le(&mut out, 0);
    push_name(&mut out, name);

    debug_assert_eq!(out.len(), total);
    Ok(out)
}

/// Serialize `image` and write the whole container to `sink`.
pub fn write_wad<W: Write>(sink: &mut W, image: &IndexedImage) -> Result<usize, WadError> {
    let bytes = to_wad_bytes(image)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(bytes.len())
}

/// Read the first miptex lump of a container.
///
/// The decal mode is recovered from the lump name.
pub fn parse_wad(data: &[u8]) -> Result<WadLump, WadError> {
    let magic = field(data, 0, 4)?;
    if magic != WAD_MAGIC {
        return Err(WadError::BadMagic([magic[0], magic[1], magic[2], magic[3]]));
    }
    let lump_count = read_i32_le(data, 4)?;
    if lump_count < 1 {
        return Err(WadError::NoLumps);
    }
    let directory = offset_field(read_i32_le(data, 8)?, "directory offset")?;

    let entry = field(data, directory, DIRENT_LEN)?;
    let file_pos = offset_field(read_i32_le(entry, 0)?, "lump offset")?;
    let disk_size = offset_field(read_i32_le(entry, 4)?, "lump size")?;
    let kind = entry[12];
    let compression = entry[13];
    let name = read_name(&entry[16..32]);

    if kind != LUMP_TYPE_MIPTEX {
        return Err(WadError::UnsupportedLumpType(kind));
    }
    if compression != 0 {
        return Err(WadError::Compressed(compression));
    }

    let lump = field(data, file_pos, disk_size)?;
    let width = read_u32_le(lump, NAME_LEN)?;
    let height = read_u32_le(lump, NAME_LEN + 4)?;
    if width == 0 || height == 0 {
        return Err(WadError::ZeroDimensions { width, height });
    }

    let mut levels = Vec::with_capacity(MIP_LEVELS);
    let mut palette_at = 0;
    for level in 0..MIP_LEVELS {
        let (mw, mh) = mip_dimensions(width, height, level);
        let len = usize::try_from(u64::from(mw) * u64::from(mh)).map_err(|_| {
            WadError::TooLarge { width, height }
        })?;
        let offset = read_u32_le(lump, NAME_LEN + 8 + 4 * level)? as usize;
        levels.push(field(lump, offset, len)?.to_vec());
        palette_at = offset + len;
    }

    let count = read_u16_le(lump, palette_at)?;
    if count as usize != PALETTE_SIZE {
        return Err(WadError::PaletteSize(count));
    }
    let table = field(lump, palette_at + 2, PALETTE_SIZE * 3)?;
    let palette = Palette::from_rgb(table).map_err(|_| WadError::PaletteSize(count))?;

    let gradient_decal = !name.starts_with('{');
    let mut levels = levels.into_iter();
    let indices = levels.next().unwrap_or_default();
    let image = IndexedImage::assemble(width, height, indices, palette, gradient_decal);

    Ok(WadLump {
        name,
        image,
        mips: levels.collect(),
    })
}

fn field(data: &[u8], offset: usize, len: usize) -> Result<&[u8], WadError> {
    let end = offset.checked_add(len).ok_or(WadError::Truncated {
        needed: usize::MAX,
        len: data.len(),
    })?;
    data.get(offset..end).ok_or(WadError::Truncated {
        needed: end,
        len: data.len(),
    })
}

fn offset_field(value: i32, name: &'static str) -> Result<usize, WadError> {
    usize::try_from(value).map_err(|_| WadError::InvalidOffset {
        field: name,
        value: i64::from(value),
    })
}

fn read_u16_le(data: &[u8], offset: usize) -> Result<u16, WadError> {
    let b = field(data, offset, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, WadError> {
    let b = field(data, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_i32_le(data: &[u8], offset: usize) -> Result<i32, WadError> {
    let b = field(data, offset, 4)?;
    Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn push_u16_le(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32_le(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_i32_le(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_name(out: &mut Vec<u8>, name: &str) {
    let mut buf = [0u8; NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_LEN - 1);
    buf[..len].copy_from_slice(&bytes[..len]);
    out.extend_from_slice(&buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::TRANSPARENT_MARKER;

    fn spray(gradient_decal: bool) -> IndexedImage {
        let indices = (0..32 * 16).map(|i| (i % 256) as u8).collect();
        let mut palette = Palette::default();
        palette.set(1, [10, 20, 30]);
        palette.set(255, TRANSPARENT_MARKER);
        IndexedImage::assemble(32, 16, indices, palette, gradient_decal)
    }

    #[test]
    fn test_layout_sizes() {
        let bytes = to_wad_bytes(&spray(false)).unwrap();
        let mips = 32 * 16 + 16 * 8 + 8 * 4 + 4 * 2;
        let lump = 40 + mips + 2 + 768 + 2;

        assert_eq!(bytes.len(), 12 + lump + 32);
        assert_eq!(&bytes[0..4], b"WAD3");
        assert_eq!(read_i32_le(&bytes, 4).unwrap(), 1);
        assert_eq!(read_i32_le(&bytes, 8).unwrap() as usize, 12 + lump);
    }

    #[test]
    fn test_miptex_header() {
        let bytes = to_wad_bytes(&spray(false)).unwrap();
        let lump = &bytes[12..];

        assert_eq!(read_name(&lump[..16]), "{LOGO");
        assert_eq!(read_u32_le(lump, 16).unwrap(), 32);
        assert_eq!(read_u32_le(lump, 20).unwrap(), 16);
        assert_eq!(read_u32_le(lump, 24).unwrap(), 40);
        assert_eq!(read_u32_le(lump, 28).unwrap(), 40 + 512);
        assert_eq!(read_u32_le(lump, 32).unwrap(), 40 + 512 + 128);
        assert_eq!(read_u32_le(lump, 36).unwrap(), 40 + 512 + 128 + 32);
    }

    #[test]
    fn test_directory_entry() {
        let bytes = to_wad_bytes(&spray(true)).unwrap();
        let entry = &bytes[bytes.len() - 32..];

        assert_eq!(read_i32_le(entry, 0).unwrap(), 12);
        assert_eq!(read_i32_le(entry, 4).unwrap(), read_i32_le(entry, 8).unwrap());
        assert_eq!(entry[12], LUMP_TYPE_MIPTEX);
        assert_eq!(entry[13], 0);
        assert_eq!(read_name(&entry[16..]), "LOGO");
    }

    #[test]
    fn test_mip_levels_point_sample() {
        let indices: Vec<u8> = (0..16).collect();
        assert_eq!(mip_level(&indices, 4, 4, 1), vec![0, 2, 8, 10]);
        assert_eq!(mip_level(&indices, 4, 4, 2), vec![0]);
        assert!(mip_level(&indices, 4, 4, 3).is_empty());
    }

    #[test]
    fn test_parse_recovers_image() {
        for gradient in [false, true] {
            let image = spray(gradient);
            let lump = parse_wad(&to_wad_bytes(&image).unwrap()).unwrap();

            assert_eq!(lump.image, image);
            assert_eq!(lump.name, lump_name(&image));
            assert_eq!(lump.mips.len(), 3);
            assert_eq!(lump.mips[0], mip_level(image.indices(), 32, 16, 1));
        }
    }

    #[test]
    fn test_write_wad_reports_length() {
        let image = spray(false);
        let mut sink = Vec::new();
        let written = write_wad(&mut sink, &image).unwrap();
        assert_eq!(written, sink.len());
        assert_eq!(sink, to_wad_bytes(&image).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut bytes = to_wad_bytes(&spray(false)).unwrap();
        bytes[3] = b'2';
        assert!(matches!(parse_wad(&bytes), Err(WadError::BadMagic(m)) if &m == b"WAD2"));
    }

    #[test]
    fn test_parse_rejects_truncated() {
        let bytes = to_wad_bytes(&spray(false)).unwrap();
        assert!(matches!(
            parse_wad(&bytes[..bytes.len() - 1]),
            Err(WadError::Truncated { .. })
        ));
        assert!(matches!(parse_wad(b"WAD"), Err(WadError::Truncated { .. })));
    }

    #[test]
    fn test_parse_rejects_wrong_lump_type() {
        let mut bytes = to_wad_bytes(&spray(false)).unwrap();
        let at = bytes.len() - 32 + 12;
        bytes[at] = 0x42;
        assert!(matches!(
            parse_wad(&bytes),
            Err(WadError::UnsupportedLumpType(0x42))
        ));
    }

    #[test]
    fn test_parse_rejects_negative_directory() {
        let mut bytes = to_wad_bytes(&spray(false)).unwrap();
        bytes[8..12].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            parse_wad(&bytes),
            Err(WadError::InvalidOffset { value: -1, .. })
        ));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut out = Vec::new();
        push_name(&mut out, "a_very_long_lump_name");
        assert_eq!(out.len(), 16);
        assert_eq!(out[15], 0);
        assert_eq!(read_name(&out), "a_very_long_lum");
    }
}
