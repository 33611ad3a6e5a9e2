//! Pixel buffer views over externally allocated memory.

use std::fmt;

use crate::error::BufferError;

/// Pixel layouts a platform bitmap can report.
///
/// Only [`Rgba8888`](Self::Rgba8888) is processable; the other variants exist
/// so acquisition can name what it rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4-channel interleaved RGBA, 8 bits per channel.
    Rgba8888,
    /// 16-bit packed RGB (5-6-5).
    Rgb565,
    /// Any other platform format code.
    Unknown(u32),
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba8888 => write!(f, "RGBA_8888"),
            Self::Rgb565 => write!(f, "RGB_565"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

/// Geometry and layout of one bitmap, as reported by its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per row, including any padding past the visible pixels.
    pub stride: u32,
    /// Channel layout.
    pub format: PixelFormat,
}

impl BufferInfo {
    /// Info for a packed RGBA bitmap (stride = width × 4).
    pub fn rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stride: width * 4,
            format: PixelFormat::Rgba8888,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total bytes the bitmap allocation must cover.
    pub fn size_bytes(&self) -> usize {
        self.stride as usize * self.height as usize
    }
}

/// A non-owning mutable view over one RGBA bitmap's pixel memory.
///
/// The view never outlives the scoped acquisition that exposed it; row
/// accessors honor the stride so padded platform bitmaps read and write
/// correctly.
pub struct PixelBuffer<'a> {
    info: BufferInfo,
    data: &'a mut [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap externally owned memory, validating format, stride, and length.
    pub fn new(info: BufferInfo, data: &'a mut [u8]) -> Result<Self, BufferError> {
        if info.format != PixelFormat::Rgba8888 {
            return Err(BufferError::NotRgba(info.format));
        }
        let row = info.width as usize * 4;
        if (info.stride as usize) < row {
            return Err(BufferError::StrideTooSmall {
                stride: info.stride,
                row,
            });
        }
        let needed = info.size_bytes();
        if data.len() < needed {
            return Err(BufferError::ViewTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { info, data })
    }

    pub fn info(&self) -> BufferInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.info.dimensions()
    }

    fn row_bytes(&self) -> usize {
        self.info.width as usize * 4
    }

    /// Visible bytes of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.info.stride as usize;
        &self.data[start..start + self.row_bytes()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.info.stride as usize;
        let end = start + self.row_bytes();
        &mut self.data[start..end]
    }

    /// Row `y` as RGBA pixels.
    pub fn row_pixels_mut(&mut self, y: u32) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(self.row_mut(y))
    }

    /// Copy the visible pixels into a packed (stride = width × 4) vector.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.row_bytes() * self.info.height as usize);
        for y in 0..self.info.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    /// Write packed RGBA data back into the (possibly padded) rows.
    pub fn copy_from_packed(&mut self, packed: &[u8]) -> Result<(), BufferError> {
        let row = self.row_bytes();
        let expected = row * self.info.height as usize;
        if packed.len() != expected {
            return Err(BufferError::PackedLengthMismatch {
                expected,
                got: packed.len(),
            });
        }
        for y in 0..self.info.height {
            let start = y as usize * row;
            self.row_mut(y).copy_from_slice(&packed[start..start + row]);
        }
        Ok(())
    }
}
