//! Owned grayscale image buffers.
//!
//! `GrayBuffer` is a contiguous single-channel `u8` grid with checked
//! construction: the backing vector must match `width * height` exactly, so
//! every accessor can index without per-pixel bounds arithmetic surprises.

use crate::util::{GlyphMatchError, GlyphMatchResult};

pub mod io;

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl GrayBuffer {
    /// Creates a buffer from a contiguous vector of `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> GlyphMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(GlyphMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a buffer filled with a constant intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> GlyphMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;
        Ok(Self {
            data: vec![value; needed],
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the backing slice in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns a contiguous slice for row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns a mutable slice for row `y`.
    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get_mut(start..start + self.width)
    }

    /// Returns the mean intensity over all pixels.
    pub fn mean(&self) -> f64 {
        let sum: u64 = self.data.iter().map(|&p| u64::from(p)).sum();
        sum as f64 / self.data.len() as f64
    }

    /// Copies a rectangular region into a new buffer.
    pub fn crop(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> GlyphMatchResult<GrayBuffer> {
        if width == 0 || height == 0 {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }
        let end_x = x
            .checked_add(width)
            .filter(|&end| end <= self.width)
            .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;
        let end_y = y
            .checked_add(height)
            .filter(|&end| end <= self.height)
            .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;

        let mut data = Vec::with_capacity(width * height);
        for row in y..end_y {
            let start = row * self.width + x;
            data.extend_from_slice(&self.data[start..start + (end_x - x)]);
        }
        GrayBuffer::new(data, width, height)
    }
}
