// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Pixel surfaces.
//!
//! The renderer never owns the surface it draws on. It is handed a
//! [`Surface`] for the duration of one pass, locks it once through a
//! [`SurfaceLock`] and draws through the resulting [`Canvas`], which clips
//! every write to the surface bounds.
//!
//! [`Framebuffer`] is a plain in-memory surface used by the binary and the
//! tests; display backends implement [`Surface`] over their own memory.

use std::io::Write;
use std::path::Path;

use bytes::BytesMut;

use crate::error::{Error, Result};
use crate::pixel::{PixelFormat, Rgb};
use crate::raster::Rect;

/// A mutable 2-D grid of packed pixels owned by a display backend.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn format(&self) -> PixelFormat;

    /// Bytes between the starts of two consecutive rows. May exceed
    /// `width * bytes_per_pixel`.
    fn stride(&self) -> usize;

    /// Raw pixel memory, row-major, `stride` bytes per row.
    ///
    /// Only called between [`Surface::lock`] and [`Surface::unlock`].
    fn pixels_mut(&mut self) -> &mut [u8];

    /// Makes the pixel memory directly accessible.
    ///
    /// # Errors
    ///
    /// Backend specific; the default implementation never fails.
    fn lock(&mut self) -> Result<()> {
        Ok(())
    }

    fn unlock(&mut self) {}
}

/// Holds a surface locked until dropped.
pub struct SurfaceLock<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SurfaceLock<'a, S> {
    /// Locks `surface`; it is unlocked again when the guard is dropped,
    /// including on early return.
    ///
    /// # Errors
    ///
    /// Propagates the backend's lock failure.
    pub fn new(surface: &'a mut S) -> Result<Self> {
        surface.lock()?;
        Ok(Self { surface })
    }

    /// A clipped drawing view of the locked pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface reports an unsupported pixel format
    /// or a buffer too small for its geometry.
    pub fn canvas(&mut self) -> Result<Canvas<'_>> {
        let width = self.surface.width();
        let height = self.surface.height();
        let stride = self.surface.stride();
        let format = self.surface.format();
        Canvas::new(self.surface.pixels_mut(), width, height, stride, format)
    }
}

impl<S: Surface + ?Sized> Drop for SurfaceLock<'_, S> {
    fn drop(&mut self) {
        self.surface.unlock();
    }
}

/// A borrowed, bounds-checked view of pixel memory.
pub struct Canvas<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    bpp: usize,
}

impl<'a> Canvas<'a> {
    /// Wraps raw pixel memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for formats that cannot be packed
    /// and [`Error::BufferSize`] when `data` cannot hold `height` rows of
    /// `stride` bytes (the last row only needs `width` pixels).
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        format.validate()?;
        let bpp = format.bytes_per_pixel();
        let row_bytes = width * bpp;
        let expected = if height == 0 {
            0
        } else {
            stride * (height - 1) + row_bytes
        };
        if stride < row_bytes || data.len() < expected {
            return Err(Error::BufferSize {
                got: data.len(),
                expected,
                width,
                height,
                stride,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
            bpp,
        })
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The whole canvas as a rectangle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * self.bpp
    }

    /// Colour of an in-bounds pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the canvas.
    #[inline]
    #[must_use]
    pub fn rgb_at(&self, x: usize, y: usize) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let o = self.offset(x, y);
        self.format.unpack(self.format.read_pixel(&self.data[o..o + self.bpp]))
    }

    /// Writes an in-bounds pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the canvas.
    #[inline]
    pub fn put_rgb(&mut self, x: usize, y: usize, c: Rgb) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let pixel = self.format.pack(c);
        let o = self.offset(x, y);
        let bpp = self.bpp;
        self.format.write_pixel(&mut self.data[o..o + bpp], pixel);
    }

    /// Colour at signed coordinates, `None` when outside the canvas.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.rgb_at(x as usize, y as usize))
    }

    /// Sets every pixel of `rect` that lies on the canvas. Rectangles with a
    /// non-positive width or height draw nothing.
    #[allow(clippy::cast_sign_loss)]
    pub fn fill_rect(&mut self, rect: Rect, c: Rgb) {
        let Some(r) = rect.intersect(&self.bounds()) else {
            return;
        };
        let pixel = self.format.pack(c);
        let mut packed = [0u8; 4];
        self.format.write_pixel(&mut packed, pixel);
        let bpp = self.bpp;
        let (x0, y0) = (r.x as usize, r.y as usize);
        let (w, h) = (r.w as usize, r.h as usize);
        for y in y0..y0 + h {
            let start = self.offset(x0, y);
            for px in self.data[start..start + w * bpp].chunks_exact_mut(bpp) {
                px.copy_from_slice(&packed[..bpp]);
            }
        }
    }

    /// Fills the whole canvas.
    pub fn clear(&mut self, c: Rgb) {
        let bounds = self.bounds();
        self.fill_rect(bounds, c);
    }
}

/// An in-memory surface backed by a byte buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    data: BytesMut,
    locked: bool,
    lock_count: usize,
}

impl Framebuffer {
    /// A zeroed framebuffer with tightly packed rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if `format` cannot be packed.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        Self::with_stride(width, height, width * format.bytes_per_pixel(), format)
    }

    /// A zeroed framebuffer whose rows are `stride` bytes apart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if `format` cannot be packed and
    /// [`Error::BufferSize`] if `stride` is shorter than one row of pixels.
    pub fn with_stride(
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        format.validate()?;
        let row_bytes = width * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(Error::BufferSize {
                got: stride,
                expected: row_bytes,
                width,
                height,
                stride,
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data: BytesMut::zeroed(stride * height),
            locked: false,
            lock_count: 0,
        })
    }

    /// Changes the geometry, discarding the current content.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.stride = width * self.format.bytes_per_pixel();
        self.data = BytesMut::zeroed(self.stride * height);
    }

    /// Raw bytes, including any row padding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of times the framebuffer has been locked.
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.lock_count
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Colour of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the framebuffer.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let bpp = self.format.bytes_per_pixel();
        let o = y * self.stride + x * bpp;
        self.format.unpack(self.format.read_pixel(&self.data[o..o + bpp]))
    }

    /// The content as tightly packed 8-bit RGB.
    #[must_use]
    pub fn to_rgb24(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.pixel(x, y);
                out.extend_from_slice(&[c.r, c.g, c.b]);
            }
        }
        out
    }

    /// Encodes the content as an 8-bit RGB PNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Png`] if encoding or writing fails.
    #[allow(clippy::cast_possible_truncation)] // PNG dimensions are u32
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_rgb24())?;
        writer.finish()?;
        Ok(())
    }

    /// Writes the content to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be created or flushed and
    /// [`Error::Png`] if encoding fails.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_png(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

impl Surface for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn lock(&mut self) -> Result<()> {
        self.locked = true;
        self.lock_count += 1;
        Ok(())
    }

    fn unlock(&mut self) {
        self.locked = false;
    }
}
