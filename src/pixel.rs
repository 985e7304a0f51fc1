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


//! Colour triples and true-colour pixel packing.
//!
//! All colour math in this crate works on [`Rgb`] triples. A [`PixelFormat`]
//! describes how a triple is packed into the bytes of a surface: channel
//! maxima and shifts inside a pixel value, bits per pixel and byte order.
//! Packing only happens at the point of writing a pixel.

use crate::error::{Error, Result};

/// An 8-bit per channel colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A neutral gray with all channels set to `v`.
    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Layout of a true-colour pixel.
///
/// A pixel value is `(r' << red_shift) | (g' << green_shift) | (b' << blue_shift)`
/// where each channel is rescaled from `0..=255` to `0..=max`. The value is
/// stored in `bits_per_pixel / 8` bytes in the given byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub depth: u8,
    pub big_endian_flag: u8,
    pub red_max: u16,
    pub green_max: u16,
    pub blue_max: u16,
    pub red_shift: u8,
    pub green_shift: u8,
    pub blue_shift: u8,
}

impl PixelFormat {
    /// 32 bits, R in the lowest byte (`0x00BBGGRR`), little endian.
    #[must_use]
    pub const fn rgba32() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian_flag: 0,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
        }
    }

    /// 32 bits, `0x00RRGGBB`, little endian (B first in memory).
    #[must_use]
    pub const fn bgra32() -> Self {
        Self {
            red_shift: 16,
            blue_shift: 0,
            ..Self::rgba32()
        }
    }

    /// 24 bits packed, R first in memory.
    #[must_use]
    pub const fn rgb24() -> Self {
        Self {
            bits_per_pixel: 24,
            ..Self::rgba32()
        }
    }

    /// 16 bits, 5-6-5.
    #[must_use]
    pub const fn rgb565() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 16,
            big_endian_flag: 0,
            red_max: 31,
            green_max: 63,
            blue_max: 31,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// 8 bits, 3-3-2.
    #[must_use]
    pub const fn rgb332() -> Self {
        Self {
            bits_per_pixel: 8,
            depth: 8,
            big_endian_flag: 0,
            red_max: 7,
            green_max: 7,
            blue_max: 3,
            red_shift: 5,
            green_shift: 2,
            blue_shift: 0,
        }
    }

    /// Same layout with the byte order flipped.
    #[must_use]
    pub const fn big_endian(self) -> Self {
        Self {
            big_endian_flag: 1,
            ..self
        }
    }

    /// Number of bytes one pixel occupies in memory.
    #[inline]
    #[must_use]
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }

    /// Checks that the format can be packed and unpacked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for bit depths other than
    /// 8/16/24/32, zero channel maxima, or channels that do not fit in the
    /// pixel value.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(Error::UnsupportedFormat(format!(
                "{} bits per pixel",
                self.bits_per_pixel
            )));
        }
        let bits = u32::from(self.bits_per_pixel);
        for (name, max, shift) in [
            ("red", self.red_max, self.red_shift),
            ("green", self.green_max, self.green_shift),
            ("blue", self.blue_max, self.blue_shift),
        ] {
            if max == 0 {
                return Err(Error::UnsupportedFormat(format!("{name} max is zero")));
            }
            if u32::from(shift) >= bits || u64::from(max) << shift >= 1u64 << bits {
                return Err(Error::UnsupportedFormat(format!(
                    "{name} channel (max {max}, shift {shift}) exceeds {bits} bits"
                )));
            }
        }
        Ok(())
    }

    /// Packs a colour into a pixel value.
    #[inline]
    #[must_use]
    pub fn pack(&self, c: Rgb) -> u32 {
        scale_down(c.r, self.red_max) << self.red_shift
            | scale_down(c.g, self.green_max) << self.green_shift
            | scale_down(c.b, self.blue_max) << self.blue_shift
    }

    /// Recovers the colour of a pixel value.
    ///
    /// Exact for 8-bit channels; narrower channels are expanded so that
    /// `0` maps to `0` and `max` maps to `255`.
    #[inline]
    #[must_use]
    pub fn unpack(&self, pixel: u32) -> Rgb {
        Rgb::new(
            scale_up(pixel >> self.red_shift, self.red_max),
            scale_up(pixel >> self.green_shift, self.green_max),
            scale_up(pixel >> self.blue_shift, self.blue_max),
        )
    }

    /// Reads one pixel value from the first `bytes_per_pixel` bytes of `data`.
    #[inline]
    #[must_use]
    pub fn read_pixel(&self, data: &[u8]) -> u32 {
        let big_endian = self.big_endian_flag != 0;
        match self.bytes_per_pixel() {
            1 => u32::from(data[0]),
            2 => {
                if big_endian {
                    u32::from(u16::from_be_bytes([data[0], data[1]]))
                } else {
                    u32::from(u16::from_le_bytes([data[0], data[1]]))
                }
            }
            3 => {
                if big_endian {
                    u32::from(data[0]) << 16 | u32::from(data[1]) << 8 | u32::from(data[2])
                } else {
                    u32::from(data[0]) | u32::from(data[1]) << 8 | u32::from(data[2]) << 16
                }
            }
            _ => {
                if big_endian {
                    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
                } else {
                    u32::from_le_bytes([data[0], data[1], data[2], data[3]])
                }
            }
        }
    }

    /// Writes one pixel value into the first `bytes_per_pixel` bytes of `out`.
    #[inline]
    #[allow(clippy::cast_possible_truncation)] // pixel values are masked to the format width
    pub fn write_pixel(&self, out: &mut [u8], pixel: u32) {
        let bytes = if self.big_endian_flag != 0 {
            pixel.to_be_bytes()
        } else {
            pixel.to_le_bytes()
        };
        match self.bytes_per_pixel() {
            1 => out[0] = pixel as u8,
            2 => {
                let v = pixel as u16;
                let b = if self.big_endian_flag != 0 {
                    v.to_be_bytes()
                } else {
                    v.to_le_bytes()
                };
                out[..2].copy_from_slice(&b);
            }
            3 => {
                if self.big_endian_flag != 0 {
                    out[..3].copy_from_slice(&bytes[1..4]);
                } else {
                    out[..3].copy_from_slice(&bytes[..3]);
                }
            }
            _ => out[..4].copy_from_slice(&bytes),
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::bgra32()
    }
}

#[inline]
fn scale_down(v: u8, max: u16) -> u32 {
    if max == 255 {
        u32::from(v)
    } else {
        (u32::from(v) * u32::from(max) + 127) / 255
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)] // result is at most 255
fn scale_up(v: u32, max: u16) -> u8 {
    let max = u32::from(max);
    let v = v & max;
    if max == 255 {
        v as u8
    } else {
        ((v * 255 + max / 2) / max) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_exact_for_8bit_channels() {
        for pf in [PixelFormat::rgba32(), PixelFormat::bgra32(), PixelFormat::rgb24()] {
            for c in [Rgb::new(1, 2, 3), Rgb::WHITE, Rgb::BLACK, Rgb::new(250, 0, 128)] {
                assert_eq!(pf.unpack(pf.pack(c)), c, "{pf:?}");
            }
        }
    }

    #[test]
    fn test_bgra32_layout() {
        let pf = PixelFormat::bgra32();
        assert_eq!(pf.pack(Rgb::new(0x12, 0x34, 0x56)), 0x0012_3456);
        let mut out = [0u8; 4];
        pf.write_pixel(&mut out, 0x0012_3456);
        assert_eq!(out, [0x56, 0x34, 0x12, 0x00]);
    }

    #[test]
    fn test_rgb565_extremes() {
        let pf = PixelFormat::rgb565();
        assert_eq!(pf.pack(Rgb::WHITE), 0xFFFF);
        assert_eq!(pf.pack(Rgb::new(255, 0, 0)), 0xF800);
        assert_eq!(pf.unpack(0xFFFF), Rgb::WHITE);
        assert_eq!(pf.unpack(0), Rgb::BLACK);
    }

    #[test]
    fn test_big_endian_24bit_roundtrip() {
        let pf = PixelFormat::rgb24().big_endian();
        let mut out = [0u8; 3];
        pf.write_pixel(&mut out, 0x00AB_CDEF);
        assert_eq!(out, [0xAB, 0xCD, 0xEF]);
        assert_eq!(pf.read_pixel(&out), 0x00AB_CDEF);
    }

    #[test]
    fn test_validate_rejects_bad_formats() {
        let mut pf = PixelFormat::rgba32();
        pf.bits_per_pixel = 12;
        assert!(pf.validate().is_err());

        let mut pf = PixelFormat::rgb565();
        pf.red_shift = 12;
        assert!(pf.validate().is_err());

        for shift in [32, 64, 70, 255] {
            let mut pf = PixelFormat::bgra32();
            pf.blue_shift = shift;
            assert!(matches!(pf.validate(), Err(Error::UnsupportedFormat(_))));
        }

        assert!(PixelFormat::rgb332().validate().is_ok());
    }
}
