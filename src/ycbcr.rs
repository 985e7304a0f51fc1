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


//! Chroma subsampling simulation.
//!
//! The finished RGB image is converted to studio-range BT.709 YCbCr with
//! 16.16 fixed-point coefficients, the two chroma planes are box filtered to
//! the block size of the selected [`SubsamplingMode`], and the result is
//! converted back to RGB in place.
//!
//! # Fixed-point matrices
//!
//! ```text
//! Y  = (1081344 + 11966*r + 40254*g +  4064*b) >> 16
//! Cb = (8421376 -  6596*r - 22189*g + 28784*b) >> 16
//! Cr = (8421376 + 28784*r - 26145*g -  2639*b) >> 16
//!
//! y -= 16, cb -= 128, cr -= 128
//! R = (32768 + 76309*y              + 117489*cr) >> 16
//! G = (32768 + 76309*y -  13975*cb  -  34925*cr) >> 16
//! B = (32768 + 76309*y + 138438*cb             ) >> 16
//! ```
//!
//! The constant terms carry the `16 << 16` / `128 << 16` offsets plus the
//! `1 << 15` rounding bias. Results are bit exact; do not replace with
//! floating point.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::pixel::Rgb;
use crate::surface::Canvas;

const FORWARD: [[i32; 4]; 3] = [
    [16 * 65536 + 32768, 11966, 40254, 4064],
    [128 * 65536 + 32768, -6596, -22189, 28784],
    [128 * 65536 + 32768, 28784, -26145, -2639],
];

const INVERSE: [[i32; 4]; 3] = [
    [32768, 76309, 0, 117489],
    [32768, 76309, -13975, -34925],
    [32768, 76309, 138438, 0],
];

/// How the colour of the rendered image is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubsamplingMode {
    /// Full RGB; the image is left untouched.
    #[default]
    Rgb,
    /// YCbCr without chroma subsampling.
    YCbCr444,
    /// Chroma halved horizontally.
    YCbCr422Horizontal,
    /// Chroma halved vertically.
    YCbCr422Vertical,
    /// Chroma halved in both directions.
    YCbCr420,
}

impl SubsamplingMode {
    pub const ALL: [SubsamplingMode; 5] = [
        SubsamplingMode::Rgb,
        SubsamplingMode::YCbCr444,
        SubsamplingMode::YCbCr422Horizontal,
        SubsamplingMode::YCbCr422Vertical,
        SubsamplingMode::YCbCr420,
    ];

    /// Width and height of the chroma averaging window, `None` for RGB.
    #[must_use]
    pub fn block_size(self) -> Option<(usize, usize)> {
        match self {
            SubsamplingMode::Rgb => None,
            SubsamplingMode::YCbCr444 => Some((1, 1)),
            SubsamplingMode::YCbCr422Horizontal => Some((2, 1)),
            SubsamplingMode::YCbCr422Vertical => Some((1, 2)),
            SubsamplingMode::YCbCr420 => Some((2, 2)),
        }
    }

    /// Human readable name shown on the card.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SubsamplingMode::Rgb => "RGB",
            SubsamplingMode::YCbCr444 => "YCbCr 4:4:4",
            SubsamplingMode::YCbCr422Horizontal => "YCbCr 4:2:2",
            SubsamplingMode::YCbCr422Vertical => "YCbCr 4:2:2 vertical",
            SubsamplingMode::YCbCr420 => "YCbCr 4:2:0",
        }
    }

    /// Short tag used in file names and on the command line.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            SubsamplingMode::Rgb => "rgb",
            SubsamplingMode::YCbCr444 => "444",
            SubsamplingMode::YCbCr422Horizontal => "422",
            SubsamplingMode::YCbCr422Vertical => "422v",
            SubsamplingMode::YCbCr420 => "420",
        }
    }

    /// The following mode, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The preceding mode, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SubsamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubsamplingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown mode '{s}' (expected rgb, 444, 422, 422v or 420)"))
    }
}

/// How blocks that stick out past the right or bottom edge are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Only complete blocks are averaged; trailing partial rows and columns
    /// keep full chroma resolution.
    #[default]
    Truncate,
    /// Partial blocks are averaged over the samples they contain.
    Cover,
}

/// A studio-range luma/chroma sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YCbCr {
    pub y: u8,
    pub cb: u8,
    pub cr: u8,
}

#[inline]
fn dot(row: &[i32; 4], a: i32, b: i32, c: i32) -> i32 {
    (row[0] + row[1] * a + row[2] * b + row[3] * c) >> 16
}

/// Forward transform. Inputs in `0..=255` always land in `16..=235` for
/// luma and `16..=240` for chroma, so no clamping is applied.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb_to_ycbcr(c: Rgb) -> YCbCr {
    let (r, g, b) = (i32::from(c.r), i32::from(c.g), i32::from(c.b));
    YCbCr {
        y: dot(&FORWARD[0], r, g, b) as u8,
        cb: dot(&FORWARD[1], r, g, b) as u8,
        cr: dot(&FORWARD[2], r, g, b) as u8,
    }
}

/// Inverse transform, saturating each channel to `0..=255`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn map_ycbcr(s: YCbCr) -> Rgb {
    let y = i32::from(s.y) - 16;
    let cb = i32::from(s.cb) - 128;
    let cr = i32::from(s.cr) - 128;
    let channel = |row: &[i32; 4]| dot(row, y, cb, cr).clamp(0, 255) as u8;
    Rgb::new(channel(&INVERSE[0]), channel(&INVERSE[1]), channel(&INVERSE[2]))
}

/// A single-channel image used while simulating one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Plane {
    /// A zeroed plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if the buffer cannot be reserved.
    pub fn try_new(width: usize, height: usize, name: &'static str) -> Result<Self> {
        let bytes = width * height;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|source| Error::Allocation {
                plane: name,
                bytes,
                source,
            })?;
        data.resize(bytes, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps existing samples; `data.len()` must equal `width * height`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] on a length mismatch.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::BufferSize {
                got: data.len(),
                expected: width * height,
                width,
                height,
                stride: width,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }
}

/// Replaces every `bw x bh` block of `plane` with the floor of its mean.
///
/// A 1x1 block leaves the plane unchanged. Blocks cut off by the right or
/// bottom edge are handled according to `policy`.
#[allow(clippy::cast_possible_truncation)] // mean of u8 samples fits in u8
pub fn box_filter(plane: &mut Plane, bw: usize, bh: usize, policy: EdgePolicy) {
    let (bw, bh) = (bw.max(1), bh.max(1));
    if bw == 1 && bh == 1 {
        return;
    }
    let (w, h) = (plane.width, plane.height);
    let (x_end, y_end) = match policy {
        EdgePolicy::Truncate => (w - w % bw, h - h % bh),
        EdgePolicy::Cover => (w, h),
    };

    for by in (0..y_end).step_by(bh) {
        let rows = by..(by + bh).min(h);
        for bx in (0..x_end).step_by(bw) {
            let cols = bx..(bx + bw).min(w);
            let mut sum = 0u32;
            for y in rows.clone() {
                for x in cols.clone() {
                    sum += u32::from(plane.get(x, y));
                }
            }
            let count = (rows.len() * cols.len()) as u32;
            let mean = (sum / count) as u8;
            for y in rows.clone() {
                for x in cols.clone() {
                    plane.set(x, y, mean);
                }
            }
        }
    }
}

/// Luma and chroma planes of a canvas.
#[derive(Debug, Clone)]
pub struct Planes {
    pub y: Plane,
    pub cb: Plane,
    pub cr: Plane,
}

impl Planes {
    /// Forward-transforms every pixel of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if any plane cannot be allocated.
    pub fn from_canvas(canvas: &Canvas<'_>) -> Result<Self> {
        let (w, h) = (canvas.width(), canvas.height());
        let mut planes = Self {
            y: Plane::try_new(w, h, "Y")?,
            cb: Plane::try_new(w, h, "Cb")?,
            cr: Plane::try_new(w, h, "Cr")?,
        };
        for py in 0..h {
            for px in 0..w {
                let s = rgb_to_ycbcr(canvas.rgb_at(px, py));
                planes.y.set(px, py, s.y);
                planes.cb.set(px, py, s.cb);
                planes.cr.set(px, py, s.cr);
            }
        }
        Ok(planes)
    }

    /// Box-filters both chroma planes.
    pub fn subsample(&mut self, bw: usize, bh: usize, policy: EdgePolicy) {
        box_filter(&mut self.cb, bw, bh, policy);
        box_filter(&mut self.cr, bw, bh, policy);
    }

    /// Inverse-transforms the planes back into `canvas`.
    pub fn write_to(&self, canvas: &mut Canvas<'_>) {
        let w = self.y.width().min(canvas.width());
        let h = self.y.height().min(canvas.height());
        for py in 0..h {
            for px in 0..w {
                let s = YCbCr {
                    y: self.y.get(px, py),
                    cb: self.cb.get(px, py),
                    cr: self.cr.get(px, py),
                };
                canvas.put_rgb(px, py, map_ycbcr(s));
            }
        }
    }
}

/// Replaces the content of `canvas` with what it would look like after
/// transmission in `mode`. [`SubsamplingMode::Rgb`] leaves it untouched.
///
/// # Errors
///
/// Returns [`Error::Allocation`] if the intermediate planes cannot be
/// allocated; the canvas is not modified in that case.
pub fn simulate(canvas: &mut Canvas<'_>, mode: SubsamplingMode, policy: EdgePolicy) -> Result<()> {
    let Some((bw, bh)) = mode.block_size() else {
        return Ok(());
    };
    let mut planes = Planes::from_canvas(canvas)?;
    planes.subsample(bw, bh, policy);
    planes.write_to(canvas);

    #[cfg(feature = "debug-logging")]
    log::info!(
        "DEBUG: simulated {} on {}x{} ({}x{} chroma blocks)",
        mode,
        canvas.width(),
        canvas.height(),
        bw,
        bh
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(w: usize, h: usize, f: impl Fn(usize, usize) -> u8) -> Plane {
        let data = (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).map(|(x, y)| f(x, y));
        Plane::from_vec(w, h, data.collect()).unwrap()
    }

    #[test]
    fn test_reference_values() {
        assert_eq!(rgb_to_ycbcr(Rgb::BLACK), YCbCr { y: 16, cb: 128, cr: 128 });
        assert_eq!(rgb_to_ycbcr(Rgb::WHITE), YCbCr { y: 235, cb: 128, cr: 128 });
        assert_eq!(map_ycbcr(YCbCr { y: 16, cb: 128, cr: 128 }), Rgb::BLACK);
        assert_eq!(map_ycbcr(YCbCr { y: 235, cb: 128, cr: 128 }), Rgb::WHITE);
    }

    #[test]
    fn test_forward_range_for_all_inputs() {
        for r in (0..=255u8).step_by(5) {
            for g in 0..=255u8 {
                for b in (0..=255u8).step_by(3) {
                    let s = rgb_to_ycbcr(Rgb::new(r, g, b));
                    assert!((16..=235).contains(&s.y));
                    assert!((16..=240).contains(&s.cb));
                    assert!((16..=240).contains(&s.cr));
                }
            }
        }
    }

    #[test]
    fn test_studio_range_roundtrip_within_two() {
        for r in 16..=235u8 {
            for g in 16..=235u8 {
                for b in 16..=235u8 {
                    let c = Rgb::new(r, g, b);
                    let back = map_ycbcr(rgb_to_ycbcr(c));
                    assert!(
                        back.r.abs_diff(r) <= 2 && back.g.abs_diff(g) <= 2 && back.b.abs_diff(b) <= 2,
                        "{c:?} -> {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_inverse_saturates() {
        let c = map_ycbcr(YCbCr { y: 235, cb: 16, cr: 240 });
        assert_eq!(c.r, 255);
        let c = map_ycbcr(YCbCr { y: 16, cb: 16, cr: 128 });
        assert_eq!(c.b, 0);
        let c = map_ycbcr(YCbCr { y: 0, cb: 255, cr: 0 });
        assert_eq!(c.r, 0);
        assert_eq!(c.b, 250);
    }

    #[test]
    fn test_box_filter_1x1_is_identity() {
        let original = plane(7, 5, |x, y| (x * 31 + y * 17) as u8);
        let mut p = original.clone();
        box_filter(&mut p, 1, 1, EdgePolicy::Truncate);
        assert_eq!(p, original);
        box_filter(&mut p, 1, 1, EdgePolicy::Cover);
        assert_eq!(p, original);
    }

    #[test]
    fn test_box_filter_2x2_floors_mean() {
        let mut p = Plane::from_vec(2, 2, vec![10, 11, 12, 14]).unwrap();
        box_filter(&mut p, 2, 2, EdgePolicy::Truncate);
        assert_eq!(p.as_slice(), &[11, 11, 11, 11]);
    }

    #[test]
    fn test_box_filter_truncate_leaves_partial_edges() {
        let original = plane(5, 3, |x, y| (x * 40 + y * 7) as u8);
        let mut p = original.clone();
        box_filter(&mut p, 2, 2, EdgePolicy::Truncate);
        // last column and last row are outside any complete block
        for y in 0..3 {
            assert_eq!(p.get(4, y), original.get(4, y));
        }
        for x in 0..5 {
            assert_eq!(p.get(x, 2), original.get(x, 2));
        }
        assert_eq!(p.get(0, 0), p.get(1, 1));
    }

    #[test]
    fn test_box_filter_cover_averages_partial_edges() {
        let mut p = plane(3, 3, |x, y| (x * 10 + y * 100) as u8);
        box_filter(&mut p, 2, 2, EdgePolicy::Cover);
        // right column pairs (20, 120) and corner (220) alone
        assert_eq!(p.get(2, 0), 70);
        assert_eq!(p.get(2, 1), 70);
        assert_eq!(p.get(2, 2), 220);
        // bottom row pairs (200, 210)
        assert_eq!(p.get(0, 2), 205);
    }

    #[test]
    fn test_box_filter_horizontal_only() {
        let mut p = plane(4, 2, |x, y| (x * 10 + y) as u8);
        box_filter(&mut p, 2, 1, EdgePolicy::Truncate);
        assert_eq!(p.as_slice(), &[5, 5, 25, 25, 6, 6, 26, 26]);
    }

    #[test]
    fn test_mode_cycle_and_parse() {
        let mut m = SubsamplingMode::Rgb;
        for _ in 0..SubsamplingMode::ALL.len() {
            m = m.next();
        }
        assert_eq!(m, SubsamplingMode::Rgb);
        assert_eq!(SubsamplingMode::Rgb.prev(), SubsamplingMode::YCbCr420);
        assert_eq!("420".parse::<SubsamplingMode>(), Ok(SubsamplingMode::YCbCr420));
        assert_eq!("RGB".parse::<SubsamplingMode>(), Ok(SubsamplingMode::Rgb));
        assert!("411".parse::<SubsamplingMode>().is_err());
        assert_eq!(SubsamplingMode::Rgb.block_size(), None);
        assert_eq!(SubsamplingMode::YCbCr422Vertical.block_size(), Some((1, 2)));
    }
}
