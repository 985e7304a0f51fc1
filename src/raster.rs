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


//! Rectangle primitives: solid fills, 1-pixel checkerboards, periodic
//! stripes, linear gradients and bitmap blits.
//!
//! Every primitive clips to the canvas and treats rectangles with a
//! non-positive width or height as empty.

use crate::pixel::Rgb;
use crate::surface::Canvas;
use crate::text::TextBitmap;

/// Finest gradient resolution along the major axis.
const GRADIENT_MAX_STEPS: i32 = 256;

/// An axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// The same rectangle with negative sizes clamped to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.x, self.y, self.w.max(0), self.h.max(0))
    }

    /// Overlap of two rectangles, `None` if they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }
}

/// Direction of the bands drawn by [`stripe_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal bands stacked top to bottom.
    Rows,
    /// Vertical bands laid out left to right.
    Columns,
}

/// Sets every on-canvas pixel of `rect` to `color`.
pub fn fill_rect(canvas: &mut Canvas<'_>, rect: Rect, color: Rgb) {
    canvas.fill_rect(rect, color);
}

/// Fills `rect` with a 1-pixel checkerboard: `a` where the offset from the
/// rectangle origin has an even coordinate sum, `b` where it is odd.
#[allow(clippy::cast_sign_loss)]
pub fn checker_raster(canvas: &mut Canvas<'_>, rect: Rect, a: Rgb, b: Rgb) {
    let Some(clip) = rect.intersect(&canvas.bounds()) else {
        return;
    };
    canvas.fill_rect(clip, a);
    for j in clip.y..clip.bottom() {
        // first odd-parity column of this row
        let parity = (clip.x - rect.x + j - rect.y) & 1;
        let first = clip.x + (1 - parity);
        for i in (first..clip.right()).step_by(2) {
            canvas.put_rgb(i as usize, j as usize, b);
        }
    }
}

/// Fills `rect` with `a`, then draws bands of `b` that are `period` pixels
/// thick, starting `period` pixels in from the leading edge and repeating
/// every `2 * period`. A non-positive period is treated as 1.
pub fn stripe_rect(
    canvas: &mut Canvas<'_>,
    orientation: Orientation,
    period: i32,
    rect: Rect,
    a: Rgb,
    b: Rgb,
) {
    if rect.is_empty() {
        return;
    }
    let period = period.max(1);
    canvas.fill_rect(rect, a);
    match orientation {
        Orientation::Rows => {
            let mut y = rect.y + period;
            while y < rect.bottom() {
                let h = period.min(rect.bottom() - y);
                canvas.fill_rect(Rect::new(rect.x, y, rect.w, h), b);
                y += 2 * period;
            }
        }
        Orientation::Columns => {
            let mut x = rect.x + period;
            while x < rect.right() {
                let w = period.min(rect.right() - x);
                canvas.fill_rect(Rect::new(x, rect.y, w, rect.h), b);
                x += 2 * period;
            }
        }
    }
}

/// Linearly interpolates from `start` to `end` along the longer side of
/// `rect` (rows when the rectangle is square or taller than wide).
///
/// The ramp is sampled every `max(1, major / 256)` pixels; the last pixel
/// along the major axis is always exactly `end`.
pub fn linear_gradient(canvas: &mut Canvas<'_>, rect: Rect, start: Rgb, end: Rgb) {
    if rect.is_empty() {
        return;
    }
    let horizontal = rect.w > rect.h;
    let major = if horizontal { rect.w } else { rect.h };
    let step = (major / GRADIENT_MAX_STEPS).max(1);
    let band = |offset: i32, len: i32| {
        if horizontal {
            Rect::new(rect.x + offset, rect.y, len, rect.h)
        } else {
            Rect::new(rect.x, rect.y + offset, rect.w, len)
        }
    };

    let mut i = 0;
    while i < major {
        let len = step.min(major - i);
        canvas.fill_rect(band(i, len), lerp(start, end, i, major - 1));
        i += step;
    }
    canvas.fill_rect(band(major - 1, 1), end);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp(start: Rgb, end: Rgb, i: i32, span: i32) -> Rgb {
    let span = span.max(1);
    let channel = |s: u8, e: u8| {
        let s = i32::from(s);
        (s + i * (i32::from(e) - s) / span) as u8
    };
    Rgb::new(
        channel(start.r, end.r),
        channel(start.g, end.g),
        channel(start.b, end.b),
    )
}

/// Copies the opaque pixels of `bitmap` with its top-left corner at
/// `(x, y)`, clipped to the canvas.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub fn blit(canvas: &mut Canvas<'_>, bitmap: &TextBitmap, x: i32, y: i32) {
    for (row, line) in bitmap.rows().enumerate() {
        let py = y + row as i32;
        for (col, px) in line.iter().enumerate() {
            let Some(c) = *px else { continue };
            let px_x = x + col as i32;
            if canvas.get(px_x, py).is_some() {
                canvas.put_rgb(px_x as usize, py as usize, c);
            }
        }
    }
}
