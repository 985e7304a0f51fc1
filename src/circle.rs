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


//! Integer midpoint circle rasterizer.

use crate::pixel::Rgb;
use crate::raster::Rect;
use crate::surface::Canvas;

/// Octant points of a circle of `radius` around the origin.
///
/// Yields `(x, y)` with `0 <= x` starting at `(0, radius)` and stepping
/// `x` until it passes `y`. The decision term starts at
/// `floor((5 - 4r) / 4)`, i.e. `1 - r`, which keeps every point within half
/// a pixel of the true circle.
#[derive(Debug, Clone)]
pub struct MidpointCircle {
    x: i32,
    y: i32,
    p: i32,
    done: bool,
}

impl MidpointCircle {
    #[must_use]
    pub fn new(radius: i32) -> Self {
        let radius = radius.max(0);
        Self {
            x: 0,
            y: radius,
            // rounds toward -inf; truncating puts (2, 4) at 4.47 for r = 5
            p: (5 - 4 * radius).div_euclid(4),
            done: false,
        }
    }
}

impl Iterator for MidpointCircle {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = (self.x, self.y);
        if self.x < self.y {
            self.x += 1;
            if self.p < 0 {
                self.p += 2 * self.x + 1;
            } else {
                self.y -= 1;
                self.p += 2 * (self.x - self.y) + 1;
            }
        } else {
            self.done = true;
        }
        Some(point)
    }
}

/// The symmetric images of one octant point, without duplicates on the
/// axes or the diagonal.
fn symmetric_points(x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> {
    let mut pts = Vec::with_capacity(8);
    if x == 0 {
        pts.extend([(0, y), (0, -y), (y, 0), (-y, 0)]);
    } else {
        pts.extend([(x, y), (-x, y), (x, -y), (-x, -y)]);
        if x < y {
            pts.extend([(y, x), (-y, x), (y, -x), (-y, -x)]);
        }
    }
    pts.into_iter()
}

/// Every offset plotted for a full circle of `radius`, relative to the
/// centre.
pub fn circle_offsets(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    MidpointCircle::new(radius).flat_map(|(x, y)| symmetric_points(x, y))
}

/// Draws a ring of `radius` around `(cx, cy)`. Each plotted point becomes a
/// `thickness x thickness` square with its top-left corner on the point.
pub fn draw_circle_outline(
    canvas: &mut Canvas<'_>,
    cx: i32,
    cy: i32,
    radius: i32,
    thickness: i32,
    color: Rgb,
) {
    let size = thickness.max(1);
    for (dx, dy) in circle_offsets(radius) {
        canvas.fill_rect(Rect::new(cx + dx, cy + dy, size, size), color);
    }
}
