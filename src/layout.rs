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


//! Resolution-independent placement of the pattern blocks.
//!
//! Everything here is a pure function of the surface size and the band
//! variant. A [`Layout`] is computed at the start of every render pass and
//! thrown away at its end.

use crate::config::Variant;
use crate::raster::Rect;

/// What a layout block contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Raster bars and corner brackets along the image edge.
    Border,
    ColorBoxes,
    GammaRamp,
    /// `W×H` readout and mode name.
    Resolution,
    /// Single-pixel colour detail that exposes chroma subsampling.
    SubsamplingPreview,
    ColorGradients,
    LineBars,
    /// Shaded alignment ring.
    Circle,
    Copyright,
    /// 5% and 10% corner markers.
    Overscan,
}

/// A block and the area it may draw into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBlock {
    pub kind: BlockKind,
    pub rect: Rect,
}

/// Geometry of the alignment ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleGeometry {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
}

/// Overscan marker insets, each rounded to the nearest pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverscanInsets {
    pub w5: i32,
    pub w10: i32,
    pub h5: i32,
    pub h10: i32,
}

/// Block geometry for one surface size, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    /// Border unit `s`; the raster bars are `2s` thick.
    pub unit: i32,
    /// Distance from the image edge to the pattern bands (`3s`).
    pub margin: i32,
    /// Vertical gap between consecutive bands.
    pub gap: i32,
    pub blocks: Vec<LayoutBlock>,
}

impl Layout {
    /// Lays out a `width x height` card.
    #[must_use]
    pub fn compute(width: i32, height: i32, variant: Variant) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let unit = width.min(height) / 45;
        let margin = 3 * unit;
        let gap = height / 70;
        let inner = Rect::new(margin, margin, width - 2 * margin, height - 2 * margin).clamped();

        let full = Rect::new(0, 0, width, height);
        let mut blocks = vec![LayoutBlock {
            kind: BlockKind::Border,
            rect: full,
        }];

        let bands = variant.bands();
        let n = i32::try_from(bands.len()).unwrap_or(i32::MAX).max(1);
        let band_h = ((inner.h - (n - 1) * gap) / n).max(0);
        let mut y = inner.y;
        for &kind in bands {
            blocks.push(LayoutBlock {
                kind,
                rect: Rect::new(inner.x, y, inner.w, band_h),
            });
            y += band_h + gap;
        }

        let circle = circle_geometry(width, height);
        blocks.push(LayoutBlock {
            kind: BlockKind::Circle,
            rect: Rect::new(
                circle.cx - circle.radius,
                circle.cy - circle.radius,
                2 * circle.radius + 1,
                2 * circle.radius + 1,
            ),
        });
        blocks.push(LayoutBlock {
            kind: BlockKind::Copyright,
            rect: Rect::new(0, height - margin, width, margin).clamped(),
        });
        blocks.push(LayoutBlock {
            kind: BlockKind::Overscan,
            rect: full,
        });

        #[cfg(feature = "debug-logging")]
        for b in &blocks {
            log::info!("DEBUG: layout {}x{}: {:?} at {:?}", width, height, b.kind, b.rect);
        }

        Self {
            width,
            height,
            unit,
            margin,
            gap,
            blocks,
        }
    }

    /// The first block of `kind`, if the variant has one.
    #[must_use]
    pub fn block(&self, kind: BlockKind) -> Option<&LayoutBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    #[must_use]
    pub fn circle(&self) -> CircleGeometry {
        circle_geometry(self.width, self.height)
    }

    #[must_use]
    pub fn overscan(&self) -> OverscanInsets {
        OverscanInsets {
            w5: (self.width + 10) / 20,
            w10: (self.width + 5) / 10,
            h5: (self.height + 10) / 20,
            h10: (self.height + 5) / 10,
        }
    }
}

fn circle_geometry(width: i32, height: i32) -> CircleGeometry {
    CircleGeometry {
        cx: width / 2 - 1,
        cy: height / 2 - 1,
        radius: 2 * width.min(height) / 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_800x600() {
        let layout = Layout::compute(800, 600, Variant::Classic);
        assert_eq!(layout.unit, 13);
        assert_eq!(layout.margin, 39);
        assert_eq!(layout.gap, 8);
        let kinds: Vec<_> = layout.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            [
                BlockKind::Border,
                BlockKind::ColorBoxes,
                BlockKind::GammaRamp,
                BlockKind::Resolution,
                BlockKind::ColorGradients,
                BlockKind::LineBars,
                BlockKind::Circle,
                BlockKind::Copyright,
                BlockKind::Overscan,
            ]
        );
        let boxes = layout.block(BlockKind::ColorBoxes).unwrap().rect;
        let gamma = layout.block(BlockKind::GammaRamp).unwrap().rect;
        assert_eq!(boxes, Rect::new(39, 39, 722, 98));
        assert_eq!(gamma.y, boxes.bottom() + layout.gap);
        let bars = layout.block(BlockKind::LineBars).unwrap().rect;
        assert!(bars.bottom() <= 600 - 39);
    }

    #[test]
    fn test_circle_geometry() {
        let c = Layout::compute(800, 600, Variant::Classic).circle();
        assert_eq!(c, CircleGeometry { cx: 399, cy: 299, radius: 240 });
        let c = Layout::compute(600, 800, Variant::Classic).circle();
        assert_eq!(c.radius, 240);
    }

    #[test]
    fn test_overscan_insets_are_independent() {
        let o = Layout::compute(1920, 1080, Variant::Classic).overscan();
        assert_eq!(o, OverscanInsets { w5: 96, w10: 192, h5: 54, h10: 108 });
    }

    #[test]
    fn test_chroma_variant_has_preview_band() {
        let layout = Layout::compute(1280, 720, Variant::Chroma);
        let preview = layout.block(BlockKind::SubsamplingPreview).unwrap().rect;
        let res = layout.block(BlockKind::Resolution).unwrap().rect;
        assert_eq!(preview.y, res.bottom() + layout.gap);
        assert_eq!(preview.h, res.h);
    }

    #[test]
    fn test_degenerate_sizes_have_no_negative_rects() {
        for (w, h) in [(0, 0), (1, 1), (10, 3), (3, 200), (64, 64)] {
            for variant in [Variant::Classic, Variant::Chroma] {
                let layout = Layout::compute(w, h, variant);
                for b in &layout.blocks {
                    assert!(b.rect.w >= 0 && b.rect.h >= 0, "{w}x{h} {:?}", b);
                }
            }
        }
    }

    #[test]
    fn test_layout_scales_with_size() {
        let small = Layout::compute(640, 480, Variant::Classic);
        let large = Layout::compute(1280, 960, Variant::Classic);
        let s = small.block(BlockKind::GammaRamp).unwrap().rect;
        let l = large.block(BlockKind::GammaRamp).unwrap().rect;
        assert!((2 * s.h - l.h).abs() <= 2);
        assert!((2 * s.w - l.w).abs() <= 8);
    }
}
