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


//! The test card composer.
//!
//! A render pass locks the surface once, lays the card out for the current
//! size, clears it, draws every block in layout order and finally, for any
//! mode other than RGB, runs the chroma subsampling simulation over the
//! finished image.

use crate::circle::draw_circle_outline;
use crate::config::CardConfig;
use crate::error::Result;
use crate::layout::{BlockKind, Layout};
use crate::pixel::Rgb;
use crate::raster::{blit, checker_raster, fill_rect, linear_gradient, stripe_rect, Orientation, Rect};
use crate::surface::{Canvas, Surface, SurfaceLock};
use crate::text::{MonoTextProvider, TextBitmap, TextProvider, TextStyle};
use crate::ycbcr::{simulate, SubsamplingMode};

const BLACK: Rgb = Rgb::BLACK;
const WHITE: Rgb = Rgb::WHITE;
const GREEN: Rgb = Rgb::new(0, 255, 0);
const YELLOW: Rgb = Rgb::new(255, 255, 0);
const RING_GRAY: Rgb = Rgb::gray(180);

const COLOR_BOXES: [Rgb; 8] = [
    Rgb::new(250, 250, 250), // white
    Rgb::new(255, 255, 0),   // yellow
    Rgb::new(0, 255, 255),   // cyan
    Rgb::new(0, 255, 0),     // green
    Rgb::new(255, 0, 255),   // magenta
    Rgb::new(255, 0, 0),     // red
    Rgb::new(0, 0, 255),     // blue
    Rgb::new(0, 0, 0),       // black
];

const GRADIENT_STARTS: [Rgb; 4] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 255),
];

const GAMMA_STEPS: i32 = 13;

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Columns(i32),
    Rows(i32),
    Checker,
}

const PREVIEW_CELLS: [(Pattern, Rgb, Rgb); 8] = [
    (Pattern::Columns(1), Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)),
    (Pattern::Rows(1), Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)),
    (Pattern::Checker, Rgb::new(255, 0, 255), Rgb::new(0, 255, 0)),
    (Pattern::Columns(2), Rgb::new(255, 0, 0), Rgb::new(0, 255, 255)),
    (Pattern::Rows(2), Rgb::new(255, 255, 0), Rgb::new(0, 0, 255)),
    (Pattern::Checker, Rgb::new(255, 255, 255), Rgb::new(255, 0, 0)),
    (Pattern::Columns(1), Rgb::new(0, 0, 255), Rgb::new(255, 255, 0)),
    (Pattern::Rows(1), Rgb::new(255, 0, 255), Rgb::new(0, 0, 0)),
];

/// Renders the card with the default configuration and the built-in bitmap
/// fonts.
///
/// # Errors
///
/// See [`render_with`].
pub fn render<S: Surface + ?Sized>(surface: &mut S, mode: SubsamplingMode) -> Result<()> {
    render_with(surface, mode, &CardConfig::default(), &mut MonoTextProvider)
}

/// Renders one full card onto `surface`, simulating `mode`.
///
/// The surface is locked for the whole pass. Rendering the same surface
/// size with the same arguments always produces the same pixels.
///
/// # Errors
///
/// Fails if the surface cannot be locked or described as a canvas, or if
/// the subsampling planes cannot be allocated. Labels the text provider
/// cannot render are skipped.
pub fn render_with<S, T>(
    surface: &mut S,
    mode: SubsamplingMode,
    config: &CardConfig,
    text: &mut T,
) -> Result<()>
where
    S: Surface + ?Sized,
    T: TextProvider + ?Sized,
{
    let mut lock = SurfaceLock::new(surface)?;
    let mut canvas = lock.canvas()?;
    render_canvas(&mut canvas, mode, config, text)
}

/// Renders onto an already locked canvas.
///
/// # Errors
///
/// Returns an error if the subsampling planes cannot be allocated.
pub fn render_canvas<T: TextProvider + ?Sized>(
    canvas: &mut Canvas<'_>,
    mode: SubsamplingMode,
    config: &CardConfig,
    text: &mut T,
) -> Result<()> {
    let width = to_i32(canvas.width());
    let height = to_i32(canvas.height());
    let layout = Layout::compute(width, height, config.variant);

    canvas.clear(config.background);
    let mut painter = Painter {
        canvas: &mut *canvas,
        text,
        config,
    };
    for block in &layout.blocks {
        let r = block.rect;
        match block.kind {
            BlockKind::Border => painter.borders(layout.unit),
            BlockKind::ColorBoxes => painter.color_boxes(r),
            BlockKind::GammaRamp => painter.gamma_ramp(r),
            BlockKind::Resolution => painter.resolution(r, mode),
            BlockKind::SubsamplingPreview => painter.subsampling_preview(r),
            BlockKind::ColorGradients => painter.color_gradients(r),
            BlockKind::LineBars => painter.line_bars(r),
            BlockKind::Circle => painter.alignment_circle(&layout),
            BlockKind::Copyright => painter.copyright(),
            BlockKind::Overscan => painter.overscan(&layout),
        }
    }

    simulate(canvas, mode, config.edge_policy)?;
    log::debug!(
        "rendered {}x{} card, {} blocks, mode {}",
        width,
        height,
        layout.blocks.len(),
        mode
    );
    Ok(())
}

fn to_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

struct Painter<'c, 'a, T: ?Sized> {
    canvas: &'c mut Canvas<'a>,
    text: &'c mut T,
    config: &'c CardConfig,
}

impl<T: TextProvider + ?Sized> Painter<'_, '_, T> {
    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        fill_rect(self.canvas, Rect::new(x, y, w, h).clamped(), c);
    }

    fn label(&mut self, s: &str, style: TextStyle) -> Option<TextBitmap> {
        if style.size == 0 {
            return None;
        }
        let bitmap = self.text.render(s, &style);
        if bitmap.is_none() {
            log::warn!("could not render label {s:?} at size {}; omitting it", style.size);
        }
        bitmap
    }

    fn blit(&mut self, bitmap: &TextBitmap, x: i32, y: i32) {
        blit(self.canvas, bitmap, x, y);
    }

    fn width(&self) -> i32 {
        to_i32(self.canvas.width())
    }

    fn height(&self) -> i32 {
        to_i32(self.canvas.height())
    }

    /// Checkerboard bars along each edge and stepped corner brackets.
    fn borders(&mut self, s: i32) {
        let (w, h) = (self.width(), self.height());
        let c = &mut *self.canvas;

        checker_raster(c, Rect::new(3 * s + 1, 0, w - 6 * s - 2, 2 * s).clamped(), WHITE, BLACK);
        checker_raster(c, Rect::new(3 * s + 1, h - 2 * s, w - 6 * s - 2, 2 * s).clamped(), WHITE, BLACK);
        checker_raster(c, Rect::new(0, 3 * s + 1, 2 * s, h - 6 * s - 2).clamped(), WHITE, BLACK);
        checker_raster(c, Rect::new(w - 2 * s, 3 * s + 1, 2 * s, h - 6 * s - 2).clamped(), WHITE, BLACK);

        // top-left
        self.fill(0, 0, 3 * s + 1, 3 * s + 1, BLACK);
        self.fill(1, 0, 3 * s - 1, 1, WHITE);
        self.fill(s, 1, 2 * s, 1, WHITE);
        self.fill(2 * s, 2, s, 1, WHITE);
        self.fill(0, 1, 1, 3 * s - 1, WHITE);
        self.fill(1, s, 1, 2 * s, WHITE);
        self.fill(2, 2 * s, 1, s, WHITE);

        // bottom-left
        self.fill(0, h - 3 * s - 1, 3 * s + 1, 3 * s + 1, BLACK);
        self.fill(1, h - 1, 3 * s - 1, 1, WHITE);
        self.fill(s, h - 2, 2 * s, 1, WHITE);
        self.fill(2 * s, h - 3, s, 1, WHITE);
        self.fill(0, h - 3 * s, 1, 3 * s - 1, WHITE);
        self.fill(1, h - 3 * s, 1, 2 * s, WHITE);
        self.fill(2, h - 3 * s, 1, s, WHITE);

        // top-right
        self.fill(w - 3 * s - 1, 0, 3 * s + 1, 3 * s + 1, BLACK);
        self.fill(w - 3 * s, 0, 3 * s - 1, 1, WHITE);
        self.fill(w - 3 * s, 1, 2 * s, 1, WHITE);
        self.fill(w - 3 * s, 2, s, 1, WHITE);
        self.fill(w - 1, 1, 1, 3 * s - 1, WHITE);
        self.fill(w - 2, s, 1, 2 * s, WHITE);
        self.fill(w - 3, 2 * s, 1, s, WHITE);

        // bottom-right
        self.fill(w - 3 * s - 1, h - 3 * s - 1, 3 * s + 1, 3 * s + 1, BLACK);
        self.fill(w - 3 * s, h - 1, 3 * s - 1, 1, WHITE);
        self.fill(w - 3 * s, h - 2, 2 * s, 1, WHITE);
        self.fill(w - 3 * s, h - 3, s, 1, WHITE);
        self.fill(w - 1, h - 3 * s, 1, 3 * s - 1, WHITE);
        self.fill(w - 2, h - 3 * s, 1, 2 * s, WHITE);
        self.fill(w - 3, h - 3 * s, 1, s, WHITE);
    }

    fn color_boxes(&mut self, r: Rect) {
        let s = r.w / 8;
        let mut x = r.x + (r.w - 8 * s) / 2;
        for c in COLOR_BOXES {
            self.fill(x, r.y, s, r.h, c);
            x += s;
        }
    }

    /// Line / checker / line reference cells between gray patches whose
    /// shade matches the 50% checkerboard at gamma 1.0 to 2.2.
    fn gamma_ramp(&mut self, r: Rect) {
        let s = (2 * r.h / 9).min(r.w / 54);
        if s <= 0 {
            return;
        }
        let mut x = r.x + (r.w - 54 * s) / 2;
        let y = r.y + (r.h - 9 * s / 2) / 2;
        let size = u32::try_from(3 * s / 2).unwrap_or(0);

        self.reference_cell(x, y, s);
        for i in 0..GAMMA_STEPS {
            let gamma = 1.0 + f64::from(i) / 10.0;
            let shade = gamma_shade(gamma);
            x += 2 * s;
            self.fill(x, y, 2 * s, 3 * s, Rgb::gray(shade));

            if let Some(t) = self.label(&format!("{gamma:.1}"), TextStyle::blended(size, WHITE)) {
                self.blit(&t, x + (2 * s - to_i32(t.width())) / 2, y + 3 * s);
            }

            x += 2 * s;
            self.reference_cell(x, y, s);
        }
    }

    fn reference_cell(&mut self, x: i32, y: i32, s: i32) {
        let c = &mut *self.canvas;
        stripe_rect(c, Orientation::Rows, 1, Rect::new(x, y, 2 * s, s), WHITE, BLACK);
        checker_raster(c, Rect::new(x, y + s, 2 * s, s), WHITE, BLACK);
        stripe_rect(c, Orientation::Columns, 1, Rect::new(x, y + 2 * s, 2 * s, s), WHITE, BLACK);
    }

    /// `W×H` in a framed box, followed by the mode name when simulating.
    fn resolution(&mut self, r: Rect, mode: SubsamplingMode) {
        let mut s = format!("{}×{}", self.width(), self.height());
        if mode != SubsamplingMode::Rgb {
            s.push_str("  ");
            s.push_str(mode.name());
        }
        let fg = self.config.label_foreground;
        let bg = self.config.label_background;
        let size = u32::try_from(r.h / 2).unwrap_or(0);
        let Some(t) = self.label(&s, TextStyle::shaded(size, fg, bg)) else {
            return;
        };
        let (tw, th) = (to_i32(t.width()), to_i32(t.height()));
        let bx = r.x + (r.w - tw) / 2;
        let by = r.y + (r.h - th) / 2;
        self.fill(bx - r.h / 4, r.y, tw + r.h / 2, r.h, fg);
        self.fill(bx - r.h / 8, r.y + r.h / 8, tw + r.h / 4, r.h - r.h / 4, bg);
        self.blit(&t, bx, by);
    }

    fn subsampling_preview(&mut self, r: Rect) {
        let s = r.w / 8;
        let mut x = r.x + (r.w - 8 * s) / 2;
        for (pattern, a, b) in PREVIEW_CELLS {
            let cell = Rect::new(x, r.y, s, r.h).clamped();
            let c = &mut *self.canvas;
            match pattern {
                Pattern::Columns(p) => stripe_rect(c, Orientation::Columns, p, cell, a, b),
                Pattern::Rows(p) => stripe_rect(c, Orientation::Rows, p, cell, a, b),
                Pattern::Checker => checker_raster(c, cell, a, b),
            }
            x += s;
        }
    }

    fn color_gradients(&mut self, r: Rect) {
        let s = (r.h - 4) / 4;
        if s <= 0 {
            return;
        }
        let y = r.y + 2;
        for (i, start) in (0..).zip(GRADIENT_STARTS) {
            linear_gradient(self.canvas, Rect::new(r.x, y + i * s, r.w, s).clamped(), start, BLACK);
        }
    }

    /// Vertical lines of period 1..4 then horizontal lines of period 4..1.
    fn line_bars(&mut self, r: Rect) {
        let s = r.w / 8;
        let mut x = r.x + (r.w - 8 * s) / 2;
        let c = &mut *self.canvas;
        for period in 1..=4 {
            stripe_rect(c, Orientation::Columns, period, Rect::new(x, r.y, s, r.h).clamped(), WHITE, BLACK);
            x += s;
        }
        for period in (1..=4).rev() {
            stripe_rect(c, Orientation::Rows, period, Rect::new(x, r.y, s, r.h).clamped(), WHITE, BLACK);
            x += s;
        }
    }

    /// Shadow, highlight and body rings offset by one pixel.
    fn alignment_circle(&mut self, layout: &Layout) {
        let g = layout.circle();
        let c = &mut *self.canvas;
        draw_circle_outline(c, g.cx + 1, g.cy + 1, g.radius, 3, BLACK);
        draw_circle_outline(c, g.cx - 1, g.cy - 1, g.radius, 3, WHITE);
        draw_circle_outline(c, g.cx, g.cy, g.radius, 3, RING_GRAY);
    }

    fn copyright(&mut self) {
        if self.config.copyright.is_empty() {
            return;
        }
        let config = self.config;
        let style = TextStyle::shaded(8, config.copyright_foreground, config.copyright_background);
        if let Some(t) = self.label(&config.copyright, style) {
            let x = (self.width() - to_i32(t.width())) / 2;
            let y = self.height() - to_i32(t.height());
            self.blit(&t, x, y);
        }
    }

    /// Outlined L-shaped markers at 5% (green) and 10% (yellow) from each
    /// corner, with horizontal and vertical insets computed separately.
    fn overscan(&mut self, layout: &Layout) {
        let (w, h) = (layout.width, layout.height);
        let o = layout.overscan();
        let (w5, w10, h5, h10) = (o.w5, o.w10, o.h5, o.h10);

        // top-left
        self.marker_top_left(w5, h5, w5, h5, GREEN);
        self.marker_top_left(w10, h10, w5, h5, YELLOW);

        // bottom-left
        self.fill(w5 - 1, h - h5 - 2, w5 + 1, 3, BLACK);
        self.fill(w5 - 1, h - 2 * h5, 3, h5 + 1, BLACK);
        self.fill(w5, h - h5 - 1, w5, 1, GREEN);
        self.fill(w5, h - 2 * h5, 1, h5, GREEN);
        self.fill(w10 - 1, h - h10 - 2, w5 + 1, 3, BLACK);
        self.fill(w10 - 1, h - h10 - h5, 3, h5 + 1, BLACK);
        self.fill(w10, h - h10 - 1, w5, 1, YELLOW);
        self.fill(w10, h - h10 - h5, 1, h5, YELLOW);

        // top-right
        self.fill(w - 2 * w5, h5 - 1, w5 + 1, 3, BLACK);
        self.fill(w - w5 - 2, h5 - 1, 3, h5 + 1, BLACK);
        self.fill(w - 2 * w5, h5, w5, 1, GREEN);
        self.fill(w - w5 - 1, h5, 1, h5, GREEN);
        self.fill(w - w10 - w5, h10 - 1, w5 + 1, 3, BLACK);
        self.fill(w - w10 - 2, h10 - 1, 3, h5 + 1, BLACK);
        self.fill(w - w10 - w5, h10, w5, 1, YELLOW);
        self.fill(w - w10 - 1, h10, 1, h5, YELLOW);

        // bottom-right
        self.fill(w - 2 * w5, h - h5 - 2, w5 + 1, 3, BLACK);
        self.fill(w - w5 - 2, h - 2 * h5, 3, h5 + 1, BLACK);
        self.fill(w - 2 * w5, h - h5 - 1, w5, 1, GREEN);
        self.fill(w - w5 - 1, h - 2 * h5, 1, h5, GREEN);
        self.fill(w - w10 - w5, h - h10 - 2, w5 + 1, 3, BLACK);
        self.fill(w - w10 - 2, h - h10 - h5, 3, h5 + 1, BLACK);
        self.fill(w - w10 - w5, h - h10 - 1, w5, 1, YELLOW);
        self.fill(w - w10 - 1, h - h10 - h5, 1, h5, YELLOW);

        let size = u32::try_from(w5 / 2).unwrap_or(0);
        if let Some(t) = self.label("5%", TextStyle::blended(size, GREEN)) {
            self.blit(&t, w - w5 - 2 - to_i32(t.width()), h5 + 1);
        }
        if let Some(t) = self.label("10%", TextStyle::blended(size, YELLOW)) {
            self.blit(&t, w - w10 - 2 - to_i32(t.width()), h10 + 1);
        }
    }

    fn marker_top_left(&mut self, x: i32, y: i32, len_x: i32, len_y: i32, c: Rgb) {
        self.fill(x - 1, y - 1, len_x + 1, 3, BLACK);
        self.fill(x - 1, y - 1, 3, len_y + 1, BLACK);
        self.fill(x, y, len_x, 1, c);
        self.fill(x, y, 1, len_y, c);
    }
}

/// Gray level whose display brightness equals a 50% checkerboard on a
/// display with the given gamma.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gamma_shade(gamma: f64) -> u8 {
    (255.0 * 0.5f64.powf(1.0 / gamma)) as u8
}
