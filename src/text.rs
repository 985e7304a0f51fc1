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


//! Text labels.
//!
//! The renderer does not rasterize glyphs itself. It asks a [`TextProvider`]
//! for a small bitmap, blits it and drops it. A provider that cannot render
//! a string returns `None` and the label is left out.

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_5X8, FONT_6X10, FONT_7X14, FONT_9X18};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::pixel::Rgb;

/// Appearance of a rendered label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Requested glyph height in pixels.
    pub size: u32,
    pub foreground: Rgb,
    /// `None` leaves the pixels around the glyphs transparent.
    pub background: Option<Rgb>,
}

impl TextStyle {
    /// Glyphs only, no background box.
    #[must_use]
    pub const fn blended(size: u32, foreground: Rgb) -> Self {
        Self {
            size,
            foreground,
            background: None,
        }
    }

    /// Glyphs on an opaque background box.
    #[must_use]
    pub const fn shaded(size: u32, foreground: Rgb, background: Rgb) -> Self {
        Self {
            size,
            foreground,
            background: Some(background),
        }
    }
}

/// A rendered label. `None` pixels are transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBitmap {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl TextBitmap {
    /// A fully transparent bitmap.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sets a pixel; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, c: Option<Rgb>) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = c;
        }
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Rgb>]> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Nearest-neighbour enlargement by an integer factor.
    #[must_use]
    pub fn scaled(&self, factor: usize) -> Self {
        if factor <= 1 {
            return self.clone();
        }
        let mut out = Self::new(self.width * factor, self.height * factor);
        for y in 0..out.height {
            for x in 0..out.width {
                out.set(x, y, self.get(x / factor, y / factor));
            }
        }
        out
    }
}

/// Renders strings into bitmaps.
pub trait TextProvider {
    /// Renders `text`, or returns `None` if it cannot.
    fn render(&mut self, text: &str, style: &TextStyle) -> Option<TextBitmap>;
}

impl<T: TextProvider + ?Sized> TextProvider for &mut T {
    fn render(&mut self, text: &str, style: &TextStyle) -> Option<TextBitmap> {
        (**self).render(text, style)
    }
}

/// A provider without any glyphs; every label is omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoText;

impl TextProvider for NoText {
    fn render(&mut self, _text: &str, _style: &TextStyle) -> Option<TextBitmap> {
        None
    }
}

/// Built-in provider using fixed-size ISO 8859-1 bitmap fonts.
///
/// Picks the tallest font no taller than the requested size and enlarges it
/// by an integer factor for sizes beyond the largest font.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoTextProvider;

const FONTS: [&MonoFont<'static>; 5] = [&FONT_5X8, &FONT_6X10, &FONT_7X14, &FONT_9X18, &FONT_10X20];

impl MonoTextProvider {
    fn font_for(size: u32) -> (&'static MonoFont<'static>, usize) {
        let largest = FONTS[FONTS.len() - 1];
        let largest_h = largest.character_size.height;
        if size > largest_h {
            let scale = ((size + largest_h / 2) / largest_h).max(1);
            return (largest, scale as usize);
        }
        let font = FONTS
            .iter()
            .rev()
            .find(|f| f.character_size.height <= size)
            .copied()
            .unwrap_or(FONTS[0]);
        (font, 1)
    }
}

impl TextProvider for MonoTextProvider {
    fn render(&mut self, text: &str, style: &TextStyle) -> Option<TextBitmap> {
        if text.is_empty() || style.size == 0 {
            return None;
        }
        let (font, scale) = Self::font_for(style.size);
        let mut builder = MonoTextStyleBuilder::new().font(font).text_color(to_rgb888(style.foreground));
        if let Some(bg) = style.background {
            builder = builder.background_color(to_rgb888(bg));
        }
        let text = Text::with_baseline(text, Point::zero(), builder.build(), Baseline::Top);
        let size = text.bounding_box().size;
        if size.width == 0 || size.height == 0 {
            return None;
        }
        let mut target = GlyphTarget {
            bitmap: TextBitmap::new(size.width as usize, size.height as usize),
        };
        text.draw(&mut target).ok()?;
        Some(target.bitmap.scaled(scale))
    }
}

fn to_rgb888(c: Rgb) -> Rgb888 {
    Rgb888::new(c.r, c.g, c.b)
}

struct GlyphTarget {
    bitmap: TextBitmap,
}

impl DrawTarget for GlyphTarget {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    #[allow(clippy::cast_sign_loss)]
    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                let c = Rgb::new(color.r(), color.g(), color.b());
                self.bitmap.set(point.x as usize, point.y as usize, Some(c));
            }
        }
        Ok(())
    }
}

impl OriginDimensions for GlyphTarget {
    #[allow(clippy::cast_possible_truncation)]
    fn size(&self) -> Size {
        Size::new(self.bitmap.width() as u32, self.bitmap.height() as u32)
    }
}
