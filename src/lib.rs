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


//! Display test card renderer.
//!
//! Draws a static diagnostic image for checking a display's geometry
//! (overscan, pixel aspect), colours and gamma, and optionally shows how the
//! same image would look after transmission with chroma subsampling
//! (4:4:4, 4:2:2, 4:2:0).
//!
//! # Architecture
//!
//! - [`raster`] and [`circle`]: clipped drawing primitives.
//! - [`ycbcr`]: fixed-point RGB/YCbCr conversion and box-filter chroma
//!   subsampling, applied in place to a finished image.
//! - [`layout`]: block geometry as a pure function of the surface size.
//! - [`card`]: the composer tying everything together.
//!
//! Window management, event handling and glyph rasterization stay outside:
//! the caller provides a [`Surface`] and, optionally, a [`TextProvider`].
//!
//! # Example
//!
//! ```no_run
//! use testcard::{render, Framebuffer, PixelFormat, SubsamplingMode};
//!
//! let mut fb = Framebuffer::new(1920, 1080, PixelFormat::bgra32())?;
//! render(&mut fb, SubsamplingMode::YCbCr420)?;
//! fb.save_png("1920x1080-420.png")?;
//! # Ok::<(), testcard::Error>(())
//! ```

pub mod card;
pub mod circle;
pub mod config;
pub mod error;
pub mod layout;
pub mod pixel;
pub mod raster;
pub mod surface;
pub mod text;
pub mod ycbcr;

pub use card::{render, render_canvas, render_with};
pub use config::{CardConfig, Variant};
pub use error::{Error, Result};
pub use layout::{BlockKind, Layout, LayoutBlock};
pub use pixel::{PixelFormat, Rgb};
pub use raster::Rect;
pub use surface::{Canvas, Framebuffer, Surface, SurfaceLock};
pub use text::{MonoTextProvider, NoText, TextBitmap, TextProvider, TextStyle};
pub use ycbcr::{EdgePolicy, SubsamplingMode};
