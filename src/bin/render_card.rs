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


//! Test Card Renderer
//!
//! Renders the test card at a fixed size and writes it as a PNG
//! screenshot. Useful for checking the pattern without a display and for
//! comparing subsampling modes side by side.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin render_card -- 1920x1080 420
//! cargo run --bin render_card -- 1280x720 all
//! ```
//!
//! # Generated Files
//!
//! - `<w>x<h>.png` for RGB
//! - `<w>x<h>-<mode>.png` for the YCbCr modes (`444`, `422`, `422v`, `420`)

use std::process::ExitCode;

use testcard::{render_with, CardConfig, Framebuffer, MonoTextProvider, PixelFormat, SubsamplingMode, Variant};

fn parse_size(s: &str) -> Option<(usize, usize)> {
    let (w, h) = s.split_once(['x', 'X', '×'])?;
    let w = w.parse().ok().filter(|&w| w > 0)?;
    let h = h.parse().ok().filter(|&h| h > 0)?;
    Some((w, h))
}

fn file_name(w: usize, h: usize, mode: SubsamplingMode) -> String {
    match mode {
        SubsamplingMode::Rgb => format!("{w}x{h}.png"),
        _ => format!("{w}x{h}-{}.png", mode.tag()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (width, height) = match args.first().map(|s| parse_size(s)) {
        None => (1920, 1080),
        Some(Some(size)) => size,
        Some(None) => {
            eprintln!("Usage: render_card [<width>x<height>] [rgb|444|422|422v|420|all]");
            return ExitCode::FAILURE;
        }
    };
    let modes: Vec<SubsamplingMode> = match args.get(1).map(String::as_str) {
        None => vec![SubsamplingMode::Rgb],
        Some("all") => SubsamplingMode::ALL.to_vec(),
        Some(tag) => match tag.parse() {
            Ok(mode) => vec![mode],
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut fb = match Framebuffer::new(width, height, PixelFormat::bgra32()) {
        Ok(fb) => fb,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let config = CardConfig::default().with_variant(Variant::Chroma);

    for mode in modes {
        if let Err(e) = render_with(&mut fb, mode, &config, &mut MonoTextProvider) {
            eprintln!("Failed to render {width}x{height} in {mode}: {e}");
            return ExitCode::FAILURE;
        }
        let path = file_name(width, height, mode);
        if let Err(e) = fb.save_png(&path) {
            eprintln!("Failed to save {path}: {e}");
            return ExitCode::FAILURE;
        }
        println!("Saved a screenshot to {path}");
    }
    ExitCode::SUCCESS
}
