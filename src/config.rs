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


//! Card configuration.

use crate::layout::BlockKind;
use crate::pixel::Rgb;
use crate::ycbcr::EdgePolicy;

/// Which set of pattern bands the card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Five bands: color boxes, gamma ramp, resolution, gradients, line bars.
    #[default]
    Classic,
    /// Classic plus a subsampling preview band below the resolution readout.
    Chroma,
}

impl Variant {
    /// Band contents from top to bottom.
    #[must_use]
    pub fn bands(self) -> &'static [BlockKind] {
        match self {
            Variant::Classic => &[
                BlockKind::ColorBoxes,
                BlockKind::GammaRamp,
                BlockKind::Resolution,
                BlockKind::ColorGradients,
                BlockKind::LineBars,
            ],
            Variant::Chroma => &[
                BlockKind::ColorBoxes,
                BlockKind::GammaRamp,
                BlockKind::Resolution,
                BlockKind::SubsamplingPreview,
                BlockKind::ColorGradients,
                BlockKind::LineBars,
            ],
        }
    }
}

/// Colours, text and policies that stay fixed across render passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardConfig {
    /// Fill behind all pattern blocks.
    pub background: Rgb,
    /// Line printed at the bottom edge; empty to omit.
    pub copyright: String,
    pub variant: Variant,
    /// Chroma filtering of blocks cut off by the image edge.
    pub edge_policy: EdgePolicy,
    /// Text and frame colour of the resolution readout.
    pub label_foreground: Rgb,
    pub label_background: Rgb,
    pub copyright_foreground: Rgb,
    pub copyright_background: Rgb,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            background: Rgb::gray(32),
            copyright: String::from("Copyright © 2025 Dustin McAfee"),
            variant: Variant::Classic,
            edge_policy: EdgePolicy::Truncate,
            label_foreground: Rgb::WHITE,
            label_background: Rgb::BLACK,
            copyright_foreground: Rgb::new(0, 0, 255),
            copyright_background: Rgb::gray(180),
        }
    }
}

impl CardConfig {
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn with_edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{MonoTextProvider, TextProvider, TextStyle};

    #[test]
    fn test_default_copyright_is_drawable() {
        let config = CardConfig::default();
        assert!(config.copyright.starts_with("Copyright ©"));

        let style = TextStyle::shaded(8, config.copyright_foreground, config.copyright_background);
        let bmp = MonoTextProvider.render(&config.copyright, &style).unwrap();
        assert_eq!(bmp.height(), 8);
        let pixels: Vec<_> = bmp.rows().flatten().copied().collect();
        assert!(pixels.contains(&Some(config.copyright_foreground)));
        assert!(pixels.contains(&Some(config.copyright_background)));
    }
}
