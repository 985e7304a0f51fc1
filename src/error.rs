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


//! Error type shared by the surface, simulation and export paths.

use std::collections::TryReserveError;

/// Errors that can abort a render pass or a screenshot export.
///
/// Missing text labels are not errors: a text provider that cannot render a
/// string returns `None` and the label is skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An intermediate luma/chroma plane could not be allocated.
    #[error("failed to allocate {bytes} bytes for the {plane} plane")]
    Allocation {
        /// Which plane was being allocated (`"Y"`, `"Cb"` or `"Cr"`).
        plane: &'static str,
        /// Requested size in bytes.
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    /// A pixel buffer is smaller than its declared geometry requires.
    #[error("buffer size mismatch: got {got} bytes, expected {expected} bytes for {width}x{height} image (stride {stride})")]
    BufferSize {
        got: usize,
        expected: usize,
        width: usize,
        height: usize,
        stride: usize,
    },

    /// The pixel format cannot be packed by this crate.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// PNG encoding of a screenshot failed.
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
