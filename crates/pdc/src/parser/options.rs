// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::QuantizeMode;

/// Import options.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Specifies how SVG colors are reduced to the 2-bit-per-channel palette.
    ///
    /// Default: Truncate
    pub color_mode: QuantizeMode,

    /// Maximum distance between a curve and its flattened polyline, in logical units.
    ///
    /// Default: 0.25
    pub curve_tolerance: f64,

    /// A stroke width to use when neither an element nor its ancestors
    /// have a `stroke-width` property.
    ///
    /// Default: 1
    pub default_stroke_width: u8,

    /// Maximum number of elements to process.
    ///
    /// Default: 1_000_000
    pub nodes_limit: u32,

    /// Maximum elements nesting depth, the root `svg` element included.
    ///
    /// Checked before the XML is parsed.
    ///
    /// Default: 128
    pub nesting_limit: u32,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            color_mode: QuantizeMode::default(),
            curve_tolerance: 0.25,
            default_stroke_width: 1,
            nodes_limit: 1_000_000,
            nesting_limit: 128,
        }
    }
}
