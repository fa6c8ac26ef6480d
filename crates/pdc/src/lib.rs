// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`pdc` is a reader and writer of PDC (Pebble Draw Command) images.

PDC is a compact binary vector format: an image is a list of paths and circles
with 2-bit-per-channel colors and 16-bit coordinates.

## Features

- Bit-exact decoding and encoding of PDC data
- A strongly-typed command model with structural equality
- ARGB2222 color quantization with truncating and nearest modes
- SVG and SVGZ import
  - `path`, `circle`, `line`, `rect`, `polyline` and `polygon` elements
  - Style inheritance from groups, `style` attributes and opacity
  - Curves are flattened into line segments
- SVG export

## Limitations

- Only translations are supported. Any other transform is an error
- Paint servers, markers, masks, filters, text and images are not supported

## Example

```
let image = pdc::import_svg(
    "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'>
        <rect width='10' height='5' fill='red'/>
    </svg>",
    &pdc::Options::default(),
).unwrap();

let data = image.to_pdc();
assert_eq!(pdc::Image::from_pdc(&data).unwrap(), image);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

mod codec;
mod parser;
mod tree;
mod writer;

pub use codec::{decode, encode, DecodeError, BLANK_IMAGE, MAGIC, PRECISE_SCALE};
pub use parser::{
    decompress_svgz, import_svg, import_svg_data, import_svg_with_warnings, import_xmltree, Error,
    Options, Warning,
};
pub use roxmltree;
pub use tree::*;
pub use writer::{write_svg, Indent, WriteOptions};
