// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
PDC binary format.

All multi-byte fields are little-endian.

```text
offset  size  field
0       4     magic, "PDCI"
4       4     payload length (u32), not validated on read
8       1     version
9       1     padding, always 0
10      2     width (read as i16, written as u16)
12      2     height (read as i16, written as u16)
14      2     commands count (u16)
16      ...   command records
```

Each command record is a 9 bytes header followed by 4 bytes per point:

```text
offset  size  field
0       1     type: 1 - path, 2 - circle, 3 - precise path
1       1     flags, bit 0 - hidden
2       1     stroke color (ARGB2222)
3       1     stroke width
4       1     fill color (ARGB2222)
5       2     circle: radius (u16)
              path: open flag, set when the sum of both bytes is odd
7       2     points count (u16)
9       4*N   points: x (i16), y (i16)
```

Precise path coordinates are stored multiplied by 8.
*/

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

use crate::Image;

/// PDC image magic.
pub const MAGIC: &[u8; 4] = b"PDCI";

/// Coordinates scale of a precise path.
pub const PRECISE_SCALE: f32 = 8.0;

/// The canonical bytes of [`Image::blank`].
pub const BLANK_IMAGE: [u8; 16] = [
    b'P', b'D', b'C', b'I', // magic
    8, 0, 0, 0, // payload length
    1, 0, // version, padding
    50, 0, // width
    50, 0, // height
    0, 0, // commands count
];

pub(crate) const HEADER_SIZE: usize = 16;
pub(crate) const COMMAND_HEADER_SIZE: usize = 9;
pub(crate) const POINT_SIZE: usize = 4;

/// List of all decoding errors.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DecodeError {
    /// The data doesn't start with the `PDCI` magic.
    BadMagic,

    /// A command record has an unknown type tag.
    UnknownCommandType(u8),

    /// The data ended before a declared field or points block.
    UnexpectedEndOfData {
        /// Position of the field that cannot be read.
        offset: usize,
        /// Number of bytes the field requires.
        expected: usize,
    },
}

impl DecodeError {
    /// Checks that the error is caused by an unsupported data layout.
    pub fn is_format_error(&self) -> bool {
        matches!(self, DecodeError::BadMagic | DecodeError::UnknownCommandType(_))
    }

    /// Checks that the data was shorter than its declared structure.
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::UnexpectedEndOfData { .. })
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            DecodeError::BadMagic => {
                write!(f, "unsupported magic word, expected 'PDCI'")
            }
            DecodeError::UnknownCommandType(n) => {
                write!(f, "unknown command type {}", n)
            }
            DecodeError::UnexpectedEndOfData { offset, expected } => {
                write!(
                    f,
                    "unexpected end of data, {} byte(s) required at offset {}",
                    expected, offset
                )
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl Image {
    /// Parses an `Image` from PDC data.
    pub fn from_pdc(data: &[u8]) -> Result<Self, DecodeError> {
        decode(data)
    }

    /// Serializes the `Image` into PDC data.
    pub fn to_pdc(&self) -> Vec<u8> {
        encode(self)
    }
}
