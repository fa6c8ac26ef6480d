// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
SVG to PDC conversion.

Only a flat subset of SVG is supported: groups with translations,
`path`, `circle`, `line`, `rect`, `polyline` and `polygon` elements
with solid fill and stroke colors.
*/

mod converter;
mod options;
mod shapes;
mod style;

pub use options::Options;

use crate::Image;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// The number of elements exceeds [`Options::nodes_limit`].
    ElementsLimitReached,

    /// Elements are nested deeper than [`Options::nesting_limit`].
    NestingLimitReached,

    /// The root element is not an `svg` one.
    NotAnSvg,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),

    /// An element has a transform that is not a pure translation,
    /// or a drawable element has any transform.
    UnsupportedTransform {
        /// Element name.
        element: String,
        /// The `transform` attribute value.
        value: String,
    },

    /// A geometry attribute is present but cannot be parsed.
    InvalidGeometry {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },
}

impl Error {
    /// Checks that the input is not a well-formed SVG document.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::NotAnUtf8Str
                | Error::MalformedGZip
                | Error::ElementsLimitReached
                | Error::NestingLimitReached
                | Error::NotAnSvg
                | Error::ParsingFailed(_)
        )
    }

    /// Checks that the document uses a feature PDC cannot represent.
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedTransform { .. } | Error::InvalidGeometry { .. }
        )
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number of SVG elements has been reached")
            }
            Error::NestingLimitReached => {
                write!(f, "the maximum SVG elements nesting depth has been reached")
            }
            Error::NotAnSvg => {
                write!(f, "the root element is not an 'svg' one")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::UnsupportedTransform {
                ref element,
                ref value,
            } => {
                write!(f, "'{}' has an unsupported transform '{}'", element, value)
            }
            Error::InvalidGeometry {
                ref element,
                ref attribute,
            } => {
                write!(f, "'{}' has an invalid '{}' value", element, attribute)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A non-fatal import issue.
///
/// The affected element is skipped and the import continues.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Warning {
    /// An element of an unsupported kind.
    UnsupportedElement(String),

    /// An element with no drawable geometry, like a zero radius circle.
    DegenerateGeometry(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Warning::UnsupportedElement(ref name) => {
                write!(f, "'{}' elements are not supported", name)
            }
            Warning::DegenerateGeometry(ref name) => {
                write!(f, "'{}' has no drawable geometry", name)
            }
        }
    }
}

trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}

/// Converts an SVG string into an [`Image`].
///
/// Fails fast: no partial image is returned on error.
pub fn import_svg(text: &str, opt: &Options) -> Result<Image, Error> {
    import_svg_with_warnings(text, opt).map(|(image, _)| image)
}

/// Converts an SVG string into an [`Image`] and returns the list of skipped elements.
pub fn import_svg_with_warnings(text: &str, opt: &Options) -> Result<(Image, Vec<Warning>), Error> {
    let xml_opt = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };

    check_nesting(text, opt.nesting_limit)?;

    let doc =
        roxmltree::Document::parse_with_options(text, xml_opt).map_err(Error::ParsingFailed)?;

    import_xmltree(&doc, opt)
}

/// Checks that elements are not nested deeper than `limit`.
///
/// `roxmltree` parses elements recursively, so the depth must be known before parsing.
/// Only the markup structure is scanned. Malformed markup is left to the parser.
fn check_nesting(text: &str, limit: u32) -> Result<(), Error> {
    let data = text.as_bytes();
    let mut depth = 0u32;
    let mut pos = 0;
    while let Some(offset) = data[pos..].iter().position(|c| *c == b'<') {
        pos += offset;
        let rest = &data[pos..];

        if rest.starts_with(b"<!--") {
            pos += skip_until(rest, b"-->");
        } else if rest.starts_with(b"<![CDATA[") {
            pos += skip_until(rest, b"]]>");
        } else if rest.starts_with(b"<?") {
            pos += skip_until(rest, b"?>");
        } else if rest.starts_with(b"<!") {
            pos += skip_declaration(rest);
        } else if rest.starts_with(b"</") {
            depth = depth.saturating_sub(1);
            pos += skip_tag(rest);
        } else {
            let len = skip_tag(rest);
            pos += len;

            if !rest[..len].ends_with(b"/>") {
                depth += 1;
                if depth > limit {
                    return Err(Error::NestingLimitReached);
                }
            }
        }
    }

    Ok(())
}

/// Returns the length up to and including `end`, or the whole length.
fn skip_until(data: &[u8], end: &[u8]) -> usize {
    data.windows(end.len())
        .position(|w| w == end)
        .map(|i| i + end.len())
        .unwrap_or(data.len())
}

/// Returns the length of a tag, skipping `>` inside quoted attribute values.
fn skip_tag(data: &[u8]) -> usize {
    let mut quote = None;
    for (i, c) in data.iter().enumerate().skip(1) {
        match (quote, *c) {
            (None, b'"') | (None, b'\'') => quote = Some(*c),
            (Some(q), c) if q == c => quote = None,
            (None, b'>') => return i + 1,
            _ => {}
        }
    }

    data.len()
}

/// Returns the length of a `<!DOCTYPE ...>` declaration, internal subset included.
fn skip_declaration(data: &[u8]) -> usize {
    let mut quote = None;
    let mut brackets = 0u32;
    for (i, c) in data.iter().enumerate().skip(2) {
        match (quote, *c) {
            (None, b'"') | (None, b'\'') => quote = Some(*c),
            (Some(q), c) if q == c => quote = None,
            (None, b'[') => brackets += 1,
            (None, b']') => brackets = brackets.saturating_sub(1),
            (None, b'>') if brackets == 0 => return i + 1,
            _ => {}
        }
    }

    data.len()
}

/// Converts an already parsed SVG document into an [`Image`].
pub fn import_xmltree(
    doc: &roxmltree::Document,
    opt: &Options,
) -> Result<(Image, Vec<Warning>), Error> {
    converter::convert_doc(doc, opt)
}

/// Converts SVG data into an [`Image`].
///
/// Can contain an SVG string or a gzip compressed data.
pub fn import_svg_data(data: &[u8], opt: &Options) -> Result<Image, Error> {
    if data.starts_with(&[0x1f, 0x8b]) {
        let data = decompress_svgz(data)?;
        let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
        import_svg(text, opt)
    } else {
        let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
        import_svg(text, opt)
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}

impl Image {
    /// Parses an `Image` from an SVG string.
    ///
    /// A shorthand for [`import_svg`].
    pub fn from_svg(text: &str, opt: &Options) -> Result<Self, Error> {
        import_svg(text, opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth_ok(text: &str, limit: u32) -> bool {
        check_nesting(text, limit).is_ok()
    }

    #[test]
    fn nesting_depth() {
        assert!(depth_ok("<svg><g><g/></g></svg>", 2));
        assert!(!depth_ok("<svg><g><g></g></g></svg>", 2));
        assert!(depth_ok("<svg><g/><g/><g/></svg>", 2));
        assert!(depth_ok("<svg><g></g><g></g></svg>", 2));
    }

    #[test]
    fn nesting_skips_non_elements() {
        let text = "<?xml version='1.0'?>\
                    <!DOCTYPE svg [<!ENTITY e '<g>'>]>\
                    <svg><!-- <g><g> --><![CDATA[<g><g>]]><g title='a>b'/></svg>";
        assert!(depth_ok(text, 1));
    }

    #[test]
    fn nesting_of_unclosed_tags() {
        let text = format!("<svg>{}", "<g>".repeat(10));
        assert!(depth_ok(&text, 11));
        assert!(!depth_ok(&text, 10));
    }
}
