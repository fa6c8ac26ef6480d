// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub use xmlwriter::Indent;
use xmlwriter::XmlWriter;

use crate::{Color, Command, CommandKind, Image, Point};

/// SVG writing options.
#[derive(Clone, Copy, Debug)]
pub struct WriteOptions {
    /// Set XML nodes indention.
    ///
    /// Default: 4 spaces
    pub indent: Indent,

    /// Set the coordinates numeric precision.
    ///
    /// Default: 3
    pub precision: u8,

    /// Write hidden commands as elements with `visibility="hidden"`.
    ///
    /// Default: false
    pub include_hidden: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: Indent::Spaces(4),
            precision: 3,
            include_hidden: false,
        }
    }
}

impl Image {
    /// Writes the `Image` as an SVG document.
    pub fn to_svg(&self, opt: &WriteOptions) -> String {
        write_svg(self, opt)
    }
}

/// Writes an [`Image`] as an SVG document.
///
/// Paths become `path` elements and every circle center becomes a `circle` element.
pub fn write_svg(image: &Image, opt: &WriteOptions) -> String {
    let mut xml = XmlWriter::new(xmlwriter::Options {
        use_single_quote: false,
        indent: opt.indent,
        attributes_indent: Indent::None,
    });

    xml.start_element("svg");
    xml.write_attribute("width", &image.width);
    xml.write_attribute("height", &image.height);
    xml.write_attribute_fmt(
        "viewBox",
        format_args!("0 0 {} {}", image.width, image.height),
    );
    xml.write_attribute("xmlns", "http://www.w3.org/2000/svg");

    for cmd in &image.commands {
        if cmd.hidden && !opt.include_hidden {
            continue;
        }

        write_command(cmd, opt, &mut xml);
    }

    xml.end_document()
}

fn write_command(cmd: &Command, opt: &WriteOptions, xml: &mut XmlWriter) {
    match cmd.kind {
        CommandKind::Path { open } | CommandKind::PrecisePath { open } => {
            if cmd.points.is_empty() {
                return;
            }

            xml.start_element("path");
            write_style(cmd, opt, xml);
            xml.write_attribute_raw("d", |buf| write_path_data(&cmd.points, open, opt, buf));
            xml.end_element();
        }
        CommandKind::Circle { radius } => {
            for p in &cmd.points {
                xml.start_element("circle");
                write_style(cmd, opt, xml);
                xml.write_attribute_raw("cx", |buf| write_num(p.x, buf, opt.precision));
                xml.write_attribute_raw("cy", |buf| write_num(p.y, buf, opt.precision));
                xml.write_attribute("r", &radius);
                xml.end_element();
            }
        }
    }
}

fn write_style(cmd: &Command, opt: &WriteOptions, xml: &mut XmlWriter) {
    if cmd.fill_color.is_transparent() {
        xml.write_attribute("fill", "none");
    } else {
        write_paint("fill", "fill-opacity", cmd.fill_color, opt, xml);
    }

    if !cmd.stroke_color.is_transparent() && cmd.stroke_width != 0 {
        write_paint("stroke", "stroke-opacity", cmd.stroke_color, opt, xml);
        xml.write_attribute("stroke-width", &cmd.stroke_width);
    }

    if cmd.hidden {
        xml.write_attribute("visibility", "hidden");
    }
}

fn write_paint(
    name: &str,
    opacity_name: &str,
    color: Color,
    opt: &WriteOptions,
    xml: &mut XmlWriter,
) {
    static CHARS: &[u8] = b"0123456789abcdef";

    #[inline]
    fn int2hex(n: u8) -> (u8, u8) {
        (CHARS[(n >> 4) as usize], CHARS[(n & 0xf) as usize])
    }

    let c = color.to_display();
    let (r1, r2) = int2hex(c.red);
    let (g1, g2) = int2hex(c.green);
    let (b1, b2) = int2hex(c.blue);

    xml.write_attribute_raw(name, |buf| {
        buf.extend_from_slice(&[b'#', r1, r2, g1, g2, b1, b2])
    });

    if c.alpha < 1.0 {
        xml.write_attribute_raw(opacity_name, |buf| write_num(c.alpha, buf, opt.precision));
    }
}

fn write_path_data(points: &[Point], open: bool, opt: &WriteOptions, buf: &mut Vec<u8>) {
    for (i, p) in points.iter().enumerate() {
        let prefix: &[u8] = if i == 0 { b"M " } else { b" L " };
        buf.extend_from_slice(prefix);
        write_num(p.x, buf, opt.precision);
        buf.push(b' ');
        write_num(p.y, buf, opt.precision);
    }

    if !open {
        buf.extend_from_slice(b" Z");
    }
}

fn write_num(num: f32, buf: &mut Vec<u8>, precision: u8) {
    // Integers are the most common case, since most commands are on a whole unit grid.
    let text = if num.fract() == 0.0 {
        (num as i32).to_string()
    } else {
        // Round numbers up to the specified precision to prevent writing
        // ugly numbers like 29.999999999999996.
        let pow = 10f32.powi(precision.min(8) as i32);
        ((num * pow).round() / pow).to_string()
    };

    buf.extend_from_slice(text.as_bytes());
}
