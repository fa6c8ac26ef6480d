// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use super::shapes;
use super::style::{parse_number, Declarations, Style};
use super::{Error, Options, Warning};
use crate::tree::round_half_up;
use crate::{Color, Command, Image};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Elements that are never rendered directly and can be skipped silently.
const NON_RENDERING: &[&str] = &[
    "clipPath",
    "defs",
    "desc",
    "filter",
    "linearGradient",
    "marker",
    "mask",
    "metadata",
    "pattern",
    "radialGradient",
    "script",
    "style",
    "symbol",
    "title",
];

/// A state passed from a group to its children.
#[derive(Clone, Copy, Default, Debug)]
struct Context {
    style: Style,
    /// An accumulated translation.
    dx: f64,
    dy: f64,
}

pub(crate) fn convert_doc(
    doc: &roxmltree::Document,
    opt: &Options,
) -> Result<(Image, Vec<Warning>), Error> {
    let svg = doc.root_element();
    if svg.tag_name().name() != "svg" || !is_svg_element(svg) {
        return Err(Error::NotAnSvg);
    }

    let (width, height, origin) = resolve_size(svg);
    let mut image = Image {
        width,
        height,
        version: 1,
        commands: Vec::new(),
    };
    let mut warnings = Vec::new();

    let root_ctx = Context {
        dx: -origin.0,
        dy: -origin.1,
        ..Context::default()
    };

    // Children are pushed in reverse, so commands are produced in document order.
    let mut stack = vec![(svg, root_ctx)];
    let mut nodes_count = 0u32;
    while let Some((node, ctx)) = stack.pop() {
        nodes_count += 1;
        if nodes_count > opt.nodes_limit {
            return Err(Error::ElementsLimitReached);
        }

        if !is_svg_element(node) {
            log::debug!("A non-SVG element '{:?}' is ignored.", node.tag_name());
            continue;
        }

        let decls = Declarations::new(node);
        if decls.is_hidden() {
            continue;
        }

        let name = node.tag_name().name();
        if node == svg || is_group(name) {
            let child_ctx = resolve_group(node, &decls, &ctx)?;
            for child in node.children().filter(|n| n.is_element()).rev() {
                stack.push((child, child_ctx));
            }
        } else if shapes::is_shape(name) {
            if let Some(cmd) = convert_shape(node, &decls, &ctx, opt, &mut warnings)? {
                image.commands.push(cmd);
            }
        } else if NON_RENDERING.contains(&name) {
            log::debug!("'{}' is a non-rendering element. Skipped.", name);
        } else {
            log::warn!("'{}' elements are not supported. Skipped.", name);
            warnings.push(Warning::UnsupportedElement(name.to_string()));
        }
    }

    Ok((image, warnings))
}

fn is_svg_element(node: roxmltree::Node) -> bool {
    matches!(node.tag_name().namespace(), None | Some(SVG_NS))
}

fn is_group(name: &str) -> bool {
    matches!(name, "g" | "a")
}

/// Returns the image size and the `viewBox` origin.
fn resolve_size(svg: roxmltree::Node) -> (i16, i16, (f64, f64)) {
    let view_box = svg.attribute("viewBox").and_then(|v| {
        let vb = svgtypes::ViewBox::from_str(v).ok();
        if vb.is_none() {
            log::warn!("Failed to parse viewBox value: '{}'.", v);
        }
        vb
    });

    let to_i16 = |n: f64| round_half_up(n as f32) as i16;
    match view_box {
        Some(vb) => (to_i16(vb.w), to_i16(vb.h), (vb.x, vb.y)),
        None => {
            let length = |name: &str| svg.attribute(name).and_then(parse_number).unwrap_or(0.0);
            (to_i16(length("width")), to_i16(length("height")), (0.0, 0.0))
        }
    }
}

fn resolve_group(
    node: roxmltree::Node,
    decls: &Declarations,
    parent: &Context,
) -> Result<Context, Error> {
    let (dx, dy) = resolve_translation(node)?;
    Ok(Context {
        style: parent.style.resolve(decls, 1),
        dx: parent.dx + dx,
        dy: parent.dy + dy,
    })
}

/// Extracts a translation from a group transform.
///
/// Fails when the transform has a rotation, scale or skew component.
fn resolve_translation(node: roxmltree::Node) -> Result<(f64, f64), Error> {
    let value = match transform_attribute(node) {
        Some(v) => v,
        None => return Ok((0.0, 0.0)),
    };

    let ts = svgtypes::Transform::from_str(value).map_err(|_| unsupported_transform(node, value))?;

    let is_zero = |n: f64| n.abs() < 1e-9;
    if is_zero(ts.a - 1.0) && is_zero(ts.b) && is_zero(ts.c) && is_zero(ts.d - 1.0) {
        Ok((ts.e, ts.f))
    } else {
        Err(unsupported_transform(node, value))
    }
}

fn transform_attribute<'a>(node: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    node.attribute("transform").filter(|v| !v.trim().is_empty())
}

fn unsupported_transform(node: roxmltree::Node, value: &str) -> Error {
    Error::UnsupportedTransform {
        element: node.tag_name().name().to_string(),
        value: value.to_string(),
    }
}

fn convert_shape(
    node: roxmltree::Node,
    decls: &Declarations,
    ctx: &Context,
    opt: &Options,
    warnings: &mut Vec<Warning>,
) -> Result<Option<Command>, Error> {
    if let Some(value) = transform_attribute(node) {
        return Err(unsupported_transform(node, value));
    }

    let style = ctx.style.resolve(decls, 0);
    let fill_color = style.fill_color(opt.color_mode);
    let mut stroke_color = style.stroke_color(opt.color_mode);
    let mut stroke_width = style.stroke_width.unwrap_or(opt.default_stroke_width);

    // Invalid geometry is an error even on an element without paint.
    let cmd = shapes::convert(node, (ctx.dx, ctx.dy), opt)?;

    if fill_color == Color::TRANSPARENT && stroke_color == Color::TRANSPARENT {
        log::debug!("'{}' has neither fill nor stroke. Skipped.", node.tag_name().name());
        return Ok(None);
    }

    let mut cmd = match cmd {
        Some(cmd) => cmd,
        None => {
            warnings.push(Warning::DegenerateGeometry(node.tag_name().name().to_string()));
            return Ok(None);
        }
    };

    if stroke_color == Color::TRANSPARENT {
        stroke_width = 0;
    } else if stroke_width == 0 {
        stroke_color = Color::TRANSPARENT;
    }

    cmd.fill_color = fill_color;
    cmd.stroke_color = stroke_color;
    cmd.stroke_width = stroke_width;
    Ok(Some(cmd))
}
