// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::{BezPath, PathEl};

use super::style::parse_number;
use super::{Error, Options};
use crate::tree::round_half_up;
use crate::{Command, Point};

/// Flattening tolerance lower bound.
const MIN_TOLERANCE: f64 = 0.01;

/// Checks that the element can be converted into a command.
pub(crate) fn is_shape(name: &str) -> bool {
    matches!(
        name,
        "path" | "circle" | "line" | "rect" | "polyline" | "polygon"
    )
}

/// Converts a shape element into an unstyled command.
///
/// `offset` is added to every point.
/// Returns `Ok(None)` when the element has no drawable geometry.
pub(crate) fn convert(
    node: roxmltree::Node,
    offset: (f64, f64),
    opt: &Options,
) -> Result<Option<Command>, Error> {
    let cmd = match node.tag_name().name() {
        "path" => convert_path(node, offset, opt.curve_tolerance)?,
        "circle" => convert_circle(node, offset)?,
        "line" => convert_line(node, offset)?,
        "rect" => convert_rect(node, offset)?,
        "polyline" => convert_points(node, offset, true)?,
        "polygon" => convert_points(node, offset, false)?,
        _ => None,
    };

    Ok(cmd)
}

fn convert_path(
    node: roxmltree::Node,
    offset: (f64, f64),
    tolerance: f64,
) -> Result<Option<Command>, Error> {
    let value = match node.attribute("d") {
        Some(v) => v,
        None => {
            log::warn!("Path '{}' has no 'd' attribute. Skipped.", element_id(node));
            return Ok(None);
        }
    };

    let mut path = BezPath::new();
    let mut closed = false;
    for segment in svgtypes::SimplifyingPathParser::from(value) {
        let segment = segment.map_err(|_| invalid_geometry(node, "d"))?;
        closed = matches!(segment, svgtypes::SimplePathSegment::ClosePath);

        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => {
                path.move_to((x, y));
            }
            svgtypes::SimplePathSegment::LineTo { x, y } => {
                path.line_to((x, y));
            }
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                path.quad_to((x1, y1), (x, y));
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                path.curve_to((x1, y1), (x2, y2), (x, y));
            }
            svgtypes::SimplePathSegment::ClosePath => {
                path.close_path();
            }
        }
    }

    // Subpaths are concatenated. A close segment doesn't add a point.
    let mut points = Vec::new();
    path.flatten(tolerance.max(MIN_TOLERANCE), |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(to_point(p.x, p.y, offset)),
        _ => {}
    });

    if points.is_empty() {
        log::warn!("Path '{}' has no segments. Skipped.", element_id(node));
        return Ok(None);
    }

    // An open path is terminated by an explicit copy of its last point.
    let open = !closed;
    if open {
        if let Some(&last) = points.last() {
            points.push(last);
        }
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    Ok(Some(Command::precise_path(points, open)))
}

fn convert_circle(node: roxmltree::Node, offset: (f64, f64)) -> Result<Option<Command>, Error> {
    let cx = number_attribute(node, "cx")?.unwrap_or(0.0);
    let cy = number_attribute(node, "cy")?.unwrap_or(0.0);
    let r = number_attribute(node, "r")?.unwrap_or(0.0);

    let radius = round_half_up(r as f32);
    if !(radius > 0.0) {
        log::warn!(
            "Circle '{}' has an invalid 'r' value. Skipped.",
            element_id(node)
        );
        return Ok(None);
    }

    let center = to_point(cx, cy, offset).round();
    Ok(Some(Command::circle(center, radius as u16)))
}

fn convert_line(node: roxmltree::Node, offset: (f64, f64)) -> Result<Option<Command>, Error> {
    let x1 = number_attribute(node, "x1")?.unwrap_or(0.0);
    let y1 = number_attribute(node, "y1")?.unwrap_or(0.0);
    let x2 = number_attribute(node, "x2")?.unwrap_or(0.0);
    let y2 = number_attribute(node, "y2")?.unwrap_or(0.0);

    let points = vec![to_point(x1, y1, offset), to_point(x2, y2, offset)];
    Ok(Some(Command::precise_path(points, true)))
}

fn convert_rect(node: roxmltree::Node, offset: (f64, f64)) -> Result<Option<Command>, Error> {
    // 'width' and 'height' attributes must be positive and non-zero.
    let width = number_attribute(node, "width")?.unwrap_or(0.0);
    let height = number_attribute(node, "height")?.unwrap_or(0.0);
    if !(width > 0.0) {
        log::warn!(
            "Rect '{}' has an invalid 'width' value. Skipped.",
            element_id(node)
        );
        return Ok(None);
    }
    if !(height > 0.0) {
        log::warn!(
            "Rect '{}' has an invalid 'height' value. Skipped.",
            element_id(node)
        );
        return Ok(None);
    }

    let x = number_attribute(node, "x")?.unwrap_or(0.0);
    let y = number_attribute(node, "y")?.unwrap_or(0.0);

    let points = vec![
        to_point(x, y, offset),
        to_point(x + width, y, offset),
        to_point(x + width, y + height, offset),
        to_point(x, y + height, offset),
    ];

    Ok(Some(Command::precise_path(points, false)))
}

fn convert_points(
    node: roxmltree::Node,
    offset: (f64, f64),
    open: bool,
) -> Result<Option<Command>, Error> {
    let text = node.attribute("points").unwrap_or_default().trim();

    // A bad token or an unpaired coordinate is an error.
    let mut numbers = Vec::new();
    for n in svgtypes::NumberListParser::from(text) {
        numbers.push(n.map_err(|_| invalid_geometry(node, "points"))?);
    }

    if numbers.len() % 2 != 0 {
        return Err(invalid_geometry(node, "points"));
    }

    let points: Vec<_> = numbers
        .chunks_exact(2)
        .map(|c| to_point(c[0], c[1], offset))
        .collect();

    if points.is_empty() {
        log::warn!(
            "{} '{}' has no points. Skipped.",
            node.tag_name().name(),
            element_id(node)
        );
        return Ok(None);
    }

    Ok(Some(Command::precise_path(points, open)))
}

#[inline]
fn to_point(x: f64, y: f64, (dx, dy): (f64, f64)) -> Point {
    Point::new((x + dx) as f32, (y + dy) as f32)
}

fn number_attribute(node: roxmltree::Node, name: &str) -> Result<Option<f64>, Error> {
    match node.attribute(name) {
        Some(value) => parse_number(value)
            .map(Some)
            .ok_or_else(|| invalid_geometry(node, name)),
        None => Ok(None),
    }
}

fn invalid_geometry(node: roxmltree::Node, attribute: &str) -> Error {
    Error::InvalidGeometry {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
    }
}

fn element_id<'a>(node: roxmltree::Node<'a, '_>) -> &'a str {
    node.attribute("id").unwrap_or_default()
}
