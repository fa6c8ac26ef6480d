// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use strict_num::NormalizedF32;
use svgtypes::{Length, LengthUnit};

use super::OptionLog;
use crate::{Color, QuantizeMode};

/// An alias to `NormalizedF32`.
pub(crate) type Opacity = NormalizedF32;

/// Presentation properties of an element.
///
/// When an element has a non-empty `style` attribute, only its declarations
/// are used and the presentation attributes are ignored.
pub(crate) struct Declarations<'a, 'input: 'a> {
    node: roxmltree::Node<'a, 'input>,
    style: Vec<(&'a str, &'a str)>,
}

impl<'a, 'input: 'a> Declarations<'a, 'input> {
    pub fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        let style = node
            .attribute("style")
            .map(|value| {
                simplecss::DeclarationTokenizer::from(value)
                    .map(|d| (d.name, d.value))
                    .collect()
            })
            .unwrap_or_default();

        Declarations { node, style }
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        let value = if self.style.is_empty() {
            self.node.attribute(name)
        } else {
            // The last declaration wins.
            self.style.iter().rev().find(|(n, _)| *n == name).map(|(_, v)| *v)
        };

        value.map(str::trim)
    }

    /// Checks for `display="none"` in both attributes and the style block.
    pub fn is_hidden(&self) -> bool {
        self.node.attribute("display").map(str::trim) == Some("none")
            || self.get("display") == Some("none")
    }
}

/// A resolved paint.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum Paint {
    /// An explicit `none`.
    None,
    Color(svgtypes::Color),
}

/// Style properties inherited by the element's descendants.
///
/// `None` means that neither the element nor any of its ancestors sets the property.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct Style {
    pub opacity: Option<Opacity>,
    pub fill: Option<Paint>,
    pub fill_opacity: Option<Opacity>,
    pub stroke: Option<Paint>,
    pub stroke_opacity: Option<Opacity>,
    pub stroke_width: Option<u8>,
    pub color: Option<svgtypes::Color>,
}

impl Style {
    /// Creates a style of an element.
    ///
    /// Properties set by `decls` override the inherited ones.
    /// A stroke width is truncated and clamped to `min_stroke_width..=255`.
    pub fn resolve(&self, decls: &Declarations, min_stroke_width: u8) -> Style {
        // `color` must be resolved first, since `currentColor` depends on it.
        let color = decls
            .get("color")
            .and_then(|v| {
                svgtypes::Color::from_str(v)
                    .ok()
                    .log_none(|| log::warn!("Failed to parse color value: '{}'.", v))
            })
            .or(self.color);
        let current_color = color.unwrap_or_else(svgtypes::Color::black);

        let paint = |name: &str| {
            decls
                .get(name)
                .and_then(|v| parse_paint(name, v, current_color))
        };
        let opacity = |name: &str| decls.get(name).and_then(|v| parse_opacity(name, v));

        let stroke_width = decls
            .get("stroke-width")
            .and_then(|v| {
                parse_number(v).log_none(|| {
                    log::warn!("Failed to parse stroke-width value: '{}'.", v)
                })
            })
            .map(|n| {
                let n = n.trunc().clamp(min_stroke_width as f64, u8::MAX as f64);
                n as u8
            });

        Style {
            opacity: opacity("opacity").or(self.opacity),
            fill: paint("fill").or(self.fill),
            fill_opacity: opacity("fill-opacity").or(self.fill_opacity),
            stroke: paint("stroke").or(self.stroke),
            stroke_opacity: opacity("stroke-opacity").or(self.stroke_opacity),
            stroke_width: stroke_width.or(self.stroke_width),
            color,
        }
    }

    pub fn fill_color(&self, mode: QuantizeMode) -> Color {
        paint_to_color(self.fill, self.fill_opacity, self.opacity, mode)
    }

    pub fn stroke_color(&self, mode: QuantizeMode) -> Color {
        paint_to_color(self.stroke, self.stroke_opacity, self.opacity, mode)
    }
}

/// Converts a paint into a packed color.
///
/// The effective alpha is `paint alpha * paint opacity * opacity`,
/// with missing factors treated as `1`.
fn paint_to_color(
    paint: Option<Paint>,
    paint_opacity: Option<Opacity>,
    opacity: Option<Opacity>,
    mode: QuantizeMode,
) -> Color {
    let c = match paint {
        Some(Paint::Color(c)) => c,
        Some(Paint::None) | None => return Color::TRANSPARENT,
    };

    let paint_opacity = paint_opacity.unwrap_or(Opacity::ONE);
    let opacity = opacity.unwrap_or(Opacity::ONE);
    let alpha = paint_opacity.get() * opacity.get() * (c.alpha as f32 / 255.0);
    let alpha = (alpha * 255.0).round() as u8;

    Color::from_rgba8(c.red, c.green, c.blue, alpha, mode)
}

fn parse_paint(name: &str, value: &str, current_color: svgtypes::Color) -> Option<Paint> {
    let paint = match svgtypes::Paint::from_str(value) {
        Ok(v) => v,
        Err(_) => {
            log::warn!("Failed to parse {} value: '{}'.", name, value);
            return None;
        }
    };

    match paint {
        svgtypes::Paint::None => Some(Paint::None),
        svgtypes::Paint::Color(c) => Some(Paint::Color(c)),
        svgtypes::Paint::CurrentColor => Some(Paint::Color(current_color)),
        svgtypes::Paint::FuncIRI(link, fallback) => {
            log::warn!("Paint servers are not supported. '{}' will use a fallback.", link);
            match fallback {
                Some(svgtypes::PaintFallback::Color(c)) => Some(Paint::Color(c)),
                Some(svgtypes::PaintFallback::CurrentColor) => Some(Paint::Color(current_color)),
                Some(svgtypes::PaintFallback::None) | None => Some(Paint::None),
            }
        }
        // `inherit` and context paints resolve to the inherited value.
        _ => None,
    }
}

/// Parses an opacity as a number or a percentage and clamps it to `0..=1`.
fn parse_opacity(name: &str, value: &str) -> Option<Opacity> {
    let length = Length::from_str(value)
        .ok()
        .log_none(|| log::warn!("Failed to parse {} value: '{}'.", name, value))?;

    let n = match length.unit {
        LengthUnit::None => length.number,
        LengthUnit::Percent => length.number / 100.0,
        _ => {
            log::warn!("Failed to parse {} value: '{}'.", name, value);
            return None;
        }
    };

    Some(Opacity::new_clamped(n as f32))
}

/// Parses a number, ignoring its unit.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    Length::from_str(value.trim()).ok().map(|l| l.number)
}
