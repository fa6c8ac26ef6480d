// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{COMMAND_HEADER_SIZE, HEADER_SIZE, MAGIC, POINT_SIZE, PRECISE_SCALE};
use crate::tree::round_half_up;
use crate::{Command, CommandKind, Image};

trait WriteExt {
    fn write_u8(&mut self, n: u8);
    fn write_u16(&mut self, n: u16);
    fn write_u32(&mut self, n: u32);
}

impl WriteExt for Vec<u8> {
    #[inline]
    fn write_u8(&mut self, n: u8) {
        self.push(n);
    }

    #[inline]
    fn write_u16(&mut self, n: u16) {
        self.extend_from_slice(&n.to_le_bytes());
    }

    #[inline]
    fn write_u32(&mut self, n: u32) {
        self.extend_from_slice(&n.to_le_bytes());
    }
}

/// Serializes an [`Image`] into PDC data.
///
/// Never fails. Values outside of a field range wrap around,
/// so callers that care must validate the image beforehand.
pub fn encode(image: &Image) -> Vec<u8> {
    let points_count: usize = image.commands.iter().map(|c| c.points.len()).sum();
    let capacity = HEADER_SIZE
        + image.commands.len() * COMMAND_HEADER_SIZE
        + points_count * POINT_SIZE;

    let mut payload = Vec::with_capacity(capacity - MAGIC.len() - 4);
    payload.write_u8(image.version);
    payload.write_u8(0);
    payload.write_u16(image.width as u16);
    payload.write_u16(image.height as u16);
    payload.write_u16(image.commands.len() as u16);

    for cmd in &image.commands {
        encode_command(cmd, &mut payload);
    }

    let mut data = Vec::with_capacity(capacity);
    data.extend_from_slice(MAGIC);
    data.write_u32(payload.len() as u32);
    data.extend_from_slice(&payload);
    data
}

fn encode_command(cmd: &Command, out: &mut Vec<u8>) {
    out.write_u8(cmd.command_type() as u8);
    out.write_u8(cmd.hidden as u8);
    out.write_u8(cmd.stroke_color.to_byte());
    out.write_u8(cmd.stroke_width);
    out.write_u8(cmd.fill_color.to_byte());

    let scale = match cmd.kind {
        CommandKind::Path { open } => {
            out.extend_from_slice(&[open as u8, 0]);
            1.0
        }
        CommandKind::PrecisePath { open } => {
            out.extend_from_slice(&[open as u8, 0]);
            PRECISE_SCALE
        }
        CommandKind::Circle { radius } => {
            out.write_u16(radius);
            1.0
        }
    };

    out.write_u16(cmd.points.len() as u16);
    for p in &cmd.points {
        out.write_u16(to_fixed(p.x, scale));
        out.write_u16(to_fixed(p.y, scale));
    }
}

// Wraps modulo 2^16, so 40000 is stored as -25536.
#[inline]
fn to_fixed(n: f32, scale: f32) -> u16 {
    round_half_up(n * scale) as i64 as u16
}
