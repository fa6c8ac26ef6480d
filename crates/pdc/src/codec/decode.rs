// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{DecodeError, COMMAND_HEADER_SIZE, MAGIC, POINT_SIZE, PRECISE_SCALE};
use crate::{Color, Command, CommandKind, CommandType, Image, Point};

/// A bounds-checked little-endian reader.
struct Stream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Stream<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Stream { data, pos: 0 }
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEndOfData {
                offset: self.pos,
                expected: len,
            })?;

        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn read_i16(&mut self) -> Result<i16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Parses an [`Image`] from PDC data.
///
/// Fails fast: no partial image is returned on error.
pub fn decode(data: &[u8]) -> Result<Image, DecodeError> {
    if !data.starts_with(MAGIC) {
        return Err(DecodeError::BadMagic);
    }

    let mut s = Stream::new(data);
    s.read_bytes(MAGIC.len())?;

    let payload_len = s.read_u32()?;
    if payload_len as usize != data.len() - s.pos {
        log::debug!(
            "Declared payload length {} doesn't match the actual one {}.",
            payload_len,
            data.len() - s.pos
        );
    }

    let version = s.read_u8()?;
    s.read_u8()?; // padding
    let width = s.read_i16()?;
    let height = s.read_i16()?;
    let commands_count = s.read_u16()?;

    let mut commands = Vec::with_capacity(commands_count as usize);
    for _ in 0..commands_count {
        commands.push(decode_command(&mut s)?);
    }

    Ok(Image {
        width,
        height,
        version,
        commands,
    })
}

fn decode_command(s: &mut Stream) -> Result<Command, DecodeError> {
    let header = s.read_bytes(COMMAND_HEADER_SIZE)?;

    let command_type = CommandType::try_from(header[0]).map_err(DecodeError::UnknownCommandType)?;
    let hidden = header[1] & 1 != 0;
    let stroke_color = Color::from_byte(header[2]);
    let stroke_width = header[3];
    let fill_color = Color::from_byte(header[4]);
    let (b5, b6) = (header[5], header[6]);
    let points_count = u16::from_le_bytes([header[7], header[8]]) as usize;

    // Legacy files store the open flag in two bytes and readers check the parity of their sum.
    let open = (b5 as u16 + b6 as u16) & 1 == 1;
    let (kind, scale) = match command_type {
        CommandType::Path => (CommandKind::Path { open }, 1.0),
        CommandType::Circle => (
            CommandKind::Circle {
                radius: u16::from_le_bytes([b5, b6]),
            },
            1.0,
        ),
        CommandType::PrecisePath => (CommandKind::PrecisePath { open }, PRECISE_SCALE),
    };

    let block = s.read_bytes(points_count * POINT_SIZE)?;
    let points = block
        .chunks_exact(POINT_SIZE)
        .map(|c| {
            let x = i16::from_le_bytes([c[0], c[1]]);
            let y = i16::from_le_bytes([c[2], c[3]]);
            Point::new(x as f32 / scale, y as f32 / scale)
        })
        .collect();

    Ok(Command {
        hidden,
        stroke_color,
        stroke_width,
        fill_color,
        kind,
        points,
    })
}
