// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod color;

pub use self::color::*;

/// A point in logical units.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new `Point`.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Returns a point with both coordinates rounded to whole units.
    #[inline]
    pub fn round(self) -> Self {
        Point::new(round_half_up(self.x), round_half_up(self.y))
    }
}

impl From<(f32, f32)> for Point {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Rounds to the nearest integer, with halves rounded towards positive infinity.
///
/// Unlike `f32::round`, `-2.5` becomes `-2`.
#[inline]
pub(crate) fn round_half_up(n: f32) -> f32 {
    (n + 0.5).floor()
}

/// A command type tag, as stored in a PDC file.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum CommandType {
    /// A path with integer coordinates.
    Path = 1,
    /// A circle.
    Circle = 2,
    /// A path with coordinates on a 1/8 unit grid.
    PrecisePath = 3,
}

impl TryFrom<u8> for CommandType {
    type Error = u8;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(CommandType::Path),
            2 => Ok(CommandType::Circle),
            3 => Ok(CommandType::PrecisePath),
            _ => Err(n),
        }
    }
}

/// A variant-specific part of a [`Command`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CommandKind {
    /// A path with integer coordinates.
    Path {
        /// Whether the last point is left unconnected to the first one.
        open: bool,
    },
    /// A circle. Each point is a center.
    Circle {
        /// Circle radius.
        radius: u16,
    },
    /// A path with coordinates on a 1/8 unit grid.
    PrecisePath {
        /// Whether the last point is left unconnected to the first one.
        open: bool,
    },
}

/// A draw command.
///
/// Equality is structural: the variant, style fields and every point are compared.
#[derive(Clone, PartialEq, Debug)]
pub struct Command {
    /// Hidden commands are kept in the file but are not drawn.
    pub hidden: bool,
    /// Stroke color.
    pub stroke_color: Color,
    /// Stroke width in logical units.
    pub stroke_width: u8,
    /// Fill color.
    pub fill_color: Color,
    /// Variant-specific data.
    pub kind: CommandKind,
    /// Command points.
    ///
    /// Path points for paths, centers for circles.
    pub points: Vec<Point>,
}

impl Command {
    /// Creates an unstyled integer path.
    pub fn path(points: Vec<Point>, open: bool) -> Self {
        Self::with_kind(CommandKind::Path { open }, points)
    }

    /// Creates an unstyled precise path.
    pub fn precise_path(points: Vec<Point>, open: bool) -> Self {
        Self::with_kind(CommandKind::PrecisePath { open }, points)
    }

    /// Creates an unstyled circle.
    pub fn circle(center: Point, radius: u16) -> Self {
        Self::with_kind(CommandKind::Circle { radius }, vec![center])
    }

    fn with_kind(kind: CommandKind, points: Vec<Point>) -> Self {
        Command {
            hidden: false,
            stroke_color: Color::TRANSPARENT,
            stroke_width: 0,
            fill_color: Color::TRANSPARENT,
            kind,
            points,
        }
    }

    /// Returns the command type tag.
    pub fn command_type(&self) -> CommandType {
        match self.kind {
            CommandKind::Path { .. } => CommandType::Path,
            CommandKind::Circle { .. } => CommandType::Circle,
            CommandKind::PrecisePath { .. } => CommandType::PrecisePath,
        }
    }

    /// Returns a human readable command name.
    pub fn name(&self) -> &'static str {
        match self.kind {
            CommandKind::Path { .. } => "path",
            CommandKind::Circle { .. } => "circle",
            CommandKind::PrecisePath { .. } => "precise-path",
        }
    }

    /// Returns the `open` flag of a path.
    ///
    /// Always `false` for circles.
    pub fn is_open(&self) -> bool {
        match self.kind {
            CommandKind::Path { open } | CommandKind::PrecisePath { open } => open,
            CommandKind::Circle { .. } => false,
        }
    }

    /// Returns the radius of a circle.
    pub fn radius(&self) -> Option<u16> {
        match self.kind {
            CommandKind::Circle { radius } => Some(radius),
            _ => None,
        }
    }

    /// Converts a precise path into an integer path.
    ///
    /// Every coordinate is rounded to the nearest integer, so the sub-unit precision is lost.
    /// An integer path is returned as is. Returns `None` for circles.
    pub fn to_path(&self) -> Option<Command> {
        match self.kind {
            CommandKind::Path { .. } => Some(self.clone()),
            CommandKind::PrecisePath { open } => Some(Command {
                kind: CommandKind::Path { open },
                points: self.points.iter().map(|p| p.round()).collect(),
                ..self.clone()
            }),
            CommandKind::Circle { .. } => None,
        }
    }

    /// Converts an integer path into a precise path.
    ///
    /// The conversion is exact. A precise path is returned as is.
    /// Returns `None` for circles.
    pub fn to_precise(&self) -> Option<Command> {
        match self.kind {
            CommandKind::Path { open } => Some(Command {
                kind: CommandKind::PrecisePath { open },
                ..self.clone()
            }),
            CommandKind::PrecisePath { .. } => Some(self.clone()),
            CommandKind::Circle { .. } => None,
        }
    }

    /// Offsets every point.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "-=-=-=- {} -=-=-=-", self.name())?;
        writeln!(f, "Hidden: {}", self.hidden)?;
        writeln!(f, "Stroke Color: {}", self.stroke_color.to_byte())?;
        writeln!(f, "Stroke Width: {}", self.stroke_width)?;
        writeln!(f, "Fill Color: {}", self.fill_color.to_byte())?;
        match self.kind {
            CommandKind::Path { open } | CommandKind::PrecisePath { open } => {
                writeln!(f, "Path Open: {}", open)?;
            }
            CommandKind::Circle { radius } => {
                writeln!(f, "Radius: {}", radius)?;
            }
        }

        write!(f, "Points: [")?;
        for (i, p) in self.points.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "[{},{}]", p.x, p.y)?;
        }
        write!(f, "]")
    }
}

/// A PDC image.
///
/// Commands are stored in draw order: the first command is painted first
/// and later commands are painted on top of it.
#[derive(Clone, PartialEq, Debug)]
pub struct Image {
    /// Image width in logical units.
    pub width: i16,
    /// Image height in logical units.
    pub height: i16,
    /// Format version.
    pub version: u8,
    /// Draw commands.
    pub commands: Vec<Command>,
}

impl Default for Image {
    fn default() -> Self {
        Image {
            width: 0,
            height: 0,
            version: 1,
            commands: Vec::new(),
        }
    }
}

impl Image {
    /// Creates the built-in blank document: 50x50, version 1, no commands.
    pub fn blank() -> Self {
        Image {
            width: 50,
            height: 50,
            ..Image::default()
        }
    }
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "Image {}x{}, version {}, {} command(s)",
            self.width,
            self.height,
            self.version,
            self.commands.len()
        )?;

        for cmd in &self.commands {
            writeln!(f, "{}", cmd)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled_precise() -> Command {
        let mut cmd = Command::precise_path(
            vec![Point::new(10.125, -3.375), Point::new(2.5, -2.5), Point::new(0.0, 7.875)],
            true,
        );
        cmd.hidden = true;
        cmd.stroke_color = Color::from_byte(0xFF);
        cmd.stroke_width = 2;
        cmd.fill_color = Color::from_byte(0xC3);
        cmd
    }

    #[test]
    fn clone_is_deep() {
        let cmd = styled_precise();
        let mut copy = cmd.clone();
        assert_eq!(cmd, copy);

        copy.points[0].x = 1.0;
        assert_ne!(cmd, copy);
        assert_eq!(cmd.points[0].x, 10.125);
    }

    #[test]
    fn equality_checks_variant() {
        let path = Command::path(vec![Point::new(1.0, 2.0)], false);
        let precise = Command::precise_path(vec![Point::new(1.0, 2.0)], false);
        assert_ne!(path, precise);
    }

    #[test]
    fn equality_checks_variant_field() {
        let a = Command::circle(Point::new(5.0, 5.0), 3);
        let b = Command::circle(Point::new(5.0, 5.0), 4);
        assert_ne!(a, b);

        let a = Command::path(vec![Point::new(1.0, 2.0)], false);
        let b = Command::path(vec![Point::new(1.0, 2.0)], true);
        assert_ne!(a, b);
    }

    #[test]
    fn to_path_rounds() {
        let path = styled_precise().to_path().unwrap();
        assert_eq!(path.command_type(), CommandType::Path);
        assert_eq!(
            path.points,
            vec![Point::new(10.0, -3.0), Point::new(3.0, -2.0), Point::new(0.0, 8.0)]
        );
        assert!(path.hidden);
        assert!(path.is_open());
        assert_eq!(path.stroke_width, 2);
        assert_eq!(path.fill_color, Color::from_byte(0xC3));
    }

    #[test]
    fn to_precise_is_exact() {
        let path = Command::path(vec![Point::new(1.0, -2.0), Point::new(30.0, 4.0)], true);
        let precise = path.to_precise().unwrap();
        assert_eq!(precise.command_type(), CommandType::PrecisePath);
        assert_eq!(precise.points, path.points);
        assert_eq!(precise.to_path().unwrap(), path);
    }

    #[test]
    fn circle_has_no_path_form() {
        let circle = Command::circle(Point::new(5.0, 5.0), 3);
        assert!(circle.to_path().is_none());
        assert!(circle.to_precise().is_none());
        assert_eq!(circle.radius(), Some(3));
        assert!(!circle.is_open());
    }

    #[test]
    fn command_type_tags() {
        assert_eq!(CommandType::try_from(1), Ok(CommandType::Path));
        assert_eq!(CommandType::try_from(2), Ok(CommandType::Circle));
        assert_eq!(CommandType::try_from(3), Ok(CommandType::PrecisePath));
        assert_eq!(CommandType::try_from(0), Err(0));
        assert_eq!(CommandType::try_from(4), Err(4));
        assert_eq!(CommandType::PrecisePath as u8, 3);
    }

    #[test]
    fn translate_points() {
        let mut cmd = Command::path(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)], false);
        cmd.translate(-1.0, 0.5);
        assert_eq!(cmd.points, vec![Point::new(0.0, 2.5), Point::new(2.0, 4.5)]);
    }

    #[test]
    fn dump() {
        let cmd = Command::circle(Point::new(5.0, 6.0), 3);
        assert_eq!(
            cmd.to_string(),
            "-=-=-=- circle -=-=-=-\n\
             Hidden: false\n\
             Stroke Color: 0\n\
             Stroke Width: 0\n\
             Fill Color: 0\n\
             Radius: 3\n\
             Points: [[5,6]]"
        );
    }

    #[test]
    fn blank_template() {
        let img = Image::blank();
        assert_eq!((img.width, img.height, img.version), (50, 50, 1));
        assert!(img.commands.is_empty());
    }
}
