use pdc::{Color, Command, CommandKind, DecodeError, Image, Point};

#[test]
fn blank_template() {
    let image = pdc::decode(&pdc::BLANK_IMAGE).unwrap();
    assert_eq!(image.width, 50);
    assert_eq!(image.height, 50);
    assert_eq!(image.version, 1);
    assert!(image.commands.is_empty());
    assert_eq!(image, Image::blank());
}

#[test]
fn round_trip() {
    let mut path = Command::path(
        vec![Point::new(-3.0, 7.0), Point::new(144.0, 168.0), Point::new(0.0, 0.0)],
        false,
    );
    path.stroke_color = Color::from_byte(0xFC);
    path.stroke_width = 2;

    let mut circle = Command::circle(Point::new(72.0, 84.0), 40);
    circle.fill_color = Color::from_byte(0xC5);

    let mut precise = Command::precise_path(
        vec![Point::new(10.125, -3.375), Point::new(0.875, 99.5)],
        true,
    );
    precise.hidden = true;
    precise.fill_color = Color::from_byte(0x7F);

    let image = Image {
        width: 144,
        height: 168,
        version: 1,
        commands: vec![path, circle, precise],
    };

    let data = image.to_pdc();
    assert_eq!(Image::from_pdc(&data).unwrap(), image);
}

#[test]
fn precise_path_rounding() {
    let image = Image {
        commands: vec![Command::precise_path(
            vec![Point::new(10.125, -3.375), Point::new(10.1, 0.0)],
            false,
        )],
        ..Image::blank()
    };

    let decoded = pdc::decode(&pdc::encode(&image)).unwrap();
    assert_eq!(
        decoded.commands[0].points,
        vec![Point::new(10.125, -3.375), Point::new(10.125, 0.0)]
    );
}

#[test]
fn integer_path_rounding() {
    let image = Image {
        commands: vec![Command::path(
            vec![Point::new(1.5, -1.5), Point::new(2.4, 2.6)],
            true,
        )],
        ..Image::blank()
    };

    let decoded = pdc::decode(&pdc::encode(&image)).unwrap();
    assert_eq!(
        decoded.commands[0].points,
        vec![Point::new(2.0, -1.0), Point::new(2.0, 3.0)]
    );
}

#[test]
fn bad_magic() {
    let mut data = pdc::BLANK_IMAGE.to_vec();
    data[3] = b'X';
    let err = pdc::decode(&data).unwrap_err();
    assert_eq!(err, DecodeError::BadMagic);
    assert!(err.is_format_error());
    assert!(!err.is_truncated());

    assert_eq!(pdc::decode(b"<svg/>"), Err(DecodeError::BadMagic));
}

#[test]
fn trailing_data_is_ignored() {
    let mut data = pdc::BLANK_IMAGE.to_vec();
    data.extend_from_slice(&[1, 2, 3]);
    assert_eq!(pdc::decode(&data).unwrap(), Image::blank());
}

#[test]
fn declared_length_is_not_validated() {
    let mut data = pdc::BLANK_IMAGE.to_vec();
    data[4] = 200;
    assert_eq!(pdc::decode(&data).unwrap(), Image::blank());
}

#[test]
fn truncated_data() {
    let image = Image {
        commands: vec![Command::circle(Point::new(1.0, 1.0), 1)],
        ..Image::blank()
    };
    let data = pdc::encode(&image);

    for len in 4..data.len() {
        let err = pdc::decode(&data[..len]).unwrap_err();
        assert!(err.is_truncated(), "length {}", len);
    }
}

#[test]
fn large_size_wraps() {
    let mut data = pdc::BLANK_IMAGE.to_vec();
    data[10..12].copy_from_slice(&[0x00, 0x80]);
    let image = pdc::decode(&data).unwrap();
    assert_eq!(image.width, i16::MIN);

    // Written back as the same unsigned bits.
    assert_eq!(&pdc::encode(&image)[10..12], &[0x00, 0x80]);
}

#[test]
fn legacy_open_flag() {
    let mut data = pdc::BLANK_IMAGE.to_vec();
    data[14] = 2;
    data.extend_from_slice(&[3, 0, 0, 0, 0, 0, 1, 0, 0]);
    data.extend_from_slice(&[3, 0, 0, 0, 0, 3, 3, 0, 0]);

    let image = pdc::decode(&data).unwrap();
    assert_eq!(image.commands[0].kind, CommandKind::PrecisePath { open: true });
    assert_eq!(image.commands[1].kind, CommandKind::PrecisePath { open: false });
}

#[test]
fn import_then_encode() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'>
        <rect x='0.5' y='0.5' width='9' height='9' fill='red' stroke='black'/>
    </svg>
    ";

    let image = pdc::import_svg(svg, &pdc::Options::default()).unwrap();
    let data = image.to_pdc();
    assert_eq!(&data[0..4], pdc::MAGIC);
    assert_eq!(Image::from_pdc(&data).unwrap(), image);
}
