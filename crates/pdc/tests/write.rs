use pdc::{Color, Command, Image, Point, WriteOptions};

fn image(commands: Vec<Command>) -> Image {
    Image {
        width: 20,
        height: 30,
        version: 1,
        commands,
    }
}

fn red_triangle() -> Command {
    let mut cmd = Command::path(
        vec![Point::new(1.0, 2.0), Point::new(10.0, 2.0), Point::new(5.5, 8.25)],
        false,
    );
    cmd.fill_color = Color::from_byte(0xF0);
    cmd
}

#[test]
fn root_element() {
    let svg = image(Vec::new()).to_svg(&WriteOptions::default());
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"width="20""#));
    assert!(svg.contains(r#"height="30""#));
    assert!(svg.contains(r#"viewBox="0 0 20 30""#));
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
}

#[test]
fn path_data() {
    let svg = image(vec![red_triangle()]).to_svg(&WriteOptions::default());
    assert!(svg.contains(r#"d="M 1 2 L 10 2 L 5.5 8.25 Z""#));
    assert!(svg.contains(r##"fill="#ff0000""##));
    assert!(!svg.contains("stroke"));
}

#[test]
fn open_path_data() {
    let mut cmd = red_triangle();
    cmd.kind = pdc::CommandKind::PrecisePath { open: true };
    let svg = image(vec![cmd]).to_svg(&WriteOptions::default());
    assert!(svg.contains(r#"d="M 1 2 L 10 2 L 5.5 8.25""#));
}

#[test]
fn empty_path_is_skipped() {
    let cmd = Command::path(Vec::new(), false);
    let svg = image(vec![cmd]).to_svg(&WriteOptions::default());
    assert!(!svg.contains("<path"));
}

#[test]
fn circles() {
    let mut cmd = Command::circle(Point::new(4.0, 5.0), 3);
    cmd.points.push(Point::new(12.0, 13.0));
    cmd.stroke_color = Color::from_byte(0xC3);
    cmd.stroke_width = 2;

    let svg = image(vec![cmd]).to_svg(&WriteOptions::default());
    assert_eq!(svg.matches("<circle").count(), 2);
    assert!(svg.contains(r#"cx="4" cy="5" r="3""#));
    assert!(svg.contains(r#"cx="12" cy="13" r="3""#));
    assert!(svg.contains(r#"fill="none""#));
    assert!(svg.contains(r##"stroke="#0000ff""##));
    assert!(svg.contains(r#"stroke-width="2""#));
}

#[test]
fn zero_stroke_width_is_not_written() {
    let mut cmd = red_triangle();
    cmd.stroke_color = Color::from_byte(0xC0);
    cmd.stroke_width = 0;
    let svg = image(vec![cmd]).to_svg(&WriteOptions::default());
    assert!(!svg.contains("stroke"));
}

#[test]
fn semi_transparent_fill() {
    let mut cmd = red_triangle();
    cmd.fill_color = Color::from_byte(0x8C);
    let svg = image(vec![cmd]).to_svg(&WriteOptions::default());
    assert!(svg.contains(r##"fill="#00ff00""##));
    assert!(svg.contains(r#"fill-opacity="0.667""#));
}

#[test]
fn precision() {
    let mut cmd = red_triangle();
    cmd.fill_color = Color::from_byte(0x4C);
    let opt = WriteOptions {
        precision: 1,
        ..WriteOptions::default()
    };
    let svg = image(vec![cmd]).to_svg(&opt);
    assert!(svg.contains(r#"fill-opacity="0.3""#));
    assert!(svg.contains(r#"L 5.5 8.3 Z"#));
}

#[test]
fn hidden_commands() {
    let mut hidden = red_triangle();
    hidden.hidden = true;
    let img = image(vec![hidden]);

    let svg = img.to_svg(&WriteOptions::default());
    assert!(!svg.contains("<path"));

    let opt = WriteOptions {
        include_hidden: true,
        ..WriteOptions::default()
    };
    let svg = img.to_svg(&opt);
    assert!(svg.contains("<path"));
    assert!(svg.contains(r#"visibility="hidden""#));
}

#[test]
fn export_then_import() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'>
        <rect width='10' height='10' fill='red' stroke='black'/>
        <circle cx='5' cy='5' r='2' fill='blue' fill-opacity='0.67'/>
    </svg>
    ";

    let opt = pdc::Options::default();
    let img = pdc::import_svg(svg, &opt).unwrap();
    assert_eq!(img.commands.len(), 2);

    let exported = img.to_svg(&WriteOptions::default());
    let img2 = pdc::import_svg(&exported, &opt).unwrap();
    assert_eq!(img, img2);
}
