// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{self, Read, Write};
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
pdc converts SVG images into PDC (Pebble Draw Command) images and back.

USAGE:
  pdc [OPTIONS] <input> <output>    # from file to file
  pdc [OPTIONS] <input> -c          # from file to stdout, as a text dump
  pdc [OPTIONS] - <output>          # from stdin to file

  The input format is detected by its content: PDC, SVG or SVGZ.
  The output format is detected by the file extension: .pdc or .svg.

OPTIONS:
  -h, --help                        Prints help information
  -V, --version                     Prints version information
  -c, --info                        Prints the image commands to the stdout

  --color-mode MODE                 Selects how SVG colors are reduced to
                                    the 64 colors palette
                                    [default: truncate]
                                    [possible values: truncate, nearest]
  --tolerance NUM                   Sets the curves flattening tolerance
                                    in logical units
                                    [default: 0.25] [possible values: 0.01..10 (inclusive)]
  --stroke-width NUM                Sets the stroke width used when an element
                                    doesn't have one
                                    [default: 1] [possible values: 0..255 (inclusive)]
  --include-hidden                  Writes hidden commands during SVG export
  --quiet                           Disables warnings

ARGS:
  <input>                           Input file
  <output>                          Output file
";

#[derive(Debug)]
struct Args {
    color_mode: pdc::QuantizeMode,
    tolerance: f64,
    stroke_width: u8,
    include_hidden: bool,
    quiet: bool,
    info: bool,

    input: String,
    output: Option<String>,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    let info = input.contains(["-c", "--info"]);

    Ok(Args {
        color_mode: input.opt_value_from_str("--color-mode")?.unwrap_or_default(),
        tolerance: input
            .opt_value_from_fn("--tolerance", parse_tolerance)?
            .unwrap_or(0.25),
        stroke_width: input.opt_value_from_str("--stroke-width")?.unwrap_or(1),
        include_hidden: input.contains("--include-hidden"),
        quiet: input.contains("--quiet"),
        info,

        input: input.free_from_str()?,
        output: input.opt_free_from_str()?,
    })
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid number")?;

    if (0.01..=10.0).contains(&n) {
        Ok(n)
    } else {
        Err("tolerance out of bounds".to_string())
    }
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom<'a> {
    Stdin,
    File(&'a str),
}

#[derive(Clone, PartialEq, Debug)]
enum OutputTo<'a> {
    Stdout,
    Pdc(&'a str),
    Svg(&'a str),
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let from = match args.input.as_str() {
        "-" => InputFrom::Stdin,
        path => InputFrom::File(path),
    };

    let to = match (args.info, args.output.as_deref()) {
        (true, None) => OutputTo::Stdout,
        (true, Some(_)) => return Err("-c and an output file cannot be used together".to_string()),
        (false, None) => return Err("an output file or -c is required".to_string()),
        (false, Some(path)) => {
            let ext = std::path::Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());
            match ext.as_deref() {
                Some("pdc") => OutputTo::Pdc(path),
                Some("svg") => OutputTo::Svg(path),
                _ => return Err(format!("'{}' has an unknown extension", path)),
            }
        }
    };

    let data = match from {
        InputFrom::Stdin => load_stdin(),
        InputFrom::File(path) => std::fs::read(path).map_err(|e| e.to_string()),
    }?;

    let image = if data.starts_with(pdc::MAGIC) {
        pdc::decode(&data).map_err(|e| e.to_string())?
    } else {
        let opt = pdc::Options {
            color_mode: args.color_mode,
            curve_tolerance: args.tolerance,
            default_stroke_width: args.stroke_width,
            ..pdc::Options::default()
        };

        pdc::import_svg_data(&data, &opt).map_err(|e| e.to_string())?
    };

    match to {
        OutputTo::Stdout => {
            io::stdout()
                .write_all(image.to_string().as_bytes())
                .map_err(|_| "failed to write to the stdout".to_string())?;
        }
        OutputTo::Pdc(path) => write_file(path, &pdc::encode(&image))?,
        OutputTo::Svg(path) => {
            let opt = pdc::WriteOptions {
                include_hidden: args.include_hidden,
                ..pdc::WriteOptions::default()
            };

            write_file(path, pdc::write_svg(&image, &opt).as_bytes())?;
        }
    }

    Ok(())
}

fn write_file(path: &str, data: &[u8]) -> Result<(), String> {
    let mut f = File::create(path).map_err(|_| "failed to create the output file".to_string())?;
    f.write_all(data)
        .map_err(|_| "failed to write to the output file".to_string())
}

fn load_stdin() -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();

    handle
        .read_to_end(&mut buf)
        .map_err(|_| "failed to read from stdin".to_string())?;

    Ok(buf)
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
