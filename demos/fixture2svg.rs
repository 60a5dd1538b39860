//! Render test cases stored in a fixture file as SVG diagrams
#![deny(warnings)]

use clipkit::*;
use std::{env, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    input_file: String,
    output_dir: PathBuf,
    ordinal: Option<i64>,
    show_coords: bool,
    caption: bool,
    config: SvgConfig,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            input_file: String::new(),
            output_dir: PathBuf::from("."),
            ordinal: None,
            show_coords: false,
            caption: false,
            config: SvgConfig {
                coords_style: CoordsStyle {
                    font_name: "Verdana".to_owned(),
                    font_color: Argb(0xff0000aa),
                    font_size: 9,
                },
                ..SvgConfig::default()
            },
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "fixture2svg".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-j" => {
                    let path = args.next().ok_or("-j requires argument")?;
                    result.config = result
                        .config
                        .update_from_json(&std::fs::read_to_string(path)?)?;
                }
                "-W" => {
                    let width = args.next().ok_or("-W requires argument")?;
                    result.config.width = width.parse()?;
                }
                "-H" => {
                    let height = args.next().ok_or("-H requires argument")?;
                    result.config.height = height.parse()?;
                }
                "-m" => {
                    let margin = args.next().ok_or("-m requires argument")?;
                    result.config.margin = margin.parse()?;
                }
                "-n" => {
                    let ordinal = args.next().ok_or("-n requires argument")?;
                    result.ordinal = Some(ordinal.parse()?);
                }
                "-o" => {
                    let dir = args.next().ok_or("-o requires argument")?;
                    result.output_dir = PathBuf::from(dir);
                }
                "-c" => {
                    result.show_coords = true;
                }
                "-t" => {
                    result.caption = true;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.input_file = arg,
                        _ => return Err("unexpected positional argment".into()),
                    }
                }
            }
        }
        if positional < 1 {
            eprintln!("Render test cases stored in a fixture file as SVG diagrams");
            eprintln!("\nUSAGE:");
            eprintln!(
                "    {} [-n <ordinal>] [-o <dir>] [-W <width>] [-H <height>] [-m <margin>] [-j <config.json>] [-c] [-t] <fixture.txt>",
                cmd
            );
            eprintln!("\nARGS:");
            eprintln!("    -n <ordinal>       render only the case with this ordinal");
            eprintln!("    -o <dir>           output directory (default: current directory)");
            eprintln!("    -W <width>         canvas width (default: 800)");
            eprintln!("    -H <height>        canvas height (default: 600)");
            eprintln!("    -m <margin>        canvas margin (default: 80)");
            eprintln!("    -j <config.json>   load SVG configuration from JSON file");
            eprintln!("    -c                 label every vertex with its coordinates");
            eprintln!("    -t                 draw case caption");
            eprintln!("    <fixture.txt>      file containing test cases");
            std::process::exit(1);
        }
        Ok(result)
    }
}

fn render(args: &Args, case: &TestCase, index: usize) -> Result<(), Error> {
    let mut diagram = Diagram::from_case(case, None, args.show_coords);
    if args.caption && !case.caption.is_empty() {
        diagram.add_text(case.caption.clone(), Argb::BLACK, 14, 20.0, 20.0);
    }
    let writer = SvgWriter::new(SvgConfig {
        fill_rule: case.fill_rule,
        ..args.config.clone()
    });
    let number = case.ordinal.unwrap_or(index as i64 + 1);
    let path = args.output_dir.join(format!("test_{}.svg", number));
    match writer.save(&diagram, &path) {
        Ok(()) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(SvgError::EmptyGeometry) => {
            tracing::warn!(number, "[render] nothing to draw");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let mut reader = FixtureReader::open(&args.input_file)?;

    let cases = tracing::debug_span!("[load]").in_scope(|| match args.ordinal {
        Some(ordinal) => Ok::<_, FixtureError>(reader.read_case(ordinal)?.into_iter().collect()),
        None => reader.cases().collect::<Result<Vec<_>, _>>(),
    })?;
    if cases.is_empty() {
        return Err("no test cases found".into());
    }
    tracing::debug!("[load:cases_count] {}", cases.len());

    let save = tracing::debug_span!("[save]");
    let _guard = save.enter();
    for (index, case) in cases.iter().enumerate() {
        render(&args, case, index)?;
    }

    Ok(())
}
