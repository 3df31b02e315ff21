//! Command line front-end: render one image to a glyph image file

use anyhow::{bail, Context, Result};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use glyphcast::{
    cancel::{Deadline, Never},
    config::{parse_color, Config},
    generator::Generator,
    image_loader::{load_image, save_image},
    AsciiError,
};

const USAGE: &str = "\
usage: glyphcast --image <path> --output <path> [options]

options:
  --chars <string>      gradient, darkest glyph first
  --ratio <x,y>         source pixels per glyph cell
  --face <hex>          glyph color, e.g. #000000
  --background <hex>    background color, e.g. #ffffff
  --transparent         leave the background transparent
  --original-color      draw each glyph in its source pixel color
  --compress <0-99>     shrink the source by this percentage first
  --max-width <cells>   limit output width in glyph cells
  --max-height <cells>  limit output height in glyph cells
  --timeout-ms <ms>     give up after this long, saving the partial render

log level comes from GLYPHCAST_LOG (error, warn, info, debug, trace)";

/// Flags collected from the command line; unset flags keep config values
#[derive(Debug, Default)]
struct Args {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    chars: Option<String>,
    ratio: Option<(u32, u32)>,
    face: Option<String>,
    background: Option<String>,
    transparent: bool,
    original_color: bool,
    compress: Option<u8>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    timeout_ms: Option<u64>,
    help: bool,
}

fn main() -> Result<()> {
    init_logging();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let (Some(image_path), Some(output_path)) = (args.image.clone(), args.output.clone()) else {
        eprintln!("{}", USAGE);
        bail!("--image and --output are required");
    };

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config: {}", e);
        Config::default()
    });
    apply_args(&mut config, &args)?;

    let options = config.to_options().context("Invalid configuration")?;
    let generator = Generator::new(options);

    let image = load_image(&image_path).with_context(|| format!("Failed to load image: {:?}", image_path))?;

    let start = Instant::now();
    let result = match config.limits.timeout_ms {
        Some(ms) => generator.generate(&image, &Deadline::after(Duration::from_millis(ms))),
        None => generator.generate(&image, &Never),
    };
    let render_time = start.elapsed().as_millis();

    match result {
        Ok(rendered) => {
            save_image(&rendered, &output_path)
                .with_context(|| format!("Failed to save output: {:?}", output_path))?;
            println!(
                "Saved {}x{} output to {} ({}ms)",
                rendered.width(),
                rendered.height(),
                output_path.display(),
                render_time
            );
            Ok(())
        }
        Err(AsciiError::Cancelled(partial)) => {
            save_image(&partial, &output_path)
                .with_context(|| format!("Failed to save partial output: {:?}", output_path))?;
            bail!(
                "render timed out after {}ms, partial output saved to {}",
                render_time,
                output_path.display()
            )
        }
        Err(e) => Err(e).context("Render failed"),
    }
}

fn init_logging() {
    let level = std::env::var("GLYPHCAST_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // fails only when a logger is already installed
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();

    let mut iter = args;
    while let Some(a) = iter.next() {
        let mut value = || iter.next().with_context(|| format!("{} needs a value", a));
        match a.as_str() {
            "--image" => parsed.image = Some(PathBuf::from(value()?)),
            "--output" => parsed.output = Some(PathBuf::from(value()?)),
            "--chars" => parsed.chars = Some(value()?),
            "--ratio" => parsed.ratio = Some(parse_ratio(&value()?)?),
            "--face" => parsed.face = Some(value()?),
            "--background" => parsed.background = Some(value()?),
            "--transparent" => parsed.transparent = true,
            "--original-color" => parsed.original_color = true,
            "--compress" => parsed.compress = Some(value()?.parse::<u8>().context("--compress takes 0-99")?),
            "--max-width" => parsed.max_width = Some(value()?.parse::<u32>().context("--max-width takes a number")?),
            "--max-height" => {
                parsed.max_height = Some(value()?.parse::<u32>().context("--max-height takes a number")?)
            }
            "--timeout-ms" => {
                parsed.timeout_ms = Some(value()?.parse::<u64>().context("--timeout-ms takes a number")?)
            }
            "-h" | "--help" => parsed.help = true,
            other => bail!("unknown argument '{}'", other),
        }
    }

    Ok(parsed)
}

fn parse_ratio(text: &str) -> Result<(u32, u32)> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("--ratio takes X,Y, got '{}'", text))?;
    Ok((
        x.trim().parse::<u32>().context("bad --ratio x")?,
        y.trim().parse::<u32>().context("bad --ratio y")?,
    ))
}

/// Command line flags win over the config file
fn apply_args(config: &mut Config, args: &Args) -> Result<()> {
    let render = &mut config.render;
    if let Some(chars) = &args.chars {
        render.chars = chars.clone();
    }
    if let Some((x, y)) = args.ratio {
        render.pixel_ratio.x = x;
        render.pixel_ratio.y = y;
    }
    if let Some(face) = &args.face {
        parse_color(face).with_context(|| format!("--face: '{}' is not a hex color", face))?;
        render.face = Some(face.clone());
    }
    if let Some(background) = &args.background {
        parse_color(background)
            .with_context(|| format!("--background: '{}' is not a hex color", background))?;
        render.background = Some(background.clone());
    }
    render.transparent_background |= args.transparent;
    render.original_color |= args.original_color;

    let limits = &mut config.limits;
    if let Some(compress) = args.compress {
        limits.compression = compress;
    }
    if let Some(max_width) = args.max_width {
        limits.max_width = max_width;
    }
    if let Some(max_height) = args.max_height {
        limits.max_height = max_height;
    }
    if args.timeout_ms.is_some() {
        limits.timeout_ms = args.timeout_ms;
    }
    Ok(())
}
