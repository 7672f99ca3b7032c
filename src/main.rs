//! ttfblit - render text lines into a 16-bit surface and save it as PNG

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use ttfblit::config::Config;
use ttfblit::font::system::find_system_font;
use ttfblit::{Font, Surface};

/// Print help message
fn print_help() {
    println!(
        r#"ttfblit {} - cached TrueType text renderer

USAGE:
    ttfblit [OPTIONS] [TEXT]...

Each TEXT argument is drawn as one line. Without TEXT, a sample is drawn.

OPTIONS:
    -o, --output FILE   Output PNG path (default: ttfblit.png)
    -f, --font FILE     Font file (overrides config and TTFBLIT_FONT)
    -h, --help          Show this help
    -V, --version       Show version

ENVIRONMENT:
    TTFBLIT_CONFIG      Config file path
    TTFBLIT_FONT        Font file path
    RUST_LOG            Log filter (e.g. debug)

CONFIG:
    ~/.config/ttfblit/config.toml"#,
        env!("CARGO_PKG_VERSION")
    );
}

struct Args {
    output: PathBuf,
    font: Option<PathBuf>,
    lines: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut output = PathBuf::from("ttfblit.png");
    let mut font = None;
    let mut lines = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let v = iter.next().ok_or_else(|| anyhow!("{} requires a path", arg))?;
                output = PathBuf::from(v);
            }
            "-f" | "--font" => {
                let v = iter.next().ok_or_else(|| anyhow!("{} requires a path", arg))?;
                font = Some(PathBuf::from(v));
            }
            other => lines.push(other.to_string()),
        }
    }

    if lines.is_empty() {
        lines.push("The quick brown fox jumps over the lazy dog".to_string());
        lines.push("0123456789 !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~".to_string());
        lines.push("漢字 かな カナ 한글".to_string());
    }

    Ok(Args { output, font, lines })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("ttfblit {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let args = parse_args(&args)?;
    let cfg = Config::load();

    // CLI > config > system search
    let font_path = args
        .font
        .or_else(|| (!cfg.font.path.is_empty()).then(|| PathBuf::from(&cfg.font.path)))
        .or_else(find_system_font)
        .ok_or_else(|| {
            anyhow!("No font found. Pass --font, set TTFBLIT_FONT, or set font.path in the config")
        })?;

    let mut surface = Surface::new(cfg.surface.width, cfg.surface.height, cfg.render.format);
    surface.fill(cfg.background_color());

    let mut font = Font::open_with_options(
        &font_path,
        cfg.font.size,
        cfg.font.mono_width,
        surface.format(),
        cfg.font.index,
        cfg.font_options(),
    )
    .with_context(|| format!("Cannot load font: {}", font_path.display()))?;

    let x = cfg.surface.margin as i32;
    let mut y = cfg.surface.margin as i32;
    let line_height = (cfg.font.size + cfg.surface.line_spacing) as i32;
    for line in &args.lines {
        let end = font.render(&mut surface, x, y, line)?;
        debug!("Line rendered: {:?} ({} px)", line, end - x);
        y += line_height;
    }

    info!(
        "{} glyphs cached in {} atlas(es)",
        font.cached_glyphs(),
        font.atlas_count()
    );

    surface.save_png(&args.output)?;
    println!("{}", args.output.display());
    Ok(())
}
