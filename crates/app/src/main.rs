//! Inkpad - replay recorded pointer strokes as smooth, variable-width ink

use std::path::Path;

use anyhow::{Context, Result};
use ink::SignaturePad;
use inkpad_config::{parse_color, PadConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod replay;

use cli::{Cli, Commands};
use replay::Replay;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // --verbose enables debug-level output unless RUST_LOG says otherwise
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            pen_color,
            background,
            min_width,
            max_width,
            width,
            height,
        } => {
            let mut config = match config {
                Some(path) => PadConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => PadConfig::default(),
            };
            if let Some(color) = pen_color {
                config.pen_color = parse_color(&color)?;
            }
            if let Some(color) = background {
                config.background_color = parse_color(&color)?;
            }
            if let Some(w) = min_width {
                config.min_width = w;
            }
            if let Some(w) = max_width {
                config.max_width = w;
            }
            if let Some(w) = width {
                config.width = w;
            }
            if let Some(h) = height {
                config.height = h;
            }
            run_render(&input, &output, config)?;
        }
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&PadConfig::default())?);
        }
    }

    Ok(())
}

fn run_render(input: &Path, output: &Path, config: PadConfig) -> Result<()> {
    let replay = Replay::load(input)?;

    info!(
        "Rendering {} strokes onto {}x{} pad",
        replay.strokes.len(),
        config.width,
        config.height
    );

    let mut pad = SignaturePad::with_size(config)?;
    let summary = replay.play(&mut pad);

    let png = pad.to_png()?;
    std::fs::write(output, &png)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "Wrote {} ({} strokes, {} samples, {} segments, empty={})",
        output.display(),
        summary.strokes,
        summary.samples,
        summary.segments,
        pad.is_empty()
    );

    Ok(())
}
