//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inkpad - render recorded signature strokes as smooth ink
#[derive(Parser, Debug)]
#[command(name = "inkpad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay strokes from a JSON file and write the result as PNG
    Render {
        /// Replay file ({"strokes": [[{"x", "y", "time"}, ...], ...]})
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Pad config JSON (missing fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pen color as CSS (e.g. "#1a237e")
        #[arg(long)]
        pen_color: Option<String>,

        /// Background color as CSS (e.g. "white")
        #[arg(long)]
        background: Option<String>,

        #[arg(long)]
        min_width: Option<f32>,

        #[arg(long)]
        max_width: Option<f32>,

        /// Surface width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Surface height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Print the default pad config as JSON
    Defaults,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
