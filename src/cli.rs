// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "spaceport")]
#[command(about = "Spaceship launch viewer", long_about = None)]
pub struct Cli {
    /// Hide the HUD buttons and FPS readout
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Start with two side-by-side viewports
    #[arg(long = "split-screen", default_value = "false")]
    pub split_screen: bool,

    /// Initial window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    pub height: Option<u32>,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log frame and render timings
    #[arg(long, default_value = "false")]
    pub benchmark: bool,
}
