// CLI definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledreaccs")]
#[command(author, version, about = "LED strip reactions to host events")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Reactions file (default: ~/.config/ledreaccs/reactions.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where frames go
    #[arg(long, global = true, value_enum, default_value_t = Output::Terminal)]
    pub output: Output,

    /// Device node or FIFO for `--output device`
    #[arg(long, global = true, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Number of pixels (overrides the config file)
    #[arg(long, global = true)]
    pub pixels: Option<usize>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Surface backends selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    /// True-color preview in the terminal
    Terminal,
    /// Raw RGB frames on stdout
    Stdout,
    /// Raw RGB frames written to --device
    Device,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered effects and the event mapping
    #[command(visible_alias = "ls")]
    List {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Play an effect directly
    Play {
        /// Effect name (e.g. rainbow, "shooting stars")
        effect: String,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Play the reaction mapped to an event
    Notify {
        /// Event name (e.g. sad, on_handshake)
        event: String,

        /// Play this effect instead of the mapped one
        #[arg(long)]
        effect: Option<String>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Read event names from stdin, one per line, and react to each
    Listen,

    /// Validate the configuration and dry-run every effect
    Check,

    /// Write the default reactions file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Per-call parameter overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Seconds to play
    #[arg(long)]
    pub duration: Option<f64>,

    /// Effect speed
    #[arg(long)]
    pub speed: Option<f32>,

    /// Color: #RRGGBB or a name
    #[arg(long)]
    pub color: Option<String>,

    /// Luminance 0.0-1.0
    #[arg(long)]
    pub luminance: Option<f32>,
}
