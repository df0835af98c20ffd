//! Command handlers for the CLI application.
//!
//! - `effects`: registry commands (list, play, check)
//! - `reactions`: event commands (notify, listen, init-config)

pub mod effects;
pub mod reactions;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use ledreaccs::reaction::ParamOverrides;
use ledreaccs::surface::{FailureGuard, PixelSurface, StreamSurface};
use ledreaccs::{EffectRegistry, PlaybackReport, ReactionConfig, ReactionController, Rgb};
use ledreaccs::TerminalSurface;

use crate::cli::{Cli, Output, ParamArgs};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Surface type used by every command that drives real output.
pub type OutputSurface = FailureGuard<Box<dyn PixelSurface>>;

/// Load the reactions file named on the command line, or the default one.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ReactionConfig> {
    match path {
        Some(path) => {
            ReactionConfig::load(path).with_context(|| format!("load {}", path.display()))
        }
        None => ReactionConfig::load_default().context("load default reactions"),
    }
}

/// Open the surface selected by `--output`.
pub fn open_surface(cli: &Cli, config: &ReactionConfig) -> anyhow::Result<OutputSurface> {
    let pixels = cli.pixels.unwrap_or(config.surface.pixels);
    if pixels == 0 {
        bail!("--pixels must be at least 1");
    }

    let surface: Box<dyn PixelSurface> = match cli.output {
        Output::Terminal => Box::new(TerminalSurface::stdout(pixels)),
        Output::Stdout => Box::new(StreamSurface::new(std::io::stdout(), pixels)),
        Output::Device => {
            let path = cli
                .device
                .as_deref()
                .context("--output device requires --device <PATH>")?;
            Box::new(StreamSurface::open_device(path, pixels)?)
        }
    };
    Ok(FailureGuard::new(
        surface,
        config.surface.max_consecutive_failures,
    ))
}

/// Build a controller over the configured output.
pub fn open_controller(cli: &Cli) -> anyhow::Result<Arc<ReactionController<OutputSurface>>> {
    let config = load_config(cli.config.as_deref())?;
    let surface = open_surface(cli, &config)?;
    let registry = EffectRegistry::with_builtins();
    Ok(Arc::new(ReactionController::new(
        Arc::new(registry),
        Arc::new(config),
        surface,
    )))
}

/// Turn `--duration/--speed/--color/--luminance` into overrides.
pub fn param_overrides(args: &ParamArgs) -> anyhow::Result<ParamOverrides> {
    let color = match args.color.as_deref() {
        Some(s) => Some(Rgb::parse(s).with_context(|| format!("invalid color: {s}"))?),
        None => None,
    };
    Ok(ParamOverrides {
        duration: args.duration,
        speed: args.speed,
        color,
        luminance: args.luminance,
    })
}

/// One-line summary of a playback, printed after it finishes.
pub fn print_report(report: &PlaybackReport) {
    let event = report.event.map(|e| e.hook_name()).unwrap_or_default();
    let waited = if report.waited.is_zero() {
        String::new()
    } else {
        format!(" after waiting {:.1}s", report.waited.as_secs_f64())
    };
    eprintln!(
        "{event}{}{} played for {:.1}s{waited}: {}",
        if event.is_empty() { "" } else { " -> " },
        report.effect,
        report.elapsed.as_secs_f64(),
        report.outcome
    );
}
