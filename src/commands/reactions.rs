//! CLI command handlers for event reactions.

use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::bail;
use ledreaccs::reaction::{default_config_path, EffectOverride};
use ledreaccs::{EventKind, ReactionEvent};
use tracing::{info, warn};

use super::{open_controller, param_overrides, print_report, CommandResult};
use crate::cli::{Cli, ParamArgs};

/// How long Ctrl-C waits for the strip before exiting anyway.
const BLACKOUT_TIMEOUT: Duration = Duration::from_millis(500);

/// Play the reaction for one event.
pub fn notify(cli: &Cli, event: &str, effect: Option<&str>, args: &ParamArgs) -> CommandResult {
    let kind: EventKind = event.parse()?;
    let controller = open_controller(cli)?;
    let event = ReactionEvent {
        kind,
        overrides: EffectOverride {
            effect: effect.map(str::to_string),
            params: param_overrides(args)?,
        },
    };
    let report = controller.notify(event)?;
    print_report(&report);
    Ok(())
}

/// Read event names from stdin and dispatch each on its own thread.
///
/// Overlapping events queue behind the one that is playing.
pub fn listen(cli: &Cli) -> CommandResult {
    let controller = open_controller(cli)?;

    let ctrlc_controller = Arc::clone(&controller);
    if let Err(e) = ctrlc::set_handler(move || {
        if !ctrlc_controller.blackout(BLACKOUT_TIMEOUT) {
            warn!("Strip busy, exiting without clearing");
        }
        std::process::exit(130);
    }) {
        warn!("Could not set Ctrl+C handler: {e}");
    }

    info!("Listening for events on stdin");
    let mut workers = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        let kind: EventKind = match name.parse() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        let controller = Arc::clone(&controller);
        workers.push(thread::spawn(move || match controller.notify(kind) {
            Ok(report) => print_report(&report),
            Err(e) => warn!(event = %kind, "{e}"),
        }));
        workers.retain(|w| !w.is_finished());
    }

    for worker in workers {
        if worker.join().is_err() {
            warn!("Reaction thread panicked");
        }
    }
    Ok(())
}

/// Write the default reactions file.
pub fn init_config(cli: &Cli, force: bool) -> CommandResult {
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    ledreaccs::reaction::config::write_default(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
