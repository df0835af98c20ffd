//! CLI command handlers for the effect registry.

use std::sync::Arc;

use anyhow::{bail, Context};
use ledreaccs::reaction::EffectBinding;
use ledreaccs::surface::MemorySurface;
use ledreaccs::{
    EffectParams, EffectRegistry, EventKind, ManualClock, ReactionController, ReactionEvent,
};
use serde_json::json;

use super::{load_config, open_controller, param_overrides, print_report, CommandResult};
use crate::cli::{Cli, ParamArgs};

/// List effects and the event mapping.
pub fn list(cli: &Cli, as_json: bool) -> CommandResult {
    let config = load_config(cli.config.as_deref())?;
    let registry = EffectRegistry::with_builtins();

    if as_json {
        let effects: Vec<_> = registry
            .iter()
            .map(|(key, effect)| {
                json!({
                    "key": key,
                    "name": effect.name(),
                    "description": effect.description(),
                })
            })
            .collect();
        let events: serde_json::Map<_, _> = config
            .bindings()
            .map(|(kind, binding)| (kind.to_string(), json!(binding)))
            .collect();
        let out = json!({
            "effects": effects,
            "events": events,
            "defaults": config.defaults,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Effects:");
    println!();
    println!("{:<16} {:<16} Description", "Key", "Name");
    println!("{}", "-".repeat(60));
    for (key, effect) in registry.iter() {
        println!("{:<16} {:<16} {}", key, effect.name(), effect.description());
    }

    println!();
    println!("Events:");
    println!();
    println!("{:<22} {:<16} Overrides", "Hook", "Effect");
    println!("{}", "-".repeat(60));
    for (kind, binding) in config.bindings() {
        let overrides = binding.params();
        let extra = if overrides.is_empty() {
            "-".to_string()
        } else {
            toml::to_string(&overrides)
                .unwrap_or_default()
                .lines()
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{:<22} {:<16} {}", kind.hook_name(), binding.effect(), extra);
    }

    Ok(())
}

/// Play one effect on the selected output.
pub fn play(cli: &Cli, effect: &str, args: &ParamArgs) -> CommandResult {
    let controller = open_controller(cli)?;
    let params = param_overrides(args)?.apply(controller.config().defaults);
    let report = controller.play(effect, params)?;
    print_report(&report);
    Ok(())
}

/// Validate the configuration, then run every effect and every event on
/// an in-memory surface with virtual time.
pub fn check(cli: &Cli) -> CommandResult {
    let config = load_config(cli.config.as_deref())?;
    let registry = Arc::new(EffectRegistry::with_builtins());
    config
        .validate(&registry)
        .context("configuration is invalid")?;

    let pixels = cli.pixels.unwrap_or(config.surface.pixels);
    if pixels == 0 {
        bail!("--pixels must be at least 1");
    }
    let config = Arc::new(config);
    let clock = Arc::new(ManualClock::new());
    let controller =
        ReactionController::new(registry.clone(), config.clone(), MemorySurface::new(pixels))
            .with_clock(clock.clone());

    let mut failures = 0;
    for (key, _) in registry.iter() {
        let before = controller.with_surface(|s| s.flush_count());
        let report = controller.play(key, EffectParams::default())?;
        let cleared = controller.frame().is_cleared();
        println!(
            "effect {:<22} {:<10} {:>6} frames  {}",
            key,
            report.outcome.to_string(),
            controller.with_surface(|s| s.flush_count()) - before,
            if cleared { "cleared" } else { "NOT CLEARED" }
        );
        if !report.outcome.is_completed() || !cleared {
            failures += 1;
        }
    }

    for kind in EventKind::ALL {
        let report = controller.notify(ReactionEvent::new(*kind))?;
        let cleared = controller.frame().is_cleared();
        let effect = config
            .binding(*kind)
            .map(EffectBinding::effect)
            .unwrap_or_default();
        println!(
            "event  {:<22} {:<10} {:<16} {}",
            kind.hook_name(),
            report.outcome.to_string(),
            effect,
            if cleared { "cleared" } else { "NOT CLEARED" }
        );
        if !report.outcome.is_completed() || !cleared {
            failures += 1;
        }
    }

    println!();
    println!("{:.1}s of virtual time", clock.slept().as_secs_f64());
    if failures > 0 {
        bail!("{failures} check(s) failed");
    }
    println!("All checks passed");
    Ok(())
}
