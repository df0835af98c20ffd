//! Event → effect mapping loaded from TOML.
//!
//! Each event maps to either a bare effect name or a table with an effect
//! name and parameter overrides:
//!
//! ```toml
//! [effects]
//! sad = "rainbow"
//! handshake = { effect = "fireworks", speed = 8, duration = 4.0 }
//! ```
//!
//! A user file only needs the events it wants to change; everything else
//! keeps the built-in mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ledreaccs_surface::{DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_PIXEL_COUNT};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::event::{EventKind, ParamOverrides, ReactionEvent};
use crate::color::Rgb;
use crate::effect::{EffectParams, EffectRegistry};
use crate::error::{Error, Result};

// ── Bindings ─────────────────────────────────────────────────────────

/// What an event plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectBinding {
    /// Bare effect name, default parameters.
    Name(String),
    /// Effect name plus parameter overrides.
    Detailed(DetailedBinding),
}

/// Table form of a binding. Unknown keys are rejected so a misspelled
/// override fails to load instead of silently falling back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedBinding {
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luminance: Option<f32>,
}

impl DetailedBinding {
    pub fn params(&self) -> ParamOverrides {
        ParamOverrides {
            duration: self.duration,
            speed: self.speed,
            color: self.color,
            luminance: self.luminance,
        }
    }
}

impl EffectBinding {
    pub fn named(effect: &str) -> Self {
        EffectBinding::Name(effect.to_string())
    }

    pub fn detailed(effect: &str, params: ParamOverrides) -> Self {
        EffectBinding::Detailed(DetailedBinding {
            effect: effect.to_string(),
            duration: params.duration,
            speed: params.speed,
            color: params.color,
            luminance: params.luminance,
        })
    }

    pub fn effect(&self) -> &str {
        match self {
            EffectBinding::Name(name) => name,
            EffectBinding::Detailed(detailed) => &detailed.effect,
        }
    }

    pub fn params(&self) -> ParamOverrides {
        match self {
            EffectBinding::Name(_) => ParamOverrides::default(),
            EffectBinding::Detailed(detailed) => detailed.params(),
        }
    }
}

/// Reject parameters no effect can play sensibly.
pub fn validate_params(params: &EffectParams) -> Result<()> {
    if !params.duration.is_finite() || params.duration < 0.0 {
        return Err(Error::Configuration(format!(
            "duration must be a non-negative number of seconds, got {}",
            params.duration
        )));
    }
    if !params.speed.is_finite() || params.speed <= 0.0 {
        return Err(Error::Configuration(format!(
            "speed must be positive, got {}",
            params.speed
        )));
    }
    if !(0.0..=1.0).contains(&params.luminance) {
        return Err(Error::Configuration(format!(
            "luminance must be within 0.0-1.0, got {}",
            params.luminance
        )));
    }
    Ok(())
}

// ── Surface settings ─────────────────────────────────────────────────

/// Strip geometry and device error tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    pub pixels: usize,
    pub max_consecutive_failures: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            pixels: DEFAULT_PIXEL_COUNT,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

// ── File format ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    defaults: ParamOverrides,
    surface: SurfaceConfig,
    effects: BTreeMap<String, EffectBinding>,
}

// ── Resolved configuration ───────────────────────────────────────────

/// The event → effect mapping consumed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionConfig {
    pub defaults: EffectParams,
    pub surface: SurfaceConfig,
    bindings: BTreeMap<EventKind, EffectBinding>,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            defaults: EffectParams::default(),
            surface: SurfaceConfig::default(),
            bindings: default_bindings(),
        }
    }
}

impl ReactionConfig {
    /// A configuration with no event bound to anything.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Parse from TOML string, merged over the built-in mapping.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("parse TOML: {e}")))?;

        let mut config = Self::default();
        config.defaults = file.defaults.apply(config.defaults);
        validate_params(&config.defaults)
            .map_err(|e| Error::Configuration(format!("[defaults]: {e}")))?;
        if file.surface.pixels == 0 {
            return Err(Error::Configuration(
                "[surface]: pixels must be at least 1".into(),
            ));
        }
        config.surface = file.surface;

        for (name, binding) in file.effects {
            let kind: EventKind = name.parse()?;
            config.bind(kind, binding);
        }
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Load the default configuration file.
    /// Creates it with the built-in mapping if it doesn't exist.
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if !path.exists() {
            write_default(&path)?;
        }
        Self::load(&path)
    }

    /// Bind (or rebind) an event.
    pub fn bind(&mut self, kind: EventKind, binding: EffectBinding) -> &mut Self {
        self.bindings.insert(kind, binding);
        self
    }

    pub fn binding(&self, kind: EventKind) -> Result<&EffectBinding> {
        self.bindings
            .get(&kind)
            .ok_or_else(|| Error::Configuration(format!("no effect configured for event {kind}")))
    }

    /// All bindings, in event order.
    pub fn bindings(&self) -> impl Iterator<Item = (EventKind, &EffectBinding)> {
        self.bindings.iter().map(|(k, v)| (*k, v))
    }

    /// Effect name and merged parameters for one notification.
    ///
    /// Precedence, lowest first: defaults, the event's binding, the
    /// notification's own overrides.
    pub fn resolve(&self, event: &ReactionEvent) -> Result<(String, EffectParams)> {
        let binding = self.binding(event.kind)?;
        let effect = event
            .overrides
            .effect
            .clone()
            .unwrap_or_else(|| binding.effect().to_string());
        let params = event
            .overrides
            .params
            .apply(binding.params().apply(self.defaults));
        validate_params(&params)
            .map_err(|e| Error::Configuration(format!("event {}: {e}", event.kind)))?;
        Ok((effect, params))
    }

    /// Check every binding against a registry.
    pub fn validate(&self, registry: &EffectRegistry) -> Result<()> {
        for (kind, binding) in &self.bindings {
            if !registry.contains(binding.effect()) {
                return Err(Error::Configuration(format!(
                    "event {kind} maps to unknown effect `{}`",
                    binding.effect()
                )));
            }
            validate_params(&binding.params().apply(self.defaults))
                .map_err(|e| Error::Configuration(format!("event {kind}: {e}")))?;
        }
        Ok(())
    }
}

/// Built-in event mapping.
pub fn default_bindings() -> BTreeMap<EventKind, EffectBinding> {
    let tinted = |effect: &str, color: Rgb, luminance: f32, duration: f64| {
        EffectBinding::detailed(
            effect,
            ParamOverrides {
                duration: Some(duration),
                color: Some(color),
                luminance: Some(luminance),
                ..ParamOverrides::default()
            },
        )
    };
    let fast = |effect: &str, speed: f32| {
        EffectBinding::detailed(
            effect,
            ParamOverrides {
                speed: Some(speed),
                ..ParamOverrides::default()
            },
        )
    };

    BTreeMap::from([
        (EventKind::Ready, EffectBinding::named("rainbow")),
        (
            EventKind::Sleep,
            tinted("solid", Rgb::new(0, 0, 80), 0.3, 2.0),
        ),
        (EventKind::Wait, EffectBinding::named("shootingstars")),
        (
            EventKind::Bored,
            tinted("solid", Rgb::new(128, 0, 255), 0.5, 1.5),
        ),
        (EventKind::Excited, fast("fireworks", 8.0)),
        (
            EventKind::Lonely,
            tinted("shootingstars", Rgb::new(0, 80, 255), 0.6, 3.0),
        ),
        (
            EventKind::Rebooting,
            tinted("solid", Rgb::new(255, 0, 0), 1.0, 1.0),
        ),
        (EventKind::Epoch, EffectBinding::named("confetti")),
        (EventKind::PeerDetected, EffectBinding::named("fireworks")),
        (EventKind::InternetAvailable, EffectBinding::named("rainbow")),
        (EventKind::Handshake, fast("fireworks", 10.0)),
        (
            EventKind::Sad,
            tinted("shootingstars", Rgb::new(0, 0, 255), 0.4, 3.0),
        ),
    ])
}

/// Path to the default configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("ledreaccs")
        .join("reactions.toml")
}

/// Write the built-in configuration to `path`, creating parent directories.
pub fn write_default(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_REACTIONS_TOML)?;
    info!("Created default reactions: {}", path.display());
    Ok(())
}

// ── Default file ─────────────────────────────────────────────────────

pub const DEFAULT_REACTIONS_TOML: &str = r##"# LED reactions to host events
# Each event maps to an effect name, or to a table with the effect name and
# parameter overrides (duration, speed, color, luminance).
# Effects: solid, shootingstars, fireworks, rainbow, confetti
# Colors: "#RRGGBB", a name ("red", "blue", ...), or [r, g, b].

[defaults]
duration = 3.0
speed = 5.0
color = "#B496C8"
luminance = 1.0

[surface]
pixels = 16
max_consecutive_failures = 3

[effects]
ready = "rainbow"
sleep = { effect = "solid", color = "#000050", luminance = 0.3, duration = 2.0 }
wait = "shootingstars"
bored = { effect = "solid", color = "#8000FF", luminance = 0.5, duration = 1.5 }
excited = { effect = "fireworks", speed = 8.0 }
lonely = { effect = "shootingstars", color = "#0050FF", luminance = 0.6, duration = 3.0 }
rebooting = { effect = "solid", color = "red", luminance = 1.0, duration = 1.0 }
epoch = "confetti"
peer_detected = "fireworks"
internet_available = "rainbow"
handshake = { effect = "fireworks", speed = 10.0 }
sad = { effect = "shootingstars", color = "blue", luminance = 0.4, duration = 3.0 }
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_matches_builtin() {
        let parsed = ReactionConfig::from_toml(DEFAULT_REACTIONS_TOML).unwrap();
        assert_eq!(parsed, ReactionConfig::default());
    }

    #[test]
    fn test_every_event_has_a_default() {
        let config = ReactionConfig::default();
        for kind in EventKind::ALL {
            assert!(config.binding(*kind).is_ok(), "{kind} unbound");
        }
        config.validate(&EffectRegistry::with_builtins()).unwrap();
    }

    #[test]
    fn test_user_entries_merge_over_defaults() {
        let config = ReactionConfig::from_toml(
            r#"
            [effects]
            on_sad = "Rainbow"
            handshake = { effect = "solid", duration = 0.5, color = [1, 2, 3] }
            "#,
        )
        .unwrap();
        assert_eq!(config.binding(EventKind::Sad).unwrap().effect(), "Rainbow");
        let hs = config.binding(EventKind::Handshake).unwrap();
        assert_eq!(hs.effect(), "solid");
        assert_eq!(hs.params().duration, Some(0.5));
        assert_eq!(hs.params().color, Some(Rgb::new(1, 2, 3)));
        // untouched
        assert_eq!(config.binding(EventKind::Epoch).unwrap().effect(), "confetti");
    }

    #[test]
    fn test_resolve_precedence() {
        let mut config = ReactionConfig::empty();
        config.defaults.speed = 2.0;
        config.bind(
            EventKind::Wait,
            EffectBinding::detailed(
                "fireworks",
                ParamOverrides {
                    speed: Some(4.0),
                    duration: Some(1.0),
                    ..ParamOverrides::default()
                },
            ),
        );

        let (effect, params) = config
            .resolve(&ReactionEvent::new(EventKind::Wait).with_duration(0.25))
            .unwrap();
        assert_eq!(effect, "fireworks");
        assert_eq!(params.speed, 4.0);
        assert_eq!(params.duration, 0.25);
        assert_eq!(params.color, EffectParams::DEFAULT_COLOR);

        let (effect, _) = config
            .resolve(&ReactionEvent::new(EventKind::Wait).with_effect("solid"))
            .unwrap();
        assert_eq!(effect, "solid");
    }

    #[test]
    fn test_unmapped_event_is_configuration_error() {
        let config = ReactionConfig::empty();
        assert!(matches!(
            config.resolve(&ReactionEvent::new(EventKind::Sad)),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_overrides_rejected() {
        let config = ReactionConfig::default();
        let bad = ReactionEvent::new(EventKind::Ready).with_duration(-1.0);
        assert!(matches!(config.resolve(&bad), Err(Error::Configuration(_))));
        let bad = ReactionEvent::new(EventKind::Ready).with_speed(0.0);
        assert!(config.resolve(&bad).is_err());
        let bad = ReactionEvent::new(EventKind::Ready).with_luminance(1.5);
        assert!(config.resolve(&bad).is_err());
    }

    #[test]
    fn test_bad_files_rejected() {
        assert!(ReactionConfig::from_toml("[effects]\nhappy = \"solid\"").is_err());
        assert!(ReactionConfig::from_toml("[effects]\nsad = { effect = \"solid\", color = \"mauve\" }").is_err());
        assert!(ReactionConfig::from_toml("[defaults]\nspeed = -1.0").is_err());
        assert!(ReactionConfig::from_toml("[surface]\npixels = 0").is_err());
        assert!(ReactionConfig::from_toml("[unknown]\nx = 1").is_err());
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let misspelled = [
            "[effects]\nsad = { effect = \"solid\", durration = 0.5 }",
            "[effects]\nsad = { effect = \"solid\", colour = \"red\" }",
            "[effects]\nsad = { efect = \"solid\" }",
            "[defaults]\nlumnance = 0.2",
            "[surface]\npixel = 28",
        ];
        for content in misspelled {
            assert!(
                matches!(
                    ReactionConfig::from_toml(content),
                    Err(Error::Configuration(_))
                ),
                "accepted: {content}"
            );
        }
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reactions.toml");
        write_default(&path).unwrap();
        assert_eq!(ReactionConfig::load(&path).unwrap(), ReactionConfig::default());

        std::fs::write(&path, "[surface]\npixels = 28\n").unwrap();
        let config = ReactionConfig::load(&path).unwrap();
        assert_eq!(config.surface.pixels, 28);
        assert_eq!(config.surface.max_consecutive_failures, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReactionConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_validate_catches_unknown_effect() {
        let mut config = ReactionConfig::default();
        config.bind(EventKind::Ready, EffectBinding::named("strobe"));
        let err = config.validate(&EffectRegistry::with_builtins()).unwrap_err();
        assert!(err.to_string().contains("strobe"));
    }
}
