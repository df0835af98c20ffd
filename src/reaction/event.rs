//! Host lifecycle events and per-notification overrides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::effect::EffectParams;
use crate::error::Error;

/// The closed set of events a host agent can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Ready,
    Sleep,
    Wait,
    Bored,
    Excited,
    Lonely,
    Rebooting,
    Epoch,
    PeerDetected,
    InternetAvailable,
    Handshake,
    Sad,
}

impl EventKind {
    /// All event kinds
    pub const ALL: &'static [EventKind] = &[
        EventKind::Ready,
        EventKind::Sleep,
        EventKind::Wait,
        EventKind::Bored,
        EventKind::Excited,
        EventKind::Lonely,
        EventKind::Rebooting,
        EventKind::Epoch,
        EventKind::PeerDetected,
        EventKind::InternetAvailable,
        EventKind::Handshake,
        EventKind::Sad,
    ];

    /// Config key, e.g. `peer_detected`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::Sleep => "sleep",
            EventKind::Wait => "wait",
            EventKind::Bored => "bored",
            EventKind::Excited => "excited",
            EventKind::Lonely => "lonely",
            EventKind::Rebooting => "rebooting",
            EventKind::Epoch => "epoch",
            EventKind::PeerDetected => "peer_detected",
            EventKind::InternetAvailable => "internet_available",
            EventKind::Handshake => "handshake",
            EventKind::Sad => "sad",
        }
    }

    /// Host hook name, e.g. `on_peer_detected`
    pub fn hook_name(&self) -> String {
        format!("on_{}", self.as_str())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both `sad` and the hook form `on_sad`, case-insensitively.
impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = lower.strip_prefix("on_").unwrap_or(&lower);
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| Error::Configuration(format!("unknown event: {s}")))
    }
}

/// Optional parameter replacements. `None` keeps the inherited value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luminance: Option<f32>,
}

impl ParamOverrides {
    /// Layer these overrides on top of `base`.
    pub fn apply(&self, base: EffectParams) -> EffectParams {
        EffectParams {
            duration: self.duration.unwrap_or(base.duration),
            speed: self.speed.unwrap_or(base.speed),
            color: self.color.unwrap_or(base.color),
            luminance: self.luminance.unwrap_or(base.luminance),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-notification modifiers: effect substitution plus parameter overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectOverride {
    pub effect: Option<String>,
    pub params: ParamOverrides,
}

/// One notification from the host. Built per call, dropped after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEvent {
    pub kind: EventKind,
    pub overrides: EffectOverride,
}

impl ReactionEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            overrides: EffectOverride::default(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.overrides.effect = Some(effect.into());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.overrides.params.duration = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.overrides.params.speed = Some(speed);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.overrides.params.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_luminance(mut self, luminance: f32) -> Self {
        self.overrides.params.luminance = Some(luminance);
        self
    }
}

impl From<EventKind> for ReactionEvent {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_names() {
        assert_eq!("sad".parse::<EventKind>().unwrap(), EventKind::Sad);
        assert_eq!("on_sad".parse::<EventKind>().unwrap(), EventKind::Sad);
        assert_eq!(
            "ON_PEER_DETECTED".parse::<EventKind>().unwrap(),
            EventKind::PeerDetected
        );
        assert!(matches!(
            "on_happy".parse::<EventKind>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.hook_name().parse::<EventKind>().unwrap(), *kind);
        }
        assert_eq!(EventKind::ALL.len(), 12);
    }

    #[test]
    fn test_overrides_apply() {
        let base = EffectParams::default();
        let o = ParamOverrides {
            speed: Some(9.0),
            color: Some(Rgb::new(1, 2, 3)),
            ..ParamOverrides::default()
        };
        let p = o.apply(base);
        assert_eq!(p.speed, 9.0);
        assert_eq!(p.color, Rgb::new(1, 2, 3));
        assert_eq!(p.duration, base.duration);
        assert!(!o.is_empty());
        assert!(ParamOverrides::default().is_empty());
    }

    #[test]
    fn test_event_builder() {
        let e = ReactionEvent::new(EventKind::Handshake)
            .with_effect("Fireworks")
            .with_speed(10.0);
        assert_eq!(e.overrides.effect.as_deref(), Some("Fireworks"));
        assert_eq!(e.overrides.params.speed, Some(10.0));
    }
}
