//! Host events → LED reactions.
//!
//! [`ReactionConfig`] says which effect an event plays and with which
//! parameters; [`ReactionController`] plays it, one effect at a time.

pub mod config;
pub mod controller;
pub mod event;

pub use config::{
    default_config_path, validate_params, DetailedBinding, EffectBinding, ReactionConfig,
    SurfaceConfig, DEFAULT_REACTIONS_TOML,
};
pub use controller::{Dispatch, Outcome, PlaybackReport, PlaybackState, ReactionController};
pub use event::{EffectOverride, EventKind, ParamOverrides, ReactionEvent};
