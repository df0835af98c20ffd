// LED SHIM reactions - shared library
// Effects, registry, event mapping and single-flight playback

pub mod clock;
pub mod color;
pub mod effect;
pub mod error;
pub mod reaction;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use color::{hsv_to_rgb, Rgb};
pub use effect::{
    Effect, EffectContext, EffectError, EffectParams, EffectRegistry, TerminalSurface,
};
pub use error::{Error, Result};
pub use reaction::{
    Dispatch, EventKind, Outcome, PlaybackReport, PlaybackState, ReactionConfig,
    ReactionController, ReactionEvent,
};

pub use ledreaccs_surface as surface;
