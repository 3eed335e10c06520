//! Defines the players scheduling timed effects, the timeline they run against, and the
//! compositor resolving which effect drives each animated property.

mod compositor;
mod effect;
mod keyframe;
mod layout;
mod player;
mod sampler;
mod timeline;

pub use compositor::{Compositor, Resolved};
pub use effect::Effect;
pub use keyframe::Keyframe;
pub use player::{Player, PlayerKind};
pub use sampler::{Hold, Sampler};
pub use timeline::Timeline;
