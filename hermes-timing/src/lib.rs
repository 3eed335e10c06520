#![doc(html_root_url = "https://docs.rs/hermes-timing/0.1.0")]

//! <h1 align="center">HERMES-TIMING - Hierarchical animation timing and compositing</h1>
//! <div style="text-align:center;font-style:italic;">Schedule nested players against a single clock, and resolve which effect drives each animated property.</div>
//! <br/>
//!
//! # Documentation
//!
//! This is the API documentation.<br/>
//! The engine is made of two parts:
//! - **timing**: nested [`Player`](animations::Player)s (leaf, group, sequence) are played on a
//!   [`Timeline`](animations::Timeline). Each tick of the timeline re-derives the current time of
//!   every player from the one of its parent.
//! - **compositing**: a [`Compositor`](animations::Compositor) walks a player tree and resolves,
//!   per property, which active [`Effect`](animations::Effect) wins. The resolved values are
//!   written to [`Target`](targets::Target)s.
//!
//! # Features
//!
//! - Compose [`Effect`](animations::Effect)s in parallel ([`Player::group()`](animations::Player::group()))
//!   or in sequence ([`Player::sequence()`](animations::Player::sequence())), nested at will.
//! - Advance a [`Timeline`](animations::Timeline) with [`tick()`](animations::Timeline::tick()),
//!   or seek any scheduled player with [`set_current_time()`](animations::Player::set_current_time()).
//! - Hold discrete keyframe values through a pluggable [`Sampler`](animations::Sampler).
//! - Write resolved values onto any [`Target`](targets::Target): a [`StyleTarget`](targets::StyleTarget)
//!   is provided, layering animated values over base ones.
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! hermes-timing = "0.1.0"
//! ```
//!
//! The following code plays two effects one after the other on the same target.
//! ```rust
//! use hermes_timing::animations::{Compositor, Effect, Keyframe, Player, Timeline};
//! use hermes_timing::targets::StyleTarget;
//!
//! let body = StyleTarget::new("body").with_base("opacity", 1.0);
//!
//! // Fade to 0.5 for 200ms, then to 0 for 100ms.
//! let fade = Player::sequence(vec![
//!     Effect::new(body.clone(), vec![Keyframe::new().with_property("opacity", 0.5)], 200.0)
//!         .unwrap()
//!         .into(),
//!     Effect::new(body.clone(), vec![Keyframe::new().with_property("opacity", 0.0)], 100.0)
//!         .unwrap()
//!         .into(),
//! ])
//! .unwrap();
//!
//! let mut timeline = Timeline::new();
//! let mut compositor = Compositor::new();
//! let player = timeline.play(fade).unwrap();
//!
//! timeline.tick(250.0).unwrap();
//! compositor.composite(&player).unwrap();
//! assert_eq!(body.get_computed("opacity").unwrap().as_float(), 0.0);
//!
//! // Once finished, the target falls back to its base value.
//! timeline.tick(100.0).unwrap();
//! compositor.composite(&player).unwrap();
//! assert_eq!(body.get_computed("opacity").unwrap().as_float(), 1.0);
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for values, keyframes and ranges.
//! - **mocks** -- Provides mocked entities of all kinds (useful for tests mostly).

pub mod animations;
pub mod errors;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod targets;
pub mod utils;
