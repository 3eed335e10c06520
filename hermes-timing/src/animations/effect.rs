use std::fmt::{Display, Formatter};

use crate::animations::keyframe::compute_offsets;
use crate::animations::{Hold, Keyframe, Sampler};
use crate::errors::{Error, TimingError};
use crate::targets::Target;
use crate::utils::{Range, Value};

/// Represents an atomic timed effect: a set of [`Keyframe`]s applied to a [`Target`] for a given
/// duration.
///
/// An effect has no notion of time by itself: it is wrapped by a leaf
/// [`Player`](crate::animations::Player) which provides its local time. The effect is active
/// during the half-open window `[0, duration)` of that local time: it is finished exactly at
/// `duration`.
///
/// # Example
/// ```
/// use hermes_timing::animations::{Effect, Keyframe};
/// use hermes_timing::targets::StyleTarget;
///
/// let effect = Effect::new(
///     StyleTarget::new("body"),
///     vec![Keyframe::new().with_property("marginLeft", "4px")],
///     2000.0,
/// )
/// .unwrap();
/// assert_eq!(effect.get_duration(), 2000.0);
/// assert!(effect.is_active(0.0));
/// assert!(!effect.is_active(2000.0));
/// ```
#[derive(Clone, Debug)]
pub struct Effect {
    /// The [`Target`] all keyframes values apply to.
    target: Box<dyn Target>,
    /// The [`Keyframe`]s of this effect.
    keyframes: Vec<Keyframe>,
    /// The intrinsic duration of the effect (in ms).
    duration: f64,
    /// The lookup used to get keyframe values at a given progress (default: [`Hold`]).
    sampler: Box<dyn Sampler>,

    // ########################################
    // # Volatile utility data.
    offsets: Vec<f64>,
}

impl Effect {
    /// Creates a new `Effect` for the given target.
    ///
    /// # Arguments
    /// * `target` - The target the keyframes values are written to.
    /// * `keyframes` - The ordered keyframes.
    /// * `duration` - The duration of the effect in milliseconds.
    ///
    /// # Errors
    /// * `InvalidDuration` - the duration is negative or not a finite number.
    /// * `InvalidKeyframeOffset` - a keyframe offset is outside `[0, 1]` or offsets are unordered.
    pub fn new<T: Target + 'static>(
        target: T,
        keyframes: Vec<Keyframe>,
        duration: f64,
    ) -> Result<Self, Error> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(TimingError::InvalidDuration { duration }.into());
        }
        let offsets = compute_offsets(&keyframes)?;
        Ok(Self {
            target: Box::new(target),
            keyframes,
            duration,
            sampler: Box::new(Hold),
            offsets,
        })
    }

    /// Returns the target of this effect.
    pub fn get_target(&self) -> &dyn Target {
        &*self.target
    }

    /// Returns a handle to the target of this effect.
    pub fn clone_target(&self) -> Box<dyn Target> {
        self.target.clone()
    }

    pub fn get_keyframes(&self) -> &Vec<Keyframe> {
        &self.keyframes
    }

    /// Returns the effective offset of each keyframe.
    pub fn get_offsets(&self) -> &Vec<f64> {
        &self.offsets
    }

    pub fn get_duration(&self) -> f64 {
        self.duration
    }

    pub fn get_sampler(&self) -> &dyn Sampler {
        &*self.sampler
    }

    /// Returns the names of all animated properties, in first-declaration order.
    pub fn get_properties(&self) -> Vec<String> {
        let mut properties: Vec<String> = vec![];
        for keyframe in &self.keyframes {
            for (property, _) in keyframe.get_properties() {
                if !properties.contains(property) {
                    properties.push(property.clone());
                }
            }
        }
        properties
    }

    /// Returns the local time window during which the effect is active.
    pub fn get_active_window(&self) -> Range<f64> {
        Range {
            start: 0.0,
            end: self.duration,
        }
    }

    /// Indicates whether the effect contributes values at the given local time.
    pub fn is_active(&self, local_time: f64) -> bool {
        self.get_active_window().contains(local_time)
    }

    /// Replaces the value lookup of this effect.
    pub fn set_sampler<S: Sampler + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    /// Samples the property values of the effect at the given local time.
    ///
    /// Returns `None` when the effect is not active at that time.
    pub fn sample(&self, local_time: f64) -> Option<Vec<(String, Value)>> {
        match self.is_active(local_time) {
            false => None,
            true => {
                let progress = local_time / self.duration;
                Some(self.sampler.sample(&self.keyframes, &self.offsets, progress))
            }
        }
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Effect [target={}, duration={}ms, keyframes={}]",
            self.target.get_name(),
            self.duration,
            self.keyframes.len()
        )
    }
}
