use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::animations::Keyframe;
use crate::utils::Value;

/// Looks up the values an [`Effect`](crate::animations::Effect) declares at a given progress.
///
/// This is the per-leaf value lookup of the [`Compositor`](crate::animations::Compositor): a
/// sampler implementing real interpolation can be substituted here without changing how players
/// are traversed or how precedence is resolved.
pub trait Sampler: Debug + DynClone + Send + Sync {
    /// Returns one value per property declared by the keyframes, in first-declaration order.
    ///
    /// # Arguments
    /// * `keyframes` - the effect keyframes.
    /// * `offsets` - the effective offset of each keyframe (same length, non-decreasing).
    /// * `progress` - the effect progress, within `[0, 1)`.
    fn sample(
        &self,
        keyframes: &[Keyframe],
        offsets: &[f64],
        progress: f64,
    ) -> Vec<(String, Value)>;
}
dyn_clone::clone_trait_object!(Sampler);

/// Discrete sampler: each property holds the value of the last keyframe reached that declares it.
///
/// Before the first keyframe declaring a property is reached, that keyframe value is held.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hold;

impl Sampler for Hold {
    fn sample(
        &self,
        keyframes: &[Keyframe],
        offsets: &[f64],
        progress: f64,
    ) -> Vec<(String, Value)> {
        let mut values: Vec<(String, Value)> = vec![];
        for (keyframe, offset) in keyframes.iter().zip(offsets) {
            let reached = *offset <= progress;
            for (property, value) in keyframe.get_properties() {
                match values.iter_mut().find(|(name, _)| name == property) {
                    Some(entry) if reached => entry.1 = value.clone(),
                    Some(_) => (),
                    None => values.push((property.clone(), value.clone())),
                }
            }
        }
        values
    }
}
