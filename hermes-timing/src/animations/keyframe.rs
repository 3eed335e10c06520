use crate::errors::{Error, TimingError};
use crate::utils::Value;

/// Represents a keyframe of an [`Effect`](crate::animations::Effect): an ordered set of
/// property values to be held from the keyframe offset onward.
///
/// The offset is a fraction of the effect duration (from 0.0 to 1.0). When not explicitly set, it
/// is computed from the keyframe position within the effect: the first keyframe sits at 0.0, the
/// last one at 1.0, and the others are spread evenly between their set neighbours.
///
/// # Example
/// ```
/// use hermes_timing::animations::Keyframe;
/// let keyframe = Keyframe::new()
///     .with_property("marginLeft", "4px")
///     .with_property("opacity", 0.5)
///     .set_offset(0.25);
/// assert_eq!(keyframe.get_offset(), Some(0.25));
/// assert_eq!(keyframe.get_property("marginLeft").unwrap().as_str(), "4px");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    /// The position of the keyframe within the effect (fraction of its duration).
    offset: Option<f64>,
    /// The property values declared by this keyframe, in declaration order.
    properties: Vec<(String, Value)>,
}

impl Keyframe {
    /// Creates a new empty `Keyframe` with a computed offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the explicitly set offset, if any.
    pub fn get_offset(&self) -> Option<f64> {
        self.offset
    }

    /// Returns the declared property values, in declaration order.
    pub fn get_properties(&self) -> &Vec<(String, Value)> {
        &self.properties
    }

    /// Returns the value declared for a property, if any.
    pub fn get_property(&self, property: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Sets an explicit offset for the keyframe.
    pub fn set_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Declares a property value. Declaring the same property twice replaces its value.
    pub fn with_property<S: Into<String>, V: Into<Value>>(mut self, property: S, value: V) -> Self {
        let property = property.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.properties.push((property, value)),
        }
        self
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Keyframe {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Keyframe::new(), |keyframe, (property, value)| {
                keyframe.with_property(property, value)
            })
    }
}

/// Computes the effective offset of each keyframe.
///
/// # Errors
/// `InvalidKeyframeOffset` when a set offset is outside `[0, 1]` or when set offsets are not
/// ordered.
pub(crate) fn compute_offsets(keyframes: &[Keyframe]) -> Result<Vec<f64>, Error> {
    let count = keyframes.len();
    let mut offsets: Vec<Option<f64>> = keyframes.iter().map(|kf| kf.get_offset()).collect();

    let mut previous = 0.0;
    for offset in offsets.iter().flatten() {
        if !(0.0..=1.0).contains(offset) || *offset < previous {
            return Err(TimingError::InvalidKeyframeOffset { offset: *offset }.into());
        }
        previous = *offset;
    }

    if let Some(first) = offsets.first_mut() {
        first.get_or_insert(0.0);
    }
    if count > 1 {
        if let Some(last) = offsets.last_mut() {
            last.get_or_insert(1.0);
        }
    }

    // Spread missing offsets evenly between the set ones surrounding them.
    let mut computed = Vec::with_capacity(count);
    let mut anchor = 0;
    for index in 0..count {
        match offsets[index] {
            Some(offset) => {
                anchor = index;
                computed.push(offset);
            }
            None => {
                let from = computed[anchor];
                let (next, to) = offsets
                    .iter()
                    .enumerate()
                    .skip(index + 1)
                    .find_map(|(i, offset)| offset.map(|o| (i, o)))
                    .unwrap_or((count - 1, 1.0));
                let ratio = (index - anchor) as f64 / (next - anchor) as f64;
                computed.push(from + (to - from) * ratio);
            }
        }
    }

    Ok(computed)
}
