use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::Error;
use crate::targets::Target;
use crate::utils::Value;

/// A property bag layering animated values over base values, the way a computed style does.
///
/// - Base values are owned by the consumer ([`StyleTarget::set_base()`]).
/// - Animated values are written by the compositor and removed once no effect drives them anymore.
/// - [`StyleTarget::get_computed()`] returns the animated value when present, the base one otherwise.
///
/// # Example
/// ```
/// use hermes_timing::targets::{StyleTarget, Target};
///
/// let mut target = StyleTarget::new("body").with_base("marginLeft", "0px");
/// target.set_property("marginLeft", "4px".into()).unwrap();
/// assert_eq!(target.get_computed("marginLeft").unwrap().as_str(), "4px");
///
/// target.clear_property("marginLeft").unwrap();
/// assert_eq!(target.get_computed("marginLeft").unwrap().as_str(), "0px");
/// ```
#[derive(Clone, Debug)]
pub struct StyleTarget {
    name: String,

    // ########################################
    // # Volatile utility data.
    base: Arc<RwLock<HashMap<String, Value>>>,
    animated: Arc<RwLock<HashMap<String, Value>>>,
}

impl StyleTarget {
    /// Creates a new (empty) `StyleTarget` identified by `name`.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            base: Arc::new(RwLock::new(HashMap::new())),
            animated: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sets a base value, returning the target.
    pub fn with_base<S: Into<String>, V: Into<Value>>(self, property: S, value: V) -> Self {
        self.set_base(property, value);
        self
    }

    /// Sets a base value.
    pub fn set_base<S: Into<String>, V: Into<Value>>(&self, property: S, value: V) {
        self.base.write().insert(property.into(), value.into());
    }

    pub fn get_base(&self, property: &str) -> Option<Value> {
        self.base.read().get(property).cloned()
    }

    pub fn get_animated(&self, property: &str) -> Option<Value> {
        self.animated.read().get(property).cloned()
    }

    /// Returns the effective value of a property: the animated one if any, the base one otherwise.
    pub fn get_computed(&self, property: &str) -> Option<Value> {
        self.get_animated(property).or_else(|| self.get_base(property))
    }
}

impl Display for StyleTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StyleTarget [name={}, animated={}]",
            self.name,
            self.animated.read().len()
        )
    }
}

impl Target for StyleTarget {
    fn get_name(&self) -> String {
        self.name.clone()
    }

    fn set_property(&mut self, property: &str, value: Value) -> Result<(), Error> {
        self.animated.write().insert(property.to_string(), value);
        Ok(())
    }

    fn clear_property(&mut self, property: &str) -> Result<(), Error> {
        self.animated.write().remove(property);
        Ok(())
    }
}
