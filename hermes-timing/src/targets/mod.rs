//! Defines the targets animated values are written to.

use std::fmt::{Debug, Display};

use dyn_clone::DynClone;

use crate::errors::Error;
use crate::utils::Value;

pub use crate::targets::style::StyleTarget;

mod style;

/// A trait for anything an [`Effect`](crate::animations::Effect) can animate: the compositor
/// "outputs" resolved property values onto it.
///
/// Targets are cheap handles: clones of a target must observe and act on the same underlying
/// object. Two targets reporting the same [`Target::get_name()`] are considered the same object
/// when the [`Compositor`](crate::animations::Compositor) resolves property precedence.
pub trait Target: Debug + Display + DynClone + Send + Sync {
    /// Returns the identity of the target.
    ///
    /// Names must be unique among distinct targets: the compositor merges the properties of all
    /// targets sharing a name, and only writes the value to the last visited one.
    fn get_name(&self) -> String;
    /// Writes the resolved value of a property.
    fn set_property(&mut self, property: &str, value: Value) -> Result<(), Error>;
    /// Notifies that no effect drives the property anymore: the target should fall back to its
    /// own (non-animated) value.
    fn clear_property(&mut self, _property: &str) -> Result<(), Error> {
        Ok(())
    }
}
dyn_clone::clone_trait_object!(Target);
