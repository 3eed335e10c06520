use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{Error, TargetError};
use crate::targets::Target;
use crate::utils::Value;

/// Mock [`Target`] for testing purposes: records every write and clear it receives.
#[derive(Clone, Debug)]
pub struct MockTarget {
    name: String,
    failing: bool,
    writes: Arc<RwLock<Vec<(String, Value)>>>,
    clears: Arc<RwLock<Vec<String>>>,
}

impl MockTarget {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            failing: false,
            writes: Arc::new(RwLock::new(vec![])),
            clears: Arc::new(RwLock::new(vec![])),
        }
    }

    /// Makes every [`Target::set_property()`] call fail.
    pub fn with_failure(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Returns all (property, value) writes received so far, in order.
    pub fn get_writes(&self) -> Vec<(String, Value)> {
        self.writes.read().clone()
    }

    /// Returns all property clears received so far, in order.
    pub fn get_clears(&self) -> Vec<String> {
        self.clears.read().clone()
    }

    pub fn reset(&self) {
        self.writes.write().clear();
        self.clears.write().clear();
    }
}

impl Display for MockTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MockTarget [name={}, writes={}]",
            self.name,
            self.writes.read().len()
        )
    }
}

impl Target for MockTarget {
    fn get_name(&self) -> String {
        self.name.clone()
    }

    fn set_property(&mut self, property: &str, value: Value) -> Result<(), Error> {
        if self.failing {
            return Err(TargetError {
                info: format!("{} refused {}", self.name, property),
            });
        }
        self.writes.write().push((property.to_string(), value));
        Ok(())
    }

    fn clear_property(&mut self, property: &str) -> Result<(), Error> {
        self.clears.write().push(property.to_string());
        Ok(())
    }
}
