//! addresses of component and component group calls
//!
//! A call address only carries the name of what is being called. Two addresses are equal when their names are,
//! no matter where (or whether) the corresponding declarations live.
use serde::Serialize;

/// Reference to a `component_group` block by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ComponentGroupCall {
    pub name: String,
}

impl ComponentGroupCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for ComponentGroupCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "component_group.{}", self.name)
    }
}

/// Reference to a `component` block by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ComponentCall {
    pub name: String,
}

impl ComponentCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for ComponentCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "component.{}", self.name)
    }
}
