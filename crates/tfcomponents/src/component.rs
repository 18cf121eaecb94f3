//! `component` and `component_group` declarations
use crate::addrs::{ComponentCall, ComponentGroupCall};
use crate::diagnostics::SourceRange;
use serde::Serialize;

/// A single unit of infrastructure declared by a `component "<name>" {}` block
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub name: String,
    pub decl_range: SourceRange,
}

impl Component {
    pub fn call_addr(&self) -> ComponentCall {
        ComponentCall::new(self.name.clone())
    }
}

/// A nested collection of components, declared by a `component_group "<name>" {}` block
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentGroup {
    pub name: String,
    pub decl_range: SourceRange,
}

impl ComponentGroup {
    pub fn call_addr(&self) -> ComponentGroupCall {
        ComponentGroupCall::new(self.name.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::diagnostics::SourceFile;

    #[test]
    fn call_addr_ignores_declaration_site() {
        let source = SourceFile::new("a.tfcomponents.hcl", "component \"x\" {}\ncomponent \"x\" {}\n");
        let first = Component::new("x".to_string(), source.range(0..16));
        let second = Component::new("x".to_string(), source.range(17..33));
        let other = Component::new("y".to_string(), source.range(17..33));

        assert_eq!(first.call_addr(), second.call_addr());
        assert_ne!(first.call_addr(), other.call_addr());
    }

    #[test]
    fn group_call_addr() {
        let source = SourceFile::new("a.tfcomponents.hcl", "");
        let group = ComponentGroup::new("network".to_string(), source.range(0..0));

        assert_eq!(group.call_addr(), ComponentGroupCall::new("network"));
        assert_eq!(group.call_addr().to_string(), "component_group.network");
    }
}
