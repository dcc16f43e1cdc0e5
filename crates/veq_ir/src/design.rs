//! Design definitions — the top-level container of modules.

use crate::ids::ModuleId;
use crate::module::Module;
use crate::store::EntityList;
use serde::{Deserialize, Serialize};
use veq_common::Ident;

/// A complete design: a set of independently-processed modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// All modules, in declaration order.
    pub modules: EntityList<ModuleId, Module>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty module with the given name and returns its ID.
    pub fn add_module(&mut self, name: Ident) -> ModuleId {
        self.modules.insert(|id| Module::new(id, name))
    }

    /// Finds a module by name.
    pub fn module_by_name(&self, name: Ident) -> Option<ModuleId> {
        self.modules
            .visit()
            .find(|(_, m)| m.name == name)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veq_common::Interner;

    #[test]
    fn add_and_find_module() {
        let interner = Interner::new();
        let mut design = Design::new();
        let top = interner.get_or_intern("top");
        let id = design.add_module(top);
        assert_eq!(design.module_by_name(top), Some(id));
        assert_eq!(design.modules.len(), 1);
    }

    #[test]
    fn missing_module_is_none() {
        let interner = Interner::new();
        let design = Design::new();
        assert!(design.module_by_name(interner.get_or_intern("nope")).is_none());
    }
}
