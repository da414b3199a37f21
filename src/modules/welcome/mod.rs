pub mod events;

use crate::modules::{Module, ModuleDefinition};

pub fn module() -> Module {
    Module {
        definition: ModuleDefinition {
            id: "welcome",
            description: "Greets new members with a direct message",
        },
        commands: vec![],
    }
}
