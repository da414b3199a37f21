pub mod commands;
pub mod duration_parser;

use crate::modules::{Module, ModuleDefinition};

pub fn module() -> Module {
    Module {
        definition: ModuleDefinition {
            id: "moderation",
            description: "Trust-gated moderation commands and ban-request voting",
        },
        commands: vec![
            commands::ban(),
            commands::unban(),
            commands::timeout(),
            commands::warn(),
            commands::unmute(),
            commands::logs(),
            commands::banrequest(),
        ],
    }
}
