//! Builtin command registry.

use crate::shell::Shell;
use msh_types::{Context, ExitStatus, MshResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{exit, jobs, pid};

/// Type alias for builtin command handler functions.
pub type CommandHandler = fn(&mut Shell, &mut Context, &[String]) -> MshResult<ExitStatus>;

pub static BUILTIN_REGISTRY: Lazy<BuiltinRegistry> = Lazy::new(BuiltinRegistry::new);

pub struct BuiltinRegistry {
    commands: HashMap<&'static str, CommandHandler>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut commands: HashMap<&'static str, CommandHandler> = HashMap::new();

        commands.insert("exit", exit::execute);
        commands.insert("pid", pid::execute);

        // Job tracking
        commands.insert("jobs", jobs::execute_jobs);
        commands.insert("wait", jobs::execute_wait);

        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&CommandHandler> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}
