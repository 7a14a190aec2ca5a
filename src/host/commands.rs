//! Named commands a host UI can trigger.

#![allow(missing_docs)]

use std::sync::Arc;

use serde::Serialize;

use crate::core::errors::{Result, VswError};

/// Identity of a command: a stable id and the name shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
}

/// Something that runs when its command is triggered. Commands take no
/// arguments; everything they need is captured at registration.
pub trait CommandHandler: Send + Sync {
    fn execute(&self) -> Result<()>;
}

struct RegisteredCommand {
    spec: CommandSpec,
    handler: Arc<dyn CommandHandler>,
}

/// Registry of commands, in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `spec.id`. Ids must be unique.
    pub fn register(&mut self, spec: CommandSpec, handler: Arc<dyn CommandHandler>) -> Result<()> {
        if self.commands.iter().any(|c| c.spec.id == spec.id) {
            return Err(VswError::InvalidConfig {
                details: format!("command already registered: {}", spec.id),
            });
        }
        self.commands.push(RegisteredCommand { spec, handler });
        Ok(())
    }

    pub fn list(&self) -> Vec<CommandSpec> {
        self.commands.iter().map(|c| c.spec).collect()
    }

    pub fn get(&self, id: &str) -> Option<CommandSpec> {
        self.commands.iter().find(|c| c.spec.id == id).map(|c| c.spec)
    }

    /// Run the command registered under `id`.
    pub fn invoke(&self, id: &str) -> Result<()> {
        let command = self
            .commands
            .iter()
            .find(|c| c.spec.id == id)
            .ok_or_else(|| VswError::UnknownCommand { id: id.to_string() })?;
        command.handler.execute()
    }
}
