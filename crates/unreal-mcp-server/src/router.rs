//! Command dispatch table

use crate::commands;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use unreal_mcp_core::{BridgeError, CommandRequest, CommandResponse, Editor, Params, Result};

/// Signature shared by every command handler
pub type CommandHandler = fn(&mut dyn Editor, Params) -> Result<Value>;

/// Maps command names to handlers. Built once, before the first request.
pub struct Router {
    handlers: HashMap<&'static str, CommandHandler>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router with every built-in command registered
    pub fn new() -> Self {
        let mut router = Self::empty();
        commands::register_all(&mut router);
        router
    }

    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Add or replace a handler
    pub fn register(&mut self, name: &'static str, handler: CommandHandler) {
        if self.handlers.insert(name, handler).is_some() {
            debug!("Replaced handler for {}", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted
    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run one request against the editor and wrap the outcome
    pub fn dispatch(&self, editor: &mut dyn Editor, request: CommandRequest) -> CommandResponse {
        let Some(handler) = self.handlers.get(request.command.as_str()) else {
            warn!("Unknown command: {}", request.command);
            return CommandResponse::from_error(&BridgeError::UnknownCommand(request.command));
        };

        info!("Executing command: {}", request.command);
        match handler(editor, request.params) {
            Ok(result) => CommandResponse::success(result),
            Err(e) => {
                warn!(
                    "Command {} failed ({:?}): {}",
                    request.command,
                    e.kind(),
                    e
                );
                CommandResponse::from_error(&e)
            }
        }
    }
}
