//! Project input settings

use crate::SimulatedEditor;
use tracing::debug;
use unreal_mcp_core::{InputActionMapping, ProjectSettings, Result};

impl ProjectSettings for SimulatedEditor {
    fn action_mappings(&self) -> Vec<InputActionMapping> {
        self.action_mappings.clone()
    }

    fn add_action_mapping(&mut self, mapping: InputActionMapping) -> Result<()> {
        // Re-adding an identical mapping is a no-op, as in the input settings UI.
        if !self.action_mappings.contains(&mapping) {
            debug!("Added action mapping {} -> {}", mapping.action_name, mapping.key);
            self.action_mappings.push(mapping);
        }
        Ok(())
    }
}
