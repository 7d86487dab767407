//! World summary

use super::require_world;
use crate::router::Router;
use serde_json::{Value, json};
use unreal_mcp_core::{Editor, LevelInfo, Params, Result};

pub fn register(router: &mut Router) {
    router.register("get_current_level_info", get_current_level_info);
}

pub(crate) fn get_current_level_info(editor: &mut dyn Editor, _params: Params) -> Result<Value> {
    let world = require_world(editor)?;
    Ok(json!({
        "world_name": world.world_name,
        "world_type": world.world_type.to_string(),
        "num_levels": world.num_levels(),
        "persistent_level": LevelInfo::from(&world.persistent_level),
        "streaming_levels": world.streaming_levels,
    }))
}
