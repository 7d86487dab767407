//! Project settings commands

use super::{parse, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{Editor, InputActionMapping, Params, Result};

pub fn register(router: &mut Router) {
    router.register("create_input_mapping", create_input_mapping);
}

#[derive(Debug, Deserialize)]
struct MappingParams {
    action_name: String,
    key: String,
    #[serde(default)]
    shift: bool,
    #[serde(default)]
    ctrl: bool,
    #[serde(default)]
    alt: bool,
    #[serde(default)]
    cmd: bool,
}

fn create_input_mapping(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: MappingParams = parse(params)?;
    let action = required("action_name", &p.action_name)?;
    let key = required("key", &p.key)?;
    editor.add_action_mapping(InputActionMapping {
        action_name: action.to_string(),
        key: key.to_string(),
        shift: p.shift,
        ctrl: p.ctrl,
        alt: p.alt,
        cmd: p.cmd,
    })?;
    Ok(json!({ "action_name": action, "key": key }))
}
