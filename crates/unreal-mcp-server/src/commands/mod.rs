//! Command handlers, grouped by editor subsystem
//!
//! Every handler has the same shape: it takes the editor and the request's
//! parameter object and returns a JSON object or a [`BridgeError`].

pub mod asset;
pub mod asset_registry;
pub mod blueprint;
pub mod blueprint_node;
pub mod content_browser;
pub mod editor;
pub mod landscape;
pub mod level;
pub mod project;
pub mod umg;
pub mod world;

use crate::router::Router;
use serde::de::DeserializeOwned;
use serde_json::Value;
use unreal_mcp_core::{AssetPath, BridgeError, Editor, Params, Result, WorldSnapshot};

/// Register every built-in command
pub fn register_all(router: &mut Router) {
    router.register("ping", ping);
    asset::register(router);
    content_browser::register(router);
    asset_registry::register(router);
    level::register(router);
    world::register(router);
    landscape::register(router);
    editor::register(router);
    blueprint::register(router);
    blueprint_node::register(router);
    project::register(router);
    umg::register(router);
}

fn ping(_editor: &mut dyn Editor, _params: Params) -> Result<Value> {
    Ok(serde_json::json!({ "message": "pong" }))
}

/// Deserialize a handler's parameter struct.
///
/// serde's "missing field" errors become [`BridgeError::MissingParameter`] so
/// clients see `"<field> parameter is required"`.
pub(crate) fn parse<T: DeserializeOwned>(params: Params) -> Result<T> {
    serde_json::from_value(Value::Object(params)).map_err(param_error)
}

fn param_error(err: serde_json::Error) -> BridgeError {
    let msg = err.to_string();
    if let Some(rest) = msg.strip_prefix("missing field `") {
        if let Some(end) = rest.find('`') {
            return BridgeError::MissingParameter(rest[..end].to_string());
        }
    }
    BridgeError::InvalidParameters(msg)
}

/// Reject empty or whitespace-only required strings
pub(crate) fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(BridgeError::MissingParameter(name.to_string()))
    } else {
        Ok(trimmed)
    }
}

/// Parse a required asset path parameter
pub(crate) fn asset_path(name: &str, value: &str) -> Result<AssetPath> {
    let value = required(name, value)?;
    AssetPath::parse(value).map_err(|e| BridgeError::invalid(name, e.to_string()))
}

/// The editor world, or the standard "no world" error
pub(crate) fn require_world(editor: &dyn Editor) -> Result<WorldSnapshot> {
    editor.current_world().ok_or(BridgeError::NoActiveWorld)
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    pub fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    pub fn call(
        editor: &mut dyn Editor,
        handler: fn(&mut dyn Editor, Params) -> Result<Value>,
        value: Value,
    ) -> Value {
        match handler(editor, params(value)) {
            Ok(result) => result,
            Err(e) => panic!("handler failed: {e}"),
        }
    }

    pub fn call_err(
        editor: &mut dyn Editor,
        handler: fn(&mut dyn Editor, Params) -> Result<Value>,
        value: Value,
    ) -> String {
        match handler(editor, params(value)) {
            Ok(result) => panic!("handler unexpectedly succeeded: {result}"),
            Err(e) => e.to_string(),
        }
    }
}
