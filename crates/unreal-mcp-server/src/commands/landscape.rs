//! Landscape commands
//!
//! Settings are validated here and handed to the editor as-is. Terrain
//! generation belongs to the engine.

use super::{parse, require_world, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{
    BridgeError, Editor, LandscapeInfo, LandscapeModification, LandscapeSettings, Params, Result,
    Vector3,
};

pub fn register(router: &mut Router) {
    router.register("create_landscape", create_landscape);
    router.register("modify_landscape", modify_landscape);
    router.register("paint_landscape_layer", paint_landscape_layer);
    router.register("get_landscape_info", get_landscape_info);
}

/// Quad counts the engine offers for a landscape section
const VALID_QUADS_PER_SECTION: [i64; 6] = [7, 15, 31, 63, 127, 255];

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CreateParams {
    size_x: i64,
    size_y: i64,
    sections_per_component: i64,
    quads_per_section: i64,
    location: Vector3,
}

impl Default for CreateParams {
    fn default() -> Self {
        let d = LandscapeSettings::default();
        Self {
            size_x: d.size_x.into(),
            size_y: d.size_y.into(),
            sections_per_component: d.sections_per_component.into(),
            quads_per_section: d.quads_per_section.into(),
            location: d.location,
        }
    }
}

impl CreateParams {
    fn validate(&self) -> Result<LandscapeSettings> {
        let size = |name: &str, value: i64| {
            u32::try_from(value)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| BridgeError::invalid(name, "must be a positive integer"))
        };
        let size_x = size("size_x", self.size_x)?;
        let size_y = size("size_y", self.size_y)?;
        if !matches!(self.sections_per_component, 1 | 2) {
            return Err(BridgeError::invalid("sections_per_component", "must be 1 or 2"));
        }
        if !VALID_QUADS_PER_SECTION.contains(&self.quads_per_section) {
            return Err(BridgeError::invalid(
                "quads_per_section",
                "must be one of 7, 15, 31, 63, 127, 255",
            ));
        }
        Ok(LandscapeSettings {
            size_x,
            size_y,
            sections_per_component: self.sections_per_component as u32,
            quads_per_section: self.quads_per_section as u32,
            location: self.location,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ModifyParams {
    #[serde(default = "default_modification")]
    modification_type: String,
}

fn default_modification() -> String {
    LandscapeModification::Sculpt.as_str().to_string()
}

#[derive(Debug, Deserialize)]
struct PaintParams {
    layer_name: String,
}

/// The landscape commands operate on the first landscape in the world
fn first_landscape(editor: &dyn Editor) -> Result<LandscapeInfo> {
    require_world(editor)?;
    editor
        .landscapes()
        .into_iter()
        .next()
        .ok_or_else(|| BridgeError::NotFound("No landscape found in current world".to_string()))
}

fn create_landscape(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: CreateParams = parse(params)?;
    let settings = p.validate()?;
    require_world(editor)?;
    let landscape = editor.create_landscape(&settings)?;
    Ok(json!({
        "message": "Landscape creation initiated",
        "name": landscape.name,
        "size_x": settings.size_x,
        "size_y": settings.size_y,
        "sections_per_component": settings.sections_per_component,
        "quads_per_section": settings.quads_per_section,
        "location": settings.location,
    }))
}

fn modify_landscape(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ModifyParams = parse(params)?;
    let modification: LandscapeModification = p
        .modification_type
        .parse()
        .map_err(|reason: String| BridgeError::invalid("modification_type", reason))?;
    let landscape = first_landscape(editor)?;
    editor.sculpt_landscape(&landscape.name, modification)?;
    Ok(json!({
        "message": "Landscape modification completed",
        "landscape": landscape.name,
        "modification_type": modification.as_str(),
    }))
}

fn paint_landscape_layer(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PaintParams = parse(params)?;
    let layer = required("layer_name", &p.layer_name)?;
    let landscape = first_landscape(editor)?;
    editor.paint_landscape_layer(&landscape.name, layer)?;
    Ok(json!({
        "message": format!("Painted landscape layer: {}", layer),
        "landscape": landscape.name,
        "layer_name": layer,
    }))
}

fn get_landscape_info(editor: &mut dyn Editor, _params: Params) -> Result<Value> {
    require_world(editor)?;
    Ok(json!({ "landscapes": editor.landscapes() }))
}
