//! UMG widget Blueprint commands

use super::{parse, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{
    BridgeError, Editor, EventBinding, Params, Result, TextBinding, WidgetBlueprintInfo,
    WidgetElement, WidgetKind,
};

pub fn register(router: &mut Router) {
    router.register("create_umg_widget_blueprint", create_umg_widget_blueprint);
    router.register("add_text_block_to_widget", add_text_block_to_widget);
    router.register("add_button_to_widget", add_button_to_widget);
    router.register("bind_widget_event", bind_widget_event);
    router.register("set_text_block_binding", set_text_block_binding);
    router.register("add_widget_to_viewport", add_widget_to_viewport);
}

const DEFAULT_WIDGET_DIR: &str = "/Game/Widgets";
const DEFAULT_WIDGET_PARENT: &str = "UserWidget";

fn default_dir() -> String {
    DEFAULT_WIDGET_DIR.to_string()
}

fn default_parent() -> String {
    DEFAULT_WIDGET_PARENT.to_string()
}

fn default_size() -> [f64; 2] {
    [200.0, 50.0]
}

fn default_font_size() -> u32 {
    12
}

fn default_color() -> [f64; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_binding_type() -> String {
    "Text".to_string()
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    #[serde(alias = "name")]
    widget_name: String,
    #[serde(default = "default_parent")]
    parent_class: String,
    #[serde(default = "default_dir")]
    path: String,
}

/// Canvas placement and styling shared by text blocks and buttons
#[derive(Debug, Deserialize)]
struct Layout {
    #[serde(default)]
    text: String,
    #[serde(default)]
    position: [f64; 2],
    #[serde(default = "default_size")]
    size: [f64; 2],
    #[serde(default = "default_font_size")]
    font_size: u32,
    #[serde(default = "default_color")]
    color: [f64; 4],
}

#[derive(Debug, Deserialize)]
struct TextBlockParams {
    widget_name: String,
    text_block_name: String,
    #[serde(flatten)]
    layout: Layout,
}

#[derive(Debug, Deserialize)]
struct ButtonParams {
    widget_name: String,
    button_name: String,
    #[serde(flatten)]
    layout: Layout,
    background_color: Option<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct EventParams {
    widget_name: String,
    widget_component_name: String,
    event_name: String,
    function_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextBindingParams {
    widget_name: String,
    text_block_name: String,
    binding_property: String,
    #[serde(default = "default_binding_type")]
    binding_type: String,
}

#[derive(Debug, Deserialize)]
struct ViewportParams {
    widget_name: String,
    #[serde(default)]
    z_order: i32,
}

fn require_widget(editor: &dyn Editor, widget: &str) -> Result<WidgetBlueprintInfo> {
    editor
        .find_widget_blueprint(widget)
        .ok_or_else(|| BridgeError::NotFound(format!("Widget Blueprint '{}' not found", widget)))
}

fn place_element(
    editor: &mut dyn Editor,
    widget: &str,
    name: &str,
    kind: WidgetKind,
    layout: Layout,
    background_color: Option<[f64; 4]>,
) -> Result<Value> {
    if layout.size.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(BridgeError::invalid("size", "must be non-negative"));
    }
    let element = WidgetElement {
        name: name.to_string(),
        kind,
        text: layout.text,
        position: layout.position,
        size: layout.size,
        font_size: layout.font_size,
        color: layout.color,
        background_color,
    };
    let result = json!({
        "widget_name": widget,
        "element": &element,
    });
    editor.add_widget_element(widget, element)?;
    Ok(result)
}

fn create_umg_widget_blueprint(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: CreateParams = parse(params)?;
    let name = required("widget_name", &p.widget_name)?;
    if name.contains(['/', '.']) {
        return Err(BridgeError::invalid("widget_name", "must not contain '/' or '.'"));
    }
    let dir = required("path", &p.path)?;
    let parent = required("parent_class", &p.parent_class)?;
    let info = editor.create_widget_blueprint(name, dir, parent)?;
    Ok(json!({ "name": info.name, "path": info.path }))
}

fn add_text_block_to_widget(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: TextBlockParams = parse(params)?;
    let widget = required("widget_name", &p.widget_name)?.to_string();
    let name = required("text_block_name", &p.text_block_name)?.to_string();
    place_element(editor, &widget, &name, WidgetKind::TextBlock, p.layout, None)
}

fn add_button_to_widget(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ButtonParams = parse(params)?;
    let widget = required("widget_name", &p.widget_name)?.to_string();
    let name = required("button_name", &p.button_name)?.to_string();
    place_element(
        editor,
        &widget,
        &name,
        WidgetKind::Button,
        p.layout,
        p.background_color,
    )
}

fn bind_widget_event(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: EventParams = parse(params)?;
    let widget = required("widget_name", &p.widget_name)?;
    let component = required("widget_component_name", &p.widget_component_name)?;
    let event = required("event_name", &p.event_name)?;

    let info = require_widget(editor, widget)?;
    let element = info.element(component).ok_or_else(|| {
        BridgeError::NotFound(format!(
            "Widget component '{}' not found in '{}'",
            component, info.name
        ))
    })?;
    if !element.kind.events().contains(&event) {
        return Err(BridgeError::invalid(
            "event_name",
            format!("{:?} '{}' has no event {}", element.kind, component, event),
        ));
    }

    let function = match p.function_name.as_deref().map(str::trim) {
        Some(f) if !f.is_empty() => f.to_string(),
        _ => format!("{}_{}", component, event),
    };
    editor.bind_widget_event(
        widget,
        EventBinding {
            widget: component.to_string(),
            event_name: event.to_string(),
            function_name: function.clone(),
        },
    )?;
    Ok(json!({
        "widget_name": widget,
        "widget_component_name": component,
        "event_name": event,
        "function_name": function,
    }))
}

fn set_text_block_binding(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: TextBindingParams = parse(params)?;
    let widget = required("widget_name", &p.widget_name)?;
    let text_block = required("text_block_name", &p.text_block_name)?;
    let property = required("binding_property", &p.binding_property)?;
    let binding_type = required("binding_type", &p.binding_type)?;

    let info = require_widget(editor, widget)?;
    if let Some(element) = info.element(text_block) {
        if element.kind != WidgetKind::TextBlock {
            return Err(BridgeError::invalid(
                "text_block_name",
                format!("'{}' is not a TextBlock", text_block),
            ));
        }
    }
    editor.bind_widget_text(
        widget,
        TextBinding {
            text_block: text_block.to_string(),
            binding_property: property.to_string(),
            binding_type: binding_type.to_string(),
        },
    )?;
    Ok(json!({
        "widget_name": widget,
        "text_block_name": text_block,
        "binding_property": property,
        "binding_type": binding_type,
    }))
}

/// Widgets are only added to a viewport at runtime; the editor can just
/// report which class a game would instantiate.
fn add_widget_to_viewport(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ViewportParams = parse(params)?;
    let widget = required("widget_name", &p.widget_name)?;
    let info = require_widget(editor, widget)?;
    Ok(json!({
        "widget_name": info.name,
        "class_path": info.class_path(),
        "z_order": p.z_order,
        "note": "Widget class is ready; call CreateWidget and AddToViewport from game code at runtime",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests_support::{call, call_err};
    use unreal_editor_sim::SimulatedEditor;
    use unreal_mcp_core::WidgetEditor;

    fn with_widget() -> SimulatedEditor {
        let mut editor = SimulatedEditor::new();
        call(&mut editor, create_umg_widget_blueprint, json!({"name": "WBP_Hud"}));
        editor
    }

    #[test]
    fn test_create_widget() {
        let mut editor = with_widget();
        let info = editor.find_widget_blueprint("WBP_Hud").unwrap();
        assert_eq!(info.path, "/Game/Widgets/WBP_Hud");
        assert_eq!(
            call_err(&mut editor, create_umg_widget_blueprint, json!({"widget_name": "WBP_Hud"})),
            "Widget Blueprint 'WBP_Hud' already exists"
        );
    }

    #[test]
    fn test_elements_and_bindings() {
        let mut editor = with_widget();
        let text = call(
            &mut editor,
            add_text_block_to_widget,
            json!({"widget_name": "WBP_Hud", "text_block_name": "Score", "text": "0"}),
        );
        assert_eq!(text["element"]["size"], json!([200.0, 50.0]));
        assert_eq!(text["element"]["font_size"], json!(12));
        call(
            &mut editor,
            add_button_to_widget,
            json!({"widget_name": "WBP_Hud", "button_name": "Start", "text": "Play", "background_color": [0, 0, 0, 1]}),
        );

        let bound = call(
            &mut editor,
            bind_widget_event,
            json!({"widget_name": "WBP_Hud", "widget_component_name": "Start", "event_name": "OnClicked"}),
        );
        assert_eq!(bound["function_name"], json!("Start_OnClicked"));

        let err = call_err(
            &mut editor,
            bind_widget_event,
            json!({"widget_name": "WBP_Hud", "widget_component_name": "Score", "event_name": "OnClicked"}),
        );
        assert_eq!(err, "Invalid event_name parameter: TextBlock 'Score' has no event OnClicked");

        call(
            &mut editor,
            set_text_block_binding,
            json!({"widget_name": "WBP_Hud", "text_block_name": "Score", "binding_property": "ScoreText"}),
        );
        let info = editor.find_widget_blueprint("WBP_Hud").unwrap();
        assert_eq!(info.text_bindings[0].binding_type, "Text");
        assert_eq!(info.event_bindings.len(), 1);

        assert_eq!(
            call_err(
                &mut editor,
                set_text_block_binding,
                json!({"widget_name": "WBP_Hud", "text_block_name": "Lives", "binding_property": "LivesText"})
            ),
            "Widget component 'Lives' not found in 'WBP_Hud'"
        );
    }

    #[test]
    fn test_add_to_viewport() {
        let mut editor = with_widget();
        let result = call(
            &mut editor,
            add_widget_to_viewport,
            json!({"widget_name": "WBP_Hud", "z_order": 3}),
        );
        assert_eq!(result["class_path"], json!("/Game/Widgets/WBP_Hud.WBP_Hud_C"));
        assert_eq!(result["z_order"], json!(3));
        assert_eq!(
            call_err(&mut editor, add_widget_to_viewport, json!({"widget_name": "WBP_Menu"})),
            "Widget Blueprint 'WBP_Menu' not found"
        );
    }
}
