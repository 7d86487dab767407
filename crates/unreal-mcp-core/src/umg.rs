//! UMG widget Blueprint and project input descriptors

use serde::Serialize;

/// Widget classes the bridge can place on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WidgetKind {
    TextBlock,
    Button,
}

impl WidgetKind {
    /// Multicast delegates exposed by the widget class
    pub fn events(&self) -> &'static [&'static str] {
        match self {
            WidgetKind::TextBlock => &[],
            WidgetKind::Button => &["OnClicked", "OnPressed", "OnReleased", "OnHovered", "OnUnhovered"],
        }
    }
}

/// A widget placed on a widget Blueprint's root canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetElement {
    pub name: String,
    pub kind: WidgetKind,
    pub text: String,
    pub position: [f64; 2],
    pub size: [f64; 2],
    pub font_size: u32,
    pub color: [f64; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBinding {
    pub widget: String,
    pub event_name: String,
    pub function_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBinding {
    pub text_block: String,
    pub binding_property: String,
    pub binding_type: String,
}

/// A widget Blueprint asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetBlueprintInfo {
    pub name: String,
    /// Package path, e.g. `/Game/Widgets/WBP_Hud`
    pub path: String,
    pub parent_class: String,
    pub elements: Vec<WidgetElement>,
    pub event_bindings: Vec<EventBinding>,
    pub text_bindings: Vec<TextBinding>,
}

impl WidgetBlueprintInfo {
    pub fn element(&self, name: &str) -> Option<&WidgetElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Generated class path, e.g. `/Game/Widgets/WBP_Hud.WBP_Hud_C`
    pub fn class_path(&self) -> String {
        format!("{}.{}_C", self.path, self.name)
    }
}

/// A legacy action mapping in the project's input settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputActionMapping {
    pub action_name: String,
    pub key: String,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub cmd: bool,
}
