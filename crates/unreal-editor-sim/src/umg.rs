//! Widget Blueprints

use crate::SimulatedEditor;
use crate::assets::StoredAsset;
use tracing::debug;
use unreal_mcp_core::{
    AssetPath, BridgeError, EventBinding, Result, TextBinding, WidgetBlueprintInfo, WidgetEditor,
    WidgetElement,
};

impl SimulatedEditor {
    fn widget_key(&self, widget: &str) -> Option<String> {
        if self.widgets.contains_key(widget) {
            return Some(widget.to_string());
        }
        if let Ok(path) = AssetPath::parse(widget) {
            if self.widgets.contains_key(path.package_name()) {
                return Some(path.package_name().to_string());
            }
        }
        self.widgets
            .iter()
            .find(|(_, w)| w.name.eq_ignore_ascii_case(widget))
            .map(|(key, _)| key.clone())
    }

    fn edit_widget(&mut self, widget: &str) -> Result<&mut WidgetBlueprintInfo> {
        let key = self.widget_key(widget).ok_or_else(|| {
            BridgeError::NotFound(format!("Widget Blueprint '{}' not found", widget))
        })?;
        if let Some(asset) = self.assets.get_mut(&key) {
            asset.dirty = true;
        }
        self.widgets.get_mut(&key).ok_or_else(|| {
            BridgeError::NotFound(format!("Widget Blueprint '{}' not found", widget))
        })
    }
}

fn require_element(widget: &WidgetBlueprintInfo, name: &str) -> Result<()> {
    match widget.element(name) {
        Some(_) => Ok(()),
        None => Err(BridgeError::NotFound(format!(
            "Widget component '{}' not found in '{}'",
            name, widget.name
        ))),
    }
}

impl WidgetEditor for SimulatedEditor {
    fn find_widget_blueprint(&self, widget: &str) -> Option<WidgetBlueprintInfo> {
        let key = self.widget_key(widget)?;
        self.widgets.get(&key).cloned()
    }

    fn create_widget_blueprint(
        &mut self,
        name: &str,
        package_path: &str,
        parent_class: &str,
    ) -> Result<WidgetBlueprintInfo> {
        let raw = format!("{}/{}", package_path.trim_end_matches('/'), name);
        let path = AssetPath::parse(&raw).map_err(|e| BridgeError::invalid("path", e.to_string()))?;
        if self.stored(&path).is_some() || self.widget_key(name).is_some() {
            return Err(BridgeError::AlreadyExists(format!(
                "Widget Blueprint '{}' already exists",
                name
            )));
        }

        let info = WidgetBlueprintInfo {
            name: path.asset_name().to_string(),
            path: path.package_name().to_string(),
            parent_class: parent_class.to_string(),
            elements: Vec::new(),
            event_bindings: Vec::new(),
            text_bindings: Vec::new(),
        };
        let mut asset = StoredAsset::new(&path, "WidgetBlueprint")
            .with_tag("ParentClass", &format!("/Script/UMG.{}", parent_class));
        asset.dirty = true;
        self.insert_asset(asset);
        self.widgets.insert(info.path.clone(), info.clone());
        debug!("Created widget Blueprint {}", info.path);
        Ok(info)
    }

    fn add_widget_element(&mut self, widget: &str, element: WidgetElement) -> Result<()> {
        let info = self.edit_widget(widget)?;
        if info.element(&element.name).is_some() {
            return Err(BridgeError::AlreadyExists(format!(
                "Widget '{}' already exists in '{}'",
                element.name, info.name
            )));
        }
        info.elements.push(element);
        Ok(())
    }

    fn bind_widget_event(&mut self, widget: &str, binding: EventBinding) -> Result<()> {
        let info = self.edit_widget(widget)?;
        require_element(info, &binding.widget)?;
        info.event_bindings
            .retain(|b| !(b.widget == binding.widget && b.event_name == binding.event_name));
        info.event_bindings.push(binding);
        Ok(())
    }

    fn bind_widget_text(&mut self, widget: &str, binding: TextBinding) -> Result<()> {
        let info = self.edit_widget(widget)?;
        require_element(info, &binding.text_block)?;
        info.text_bindings.retain(|b| b.text_block != binding.text_block);
        info.text_bindings.push(binding);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unreal_mcp_core::WidgetKind;

    fn button(name: &str) -> WidgetElement {
        WidgetElement {
            name: name.into(),
            kind: WidgetKind::Button,
            text: "Go".into(),
            position: [0.0, 0.0],
            size: [200.0, 50.0],
            font_size: 12,
            color: [1.0, 1.0, 1.0, 1.0],
            background_color: None,
        }
    }

    #[test]
    fn test_widget_lifecycle() {
        let mut editor = SimulatedEditor::new();
        editor
            .create_widget_blueprint("WBP_Menu", "/Game/Widgets", "UserWidget")
            .unwrap();
        assert!(
            editor
                .create_widget_blueprint("WBP_Menu", "/Game/Widgets", "UserWidget")
                .is_err()
        );

        editor.add_widget_element("WBP_Menu", button("Start")).unwrap();
        assert!(editor.add_widget_element("WBP_Menu", button("Start")).is_err());

        let binding = EventBinding {
            widget: "Start".into(),
            event_name: "OnClicked".into(),
            function_name: "Start_OnClicked".into(),
        };
        editor.bind_widget_event("WBP_Menu", binding.clone()).unwrap();
        editor.bind_widget_event("WBP_Menu", binding).unwrap();
        let info = editor.find_widget_blueprint("WBP_Menu").unwrap();
        assert_eq!(info.event_bindings.len(), 1);

        let missing = EventBinding {
            widget: "Quit".into(),
            event_name: "OnClicked".into(),
            function_name: "Quit_OnClicked".into(),
        };
        assert!(editor.bind_widget_event("WBP_Menu", missing).is_err());
    }
}
