//! Asset registry and asset tools

use crate::SimulatedEditor;
use crate::level::SimActor;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};
use unreal_mcp_core::{AssetData, AssetFilter, AssetPath, AssetRegistry, AssetTools};

/// A registry entry plus the bookkeeping the editor keeps for it
#[derive(Debug, Clone)]
pub(crate) struct StoredAsset {
    pub path: AssetPath,
    pub data: AssetData,
    pub tags: BTreeMap<String, String>,
    /// Package names this asset depends on
    pub dependencies: BTreeSet<String>,
    pub dirty: bool,
    pub loaded: bool,
}

impl StoredAsset {
    pub fn new(path: &AssetPath, class: &str) -> Self {
        Self {
            path: path.clone(),
            data: AssetData::new(path, class),
            tags: BTreeMap::new(),
            dependencies: BTreeSet::new(),
            dirty: false,
            loaded: false,
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_dependency(mut self, package: &str) -> Self {
        self.dependencies.insert(package.to_string());
        self
    }

    fn relocated(&self, path: &AssetPath) -> Self {
        Self {
            path: path.clone(),
            data: AssetData::new(path, self.data.class.clone()),
            tags: self.tags.clone(),
            dependencies: self.dependencies.clone(),
            dirty: true,
            loaded: true,
        }
    }
}

/// Engine content is mounted read-only
fn is_read_only(path: &AssetPath) -> bool {
    path.mount_point() == "Engine"
}

/// Class assigned to files by extension
fn import_class(file: &Path) -> Option<&'static str> {
    let ext = file.extension()?.to_str()?.to_ascii_lowercase();
    let class = match ext.as_str() {
        "fbx" | "obj" | "gltf" | "glb" => "StaticMesh",
        "png" | "jpg" | "jpeg" | "tga" | "bmp" | "exr" | "hdr" => "Texture2D",
        "wav" | "ogg" => "SoundWave",
        "csv" | "json" => "DataTable",
        _ => return None,
    };
    Some(class)
}

/// Turn a file stem into a valid asset name
fn sanitize_name(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

impl SimulatedEditor {
    pub(crate) fn insert_asset(&mut self, asset: StoredAsset) {
        self.assets.insert(asset.path.package_name().to_string(), asset);
    }

    pub(crate) fn stored(&self, path: &AssetPath) -> Option<&StoredAsset> {
        self.assets.get(path.package_name())
    }

    /// Register a level package, recording the meshes its actors use
    pub(crate) fn register_level(&mut self, package: &str, actors: &[SimActor]) {
        let Ok(path) = AssetPath::parse(package) else {
            warn!("Refusing to register level with invalid path {}", package);
            return;
        };
        let mut asset = StoredAsset::new(&path, "World");
        for actor in actors {
            if let Some(mesh) = actor.static_mesh() {
                asset.dependencies.insert(mesh);
            }
        }
        self.insert_asset(asset);
    }

    /// Keep Blueprint, widget and level bookkeeping in step with a rename
    fn relocate(&mut self, old: &AssetPath, new: &AssetPath) {
        let (old_pkg, new_pkg) = (old.package_name(), new.package_name());

        for asset in self.assets.values_mut() {
            if asset.dependencies.remove(old_pkg) {
                asset.dependencies.insert(new_pkg.to_string());
                asset.dirty = true;
            }
        }
        if let Some(mut bp) = self.blueprints.remove(old_pkg) {
            bp.info.name = new.asset_name().to_string();
            bp.info.path = new_pkg.to_string();
            self.blueprints.insert(new_pkg.to_string(), bp);
        }
        if let Some(mut widget) = self.widgets.remove(old_pkg) {
            widget.name = new.asset_name().to_string();
            widget.path = new_pkg.to_string();
            self.widgets.insert(new_pkg.to_string(), widget);
        }
        if let Some(actors) = self.saved_levels.remove(old_pkg) {
            self.saved_levels.insert(new_pkg.to_string(), actors);
        }
        if let Some(landscapes) = self.saved_landscapes.remove(old_pkg) {
            self.saved_landscapes.insert(new_pkg.to_string(), landscapes);
        }
        if let Some(world) = self.world.as_mut() {
            if world.package_name == old_pkg {
                world.rename(new_pkg);
            }
        }
    }

    fn forget(&mut self, path: &AssetPath) {
        let pkg = path.package_name();
        self.blueprints.remove(pkg);
        self.widgets.remove(pkg);
        self.saved_levels.remove(pkg);
        self.saved_landscapes.remove(pkg);
        for asset in self.assets.values_mut() {
            asset.dependencies.remove(pkg);
        }
    }
}

impl AssetTools for SimulatedEditor {
    fn load_asset(&mut self, path: &AssetPath) -> Option<AssetData> {
        let asset = self.assets.get_mut(path.package_name())?;
        if !asset.loaded {
            debug!("Loading package {}", path);
            asset.loaded = true;
        }
        Some(asset.data.clone())
    }

    fn save_asset(&mut self, path: &AssetPath, only_if_dirty: bool) -> bool {
        if is_read_only(path) {
            return false;
        }
        match self.assets.get_mut(path.package_name()) {
            Some(asset) => {
                if asset.dirty || !only_if_dirty {
                    debug!("Saving package {}", path);
                }
                asset.dirty = false;
                true
            }
            None => false,
        }
    }

    fn duplicate_asset(&mut self, source: &AssetPath, destination: &AssetPath) -> Option<AssetData> {
        if is_read_only(destination) || self.stored(destination).is_some() {
            return None;
        }
        let copy = self.stored(source)?.relocated(destination);
        let data = copy.data.clone();
        self.insert_asset(copy);
        if let Some(mut bp) = self.blueprints.get(source.package_name()).cloned() {
            bp.info.name = destination.asset_name().to_string();
            bp.info.path = destination.package_name().to_string();
            self.blueprints.insert(destination.package_name().to_string(), bp);
        }
        if let Some(mut widget) = self.widgets.get(source.package_name()).cloned() {
            widget.name = destination.asset_name().to_string();
            widget.path = destination.package_name().to_string();
            self.widgets.insert(destination.package_name().to_string(), widget);
        }
        if let Some(actors) = self.saved_levels.get(source.package_name()).cloned() {
            self.saved_levels.insert(destination.package_name().to_string(), actors);
        }
        Some(data)
    }

    fn delete_asset(&mut self, path: &AssetPath) -> bool {
        if is_read_only(path) {
            return false;
        }
        if let Some(world) = &self.world {
            if world.package_name == path.package_name() {
                // The open level cannot be deleted out from under the editor.
                return false;
            }
        }
        if self.assets.remove(path.package_name()).is_none() {
            return false;
        }
        self.forget(path);
        debug!("Deleted asset {}", path);
        true
    }

    fn rename_asset(&mut self, source: &AssetPath, destination: &AssetPath) -> bool {
        if is_read_only(source) || is_read_only(destination) {
            return false;
        }
        if self.stored(destination).is_some() {
            return false;
        }
        let Some(asset) = self.assets.remove(source.package_name()) else {
            return false;
        };
        self.insert_asset(asset.relocated(destination));
        self.relocate(source, destination);
        debug!("Renamed asset {} -> {}", source, destination);
        true
    }

    fn import_asset(&mut self, file: &Path, destination: &str) -> Vec<AssetData> {
        if !file.is_file() {
            warn!("Import source does not exist: {}", file.display());
            return Vec::new();
        }
        let Some(class) = import_class(file) else {
            warn!("No factory for {}", file.display());
            return Vec::new();
        };
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            return Vec::new();
        };
        let raw = format!("{}/{}", destination.trim_end_matches('/'), sanitize_name(stem));
        let path = match AssetPath::parse(&raw) {
            Ok(path) if !is_read_only(&path) => path,
            _ => return Vec::new(),
        };
        if self.stored(&path).is_some() {
            warn!("Import destination already exists: {}", path);
            return Vec::new();
        }

        let mut asset = StoredAsset::new(&path, class)
            .with_tag("SourceFile", &file.display().to_string());
        asset.dirty = true;
        asset.loaded = true;
        let data = asset.data.clone();
        self.insert_asset(asset);
        vec![data]
    }

    fn export_asset(&mut self, path: &AssetPath, destination: &Path) -> bool {
        let Some(asset) = self.stored(path) else {
            return false;
        };
        let body = serde_json::json!({
            "asset": asset.data,
            "tags": asset.tags,
            "dependencies": asset.dependencies,
        });
        let file = destination.join(format!("{}.json", path.asset_name()));
        let written = std::fs::create_dir_all(destination)
            .and_then(|_| std::fs::write(&file, body.to_string()));
        match written {
            Ok(()) => true,
            Err(e) => {
                warn!("Export of {} to {} failed: {}", path, file.display(), e);
                false
            }
        }
    }
}

impl AssetRegistry for SimulatedEditor {
    fn find_asset(&self, path: &AssetPath) -> Option<AssetData> {
        self.stored(path).map(|a| a.data.clone())
    }

    fn query_assets(&self, filter: &AssetFilter) -> Vec<AssetData> {
        self.assets
            .values()
            .map(|a| &a.data)
            .filter(|data| filter.matches(data))
            .cloned()
            .collect()
    }

    fn asset_tags(&self, path: &AssetPath) -> BTreeMap<String, String> {
        self.stored(path).map(|a| a.tags.clone()).unwrap_or_default()
    }

    fn referencers(&self, path: &AssetPath) -> Vec<String> {
        self.assets
            .iter()
            .filter(|(_, a)| a.dependencies.contains(path.package_name()))
            .map(|(pkg, _)| pkg.clone())
            .collect()
    }

    fn dependencies(&self, path: &AssetPath) -> Vec<String> {
        self.stored(path)
            .map(|a| a.dependencies.iter().cloned().collect())
            .unwrap_or_default()
    }
}
