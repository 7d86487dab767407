//! Landscape actors
//!
//! Only descriptors are kept: sculpt and paint operations are recorded, not
//! applied to any heightmap.

use crate::SimulatedEditor;
use tracing::debug;
use unreal_mcp_core::{
    BoundingBox, BridgeError, LandscapeEditor, LandscapeInfo, LandscapeModification,
    LandscapeSettings, Result, Vector3,
};

/// Default actor scale for new landscapes
const LANDSCAPE_SCALE: f64 = 100.0;

/// Half of the heightmap's vertical range at unit scale
const HEIGHT_HALF_RANGE: f64 = 256.0;

#[derive(Debug, Clone)]
pub(crate) struct SimLandscape {
    pub info: LandscapeInfo,
    pub history: Vec<LandscapeModification>,
    pub layers: Vec<String>,
}

impl SimLandscape {
    pub fn bounds(&self) -> BoundingBox {
        let (loc, scale) = (self.info.location, self.info.scale);
        let z = HEIGHT_HALF_RANGE * scale.z / LANDSCAPE_SCALE;
        BoundingBox {
            min: Vector3::new(loc.x, loc.y, loc.z - z),
            max: Vector3::new(
                loc.x + f64::from(self.info.size_x) * scale.x,
                loc.y + f64::from(self.info.size_y) * scale.y,
                loc.z + z,
            ),
        }
    }
}

impl SimulatedEditor {
    fn landscape_mut(&mut self, name: &str) -> Result<&mut SimLandscape> {
        self.world_mut()?
            .landscapes
            .iter_mut()
            .find(|l| l.info.name == name)
            .ok_or_else(|| BridgeError::NotFound(format!("Landscape not found: {}", name)))
    }
}

impl LandscapeEditor for SimulatedEditor {
    fn landscapes(&self) -> Vec<LandscapeInfo> {
        self.world
            .as_ref()
            .map(|w| w.landscapes.iter().map(|l| l.info.clone()).collect())
            .unwrap_or_default()
    }

    fn create_landscape(&mut self, settings: &LandscapeSettings) -> Result<LandscapeInfo> {
        let world = self.world_mut()?;
        let name = match world.landscapes.len() {
            0 => "Landscape".to_string(),
            n => format!("Landscape_{}", n),
        };
        let info = LandscapeInfo {
            name,
            location: settings.location,
            scale: Vector3::new(LANDSCAPE_SCALE, LANDSCAPE_SCALE, LANDSCAPE_SCALE),
            size_x: settings.size_x,
            size_y: settings.size_y,
        };
        world.landscapes.push(SimLandscape {
            info: info.clone(),
            history: Vec::new(),
            layers: Vec::new(),
        });
        debug!(
            "Created landscape {} ({}x{}, {} section(s) of {} quads per component)",
            info.name,
            info.size_x,
            info.size_y,
            settings.sections_per_component,
            settings.quads_per_section
        );
        Ok(info)
    }

    fn sculpt_landscape(&mut self, name: &str, modification: LandscapeModification) -> Result<()> {
        self.landscape_mut(name)?.history.push(modification);
        Ok(())
    }

    fn paint_landscape_layer(&mut self, name: &str, layer: &str) -> Result<()> {
        let landscape = self.landscape_mut(name)?;
        if !landscape.layers.iter().any(|l| l == layer) {
            landscape.layers.push(layer.to_string());
        }
        Ok(())
    }
}
