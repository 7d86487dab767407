//! World, level, actor and landscape descriptors

use crate::math::{BoundingBox, Rotator, Transform, Vector3, rotator_as_array, vector_as_array};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An actor placed in the current level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorInfo {
    pub name: String,
    pub class: String,
    #[serde(serialize_with = "vector_as_array")]
    pub location: Vector3,
    #[serde(serialize_with = "rotator_as_array")]
    pub rotation: Rotator,
    #[serde(serialize_with = "vector_as_array")]
    pub scale: Vector3,
}

impl ActorInfo {
    pub fn transform(&self) -> Transform {
        Transform {
            location: self.location,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

/// Request to place a new actor
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSpawn {
    pub name: String,
    pub class: String,
    pub transform: Transform,
}

/// Partial transform update; `None` fields are left as they are
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformUpdate {
    pub location: Option<Vector3>,
    pub rotation: Option<Rotator>,
    pub scale: Option<Vector3>,
}

impl TransformUpdate {
    pub fn apply(&self, transform: &mut Transform) {
        if let Some(location) = self.location {
            transform.location = location;
        }
        if let Some(rotation) = self.rotation {
            transform.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            transform.scale = scale;
        }
    }
}

/// Engine-side view of one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSnapshot {
    pub name: String,
    pub package_name: String,
    pub is_visible: bool,
    pub num_actors: usize,
    /// Component bounds of every actor that has any
    pub actor_bounds: Vec<BoundingBox>,
}

/// Level bounds as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelBounds {
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_z: f64,
    pub extent_x: f64,
    pub extent_y: f64,
    pub extent_z: f64,
}

impl From<BoundingBox> for LevelBounds {
    fn from(b: BoundingBox) -> Self {
        let (origin, extent) = (b.origin(), b.extent());
        Self {
            origin_x: origin.x,
            origin_y: origin.y,
            origin_z: origin.z,
            extent_x: extent.x,
            extent_y: extent.y,
            extent_z: extent.z,
        }
    }
}

/// Level summary returned by level and world commands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelInfo {
    pub name: String,
    pub num_actors: usize,
    pub is_visible: bool,
    pub package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LevelBounds>,
}

impl From<&LevelSnapshot> for LevelInfo {
    fn from(level: &LevelSnapshot) -> Self {
        Self {
            name: level.name.clone(),
            num_actors: level.num_actors,
            is_visible: level.is_visible,
            package_name: level.package_name.clone(),
            bounds: BoundingBox::enclosing(level.actor_bounds.iter().copied()).map(Into::into),
        }
    }
}

/// A sub-level attached to the persistent level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamingLevelInfo {
    pub package_name: String,
    pub is_loaded: bool,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorldType {
    Editor,
    #[serde(rename = "PIE")]
    PlayInEditor,
    Game,
    EditorPreview,
    Inactive,
}

impl fmt::Display for WorldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorldType::Editor => "Editor",
            WorldType::PlayInEditor => "PIE",
            WorldType::Game => "Game",
            WorldType::EditorPreview => "EditorPreview",
            WorldType::Inactive => "Inactive",
        };
        f.write_str(s)
    }
}

/// Engine-side view of the editor world
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub world_name: String,
    pub world_type: WorldType,
    pub persistent_level: LevelSnapshot,
    pub streaming_levels: Vec<StreamingLevelInfo>,
}

impl WorldSnapshot {
    /// Persistent level plus every loaded streaming level
    pub fn num_levels(&self) -> usize {
        1 + self.streaming_levels.iter().filter(|l| l.is_loaded).count()
    }

    pub fn streaming_level(&self, name: &str) -> Option<&StreamingLevelInfo> {
        self.streaming_levels
            .iter()
            .find(|l| streaming_level_matches(&l.package_name, name))
    }
}

/// Streaming levels are addressed either by full package name or by short name
pub fn streaming_level_matches(package_name: &str, name: &str) -> bool {
    package_name == name || package_name.rsplit('/').next() == Some(name)
}

/// Parameters for a new landscape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeSettings {
    pub size_x: u32,
    pub size_y: u32,
    pub sections_per_component: u32,
    pub quads_per_section: u32,
    pub location: Vector3,
}

impl Default for LandscapeSettings {
    fn default() -> Self {
        Self {
            size_x: 127,
            size_y: 127,
            sections_per_component: 1,
            quads_per_section: 63,
            location: Vector3::ZERO,
        }
    }
}

/// A landscape actor in the current world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeInfo {
    pub name: String,
    pub location: Vector3,
    pub scale: Vector3,
    pub size_x: u32,
    pub size_y: u32,
}

/// Sculpting operation applied to a landscape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandscapeModification {
    Sculpt,
    Smooth,
    Flatten,
    Ramp,
    Erosion,
    Noise,
}

impl LandscapeModification {
    pub const ALL: [LandscapeModification; 6] = [
        LandscapeModification::Sculpt,
        LandscapeModification::Smooth,
        LandscapeModification::Flatten,
        LandscapeModification::Ramp,
        LandscapeModification::Erosion,
        LandscapeModification::Noise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandscapeModification::Sculpt => "sculpt",
            LandscapeModification::Smooth => "smooth",
            LandscapeModification::Flatten => "flatten",
            LandscapeModification::Ramp => "ramp",
            LandscapeModification::Erosion => "erosion",
            LandscapeModification::Noise => "noise",
        }
    }
}

impl FromStr for LandscapeModification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LandscapeModification::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = LandscapeModification::ALL.iter().map(|m| m.as_str()).collect();
                format!("'{}' is not one of {}", s, names.join(", "))
            })
    }
}
