//! # unreal-mcp-core
//!
//! Core types shared by the Unreal MCP bridge crates:
//! - Command envelope and error taxonomy
//! - Asset, world, Blueprint and widget descriptors
//! - Editor ports implemented by engine adapters

pub mod asset;
pub mod blueprint;
pub mod editor;
pub mod envelope;
pub mod error;
pub mod math;
pub mod umg;
pub mod world;

pub use asset::{AssetData, AssetFilter, AssetMetadata, AssetPath, AssetPathError};
pub use blueprint::{
    BlueprintInfo, CompileStatus, ComponentInfo, GraphNode, NodeKind, Pin, PinDirection,
    VariableSpec, VariableType,
};
pub use editor::{
    ActorEditor, AssetRegistry, AssetTools, BlueprintEditor, Editor, LandscapeEditor, LevelEditor,
    ProjectSettings, WidgetEditor,
};
pub use envelope::{CommandRequest, CommandResponse, Params};
pub use error::{BridgeError, ErrorKind, Result};
pub use math::{BoundingBox, Rotator, Transform, Vector3};
pub use umg::{
    EventBinding, InputActionMapping, TextBinding, WidgetBlueprintInfo, WidgetElement, WidgetKind,
};
pub use world::{
    ActorInfo, ActorSpawn, LandscapeInfo, LandscapeModification, LandscapeSettings, LevelBounds,
    LevelInfo, LevelSnapshot, StreamingLevelInfo, TransformUpdate, WorldSnapshot, WorldType,
};
