//! Asset paths and content-browser descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters the engine refuses in long package names
const INVALID_PATH_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|', '\'', ','];

/// Why a string is not a usable asset path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("path is empty")]
    Empty,
    #[error("path must start with '/'")]
    NotRooted,
    #[error("path must contain a mount point and an asset name")]
    MissingName,
    #[error("path contains an empty segment")]
    EmptySegment,
    #[error("path contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A validated long package path such as `/Game/Meshes/Rock`.
///
/// `/Game/Meshes/Rock` and `/Game/Meshes/Rock.Rock` parse to the same asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath {
    package: String,
    name: String,
}

impl AssetPath {
    pub fn parse(raw: &str) -> Result<Self, AssetPathError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AssetPathError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(AssetPathError::NotRooted);
        }

        let (package, object) = match raw.rsplit_once('.') {
            Some((package, object)) => (package, Some(object)),
            None => (raw, None),
        };

        let segments: Vec<&str> = package[1..].split('/').collect();
        if segments.len() < 2 {
            return Err(AssetPathError::MissingName);
        }
        for segment in &segments {
            if segment.is_empty() {
                return Err(AssetPathError::EmptySegment);
            }
            validate_name(segment)?;
        }

        let name = match object {
            Some(object) if object.is_empty() => return Err(AssetPathError::MissingName),
            Some(object) if object.contains('/') => {
                return Err(AssetPathError::InvalidCharacter('.'));
            }
            Some(object) => {
                validate_name(object)?;
                object
            }
            None => segments[segments.len() - 1],
        };

        Ok(Self {
            package: package.to_string(),
            name: name.to_string(),
        })
    }

    /// `/Game/Meshes/Rock`
    pub fn package_name(&self) -> &str {
        &self.package
    }

    /// `/Game/Meshes/Rock.Rock`
    pub fn object_path(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    /// `Rock`
    pub fn asset_name(&self) -> &str {
        &self.name
    }

    /// `/Game/Meshes`
    pub fn package_path(&self) -> &str {
        match self.package.rfind('/') {
            Some(idx) => &self.package[..idx],
            None => "",
        }
    }

    /// Mount point, e.g. `Game` or `Engine`
    pub fn mount_point(&self) -> &str {
        self.package[1..].split('/').next().unwrap_or_default()
    }

    /// Sibling asset in the same directory
    pub fn with_name(&self, name: &str) -> Result<AssetPath, AssetPathError> {
        AssetPath::parse(&format!("{}/{}", self.package_path(), name))
    }

    /// Whether this asset lives in `dir` (or below it when `recursive`)
    pub fn is_in(&self, dir: &str, recursive: bool) -> bool {
        let dir = dir.trim_end_matches('/');
        if dir.is_empty() {
            return true;
        }
        let parent = self.package_path();
        if recursive {
            parent == dir || parent.starts_with(&format!("{dir}/"))
        } else {
            parent == dir
        }
    }
}

fn validate_name(segment: &str) -> Result<(), AssetPathError> {
    match segment
        .chars()
        .find(|c| c.is_whitespace() || INVALID_PATH_CHARS.contains(c))
    {
        Some(c) => Err(AssetPathError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package)
    }
}

impl FromStr for AssetPath {
    type Err = AssetPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetPath::parse(s)
    }
}

/// Registry entry for a single asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetData {
    pub name: String,
    /// Object path, e.g. `/Game/Meshes/Rock.Rock`
    pub path: String,
    pub package_path: String,
    pub class: String,
}

impl AssetData {
    pub fn new(path: &AssetPath, class: impl Into<String>) -> Self {
        Self {
            name: path.asset_name().to_string(),
            path: path.object_path(),
            package_path: path.package_path().to_string(),
            class: class.into(),
        }
    }

    pub fn asset_path(&self) -> Option<AssetPath> {
        AssetPath::parse(&self.path).ok()
    }
}

/// [`AssetData`] plus package details and registry tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    #[serde(flatten)]
    pub data: AssetData,
    pub package_name: String,
    pub asset_name: String,
    pub tags: BTreeMap<String, String>,
}

/// Registry query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    /// Directory to search; `None` searches everything
    pub package_path: Option<String>,
    /// Class name such as `StaticMesh`; `None` matches every class
    pub class_name: Option<String>,
    pub recursive: bool,
}

impl AssetFilter {
    pub fn matches(&self, asset: &AssetData) -> bool {
        if let Some(class) = &self.class_name {
            if !asset.class.eq_ignore_ascii_case(class) {
                return false;
            }
        }
        match (&self.package_path, asset.asset_path()) {
            (Some(dir), Some(path)) => path.is_in(dir, self.recursive),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}
