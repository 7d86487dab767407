//! Vector, rotator and bounding-box value types
//!
//! Clients send vectors either as `[x, y, z]` arrays or as `{x, y, z}`
//! objects; both forms are accepted on input.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// World-space vector in centimetres
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn min(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VectorRepr {
    Array([f64; 3]),
    Object {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        #[serde(default)]
        z: f64,
    },
}

impl<'de> Deserialize<'de> for Vector3 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match VectorRepr::deserialize(deserializer)? {
            VectorRepr::Array([x, y, z]) | VectorRepr::Object { x, y, z } => {
                Ok(Vector3::new(x, y, z))
            }
        }
    }
}

/// Euler rotation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rotator {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator::new(0.0, 0.0, 0.0);

    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.pitch, self.yaw, self.roll]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RotatorRepr {
    Array([f64; 3]),
    Object {
        #[serde(default)]
        pitch: f64,
        #[serde(default)]
        yaw: f64,
        #[serde(default)]
        roll: f64,
    },
}

impl<'de> Deserialize<'de> for Rotator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RotatorRepr::deserialize(deserializer)? {
            RotatorRepr::Array([pitch, yaw, roll]) | RotatorRepr::Object { pitch, yaw, roll } => {
                Ok(Rotator::new(pitch, yaw, roll))
            }
        }
    }
}

/// Location, rotation and scale of an actor or component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub location: Vector3,
    #[serde(default)]
    pub rotation: Rotator,
    #[serde(default = "unit_scale")]
    pub scale: Vector3,
}

fn unit_scale() -> Vector3 {
    Vector3::ONE
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vector3::ZERO,
            rotation: Rotator::ZERO,
            scale: Vector3::ONE,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundingBox {
    /// Box of half-size `extent` centred on `origin`
    pub fn around(origin: Vector3, extent: Vector3) -> Self {
        Self {
            min: Vector3::new(origin.x - extent.x, origin.y - extent.y, origin.z - extent.z),
            max: Vector3::new(origin.x + extent.x, origin.y + extent.y, origin.z + extent.z),
        }
    }

    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn origin(&self) -> Vector3 {
        Vector3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn extent(&self) -> Vector3 {
        Vector3::new(
            (self.max.x - self.min.x) / 2.0,
            (self.max.y - self.min.y) / 2.0,
            (self.max.z - self.min.z) / 2.0,
        )
    }

    /// Smallest box containing all of `boxes`, or `None` when empty
    pub fn enclosing(boxes: impl IntoIterator<Item = BoundingBox>) -> Option<BoundingBox> {
        boxes.into_iter().reduce(BoundingBox::union)
    }
}

/// Serialize a [`Vector3`] as `[x, y, z]`
pub fn vector_as_array<S: Serializer>(v: &Vector3, s: S) -> Result<S::Ok, S::Error> {
    v.to_array().serialize(s)
}

/// Serialize a [`Rotator`] as `[pitch, yaw, roll]`
pub fn rotator_as_array<S: Serializer>(r: &Rotator, s: S) -> Result<S::Ok, S::Error> {
    r.to_array().serialize(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vector_accepts_both_forms() {
        let a: Vector3 = serde_json::from_value(json!([1.0, 2.0, 3.0])).unwrap();
        let b: Vector3 = serde_json::from_value(json!({"x": 1, "y": 2, "z": 3})).unwrap();
        assert_eq!(a, b);
        let partial: Vector3 = serde_json::from_value(json!({"z": 5})).unwrap();
        assert_eq!(partial, Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_vector_rejects_short_array() {
        assert!(serde_json::from_value::<Vector3>(json!([1.0, 2.0])).is_err());
        assert!(serde_json::from_value::<Vector3>(json!("up")).is_err());
    }

    #[test]
    fn test_rotator_forms() {
        let r: Rotator = serde_json::from_value(json!([10, 20, 30])).unwrap();
        assert_eq!(r, Rotator::new(10.0, 20.0, 30.0));
        let r: Rotator = serde_json::from_value(json!({"yaw": 90})).unwrap();
        assert_eq!(r, Rotator::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn test_enclosing_bounds() {
        let a = BoundingBox::around(Vector3::ZERO, Vector3::new(50.0, 50.0, 50.0));
        let b = BoundingBox::around(Vector3::new(200.0, 0.0, 0.0), Vector3::new(50.0, 50.0, 50.0));
        let all = BoundingBox::enclosing([a, b]).unwrap();
        assert_eq!(all.origin(), Vector3::new(100.0, 0.0, 0.0));
        assert_eq!(all.extent(), Vector3::new(150.0, 50.0, 50.0));
        assert!(BoundingBox::enclosing([]).is_none());
    }
}
