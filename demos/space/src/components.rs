//! Components used by the space demo.

use engine_store::Component;
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// World-space position; rendering is 2D so `z` stays 0.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub orientation: Quat,
}

impl Transform {
    /// A transform at `position` with no rotation.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
            ..Self::default()
        }
    }

    /// The position projected onto the ground plane.
    #[must_use]
    pub fn xy(&self) -> Vec2 {
        self.position.truncate()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

/// Where an entity is heading. Removed once it arrives.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    /// Target point on the ground plane.
    pub position: Vec2,
}

impl Component for Destination {
    fn type_name() -> &'static str {
        "Destination"
    }
}

/// Drawn as a four-vertex line loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle;

impl Component for Rectangle {
    fn type_name() -> &'static str {
        "Rectangle"
    }
}

/// Drawn as a three-vertex line loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle;

impl Component for Triangle {
    fn type_name() -> &'static str {
        "Triangle"
    }
}
