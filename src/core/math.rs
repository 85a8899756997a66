//! Minimal 3D vector math for target shapes.
//!
//! Cone, line, and sector targeting only need distances, dot products, and
//! horizontal angles, so this stays deliberately small.

use serde::{Deserialize, Serialize};

/// A position or direction in world space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise subtraction (`self - other`).
    #[must_use]
    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared length.
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Vec3) -> f64 {
        other.sub(self).length_squared()
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Vec3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector in the same direction, or zero if the length is zero.
    #[must_use]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            Vec3::default()
        } else {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        }
    }

    /// Angle in degrees between this vector and another.
    ///
    /// Returns 0 when either vector is zero-length.
    #[must_use]
    pub fn angle_degrees(self, other: Vec3) -> f64 {
        let denom = self.length() * other.length();
        if denom == 0.0 {
            return 0.0;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    /// This vector with the vertical component dropped.
    ///
    /// Sector targeting works on the horizontal plane only.
    #[must_use]
    pub fn horizontal(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }
}
