use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D point in the colony plane. Neighbor queries work on this projection.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Squared distance to another point. Contact checks compare this
    /// against a squared radius so no square root is taken.
    pub fn distance_squared(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// A 3D vector used for agent position and orientation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn zero() -> Self {
        Vec3::new(0.0, 0.0, 0.0)
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit vector, or +x if the vector is (nearly) zero.
    /// Orientation vectors coming from the mechanics engine are only
    /// "unit-ish", so callers that need a true axis go through this.
    pub fn normalize_or_x(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 1e-12 {
            let inv_len = 1.0 / len_sq.sqrt();
            Vec3::new(self.x * inv_len, self.y * inv_len, self.z * inv_len)
        } else {
            Vec3::new(1.0, 0.0, 0.0)
        }
    }

    /// Projection onto the colony plane.
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn scale(&self, scalar: f32) -> Self {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        self.scale(scalar)
    }
}

/// Direction vector in the plane for an angle (radians).
pub fn planar_direction(angle_rad: f32) -> Vec3 {
    Vec3::new(angle_rad.cos(), angle_rad.sin(), 0.0)
}

/// Clamps a value between a minimum and maximum.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_squared_matches_hand_computation() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn degenerate_direction_falls_back_to_x_axis() {
        let axis = Vec3::zero().normalize_or_x();
        assert_eq!(axis, Vec3::new(1.0, 0.0, 0.0));
        let unit = Vec3::new(0.0, 2.0, 0.0).normalize_or_x();
        assert!((unit.length() - 1.0).abs() < 1e-6);
    }
}
