//! Transform component and utilities for spatial positioning.
//!
//! The world is an effectively infinite 2D plane, so positions are `DVec2`:
//! f64 keeps sub-unit precision even hundreds of thousands of units from the
//! origin, where f32 would start to quantize.

use glam::DVec2;

/// A 2D transform representing position and heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub position: DVec2,
    /// Heading angle in radians, counter-clockwise from +X.
    pub rotation: f64,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform2 {
    /// Create a new transform at the given position.
    pub fn from_position(position: DVec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the forward direction for the current heading.
    pub fn forward(&self) -> DVec2 {
        DVec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: DVec2) -> f64 {
        self.position.distance(other)
    }

    /// Point the heading at a target position. No-op if the target is on top
    /// of us (heading would be undefined).
    pub fn look_at(&mut self, target: DVec2) {
        let to = target - self.position;
        if to.length_squared() > 1e-8 {
            self.rotation = to.y.atan2(to.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_matches_heading() {
        let mut t = Transform2::default();
        t.rotation = std::f64::consts::FRAC_PI_2;
        let f = t.forward();
        assert!(f.x.abs() < 1e-9);
        assert!((f.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn look_at_degenerate_target_keeps_heading() {
        let mut t = Transform2::from_position(DVec2::new(5.0, 5.0));
        t.rotation = 1.25;
        t.look_at(DVec2::new(5.0, 5.0));
        assert_eq!(t.rotation, 1.25);
    }
}
