use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

/// Infinite plane `{ p | normal · p = distance }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Plane through `point` with the given (unit) normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Signed distance of `point` above the plane, along the normal
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// Ray parameter `t` such that `origin + t * direction` lies on `plane`.
///
/// Returns `None` when the ray runs parallel to the plane.
pub fn plane_ray_intersect(plane: &Plane, origin: Vec3, direction: Vec3) -> Option<f32> {
    let denom = plane.normal.dot(direction);
    if denom.abs() < f32::EPSILON {
        return None;
    }
    Some((plane.distance - plane.normal.dot(origin)) / denom)
}

/// Wraps `to - from` into (-π, π] so rotations always take the short way round
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI { delta - TAU } else { delta }
}

/// Drops the vertical component and normalizes, zero if nothing is left
pub fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_along_normal_lands_on_plane() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        let origin = Vec3::new(3.0, 5.0, -1.0);
        let t = plane_ray_intersect(&plane, origin, Vec3::Y).unwrap();
        let hit = origin + t * Vec3::Y;
        assert!((hit.y - 2.0).abs() < 1e-6);
        assert!((t + 3.0).abs() < 1e-6);
    }

    #[test]
    fn parallel_ray_misses() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        assert!(plane_ray_intersect(&plane, Vec3::Y, Vec3::X).is_none());
    }

    #[test]
    fn signed_distance_follows_normal() {
        let plane = Plane::from_point_normal(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X);
        assert!((plane.signed_distance(Vec3::new(-1.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn shortest_delta_never_exceeds_half_turn() {
        let cases = [(0.0, 3.0 * PI / 2.0), (-3.0, 3.0), (0.1, 6.2), (PI, -PI)];
        for (from, to) in cases {
            let delta = shortest_angle_delta(from, to);
            assert!(delta.abs() <= PI + 1e-5, "{from} -> {to} gave {delta}");
            let landed = (from + delta - to).rem_euclid(TAU);
            assert!(landed < 1e-4 || (TAU - landed) < 1e-4);
        }
        assert!((shortest_angle_delta(0.0, 3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
    }
}
