use avian3d::prelude::*;
use bevy::prelude::*;
use thiserror::Error;

/// Share of the model's width used as capsule radius
const RADIUS_FROM_WIDTH: f32 = 0.4;
/// Capsule center height as a share of the model's height
const CENTER_FROM_HEIGHT: f32 = 0.51;

/// Model bounds that cannot produce a collision capsule
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CollisionVolumeError {
    #[error("model bounds are not finite (min {min}, max {max})")]
    NonFinite { min: Vec3, max: Vec3 },
    #[error("model bounds give a capsule radius of {0}, expected a positive value")]
    Radius(f32),
    #[error("model bounds give a capsule height of {0}, expected a positive value")]
    Height(f32),
}

/// Character capsule, derived once from the model bounds and never mutated.
///
/// `offset` goes from the model's local origin (the feet) to the capsule
/// center: collision-space = model-space + offset.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CollisionVolume {
    radius: f32,
    height: f32,
    offset: Vec3,
}

impl CollisionVolume {
    /// Derives the capsule from the model's bounding box
    pub fn from_bounds(min: Vec3, max: Vec3) -> Result<Self, CollisionVolumeError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(CollisionVolumeError::NonFinite { min, max });
        }

        let radius = (max.x - min.x) * RADIUS_FROM_WIDTH;
        if radius <= 0.0 {
            return Err(CollisionVolumeError::Radius(radius));
        }

        let height = max.y - min.y;
        if height <= 0.0 {
            return Err(CollisionVolumeError::Height(height));
        }

        Ok(Self {
            radius,
            height,
            offset: Vec3::new(0.0, height * CENTER_FROM_HEIGHT, 0.0),
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Total capsule height, caps included
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn to_collision_space(&self, model_position: Vec3) -> Vec3 {
        model_position + self.offset
    }

    pub fn to_model_space(&self, collision_position: Vec3) -> Vec3 {
        collision_position - self.offset
    }

    /// Avian collider matching this capsule, built once at spawn
    pub fn collider(&self) -> Collider {
        let segment = (self.height - 2.0 * self.radius).max(0.0);
        Collider::capsule(self.radius, segment)
    }
}

/// Sweep shape for the character, cached so the per-frame path never builds colliders
#[derive(Component, Deref)]
pub struct CharacterShape(pub Collider);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_capsule_from_bounds() {
        let volume =
            CollisionVolume::from_bounds(Vec3::new(-0.5, 0.0, -0.3), Vec3::new(0.5, 2.0, 0.3))
                .unwrap();
        assert!((volume.radius() - 0.4).abs() < 1e-6);
        assert!((volume.height() - 2.0).abs() < 1e-6);
        assert!((volume.offset().y - 1.02).abs() < 1e-6);

        let feet = Vec3::new(3.0, 1.0, -2.0);
        assert_eq!(volume.to_model_space(volume.to_collision_space(feet)), feet);
    }

    #[test]
    fn rejects_degenerate_bounds() {
        assert_eq!(
            CollisionVolume::from_bounds(Vec3::ZERO, Vec3::new(0.0, 2.0, 1.0)),
            Err(CollisionVolumeError::Radius(0.0))
        );
        assert_eq!(
            CollisionVolume::from_bounds(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0)),
            Err(CollisionVolumeError::Height(-1.0))
        );
        assert!(matches!(
            CollisionVolume::from_bounds(Vec3::splat(f32::NAN), Vec3::ONE),
            Err(CollisionVolumeError::NonFinite { .. })
        ));
    }
}
