use avian3d::prelude::*;
use bevy::prelude::*;

use super::layers::GameLayer;

/// Surface classification supplied by the level on its colliders.
///
/// Colliders without this component are treated as [`SurfaceKind::Normal`].
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    #[default]
    Normal,
    /// Standing on it sets the character on fire
    Hazard,
}

/// Earliest contact reported by a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// Unit surface normal of the obstacle, pointing back toward the swept shape
    pub normal: Vec3,
    /// World-space contact point on the obstacle
    pub point: Vec3,
    /// How far along the requested sweep the contact occurred, in [0, 1]
    pub fraction: f32,
}

/// Nearest hit of a segment test against walkable geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub point: Vec3,
    pub surface: SurfaceKind,
}

/// Read-only collision queries the character core runs every frame.
///
/// Implementations must be pure queries: calling them any number of times per
/// frame has no effect on the world.
pub trait CollisionQueries {
    /// Sweeps the character capsule, centered at `from`, to `to` against solid
    /// geometry and returns the closest contact.
    fn sweep(&self, from: Vec3, to: Vec3) -> Option<ContactEvent>;

    /// Tests the segment `a -> b` against ground geometry and returns the hit
    /// nearest to `a`.
    fn segment_hit(&self, a: Vec3, b: Vec3) -> Option<GroundHit>;
}

/// [`CollisionQueries`] backed by Avian's [`SpatialQuery`].
///
/// Sweeps use the [`GameLayer::Solid`] category and the segment test uses
/// [`GameLayer::Ground`], so enemies never block or support the character.
pub struct SpatialQueries<'a, 'w, 's, S>
where
    S: Fn(Entity) -> SurfaceKind,
{
    spatial_query: &'a SpatialQuery<'w, 's>,
    shape: &'a Collider,
    exclude: Entity,
    surface_of: S,
}

impl<'a, 'w, 's, S> SpatialQueries<'a, 'w, 's, S>
where
    S: Fn(Entity) -> SurfaceKind,
{
    pub fn new(
        spatial_query: &'a SpatialQuery<'w, 's>,
        shape: &'a Collider,
        exclude: Entity,
        surface_of: S,
    ) -> Self {
        Self {
            spatial_query,
            shape,
            exclude,
            surface_of,
        }
    }

    fn filter(&self, layer: GameLayer) -> SpatialQueryFilter {
        SpatialQueryFilter::default()
            .with_mask(layer)
            .with_excluded_entities([self.exclude])
    }
}

impl<S> CollisionQueries for SpatialQueries<'_, '_, '_, S>
where
    S: Fn(Entity) -> SurfaceKind,
{
    fn sweep(&self, from: Vec3, to: Vec3) -> Option<ContactEvent> {
        let (direction, length) = Dir3::new_and_length(to - from).ok()?;

        let config = ShapeCastConfig {
            max_distance: length,
            ignore_origin_penetration: true,
            ..default()
        };

        let hit = self.spatial_query.cast_shape(
            self.shape,
            from,
            Quat::IDENTITY,
            direction,
            &config,
            &self.filter(GameLayer::Solid),
        )?;

        Some(ContactEvent {
            normal: hit.normal1.normalize_or_zero(),
            point: hit.point1,
            fraction: (hit.distance / length).clamp(0.0, 1.0),
        })
    }

    fn segment_hit(&self, a: Vec3, b: Vec3) -> Option<GroundHit> {
        let (direction, length) = Dir3::new_and_length(b - a).ok()?;

        let hit = self.spatial_query.cast_ray(
            a,
            direction,
            length,
            true,
            &self.filter(GameLayer::Ground),
        )?;

        Some(GroundHit {
            point: a + direction.as_vec3() * hit.distance,
            surface: (self.surface_of)(hit.entity),
        })
    }
}
