use bevy::prelude::*;

use super::query::{CollisionQueries, GroundHit, SurfaceKind};

/// Ground probe settings
#[derive(Debug, Clone, Copy)]
pub struct GroundProbe {
    /// The probe runs from `half_range` above to `half_range` below the feet
    pub half_range: f32,
    /// Height kept between feet and ground
    pub collision_margin: f32,
    /// Falling below this with nothing underneath requests a reset
    pub min_altitude: f32,
}

/// Result of probing under the character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundReading {
    pub hit: Option<GroundHit>,
    pub grounded: bool,
    /// Altitude the feet should be placed at this frame
    pub altitude: f32,
    pub reset_requested: bool,
}

impl GroundReading {
    /// Surface under the feet when grounded
    pub fn surface(&self) -> Option<SurfaceKind> {
        self.hit.filter(|_| self.grounded).map(|hit| hit.surface)
    }
}

/// Probes the ground under `position` (the feet).
///
/// The character is grounded when its feet are at or below the hit point plus
/// the collision margin; the reading then snaps the altitude onto the margin.
/// With nothing underneath and the feet under `min_altitude` the altitude is
/// clamped and a reset requested rather than applied in place.
pub fn sense_ground(
    queries: &impl CollisionQueries,
    position: Vec3,
    probe: &GroundProbe,
) -> GroundReading {
    sense_ground_along(queries, position, position, probe)
}

/// Probes the ground for feet moving from `from` to `to` this frame.
///
/// The probe spans the whole vertical step plus `half_range` on either side,
/// so a fast fall cannot step over a floor. Grounding and snapping are judged
/// at `to`, as in [`sense_ground`].
pub fn sense_ground_along(
    queries: &impl CollisionQueries,
    from: Vec3,
    to: Vec3,
    probe: &GroundProbe,
) -> GroundReading {
    let top = from.y.max(to.y) + probe.half_range;
    let bottom = from.y.min(to.y) - probe.half_range;
    let hit = queries.segment_hit(
        Vec3::new(to.x, top, to.z),
        Vec3::new(to.x, bottom, to.z),
    );

    match hit {
        Some(hit) => {
            let rest = hit.point.y + probe.collision_margin;
            let grounded = to.y <= rest;
            GroundReading {
                hit: Some(hit),
                grounded,
                altitude: if grounded { rest } else { to.y },
                reset_requested: false,
            }
        }
        None if to.y < probe.min_altitude => GroundReading {
            hit: None,
            grounded: false,
            altitude: probe.min_altitude,
            reset_requested: true,
        },
        None => GroundReading {
            hit: None,
            grounded: false,
            altitude: to.y,
            reset_requested: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::query::testing::{PlaneWorld, Slab};

    const PROBE: GroundProbe = GroundProbe {
        half_range: 0.2,
        collision_margin: 0.04,
        min_altitude: -10.0,
    };

    #[test]
    fn snaps_onto_ground_within_margin() {
        let world = PlaneWorld::new(0.4, vec![Slab::floor(0.0)]);
        let reading = sense_ground(&world, Vec3::new(0.0, -0.05, 0.0), &PROBE);
        assert!(reading.grounded);
        assert!((reading.altitude - 0.04).abs() < 1e-6);
        assert_eq!(reading.surface(), Some(SurfaceKind::Normal));
    }

    #[test]
    fn hovering_above_margin_is_airborne() {
        let world = PlaneWorld::new(0.4, vec![Slab::floor(0.0)]);
        let reading = sense_ground(&world, Vec3::new(0.0, 0.15, 0.0), &PROBE);
        assert!(reading.hit.is_some());
        assert!(!reading.grounded);
        assert_eq!(reading.altitude, 0.15);
        assert_eq!(reading.surface(), None);
    }

    #[test]
    fn reports_hazard_surface() {
        let world = PlaneWorld::new(
            0.4,
            vec![Slab::floor(0.0).hazard().within(Vec2::splat(-1.0), Vec2::splat(1.0))],
        );
        let reading = sense_ground(&world, Vec3::ZERO, &PROBE);
        assert_eq!(reading.surface(), Some(SurfaceKind::Hazard));

        let off_edge = sense_ground(&world, Vec3::new(2.0, 0.0, 0.0), &PROBE);
        assert!(!off_edge.grounded);
        assert!(off_edge.hit.is_none());
    }

    #[test]
    fn falling_out_of_the_level_requests_reset() {
        let world = PlaneWorld::new(0.4, vec![]);
        let reading = sense_ground(&world, Vec3::new(0.0, -11.0, 0.0), &PROBE);
        assert!(reading.reset_requested);
        assert_eq!(reading.altitude, -10.0);

        let still_falling = sense_ground(&world, Vec3::new(0.0, -9.0, 0.0), &PROBE);
        assert!(!still_falling.reset_requested);
    }

    #[test]
    fn fast_fall_cannot_step_over_the_floor() {
        let world = PlaneWorld::new(0.4, vec![Slab::floor(0.0)]);
        let from = Vec3::new(0.0, 0.3, 0.0);
        let to = Vec3::new(0.0, -0.5, 0.0);

        // A probe around the end point alone starts below the floor
        assert!(sense_ground(&world, to, &PROBE).hit.is_none());

        let reading = sense_ground_along(&world, from, to, &PROBE);
        assert!(reading.grounded);
        assert!((reading.altitude - 0.04).abs() < 1e-6);
    }

    #[test]
    fn rising_above_the_margin_stays_airborne() {
        let world = PlaneWorld::new(0.4, vec![Slab::floor(0.0)]);
        let reading = sense_ground_along(
            &world,
            Vec3::new(0.0, 0.04, 0.0),
            Vec3::new(0.0, 0.14, 0.0),
            &PROBE,
        );
        assert!(reading.hit.is_some());
        assert!(!reading.grounded);
        assert_eq!(reading.altitude, 0.14);
    }
}
