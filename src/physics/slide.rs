use bevy::prelude::*;

use super::geometry::{Plane, plane_ray_intersect};
use super::query::{CollisionQueries, ContactEvent};

/// Slide response tuning
#[derive(Debug, Clone, Copy)]
pub struct SlideSettings {
    pub max_iterations: u32,
    /// `|dot(normal, direction)|` below which a contact is glancing
    pub glancing_threshold: f32,
    pub glancing_friction: f32,
    pub head_on_friction: f32,
    /// Push off the sliding plane applied to glancing contacts
    pub epsilon: f32,
    /// Squared speed under which the solver stops
    pub min_speed_sq: f32,
}

/// Where the solver left the collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOutcome {
    /// Final collision-space position
    pub position: Vec3,
    /// Contacts resolved this frame
    pub iterations: u32,
}

/// Motion left after resolving one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStep {
    /// Collider position when it touched the surface
    pub position: Vec3,
    /// Velocity redirected along the surface
    pub velocity: Vec3,
    /// Friction applied to the remaining motion
    pub friction: f32,
}

/// Moves the collision volume from `start` by `velocity`, sliding along
/// whatever it hits.
///
/// Each contact stops the volume where it touched and redirects the rest of
/// the motion along the contact plane. Resolution ends when the sweep is
/// clear, the redirected motion vanishes, or `max_iterations` contacts have
/// been resolved; in the latter two cases the volume stays at the last
/// contact position.
pub fn solve_slide(
    queries: &impl CollisionQueries,
    mut start: Vec3,
    mut velocity: Vec3,
    settings: &SlideSettings,
) -> SlideOutcome {
    let mut iterations = 0;

    loop {
        let Some(contact) = queries.sweep(start, start + velocity) else {
            return SlideOutcome {
                position: start + velocity,
                iterations,
            };
        };

        let step = slide_at_contact(&contact, start, velocity, settings);
        start = step.position;
        velocity = step.velocity;
        iterations += 1;

        if velocity.length_squared() <= settings.min_speed_sq {
            return SlideOutcome {
                position: start,
                iterations,
            };
        }

        if iterations >= settings.max_iterations {
            debug!("slide solver gave up after {iterations} contacts at {start}");
            return SlideOutcome {
                position: start,
                iterations,
            };
        }
    }
}

/// Redirects `velocity` along the surface hit at `contact`
pub fn slide_at_contact(
    contact: &ContactEvent,
    start: Vec3,
    velocity: Vec3,
    settings: &SlideSettings,
) -> SlideStep {
    let speed = velocity.length();
    let position = start + contact.fraction * velocity;
    if speed <= f32::EPSILON {
        return SlideStep {
            position,
            velocity: Vec3::ZERO,
            friction: 0.0,
        };
    }

    let plane = Plane::from_point_normal(contact.point, contact.normal);
    let center_offset = contact.point - position;

    // Where the contact point would have ended up, dropped back onto the plane
    let destination = contact.point + velocity;
    let mut t = plane_ray_intersect(&plane, destination, contact.normal).unwrap_or(0.0);

    let angle = contact.normal.dot(velocity / speed);
    let friction = if angle.abs() < settings.glancing_threshold {
        t += settings.epsilon;
        settings.glancing_friction
    } else {
        settings.head_on_friction
    };

    let target = destination + t * contact.normal - center_offset;
    let remaining = (1.0 - contact.fraction) * speed;

    SlideStep {
        position,
        velocity: friction * remaining * (target - start).normalize_or_zero(),
        friction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::query::testing::{PlaneWorld, ScriptedWorld, Slab};

    const SETTINGS: SlideSettings = SlideSettings {
        max_iterations: 4,
        glancing_threshold: 0.9,
        glancing_friction: 1.0,
        head_on_friction: 0.3,
        epsilon: 0.01,
        min_speed_sq: 1e-4,
    };

    #[test]
    fn clear_sweep_moves_exactly_by_velocity() {
        let world = ScriptedWorld::empty();
        let start = Vec3::new(0.3, 1.7, -4.1);
        let velocity = Vec3::new(0.123, -0.05, 0.77);
        let outcome = solve_slide(&world, start, velocity, &SETTINGS);
        assert_eq!(outcome.position, start + velocity);
        assert_eq!(outcome.iterations, 0);
    }

    /// Contact halfway along an X-axis move against a surface whose normal
    /// makes `|dot(normal, direction)| == alignment`
    fn contact_with_alignment(alignment: f32) -> ContactEvent {
        let normal = Vec3::new(-alignment, (1.0 - alignment * alignment).sqrt(), 0.0);
        ContactEvent {
            normal,
            point: Vec3::new(1.0, 0.0, 0.0) - normal * 0.5,
            fraction: 0.5,
        }
    }

    #[test]
    fn glancing_contact_slides_at_full_speed() {
        let contact = contact_with_alignment(0.89);
        let step = slide_at_contact(&contact, Vec3::ZERO, Vec3::X * 2.0, &SETTINGS);
        assert_eq!(step.friction, 1.0);
        assert!((step.velocity.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn head_on_contact_is_damped() {
        let contact = contact_with_alignment(0.91);
        let step = slide_at_contact(&contact, Vec3::ZERO, Vec3::X * 2.0, &SETTINGS);
        assert_eq!(step.friction, 0.3);
        assert!((step.velocity.length() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn friction_split_reaches_the_final_position() {
        for (alignment, travelled) in [(0.89, 1.0), (0.91, 0.3)] {
            let contact = contact_with_alignment(alignment);
            let first = std::cell::Cell::new(true);
            let world = ScriptedWorld::new(move |_, _| first.replace(false).then_some(contact));
            let outcome = solve_slide(&world, Vec3::ZERO, Vec3::X * 2.0, &SETTINGS);
            assert_eq!(outcome.iterations, 1);
            let contact_position = Vec3::X;
            assert!(((outcome.position - contact_position).length() - travelled).abs() < 1e-5);
        }
    }

    #[test]
    fn slides_along_a_wall() {
        // Wall facing -X at x = 1, approached diagonally
        let world = PlaneWorld::new(0.25, vec![Slab::wall(Vec3::X, Vec3::NEG_X)]);
        let start = Vec3::ZERO;
        let velocity = Vec3::new(1.5, 0.0, 1.5);
        let outcome = solve_slide(&world, start, velocity, &SETTINGS);

        assert!(outcome.iterations >= 1);
        assert!(outcome.iterations <= SETTINGS.max_iterations);
        // Held off the wall, with the tangential motion carried on past the contact
        assert!(outcome.position.x <= 0.75 + 1e-4);
        assert!(outcome.position.x > 0.7);
        assert!(outcome.position.z > 0.75);
    }

    #[test]
    fn head_on_into_a_wall_stays_out_of_it() {
        let world = PlaneWorld::new(0.25, vec![Slab::wall(Vec3::X, Vec3::NEG_X)]);
        let outcome = solve_slide(&world, Vec3::ZERO, Vec3::X * 2.0, &SETTINGS);
        assert!(outcome.position.x <= 0.75 + 1e-4);
        assert!(outcome.iterations <= SETTINGS.max_iterations);
    }

    #[test]
    fn corner_never_exceeds_iteration_budget() {
        // Two walls meeting in a corner the motion drives straight into
        let world = PlaneWorld::new(
            0.25,
            vec![
                Slab::wall(Vec3::X, Vec3::NEG_X),
                Slab::wall(Vec3::Z, Vec3::NEG_Z),
            ],
        );
        let outcome = solve_slide(&world, Vec3::ZERO, Vec3::new(3.0, 0.0, 2.9), &SETTINGS);
        assert!(outcome.iterations <= SETTINGS.max_iterations);
        assert!(outcome.position.x <= 0.75 + 1e-3);
        assert!(outcome.position.z <= 0.75 + 1e-3);
    }

    #[test]
    fn exhausted_budget_stops_at_last_touched_point() {
        // Every sweep touches something halfway along a glancing surface
        let touched = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = touched.clone();
        let world = ScriptedWorld::new(move |from: Vec3, to: Vec3| {
            let at = from + (to - from) * 0.5;
            log.borrow_mut().push(at);
            Some(ContactEvent {
                normal: Vec3::new(-0.5, 0.0, 0.866).normalize(),
                point: at,
                fraction: 0.5,
            })
        });

        let outcome = solve_slide(&world, Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), &SETTINGS);

        assert_eq!(outcome.iterations, 4);
        assert_eq!(world.sweeps.get(), 4);
        let touched = touched.borrow();
        let last = *touched.last().unwrap();
        assert!((outcome.position - last).length() < 1e-5);
    }

    #[test]
    fn vanishing_motion_stops_at_contact() {
        let world = ScriptedWorld::new(|from: Vec3, _| {
            Some(ContactEvent {
                normal: Vec3::NEG_X,
                point: from + Vec3::X * 0.25,
                fraction: 0.0,
            })
        });
        let start = Vec3::new(0.5, 0.0, 0.0);
        let outcome = solve_slide(&world, start, Vec3::X * 0.02, &SETTINGS);
        assert_eq!(outcome.position, start);
        assert_eq!(outcome.iterations, 1);
    }
}
