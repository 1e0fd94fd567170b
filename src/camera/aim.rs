use bevy::prelude::*;

use crate::character::InputSnapshot;
use crate::physics::geometry::flatten;

/// Marker for the camera that analog input is relative to
#[derive(Component)]
pub struct AimCamera;

/// World direction of the character's analog input, flattened to the ground
/// plane. Its length is the input magnitude.
#[derive(Component, Default, Debug, Clone, Copy, Deref)]
pub struct AimDirection(pub Vec3);

/// Maps analog input onto the world relative to `camera`.
///
/// Pushing up moves away from the camera. Without a camera, up is `-Z` and
/// right is `+X`.
pub fn aim_direction(camera: Option<&GlobalTransform>, input: Vec2) -> Vec3 {
    if input == Vec2::ZERO {
        return Vec3::ZERO;
    }

    let local = Vec3::new(input.x, 0.0, -input.y);
    let Some(camera) = camera else {
        return local;
    };

    let world = flatten(camera.rotation() * local);
    // Looking straight down leaves no horizontal component to go by
    if world == Vec3::ZERO {
        return local;
    }
    world * input.length()
}

/// Refreshes every character's aim from its input and the aim camera
pub fn update_aim_direction(
    camera_query: Query<&GlobalTransform, With<AimCamera>>,
    mut query: Query<(&InputSnapshot, &mut AimDirection)>,
) {
    let camera = camera_query.single().ok();

    for (input, mut aim) in &mut query {
        aim.0 = aim_direction(camera, input.direction);
    }
}
