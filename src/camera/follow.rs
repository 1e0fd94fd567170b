use bevy::prelude::*;

use crate::character::{Character, CharacterState};

/// Camera trailing the character from a fixed offset
#[derive(Component, Clone, Copy, Debug)]
pub struct FollowCamera {
    /// Offset from the character's feet
    pub offset: Vec3,
    /// Height above the feet the camera looks at
    pub look_height: f32,
    /// Catch-up rate per second
    pub stiffness: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.5, 4.0),
            look_height: 0.8,
            stiffness: 8.0,
        }
    }
}

/// Point the camera sits at for `state`.
///
/// Height comes from the smoothed altitude so jumps and small steps don't
/// jolt the view.
pub fn follow_target(state: &CharacterState, camera: &FollowCamera) -> Vec3 {
    Vec3::new(state.position.x, state.smoothed_altitude, state.position.z) + camera.offset
}

/// Moves follow cameras toward the character and keeps it in view
pub fn follow_character(
    character_query: Query<&CharacterState, With<Character>>,
    mut camera_query: Query<(&FollowCamera, &mut Transform), Without<Character>>,
    time: Res<Time>,
) {
    let Ok(state) = character_query.single() else {
        return;
    };

    for (camera, mut transform) in &mut camera_query {
        let target = follow_target(state, camera);
        let blend = 1.0 - (-camera.stiffness * time.delta_secs()).exp();
        transform.translation = transform.translation.lerp(target, blend);

        let focus = Vec3::new(
            state.position.x,
            state.smoothed_altitude + camera.look_height,
            state.position.z,
        );
        transform.look_at(focus, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_uses_smoothed_altitude() {
        let mut state = CharacterState::new(Vec3::new(1.0, 3.0, 2.0));
        state.smoothed_altitude = 0.5;
        let camera = FollowCamera::default();
        assert_eq!(
            follow_target(&state, &camera),
            Vec3::new(1.0, 0.5, 2.0) + camera.offset
        );
    }
}
