pub mod camera;
pub mod character;
pub mod physics;

pub use camera::CameraPlugin;
pub use character::CharacterPlugin;
pub use physics::PhysicsPlugin;

use bevy::prelude::*;

/// Unified plugin that adds physics, the character controller and the follow camera.
pub struct HazardRunnerPlugin;

impl Plugin for HazardRunnerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<PhysicsPlugin>() {
            app.add_plugins(PhysicsPlugin);
        }
        if !app.is_plugin_added::<CharacterPlugin>() {
            app.add_plugins(CharacterPlugin);
        }
        if !app.is_plugin_added::<CameraPlugin>() {
            app.add_plugins(CameraPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::HazardRunnerPlugin;
    pub use crate::camera::{AimCamera, AimDirection, CameraPlugin, FollowCamera};
    pub use crate::character::{
        AnimationStep, Burning, Character, CharacterConfig, CharacterCue, CharacterPlugin,
        CharacterShape, CharacterState, CollisionVolume, CollisionVolumeError, Cue, EnemyContact,
        Grounded, JumpPhase, spawn_character,
    };
    pub use crate::physics::{GameLayer, PhysicsPlugin, SurfaceKind};
}
