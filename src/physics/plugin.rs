use avian3d::prelude::*;
use bevy::prelude::*;

/// Plugin that sets up the Avian3D physics engine.
///
/// The character itself is moved kinematically by sweep queries; Avian only
/// maintains the spatial query pipeline and simulates whatever else lives in
/// the level.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            PhysicsPlugins::default()
                .with_length_unit(1.0), // 1 unit = 1 meter
        );
    }
}
