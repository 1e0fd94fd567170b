use bevy::prelude::*;

use super::follow::follow_character;
use crate::character::sync_transforms;

/// Plugin for the third-person follow camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, follow_character.after(sync_transforms));
    }
}
