pub mod combat;
pub mod cues;
mod input;
pub mod jump;
pub mod movement;
mod plugin;
mod state;
pub mod update;
mod volume;

pub use combat::EnemyContact;
pub use cues::{
    AnimationClip, AnimationStep, CharacterCue, Cue, CueTracker, Emitter, FrameReport, SoundClip,
};
pub use input::*;
pub use plugin::{
    CharacterPlugin, drive_characters, play_footsteps, react_to_enemies, spawn_character,
    start_attacks, sync_transforms,
};
pub use state::*;
pub use update::update_character;
pub use volume::{CharacterShape, CollisionVolume, CollisionVolumeError};
