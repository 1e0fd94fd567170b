use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::combat::{EnemyContact, footstep, request_attack, touched_by_enemy};
use super::cues::{AnimationStep, CharacterCue, Cue, CueTracker, react};
use super::input::{
    AttackAction, AttackRequested, InputSnapshot, JumpAction, MoveAction, handle_attack_start,
    handle_jump_end, handle_jump_start, handle_move_end, handle_move_input,
};
use super::state::{Burning, Character, CharacterConfig, CharacterState, Grounded};
use super::update::update_character;
use super::volume::{CharacterShape, CollisionVolume};
use crate::camera::{AimDirection, update_aim_direction};
use crate::physics::{SpatialQueries, SurfaceKind};

/// Plugin for the third-person character controller
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EnhancedInputPlugin>() {
            app.add_plugins(EnhancedInputPlugin);
        }

        // Register input context for the character
        app.add_input_context::<Character>();

        app.add_message::<CharacterCue>()
            .add_message::<EnemyContact>()
            .add_message::<AnimationStep>();

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_end);
        app.add_observer(handle_jump_start);
        app.add_observer(handle_jump_end);
        app.add_observer(handle_attack_start);

        // One variable-rate update per rendered frame
        app.add_systems(
            Update,
            (
                update_aim_direction,
                start_attacks,
                drive_characters,
                react_to_enemies,
                play_footsteps,
                sync_transforms,
            )
                .chain(),
        );
    }
}

/// Spawns a character with the given tuning and collision capsule
pub fn spawn_character(
    commands: &mut Commands,
    config: CharacterConfig,
    volume: CollisionVolume,
) -> Entity {
    let entity = commands
        .spawn((
            Character,
            config,
            CharacterState::new(config.spawn_position),
            CueTracker::default(),
            volume,
            CharacterShape(volume.collider()),
        ))
        .insert((
            // Input state
            InputSnapshot::default(),
            AttackRequested::default(),
            AimDirection::default(),
        ))
        .insert((
            // Transform
            Transform::from_translation(config.spawn_position),
            Visibility::default(),
        ))
        .insert(
            // Input bindings
            actions!(Character[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
                (
                    Action::<AttackAction>::new(),
                    bindings![KeyCode::KeyE, GamepadButton::West],
                ),
            ]),
        )
        .id();

    info!(
        "spawned character {entity} at {} (capsule r={} h={})",
        config.spawn_position,
        volume.radius(),
        volume.height()
    );
    entity
}

fn write_cues(writer: &mut MessageWriter<CharacterCue>, character: Entity, cues: &mut Vec<Cue>) {
    for cue in cues.drain(..) {
        writer.write(CharacterCue { character, cue });
    }
}

/// Starts attacks requested through input
pub fn start_attacks(
    mut query: Query<(Entity, &mut CharacterState, &CharacterConfig, &mut AttackRequested)>,
    mut writer: MessageWriter<CharacterCue>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();
    let mut cues = Vec::new();

    for (entity, mut state, config, mut requested) in &mut query {
        if !requested.0 {
            continue;
        }
        requested.0 = false;
        request_attack(&mut state, now, config, &mut cues);
        write_cues(&mut writer, entity, &mut cues);
    }
}

/// Runs the frame update for every character and emits presentation cues
pub fn drive_characters(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    surfaces: Query<&SurfaceKind>,
    mut query: Query<
        (
            Entity,
            &mut CharacterState,
            &mut CueTracker,
            &CharacterConfig,
            &CollisionVolume,
            &CharacterShape,
            &InputSnapshot,
            &AimDirection,
            Has<Grounded>,
            Has<Burning>,
        ),
        With<Character>,
    >,
    mut writer: MessageWriter<CharacterCue>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();
    let surface_of = |entity: Entity| surfaces.get(entity).copied().unwrap_or_default();
    let mut cues = Vec::new();

    for (
        entity,
        mut state,
        mut tracker,
        config,
        volume,
        shape,
        input,
        aim,
        was_grounded,
        was_burning,
    ) in &mut query
    {
        let queries = SpatialQueries::new(&spatial_query, shape, entity, surface_of);
        let report = update_character(&mut state, config, volume, input, aim.0, now, &queries);
        react(&mut tracker, &mut state, &report, config, &mut cues);
        write_cues(&mut writer, entity, &mut cues);

        if state.grounded != was_grounded {
            if state.grounded {
                commands.entity(entity).insert(Grounded);
            } else {
                commands.entity(entity).remove::<Grounded>();
            }
        }
        if state.burning != was_burning {
            if state.burning {
                commands.entity(entity).insert(Burning);
            } else {
                commands.entity(entity).remove::<Burning>();
            }
        }
    }
}

/// Plays the damage reaction for enemies touching a character
pub fn react_to_enemies(
    mut reader: MessageReader<EnemyContact>,
    mut query: Query<(&mut CharacterState, &CharacterConfig)>,
    mut writer: MessageWriter<CharacterCue>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();
    let mut cues = Vec::new();

    for contact in reader.read() {
        let Ok((mut state, config)) = query.get_mut(contact.character) else {
            continue;
        };
        if touched_by_enemy(&mut state, now, config, &mut cues) {
            debug!("character {} hit by enemy", contact.character);
        }
        write_cues(&mut writer, contact.character, &mut cues);
    }
}

/// Plays footsteps for walk-cycle step events
pub fn play_footsteps(
    mut reader: MessageReader<AnimationStep>,
    query: Query<(&CharacterState, &CharacterConfig)>,
    mut writer: MessageWriter<CharacterCue>,
) {
    let mut rng = rand::thread_rng();
    let mut cues = Vec::new();

    for step in reader.read() {
        let Ok((state, config)) = query.get(step.character) else {
            continue;
        };
        footstep(state, &mut rng, config, &mut cues);
        write_cues(&mut writer, step.character, &mut cues);
    }
}

/// Places the character transform from its state
pub fn sync_transforms(mut query: Query<(&CharacterState, &mut Transform), With<Character>>) {
    for (state, mut transform) in &mut query {
        transform.translation = state.position;
        transform.rotation = Quat::from_rotation_y(state.yaw);
    }
}
