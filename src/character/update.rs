use bevy::prelude::*;

use super::cues::FrameReport;
use super::input::InputSnapshot;
use super::jump::{JumpInputs, step_jump, virtual_frames};
use super::movement::{advance_turn, integrate_motion, turn_toward};
use super::state::{CharacterConfig, CharacterState};
use super::volume::CollisionVolume;
use crate::physics::{CollisionQueries, SurfaceKind, sense_ground_along, solve_slide};

/// Runs one frame of the character at time `now` (seconds).
///
/// `aim` is the camera-relative world direction of the analog input. A reset
/// requested last frame is applied first and ends the frame. Otherwise the
/// frame integrates horizontal motion, applies gravity to the vertical
/// accumulator, probes the ground at the predicted position, runs the jump
/// state machine and finally slides the capsule to its new position.
pub fn update_character(
    state: &mut CharacterState,
    config: &CharacterConfig,
    volume: &CollisionVolume,
    input: &InputSnapshot,
    aim: Vec3,
    now: f64,
    queries: &impl CollisionQueries,
) -> FrameReport {
    state.frame_counter += 1;

    if state.reset_requested {
        state.reset_requested = false;
        state.position = config.spawn_position;
        state.acceleration = 0.0;
        state.previous_update_time = Some(now);
        info!("character reset to {}", config.spawn_position);
        return FrameReport {
            reset: true,
            ..default()
        };
    }

    let dt = state
        .previous_update_time
        .map_or(0.0, |previous| (now - previous).max(0.0) as f32);
    state.previous_update_time = Some(now);

    state.expire_attacks(now);
    advance_turn(state, dt, config);

    // --- Horizontal motion ---
    let motion = integrate_motion(aim, input.direction, dt, state.burning, config);
    state.walking = motion.walking;
    if let Some(heading) = motion.heading {
        turn_toward(state, heading);
    }
    if let Some(rate) = motion.walk_rate {
        state.walk_rate = rate;
    }

    // --- Gravity and ground ---
    state.acceleration -= config.gravity;
    let mut target = state.position + Vec3::Y * state.acceleration;

    let reading = sense_ground_along(queries, state.position, target, &config.ground_probe());
    target.y = reading.altitude;

    let was_grounded = state.grounded;
    state.grounded = reading.grounded;
    state.ground_surface = reading.surface();
    if state.grounded && state.acceleration < 0.0 {
        state.acceleration = 0.0;
    }
    if let Some(surface) = state.ground_surface {
        state.burning = surface == SurfaceKind::Hazard;
    }
    if reading.reset_requested && !state.reset_requested {
        warn!("character fell below altitude {}, resetting", config.min_altitude);
        state.reset_requested = true;
    }

    // --- Jump ---
    let jump = step_jump(
        &mut state.jump_phase,
        &mut state.acceleration,
        JumpInputs {
            grounded: state.grounded,
            was_grounded,
            jump_held: input.jump,
            virtual_frames: virtual_frames(dt, config),
        },
        config,
    );

    if state.grounded {
        state.target_altitude = target.y;
    }
    state.smoothed_altitude +=
        (state.target_altitude - state.smoothed_altitude) * config.altitude_smoothing;

    // --- Slide ---
    let velocity = motion.velocity + Vec3::Y * (target.y - state.position.y);
    let mut slide_iterations = 0;
    if velocity != Vec3::ZERO {
        let outcome = solve_slide(
            queries,
            volume.to_collision_space(state.position),
            velocity,
            &config.slide_settings(),
        );
        state.position = volume.to_model_space(outcome.position);
        slide_iterations = outcome.iterations;
    }

    FrameReport {
        jump,
        reset: false,
        slide_iterations,
    }
}
