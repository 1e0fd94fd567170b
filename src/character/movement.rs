use bevy::prelude::*;

use super::state::{CharacterConfig, CharacterState, YawTween};
use crate::physics::geometry::{flatten, shortest_angle_delta};

/// Horizontal motion for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Horizontal displacement for this frame
    pub velocity: Vec3,
    pub walking: bool,
    /// Heading to turn toward, set while walking
    pub heading: Option<f32>,
    /// Walk-animation playback rate, set while walking
    pub walk_rate: Option<f32>,
}

impl Motion {
    pub const IDLE: Self = Self {
        velocity: Vec3::ZERO,
        walking: false,
        heading: None,
        walk_rate: None,
    };
}

/// Maps analog input magnitude onto `[min_speed_factor, max_speed_factor]`
pub fn speed_multiplier(input_magnitude: f32, config: &CharacterConfig) -> f32 {
    let magnitude = input_magnitude.clamp(0.0, 1.0);
    config.min_speed_factor + magnitude * (config.max_speed_factor - config.min_speed_factor)
}

/// Turns the camera-relative `aim` and the raw analog `input` into this
/// frame's horizontal motion
pub fn integrate_motion(
    aim: Vec3,
    input: Vec2,
    dt: f32,
    burning: bool,
    config: &CharacterConfig,
) -> Motion {
    let direction = flatten(aim);
    if input.length_squared() <= f32::EPSILON || direction == Vec3::ZERO {
        return Motion::IDLE;
    }

    let burn = if burning {
        config.burning_speed_multiplier
    } else {
        1.0
    };
    let multiplier = speed_multiplier(input.length(), config);

    Motion {
        velocity: direction * dt * config.base_speed * burn * multiplier,
        walking: true,
        heading: Some(direction.x.atan2(direction.z)),
        walk_rate: Some(config.base_speed * multiplier * burn),
    }
}

/// Starts turning toward `heading` along the shortest arc, unless already
/// turning (or facing) that way
pub fn turn_toward(state: &mut CharacterState, heading: f32) {
    let current_target = state.yaw_tween.map_or(state.yaw, |tween| tween.to);
    if shortest_angle_delta(current_target, heading).abs() < 1e-4 {
        return;
    }

    state.yaw_tween = Some(YawTween {
        from: state.yaw,
        to: state.yaw + shortest_angle_delta(state.yaw, heading),
        elapsed: 0.0,
    });
}

/// Advances the heading animation by `dt`
pub fn advance_turn(state: &mut CharacterState, dt: f32, config: &CharacterConfig) {
    let Some(mut tween) = state.yaw_tween else {
        return;
    };

    tween.elapsed += dt;
    let t = if config.turn_duration > 0.0 {
        (tween.elapsed / config.turn_duration).min(1.0)
    } else {
        1.0
    };

    if t >= 1.0 {
        state.yaw = shortest_angle_delta(0.0, tween.to);
        state.yaw_tween = None;
    } else {
        state.yaw = tween.from + (tween.to - tween.from) * t;
        state.yaw_tween = Some(tween);
    }
}
