use bevy::ecs::observer::On;
use bevy::prelude::{Component, EntityEvent, Query, Vec2};
use bevy_enhanced_input::prelude::*;

/// Move in a direction (WASD / stick)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Jump action (hold for a higher jump)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Spin attack
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct AttackAction;

/// Player input read once per frame by the character update
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct InputSnapshot {
    /// Analog direction, magnitude in [0, 1]
    pub direction: Vec2,
    /// Whether jump is currently held
    pub jump: bool,
}

/// Set when attack was pressed, cleared once the attack starts
#[derive(Component, Default)]
pub struct AttackRequested(pub bool);

/// System to handle move input via observer
pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut InputSnapshot>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.direction = trigger.value.clamp_length_max(1.0);
    }
}

/// Clear move input when all movement keys are released
pub fn handle_move_end(trigger: On<Complete<MoveAction>>, mut query: Query<&mut InputSnapshot>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.direction = Vec2::ZERO;
    }
}

/// Handle jump press
pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut InputSnapshot>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.jump = true;
    }
}

/// Handle jump release
pub fn handle_jump_end(trigger: On<Complete<JumpAction>>, mut query: Query<&mut InputSnapshot>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.jump = false;
    }
}

/// Handle attack press
pub fn handle_attack_start(
    trigger: On<Start<AttackAction>>,
    mut query: Query<&mut AttackRequested>,
) {
    if let Ok(mut attack) = query.get_mut(trigger.event_target()) {
        attack.0 = true;
    }
}
