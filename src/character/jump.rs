use super::state::{CharacterConfig, JumpPhase};

/// What the jump state machine sees this frame
#[derive(Debug, Clone, Copy)]
pub struct JumpInputs {
    pub grounded: bool,
    pub was_grounded: bool,
    pub jump_held: bool,
    /// Whole virtual frames elapsed since the previous update
    pub virtual_frames: u32,
}

/// Transition worth reacting to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpEvent {
    None,
    /// Impulse applied this frame
    Launched,
    /// Back on the ground after a jump
    Landed,
}

/// Whole virtual frames contained in `dt`
pub fn virtual_frames(dt: f32, config: &CharacterConfig) -> u32 {
    if config.virtual_frame <= 0.0 || dt <= 0.0 {
        return 0;
    }
    (dt / config.virtual_frame).floor() as u32
}

/// Advances the jump state machine.
///
/// `acceleration` is the vertical accumulator gravity was already applied to
/// this frame. A jump starts only from [`JumpPhase::None`] while grounded and
/// holding jump, so the impulse can never stack within a frame. While a jump
/// ascends, upward motion decays once per virtual frame: gently while the
/// button is still held, sharply once released, which makes a tapped jump a
/// short hop.
pub fn step_jump(
    phase: &mut JumpPhase,
    acceleration: &mut f32,
    inputs: JumpInputs,
    config: &CharacterConfig,
) -> JumpEvent {
    let landed = inputs.grounded && !inputs.was_grounded;

    if *phase == JumpPhase::None {
        if inputs.grounded && inputs.jump_held {
            *acceleration += config.jump_impulse;
            *phase = JumpPhase::Pressed;
            return JumpEvent::Launched;
        }
        // Falls that didn't start with a jump still land
        return if landed {
            JumpEvent::Landed
        } else {
            JumpEvent::None
        };
    }

    if *phase == JumpPhase::Pressed && !inputs.jump_held {
        *phase = JumpPhase::Jumping;
    }

    if *acceleration > 0.0 {
        let decay = if *phase == JumpPhase::Pressed {
            config.held_jump_decay
        } else {
            config.released_jump_decay
        };
        for _ in 0..inputs.virtual_frames {
            *acceleration *= decay;
        }
    }

    if inputs.grounded && !inputs.jump_held {
        *phase = JumpPhase::None;
    }
    if landed {
        JumpEvent::Landed
    } else {
        JumpEvent::None
    }
}
