use bevy::prelude::*;

use super::jump::JumpEvent;
use super::state::{CharacterConfig, CharacterState};

/// Blend-out applied when the walk cycle stops
pub const WALK_BLEND_OUT: f32 = 0.2;
/// Blend-out applied to the jump pose on landing
pub const JUMP_BLEND_OUT: f32 = 0.1;
/// Half period of one opacity pulse
pub const FLASH_PULSE: f32 = 0.1;
/// Pulses in the damage flash
pub const HIT_FLASH_PULSES: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationClip {
    Walk,
    Jump,
    Spin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundClip {
    /// Footstep variant
    Step(usize),
    CatchFire,
    Ouch,
    BurningLoop,
    HaltFire,
    Hit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emitter {
    Fire,
    Smoke,
    WhiteSmoke,
    JumpDust,
    Spin,
}

/// Fire-and-forget presentation request.
///
/// Cues never feed back into the simulation; the consumer maps them onto
/// animation players, audio and particle systems.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    PlayAnimation(AnimationClip),
    StopAnimation { clip: AnimationClip, blend_out: f32 },
    SetAnimationSpeed { clip: AnimationClip, rate: f32 },
    PlaySound(SoundClip),
    StopSound(SoundClip),
    SetParticleRate { emitter: Emitter, rate: f32 },
    /// Emit at `rate` for `duration` seconds, then stop
    ParticleBurst { emitter: Emitter, rate: f32, duration: f32 },
    /// Pulse the model's opacity, `None` pulses until [`Cue::StopFlash`]
    Flash { pulses: Option<u32>, half_period: f32 },
    StopFlash,
}

/// A cue addressed to one character
#[derive(Message, Clone, Debug)]
pub struct CharacterCue {
    pub character: Entity,
    pub cue: Cue,
}

/// The walk cycle planted a foot; written by the animation player
#[derive(Message, Clone, Copy, Debug)]
pub struct AnimationStep {
    pub character: Entity,
}

/// What the frame update did that presentation may react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub jump: JumpEvent,
    /// The update only applied a pending reset
    pub reset: bool,
    /// Contacts the slide solver resolved
    pub slide_iterations: u32,
}

impl Default for FrameReport {
    fn default() -> Self {
        Self {
            jump: JumpEvent::None,
            reset: false,
            slide_iterations: 0,
        }
    }
}

/// Previous-frame flags used for edge detection
#[derive(Component, Debug, Default, Clone)]
pub struct CueTracker {
    pub was_walking: bool,
    pub was_grounded: bool,
    pub was_burning: bool,
    pub was_attacking: bool,
    /// Last walk rate sent to the animation player
    pub walk_rate: Option<f32>,
}

/// Compares `state` with the flags seen last frame and pushes the matching
/// cues to `out`
pub fn react(
    tracker: &mut CueTracker,
    state: &mut CharacterState,
    report: &FrameReport,
    config: &CharacterConfig,
    out: &mut Vec<Cue>,
) {
    // --- Walking ---
    if !tracker.was_walking && state.walking {
        out.push(Cue::PlayAnimation(AnimationClip::Walk));
    }
    if tracker.was_walking && !state.walking {
        out.push(Cue::StopAnimation {
            clip: AnimationClip::Walk,
            blend_out: WALK_BLEND_OUT,
        });
    }

    // --- Jump ---
    match report.jump {
        JumpEvent::Launched => out.push(Cue::PlayAnimation(AnimationClip::Jump)),
        JumpEvent::Landed => {
            out.push(Cue::StopAnimation {
                clip: AnimationClip::Jump,
                blend_out: JUMP_BLEND_OUT,
            });
            if state.burning {
                out.push(Cue::ParticleBurst {
                    emitter: Emitter::JumpDust,
                    rate: config.dust_rate,
                    duration: config.dust_duration,
                });
            }
        }
        JumpEvent::None => {}
    }

    // --- Landing footstep ---
    if !tracker.was_grounded
        && state.grounded
        && !state.burning
        && state.last_step_frame + config.landing_step_frames < state.frame_counter
    {
        state.last_step_frame = state.frame_counter;
        out.push(Cue::PlaySound(SoundClip::Step(0)));
    }

    // --- Burning ---
    if !tracker.was_burning && state.burning {
        out.extend([
            Cue::PlaySound(SoundClip::CatchFire),
            Cue::PlaySound(SoundClip::Ouch),
            Cue::PlaySound(SoundClip::BurningLoop),
            Cue::Flash {
                pulses: None,
                half_period: FLASH_PULSE,
            },
            Cue::SetParticleRate {
                emitter: Emitter::Fire,
                rate: config.fire_rate,
            },
            Cue::SetParticleRate {
                emitter: Emitter::Smoke,
                rate: config.smoke_rate,
            },
        ]);
    }
    if tracker.was_burning && !state.burning {
        out.extend([
            Cue::StopSound(SoundClip::BurningLoop),
            Cue::StopFlash,
            Cue::PlaySound(SoundClip::HaltFire),
            Cue::ParticleBurst {
                emitter: Emitter::WhiteSmoke,
                rate: config.white_smoke_rate,
                duration: config.white_smoke_duration,
            },
            Cue::SetParticleRate {
                emitter: Emitter::Fire,
                rate: 0.0,
            },
            Cue::SetParticleRate {
                emitter: Emitter::Smoke,
                rate: 0.0,
            },
        ]);
    }

    // --- Walk rate, retuned whenever it changes (burning included) ---
    if state.walking && tracker.walk_rate != Some(state.walk_rate) {
        out.push(Cue::SetAnimationSpeed {
            clip: AnimationClip::Walk,
            rate: state.walk_rate,
        });
        tracker.walk_rate = Some(state.walk_rate);
    }

    // --- Attack finished ---
    let attacking = state.is_attacking();
    if tracker.was_attacking && !attacking {
        out.push(Cue::SetParticleRate {
            emitter: Emitter::Spin,
            rate: 0.0,
        });
    }

    tracker.was_walking = state.walking;
    tracker.was_grounded = state.grounded;
    tracker.was_burning = state.burning;
    tracker.was_attacking = attacking;
}
