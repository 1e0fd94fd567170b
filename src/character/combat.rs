use bevy::prelude::{Entity, Message};
use rand::Rng;

use super::cues::{AnimationClip, Cue, Emitter, FLASH_PULSE, HIT_FLASH_PULSES, SoundClip};
use super::state::{CharacterConfig, CharacterState};

/// An enemy touched `character`; written by whatever detects the contact
#[derive(Message, Clone, Copy, Debug)]
pub struct EnemyContact {
    pub character: Entity,
}

/// Starts a spin attack at `now`.
///
/// Attacks overlap freely: each one keeps the character attacking for
/// `attack_duration` seconds and the counter drops lazily once it expires.
pub fn request_attack(
    state: &mut CharacterState,
    now: f64,
    config: &CharacterConfig,
    out: &mut Vec<Cue>,
) {
    state.expire_attacks(now);
    state.attack_expiries.push(now + config.attack_duration);
    out.push(Cue::PlayAnimation(AnimationClip::Spin));
    out.push(Cue::SetParticleRate {
        emitter: Emitter::Spin,
        rate: config.spin_rate,
    });
}

/// Reacts to an enemy touching the character at `now`.
///
/// Returns whether the damage reaction fired; it fires at most once per
/// `hit_cooldown` seconds.
pub fn touched_by_enemy(
    state: &mut CharacterState,
    now: f64,
    config: &CharacterConfig,
    out: &mut Vec<Cue>,
) -> bool {
    if state
        .last_hit_time
        .is_some_and(|last| now < last + config.hit_cooldown)
    {
        return false;
    }

    state.last_hit_time = Some(now);
    out.push(Cue::PlaySound(SoundClip::Hit));
    out.push(Cue::Flash {
        pulses: Some(HIT_FLASH_PULSES),
        half_period: FLASH_PULSE,
    });
    true
}

/// Plays a random footstep when the walk cycle plants a foot on the ground
pub fn footstep(
    state: &CharacterState,
    rng: &mut impl Rng,
    config: &CharacterConfig,
    out: &mut Vec<Cue>,
) {
    if !state.grounded || !state.walking || config.step_variants == 0 {
        return;
    }
    let variant = rng.gen_range(0..config.step_variants);
    out.push(Cue::PlaySound(SoundClip::Step(variant)));
}

#[cfg(test)]
mod tests {
    use bevy::prelude::Vec3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn overlapping_attacks_stack_and_expire() {
        let config = CharacterConfig::default();
        let mut state = CharacterState::new(Vec3::ZERO);
        let mut out = Vec::new();

        request_attack(&mut state, 1.0, &config, &mut out);
        request_attack(&mut state, 1.2, &config, &mut out);
        assert_eq!(state.attack_count(), 2);
        assert!(out.contains(&Cue::PlayAnimation(AnimationClip::Spin)));

        state.expire_attacks(1.5);
        assert_eq!(state.attack_count(), 1);
        state.expire_attacks(1.7);
        assert_eq!(state.attack_count(), 0);
        assert!(!state.is_attacking());
    }

    #[test]
    fn damage_flash_is_rate_limited() {
        let config = CharacterConfig::default();
        let mut state = CharacterState::new(Vec3::ZERO);
        let mut out = Vec::new();

        let fired: Vec<f64> = (0..=20)
            .map(|tick| 5.0 + tick as f64 * 0.1)
            .filter(|&now| touched_by_enemy(&mut state, now, &config, &mut out))
            .collect();

        // One reaction per rolling second
        assert!(fired.len() >= 2);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= config.hit_cooldown - 1e-9);
        }
        assert_eq!(
            out.iter()
                .filter(|cue| **cue == Cue::PlaySound(SoundClip::Hit))
                .count(),
            fired.len()
        );
    }

    #[test]
    fn damage_fires_again_after_exactly_the_cooldown() {
        let config = CharacterConfig::default();
        let mut state = CharacterState::new(Vec3::ZERO);
        let mut out = Vec::new();

        assert!(touched_by_enemy(&mut state, 2.0, &config, &mut out));
        assert!(!touched_by_enemy(&mut state, 2.5, &config, &mut out));
        assert!(!touched_by_enemy(&mut state, 2.999, &config, &mut out));
        assert!(touched_by_enemy(&mut state, 3.0, &config, &mut out));
    }

    #[test]
    fn footsteps_need_ground_and_walking() {
        let config = CharacterConfig::default();
        let mut state = CharacterState::new(Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(7);
        let mut out = Vec::new();

        footstep(&state, &mut rng, &config, &mut out);
        assert!(out.is_empty());

        state.grounded = true;
        state.walking = true;
        for _ in 0..50 {
            footstep(&state, &mut rng, &config, &mut out);
        }
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|cue| matches!(
            cue,
            Cue::PlaySound(SoundClip::Step(variant)) if *variant < config.step_variants
        )));
    }
}
