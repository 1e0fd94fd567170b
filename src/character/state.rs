use bevy::prelude::*;

use crate::physics::{GroundProbe, SlideSettings, SurfaceKind};

/// Marker component for the playable character (also used as input context)
#[derive(Component, Default)]
pub struct Character;

/// Character tuning. Distances are world units, accelerations are world units
/// per update frame.
#[derive(Component, Clone, Copy, Debug)]
pub struct CharacterConfig {
    /// Position the character spawns at and is reset to
    pub spawn_position: Vec3,
    /// Horizontal speed in units per second at full input
    pub base_speed: f32,
    /// Speed multiplier for the weakest non-zero analog input
    pub min_speed_factor: f32,
    /// Speed multiplier at full analog input
    pub max_speed_factor: f32,
    /// Speed and walk-animation multiplier while burning
    pub burning_speed_multiplier: f32,
    /// Seconds taken to turn toward a new heading
    pub turn_duration: f32,
    /// Subtracted from the vertical accumulator every update
    pub gravity: f32,
    /// Added to the vertical accumulator when a jump starts
    pub jump_impulse: f32,
    /// Per virtual frame decay of upward motion while jump is still held
    pub held_jump_decay: f32,
    /// Per virtual frame decay of upward motion once jump is released
    pub released_jump_decay: f32,
    /// Length of the virtual frame used for frame-rate independent decay
    pub virtual_frame: f32,
    /// Half length of the vertical ground probe
    pub ground_probe_half_range: f32,
    /// Height kept between feet and ground
    pub collision_margin: f32,
    /// Below this altitude with nothing underneath, the character is reset
    pub min_altitude: f32,
    /// Maximum sweep/slide iterations per update
    pub max_slide_iterations: u32,
    /// `|dot(normal, direction)|` below which a contact counts as glancing
    pub glancing_threshold: f32,
    /// Friction applied along glancing contacts
    pub glancing_friction: f32,
    /// Friction applied on near head-on contacts
    pub head_on_friction: f32,
    /// Push off the sliding plane for glancing contacts
    pub slide_epsilon: f32,
    /// Squared speed under which sliding stops
    pub min_slide_speed_sq: f32,
    /// Blend of the smoothed altitude toward the last ground altitude, per update
    pub altitude_smoothing: f32,
    /// Seconds an attack keeps the character attacking
    pub attack_duration: f64,
    /// Minimum seconds between two damage reactions
    pub hit_cooldown: f64,
    /// Frames that must pass between two landing footsteps
    pub landing_step_frames: u64,
    /// Number of footstep sound variants
    pub step_variants: usize,
    /// Emission rate of the fire emitter while burning
    pub fire_rate: f32,
    /// Emission rate of the smoke emitter while burning
    pub smoke_rate: f32,
    /// Emission rate of the white smoke puff when the fire goes out
    pub white_smoke_rate: f32,
    /// Seconds the white smoke puff lasts
    pub white_smoke_duration: f32,
    /// Emission rate of the landing dust burst
    pub dust_rate: f32,
    /// Seconds the landing dust burst lasts
    pub dust_duration: f32,
    /// Emission rate of the spin trail while attacking
    pub spin_rate: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(0.1, -0.2, 0.0),
            base_speed: 2.0,
            min_speed_factor: 0.2,
            max_speed_factor: 1.0,
            burning_speed_multiplier: 2.0,
            turn_duration: 0.1,
            gravity: 0.004,
            jump_impulse: 0.1,
            held_jump_decay: 0.99,
            released_jump_decay: 0.2,
            virtual_frame: 1.0 / 60.0,
            ground_probe_half_range: 0.2,
            collision_margin: 0.04,
            min_altitude: -10.0,
            max_slide_iterations: 4,
            glancing_threshold: 0.9,
            glancing_friction: 1.0,
            head_on_friction: 0.3,
            slide_epsilon: 0.01,
            min_slide_speed_sq: 1e-4,
            altitude_smoothing: 0.05,
            attack_duration: 0.5,
            hit_cooldown: 1.0,
            landing_step_frames: 10,
            step_variants: 10,
            fire_rate: 120.0,
            smoke_rate: 40.0,
            white_smoke_rate: 80.0,
            white_smoke_duration: 5.0,
            dust_rate: 200.0,
            dust_duration: 0.1,
            spin_rate: 150.0,
        }
    }
}

impl CharacterConfig {
    pub fn ground_probe(&self) -> GroundProbe {
        GroundProbe {
            half_range: self.ground_probe_half_range,
            collision_margin: self.collision_margin,
            min_altitude: self.min_altitude,
        }
    }

    pub fn slide_settings(&self) -> SlideSettings {
        SlideSettings {
            max_iterations: self.max_slide_iterations,
            glancing_threshold: self.glancing_threshold,
            glancing_friction: self.glancing_friction,
            head_on_friction: self.head_on_friction,
            epsilon: self.slide_epsilon,
            min_speed_sq: self.min_slide_speed_sq,
        }
    }
}

/// Jump progress. Only ever moves `None -> Pressed -> Jumping -> None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JumpPhase {
    /// No jump in progress
    #[default]
    None,
    /// Impulse applied, button still held
    Pressed,
    /// Button released, waiting to be back on the ground
    Jumping,
}

/// Heading animated toward a target over a fixed duration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YawTween {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
}

/// Everything the per-frame update reads and writes for one character
#[derive(Component, Clone, Debug)]
pub struct CharacterState {
    /// World position of the model origin (the feet)
    pub position: Vec3,
    /// Current heading in radians, 0 facing +Z
    pub yaw: f32,
    pub yaw_tween: Option<YawTween>,
    /// Vertical motion accumulator, positive while a jump impulse lasts
    pub acceleration: f32,
    pub grounded: bool,
    /// Surface under the feet, `None` while airborne
    pub ground_surface: Option<SurfaceKind>,
    pub jump_phase: JumpPhase,
    pub walking: bool,
    /// Playback rate of the walk animation
    pub walk_rate: f32,
    pub burning: bool,
    /// Expiry times of attacks in progress; their count is the attack counter
    pub attack_expiries: Vec<f64>,
    pub frame_counter: u64,
    pub last_step_frame: u64,
    pub last_hit_time: Option<f64>,
    pub previous_update_time: Option<f64>,
    /// Set when the character fell out of the level, applied next update
    pub reset_requested: bool,
    /// Last altitude the character stood at
    pub target_altitude: f32,
    /// Altitude eased toward `target_altitude`, for followers such as cameras
    pub smoothed_altitude: f32,
}

impl CharacterState {
    pub fn new(spawn_position: Vec3) -> Self {
        Self {
            position: spawn_position,
            yaw: 0.0,
            yaw_tween: None,
            acceleration: 0.0,
            grounded: false,
            ground_surface: None,
            jump_phase: JumpPhase::None,
            walking: false,
            walk_rate: 0.0,
            burning: false,
            attack_expiries: Vec::new(),
            frame_counter: 0,
            last_step_frame: 0,
            last_hit_time: None,
            previous_update_time: None,
            reset_requested: false,
            target_altitude: spawn_position.y,
            smoothed_altitude: spawn_position.y,
        }
    }

    /// Number of attacks still running
    pub fn attack_count(&self) -> usize {
        self.attack_expiries.len()
    }

    pub fn is_attacking(&self) -> bool {
        !self.attack_expiries.is_empty()
    }

    /// Drops attacks whose duration has run out
    pub fn expire_attacks(&mut self, now: f64) {
        self.attack_expiries.retain(|&expiry| expiry > now);
    }
}

/// Marker: character is on the ground, mirrors [`CharacterState::grounded`]
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Grounded;

/// Marker: character is burning, mirrors [`CharacterState::burning`]
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Burning;
