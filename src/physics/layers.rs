use avian3d::prelude::*;

/// Collision layers for the physics simulation
#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum GameLayer {
    #[default]
    Default,
    /// Walkable surfaces probed by the ground sensor (hazards included)
    Ground,
    /// Geometry the character capsule slides against
    Solid,
    /// Enemies, found by overlap tests around the character
    Enemy,
}
