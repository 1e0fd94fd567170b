pub mod geometry;
pub mod ground;
mod layers;
mod plugin;
pub mod query;
pub mod slide;

pub use ground::{GroundProbe, GroundReading, sense_ground, sense_ground_along};
pub use layers::GameLayer;
pub use plugin::PhysicsPlugin;
pub use query::{CollisionQueries, ContactEvent, GroundHit, SpatialQueries, SurfaceKind};
pub use slide::{SlideOutcome, SlideSettings, solve_slide};
