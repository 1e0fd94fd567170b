mod aim;
mod follow;
mod plugin;

pub use aim::*;
pub use follow::*;
pub use plugin::CameraPlugin;
