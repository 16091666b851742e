mod camera;
mod texture;
mod wall;

pub use camera::Camera;
pub use texture::{TextureBank, TextureError, TextureId};
pub use wall::{Extrusion, Wall, WallId};
