//! Runtime wall graph.
//!
//! Walls are BSP nodes kept in a flat arena (`Vec<Wall>`, root at index
//! 0); `front`/`back` children are arena indices resolved by the loader.
//! Extrusion textures are [`TextureId`]s into the level's `TextureBank`.

use crate::world::camera::Camera;
use crate::world::texture::TextureId;

/// Arena index of a wall. The loader guarantees indices are in bounds.
pub type WallId = u16;

/// The ceiling or floor portion of a wall: a vertical interval with up
/// to three textures (outer seen from in front, face on the vertical
/// rise, inner seen from behind). A missing texture skips that surface.
#[derive(Clone, Debug)]
pub struct Extrusion {
    pub top: f32,
    pub bottom: f32,
    pub outer_texture: Option<TextureId>,
    pub face_texture: Option<TextureId>,
    pub inner_texture: Option<TextureId>,
}

#[derive(Clone, Debug)]
pub struct Wall {
    pub left_x: f32,
    pub left_z: f32,
    pub right_x: f32,
    pub right_z: f32,
    /// Horizontal distance between the edges, precomputed at load.
    pub length: f32,

    pub ceiling: Option<Extrusion>,
    pub floor: Option<Extrusion>,

    pub front: Option<WallId>,
    pub back: Option<WallId>,
}

impl Wall {
    pub fn has_ceiling_extrusion(&self) -> bool {
        self.ceiling.is_some()
    }

    pub fn has_floor_extrusion(&self) -> bool {
        self.floor.is_some()
    }

    /// A wall is split when its ceiling and floor extrusions do not meet,
    /// leaving a gap one can see (and walk) through.
    pub fn is_split(&self) -> bool {
        match (&self.ceiling, &self.floor) {
            (Some(ceiling), Some(floor)) => ceiling.bottom < floor.top,
            _ => true,
        }
    }

    /// A continuous wall renders as one face from ceiling top to floor
    /// bottom; that requires the two extrusions to meet and share a face
    /// texture.
    pub fn is_continuous(&self) -> bool {
        if self.is_split() {
            return false;
        }
        let ceiling = self.ceiling.as_ref().unwrap();
        let floor = self.floor.as_ref().unwrap();
        ceiling.face_texture == floor.face_texture
    }

    /// Whether the camera is in the wall's front half-space.
    pub fn is_front_facing(&self, camera: &Camera) -> bool {
        let delta_x = self.right_x - self.left_x;
        let delta_z = self.right_z - self.left_z;
        delta_z * (self.right_x - camera.x()) < delta_x * (self.right_z - camera.z())
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
