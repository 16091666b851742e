//! ---------------------------------------------------------------------------
//! Front-to-back BSP traversal
//!
//! Walks the wall arena and feeds segments to the rasterizer in
//! front-to-back order: at every node the child on the camera's side is
//! visited first, then the node's own visible side, then the far child.
//! Closer geometry therefore closes column clips before farther geometry
//! is considered, and traversal stops outright once the screen is
//! saturated.
//! ---------------------------------------------------------------------------

use crate::world::{Camera, TextureBank, Wall, WallId};

use super::renderer::Renderer;
use super::segment::Segment;

pub fn render_bsp(
    renderer: &mut Renderer,
    walls: &[Wall],
    wall_id: Option<WallId>,
    camera: &Camera,
    bank: &TextureBank,
) {
    let Some(wall_id) = wall_id else {
        return;
    };

    if renderer.saturated() {
        return;
    }

    let wall = &walls[wall_id as usize];
    if wall.is_front_facing(camera) {
        render_bsp(renderer, walls, wall.front, camera, bank);
        render_wall_front(renderer, wall, camera, bank);
        render_bsp(renderer, walls, wall.back, camera, bank);
    } else {
        render_bsp(renderer, walls, wall.back, camera, bank);
        render_wall_back(renderer, wall, camera, bank);
        render_bsp(renderer, walls, wall.front, camera, bank);
    }
}

fn render_wall_front(renderer: &mut Renderer, wall: &Wall, camera: &Camera, bank: &TextureBank) {
    if wall.is_continuous() {
        let ceiling = wall.ceiling.as_ref().unwrap();
        let floor = wall.floor.as_ref().unwrap();
        renderer.render_segment(
            Segment {
                left_x: wall.left_x,
                left_z: wall.left_z,
                right_x: wall.right_x,
                right_z: wall.right_z,
                length: wall.length,
                top: ceiling.top,
                bottom: floor.bottom,
                ceiling_texture: ceiling.outer_texture,
                face_texture: ceiling.face_texture,
                floor_texture: floor.outer_texture,
            },
            camera,
            bank,
        );
        return;
    }

    if let Some(ceiling) = &wall.ceiling {
        renderer.render_segment(
            Segment {
                left_x: wall.left_x,
                left_z: wall.left_z,
                right_x: wall.right_x,
                right_z: wall.right_z,
                length: wall.length,
                top: ceiling.top,
                bottom: ceiling.bottom,
                ceiling_texture: ceiling.outer_texture,
                face_texture: ceiling.face_texture,
                floor_texture: None,
            },
            camera,
            bank,
        );
    }

    if let Some(floor) = &wall.floor {
        renderer.render_segment(
            Segment {
                left_x: wall.left_x,
                left_z: wall.left_z,
                right_x: wall.right_x,
                right_z: wall.right_z,
                length: wall.length,
                top: floor.top,
                bottom: floor.bottom,
                ceiling_texture: None,
                face_texture: floor.face_texture,
                floor_texture: floor.outer_texture,
            },
            camera,
            bank,
        );
    }
}

/// From behind, only the inner faces of a split wall's extrusions are
/// visible. Left/right are swapped so the emitted segment faces the
/// viewer; with a single extrusion the segment degenerates to zero
/// height and only seeds the ceiling/floor floodfill.
fn render_wall_back(renderer: &mut Renderer, wall: &Wall, camera: &Camera, bank: &TextureBank) {
    if !wall.is_split() {
        return;
    }

    if let (Some(ceiling), Some(floor)) = (&wall.ceiling, &wall.floor) {
        renderer.render_segment(
            Segment {
                left_x: wall.right_x,
                left_z: wall.right_z,
                right_x: wall.left_x,
                right_z: wall.left_z,
                length: wall.length,
                top: ceiling.bottom,
                bottom: floor.top,
                ceiling_texture: ceiling.inner_texture,
                face_texture: None,
                floor_texture: floor.inner_texture,
            },
            camera,
            bank,
        );
        return;
    }

    if let Some(ceiling) = &wall.ceiling {
        renderer.render_segment(
            Segment {
                left_x: wall.right_x,
                left_z: wall.right_z,
                right_x: wall.left_x,
                right_z: wall.left_z,
                length: wall.length,
                top: ceiling.bottom,
                bottom: ceiling.bottom,
                ceiling_texture: ceiling.inner_texture,
                face_texture: None,
                floor_texture: None,
            },
            camera,
            bank,
        );
    }

    if let Some(floor) = &wall.floor {
        renderer.render_segment(
            Segment {
                left_x: wall.right_x,
                left_z: wall.right_z,
                right_x: wall.left_x,
                right_z: wall.left_z,
                length: wall.length,
                top: floor.top,
                bottom: floor.top,
                ceiling_texture: None,
                face_texture: None,
                floor_texture: floor.inner_texture,
            },
            camera,
            bank,
        );
    }
}

/*────────────────────────────────── Tests ─────────────────────────────*/
