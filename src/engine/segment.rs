use crate::world::TextureId;

/// One renderable wall slice in world space: a vertical quad between
/// `top` and `bottom` over the horizontal edge (left, right), plus up to
/// three surfaces. A `None` texture skips that surface entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct Segment {
    pub left_x: f32,
    pub left_z: f32,
    pub right_x: f32,
    pub right_z: f32,
    /// Horizontal length of the edge, in world units. Carried along so
    /// the face U coordinate spans the full texture run.
    pub length: f32,
    pub top: f32,
    pub bottom: f32,

    pub ceiling_texture: Option<TextureId>,
    pub face_texture: Option<TextureId>,
    pub floor_texture: Option<TextureId>,
}

impl Segment {
    pub fn has_ceiling(&self) -> bool {
        self.ceiling_texture.is_some()
    }

    pub fn has_face(&self) -> bool {
        self.face_texture.is_some()
    }

    pub fn has_floor(&self) -> bool {
        self.floor_texture.is_some()
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.left_x += x;
        self.right_x += x;
        self.top += y;
        self.bottom += y;
        self.left_z += z;
        self.right_z += z;
    }

    /// Rotate the horizontal edge around the vertical axis.
    pub fn rotate(&mut self, cos: f32, sin: f32) {
        let new_left_x = self.left_x * cos - self.left_z * sin;
        let new_left_z = self.left_x * sin + self.left_z * cos;
        self.left_x = new_left_x;
        self.left_z = new_left_z;

        let new_right_x = self.right_x * cos - self.right_z * sin;
        let new_right_z = self.right_x * sin + self.right_z * cos;
        self.right_x = new_right_x;
        self.right_z = new_right_z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_moves_all_coordinates() {
        let mut seg = Segment {
            left_x: 1.0,
            left_z: 2.0,
            right_x: 3.0,
            right_z: 4.0,
            top: -2.0,
            bottom: 0.0,
            ..Default::default()
        };
        seg.translate(10.0, -1.0, 100.0);
        assert_eq!(seg.left_x, 11.0);
        assert_eq!(seg.right_x, 13.0);
        assert_eq!(seg.left_z, 102.0);
        assert_eq!(seg.right_z, 104.0);
        assert_eq!(seg.top, -3.0);
        assert_eq!(seg.bottom, -1.0);
    }

    #[test]
    fn quarter_turn_swaps_axes() {
        let mut seg = Segment {
            left_x: 1.0,
            left_z: 0.0,
            right_x: 0.0,
            right_z: 2.0,
            ..Default::default()
        };
        seg.rotate(0.0, 1.0);
        assert!((seg.left_x - 0.0).abs() < 1e-6);
        assert!((seg.left_z - 1.0).abs() < 1e-6);
        assert!((seg.right_x - -2.0).abs() < 1e-6);
        assert!((seg.right_z - 0.0).abs() < 1e-6);
    }
}
