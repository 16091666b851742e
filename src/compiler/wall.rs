//! BSP construction over finished walls.
//!
//! Each wall doubles as a tree node: its plane divides space, its
//! `front`/`back` children hold the walls on either side. Walls that
//! straddle a plane are split along it, so the tree's combined surface
//! matches the input exactly.

use glam::DVec3;

#[derive(Clone, Debug, PartialEq)]
pub struct Extrusion {
    pub top: f64,
    pub bottom: f64,

    pub outer_texture_name: String,
    pub face_texture_name: String,
    pub inner_texture_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct Wall {
    pub left_x: f64,
    pub left_z: f64,
    pub right_x: f64,
    pub right_z: f64,

    pub ceiling: Option<Extrusion>,
    pub floor: Option<Extrusion>,

    pub front: Option<Box<Wall>>,
    pub back: Option<Box<Wall>>,
}

impl Wall {
    pub fn flat_left(&self) -> DVec3 {
        DVec3::new(self.left_x, 0.0, self.left_z)
    }

    pub fn flat_right(&self) -> DVec3 {
        DVec3::new(self.right_x, 0.0, self.right_z)
    }

    pub fn flat_middle(&self) -> DVec3 {
        (self.flat_left() + self.flat_right()) / 2.0
    }

    /// Unit normal pointing from the back half-space into the front one.
    pub fn normal(&self) -> DVec3 {
        DVec3::new(self.left_z - self.right_z, 0.0, self.right_x - self.left_x).normalize()
    }

    /// Horizontal length of the wall.
    pub fn flat_length(&self) -> f64 {
        (self.flat_right() - self.flat_left()).length()
    }

    pub fn insert(&mut self, wall: Box<Wall>, precision: f64) {
        if wall.is_in_front_of(self, precision) {
            match &mut self.front {
                None => self.front = Some(wall),
                Some(front) => front.insert(wall, precision),
            }
        } else if wall.is_behind_of(self, precision) {
            match &mut self.back {
                None => self.back = Some(wall),
                Some(back) => back.insert(wall, precision),
            }
        } else {
            let (front_half, back_half) = wall.split(self);
            match &mut self.front {
                None => self.front = Some(front_half),
                Some(front) => front.insert(front_half, precision),
            }
            match &mut self.back {
                None => self.back = Some(back_half),
                Some(back) => back.insert(back_half, precision),
            }
        }
    }

    pub fn is_in_front_of(&self, other: &Wall, precision: f64) -> bool {
        let other_middle = other.flat_middle();
        let other_normal = other.normal();

        let left_distance = (self.flat_left() - other_middle).dot(other_normal);
        let right_distance = (self.flat_right() - other_middle).dot(other_normal);

        left_distance > -precision && right_distance > -precision
    }

    pub fn is_behind_of(&self, other: &Wall, precision: f64) -> bool {
        let other_middle = other.flat_middle();
        let other_normal = other.normal();

        let left_distance = (self.flat_left() - other_middle).dot(other_normal);
        let right_distance = (self.flat_right() - other_middle).dot(other_normal);

        left_distance < precision && right_distance < precision
    }

    /// Cut this wall along the separator's plane by the ratio of
    /// endpoint distances, both halves keeping the extrusion data.
    /// Returns (front half, back half) relative to the separator.
    pub fn split(self: Box<Wall>, separator: &Wall) -> (Box<Wall>, Box<Wall>) {
        let separator_middle = separator.flat_middle();
        let separator_normal = separator.normal();

        let left_distance = (self.flat_left() - separator_middle).dot(separator_normal);
        let right_distance = (self.flat_right() - separator_middle).dot(separator_normal);
        let left_ratio = left_distance.abs() / (left_distance.abs() + right_distance.abs());
        let right_ratio = right_distance.abs() / (left_distance.abs() + right_distance.abs());

        let cut_x = self.left_x * right_ratio + self.right_x * left_ratio;
        let cut_z = self.left_z * right_ratio + self.right_z * left_ratio;

        let left = Box::new(Wall {
            left_x: self.left_x,
            left_z: self.left_z,
            right_x: cut_x,
            right_z: cut_z,
            ceiling: self.ceiling.clone(),
            floor: self.floor.clone(),
            front: None,
            back: None,
        });
        let right = Box::new(Wall {
            left_x: cut_x,
            left_z: cut_z,
            right_x: self.right_x,
            right_z: self.right_z,
            ceiling: self.ceiling,
            floor: self.floor,
            front: None,
            back: None,
        });
        if left_distance < right_distance {
            (right, left)
        } else {
            (left, right)
        }
    }

    /// Number of walls in this subtree, split halves counted apart.
    pub fn count(&self) -> usize {
        let mut result = 1;
        if let Some(front) = &self.front {
            result += front.count();
        }
        if let Some(back) = &self.back {
            result += back.count();
        }
        result
    }
}

/// Build a tree by inserting walls root-first in input order.
pub fn partition(walls: Vec<Wall>, precision: f64) -> Option<Box<Wall>> {
    let mut root: Option<Box<Wall>> = None;
    for wall in walls {
        match &mut root {
            None => root = Some(Box::new(wall)),
            Some(root) => root.insert(Box::new(wall), precision),
        }
    }
    root
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
