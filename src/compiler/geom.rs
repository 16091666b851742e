//! Lines and vertical lines, the compiler's basic measuring sticks.

use glam::DVec3;

use super::eq_eps;

/// A finite line between two points in 3-D space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub p1: DVec3,
    pub p2: DVec3,
}

impl Line {
    pub fn new(p1: DVec3, p2: DVec3) -> Self {
        Self { p1, p2 }
    }

    /// `p1` projected onto the horizontal plane.
    pub fn flat_p1(&self) -> DVec3 {
        DVec3::new(self.p1.x, 0.0, self.p1.z)
    }

    /// `p2` projected onto the horizontal plane.
    pub fn flat_p2(&self) -> DVec3 {
        DVec3::new(self.p2.x, 0.0, self.p2.z)
    }

    /// Whether the edge runs straight up: both endpoints share (X, Z).
    pub fn is_vertical(&self, precision: f64) -> bool {
        eq_eps(self.p1.x, self.p2.x, precision) && eq_eps(self.p1.z, self.p2.z, precision)
    }

    /// Triangle-inequality containment: `point` lies on the line when
    /// the detour through it adds no more than `precision` to the
    /// length.
    pub fn contains_point(&self, point: DVec3, precision: f64) -> bool {
        let dist1 = (point - self.p1).length();
        let dist2 = (point - self.p2).length();
        let length = (self.p2 - self.p1).length();
        dist1 + dist2 <= length + precision
    }

    /// Point of this line at the vertical line's horizontal position,
    /// interpolated by the ratio of flat distances to either endpoint.
    pub fn vertical_line_intersection(&self, line: &VerticalLine) -> DVec3 {
        let distance_p1 = (self.flat_p1() - line.flat_point()).length();
        let distance_p2 = (self.flat_p2() - line.flat_point()).length();
        let total_distance = distance_p1 + distance_p2;

        self.p1 * (distance_p2 / total_distance) + self.p2 * (distance_p1 / total_distance)
    }

    /// The part of this line on the `p1` side of the vertical line.
    pub fn p1_partition(&self, line: &VerticalLine) -> Line {
        Line {
            p1: self.p1,
            p2: self.vertical_line_intersection(line),
        }
    }

    /// The part of this line on the `p2` side of the vertical line.
    pub fn p2_partition(&self, line: &VerticalLine) -> Line {
        Line {
            p1: self.vertical_line_intersection(line),
            p2: self.p2,
        }
    }
}

/// An infinite vertical edge, identified by its horizontal position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VerticalLine {
    pub x: f64,
    pub z: f64,
}

impl VerticalLine {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn equal(&self, other: &VerticalLine, precision: f64) -> bool {
        eq_eps(self.x, other.x, precision) && eq_eps(self.z, other.z, precision)
    }

    pub fn flat_point(&self) -> DVec3 {
        DVec3::new(self.x, 0.0, self.z)
    }
}

pub fn contains_vertical_line(
    lines: &[VerticalLine],
    line: &VerticalLine,
    precision: f64,
) -> bool {
    lines.iter().any(|candidate| candidate.equal(line, precision))
}

/// Drop duplicates, keeping the first occurrence of each position.
pub fn dedupe_vertical_lines(lines: &[VerticalLine], precision: f64) -> Vec<VerticalLine> {
    let mut result: Vec<VerticalLine> = Vec::new();
    for line in lines {
        if !contains_vertical_line(&result, line, precision) {
            result.push(*line);
        }
    }
    result
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
