//! Textured triangles and their classification by face direction.

use glam::DVec3;

use super::eq_eps;
use super::geom::{Line, VerticalLine};

#[derive(Clone, Debug)]
pub struct Triangle {
    pub p1: DVec3,
    pub p2: DVec3,
    pub p3: DVec3,
    pub texture_name: String,
}

impl Triangle {
    pub fn line1(&self) -> Line {
        Line::new(self.p1, self.p2)
    }

    pub fn line2(&self) -> Line {
        Line::new(self.p2, self.p3)
    }

    pub fn line3(&self) -> Line {
        Line::new(self.p3, self.p1)
    }

    pub fn normal(&self) -> DVec3 {
        (self.p1 - self.p3).cross(self.p2 - self.p3).normalize()
    }

    pub fn center(&self) -> DVec3 {
        (self.p1 + self.p2 + self.p3) / 3.0
    }

    /// The vertex most displaced along the leftward horizontal axis
    /// (normal × world up), as a vertical edge position.
    pub fn left(&self) -> VerticalLine {
        self.extreme_vertex(self.normal().cross(DVec3::Y))
    }

    /// Mirror of [`Triangle::left`] along the rightward axis.
    pub fn right(&self) -> VerticalLine {
        self.extreme_vertex(DVec3::Y.cross(self.normal()))
    }

    fn extreme_vertex(&self, axis: DVec3) -> VerticalLine {
        let center = self.center();
        let flat_distance = |p: DVec3| axis.dot(p - center);

        let mut best_flat_distance = 0.0;
        let mut result = VerticalLine::default();
        let distance1 = flat_distance(self.p1);
        if distance1 > best_flat_distance {
            best_flat_distance = distance1;
            result = VerticalLine::new(self.p1.x, self.p1.z);
        }
        let distance2 = flat_distance(self.p2);
        if distance2 > best_flat_distance {
            best_flat_distance = distance2;
            result = VerticalLine::new(self.p2.x, self.p2.z);
        }
        let distance3 = flat_distance(self.p3);
        if distance3 > best_flat_distance {
            result = VerticalLine::new(self.p3.x, self.p3.z);
        }
        result
    }

    pub fn is_floor(&self, precision: f64) -> bool {
        eq_eps(self.normal().y, 1.0, precision)
    }

    pub fn is_ceiling(&self, precision: f64) -> bool {
        eq_eps(self.normal().y, -1.0, precision)
    }

    pub fn is_vertical(&self, precision: f64) -> bool {
        eq_eps(self.normal().y, 0.0, precision)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(p1: DVec3, p2: DVec3, p3: DVec3) -> Triangle {
        Triangle {
            p1,
            p2,
            p3,
            texture_name: "stone".into(),
        }
    }

    #[test]
    fn normal_is_unit_length() {
        let tri = triangle(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 1.0, 0.0),
            DVec3::new(0.0, 2.0, 5.0),
        );
        assert!((tri.normal().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn horizontal_triangle_classification() {
        // Counter-clockwise in the XZ plane, facing up.
        let floor = triangle(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 0.0),
        );
        assert!(floor.is_floor(1e-3));
        assert!(!floor.is_ceiling(1e-3));
        assert!(!floor.is_vertical(1e-3));

        // Reversed winding faces down.
        let ceiling = triangle(floor.p1, floor.p3, floor.p2);
        assert!(ceiling.is_ceiling(1e-3));
        assert!(!ceiling.is_floor(1e-3));
    }

    #[test]
    fn upright_triangle_is_vertical() {
        let tri = triangle(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 3.0, 0.0),
        );
        assert!(tri.is_vertical(1e-3));
        assert!(!tri.is_floor(1e-3));
        assert!(!tri.is_ceiling(1e-3));
    }

    #[test]
    fn left_and_right_pick_extreme_vertices() {
        // Wall-quad half in the XY plane; whichever way the normal
        // points, left/right must land on the outermost X positions.
        let tri = triangle(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(4.0, 3.0, 0.0),
        );
        let left = tri.left();
        let right = tri.right();
        assert!((left.x - right.x).abs() > 1.0, "distinct extremes");
        assert!(left.x == 0.0 || left.x == 4.0);
        assert!(right.x == 0.0 || right.x == 4.0);
        assert_ne!(left.x, right.x);
    }

    #[test]
    fn tied_vertices_share_the_same_edge_position() {
        // The two right-hand vertices lie on one vertical edge; either
        // choice must name the same (x, z).
        let tri = triangle(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(4.0, 3.0, 0.0),
        );
        let extreme = tri.extreme_vertex(DVec3::Y.cross(tri.normal()).normalize());
        let mirrored = triangle(tri.p1, tri.p3, tri.p2)
            .extreme_vertex(DVec3::Y.cross(tri.normal()).normalize());
        assert_eq!((extreme.x, extreme.z), (mirrored.x, mirrored.z));
    }
}
