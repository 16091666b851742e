//! Intermediate aggregates between raw triangles and BSP walls:
//! segments (planar wall polygons), spans (textured vertical
//! intervals), and blocks (spans stacked between two shared vertical
//! edges).

use glam::DVec3;
use smallvec::SmallVec;

use super::geom::{Line, VerticalLine};

/*──────────────────────────── segments ───────────────────────────────*/

/// A planar wall polygon cut out of a vertical triangle: its extreme
/// vertical edges, plane normal, boundary lines, and material.
#[derive(Clone, Debug)]
pub struct Segment {
    pub left: VerticalLine,
    pub right: VerticalLine,
    pub normal: DVec3,
    pub lines: SmallVec<[Line; 4]>,
    pub texture_name: String,
}

impl Segment {
    pub fn middle(&self) -> VerticalLine {
        VerticalLine::new(
            (self.left.x + self.right.x) / 2.0,
            (self.left.z + self.right.z) / 2.0,
        )
    }

    /// Highest Y among the boundary lines; 0 when the segment is empty.
    pub fn top(&self) -> f64 {
        if self.lines.is_empty() {
            return 0.0;
        }
        self.lines
            .iter()
            .flat_map(|line| [line.p1.y, line.p2.y])
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest Y among the boundary lines; 0 when the segment is empty.
    pub fn bottom(&self) -> f64 {
        if self.lines.is_empty() {
            return 0.0;
        }
        self.lines
            .iter()
            .flat_map(|line| [line.p1.y, line.p2.y])
            .fold(f64::INFINITY, f64::min)
    }

    /// Whether the vertical line cuts through this segment's interior:
    /// on its plane, and strictly between the two end edges.
    pub fn contains_vertical_line(&self, line: &VerticalLine, precision: f64) -> bool {
        let line_offset = line.flat_point() - self.middle().flat_point();
        let surface_distance = self.normal.dot(line_offset);
        if surface_distance.abs() > precision {
            return false;
        }

        let segment_length = (self.right.flat_point() - self.left.flat_point()).length();
        let line_offset_length = line_offset.length();
        line_offset_length - precision < segment_length / 2.0
    }

    /// The part of this segment between `left` and the vertical line.
    /// Boundary lines wholly on the far side are dropped; straddling
    /// ones are cut at their intersection with the line.
    pub fn left_partition(&self, vertical_line: &VerticalLine, _precision: f64) -> Segment {
        let mut partitioned_lines = SmallVec::new();
        for line in &self.lines {
            let flat_distance_p1 = (line.flat_p1() - self.left.flat_point()).length();
            let flat_distance_p2 = (line.flat_p2() - self.left.flat_point()).length();
            let flat_distance_cut =
                (vertical_line.flat_point() - self.left.flat_point()).length();

            if flat_distance_p1 <= flat_distance_cut && flat_distance_p2 <= flat_distance_cut {
                partitioned_lines.push(*line);
            } else if flat_distance_p1 <= flat_distance_cut
                && flat_distance_p2 >= flat_distance_cut
            {
                partitioned_lines.push(line.p1_partition(vertical_line));
            } else if flat_distance_p2 <= flat_distance_cut
                && flat_distance_p1 >= flat_distance_cut
            {
                partitioned_lines.push(line.p2_partition(vertical_line));
            }
        }

        Segment {
            left: self.left,
            right: *vertical_line,
            normal: self.normal,
            lines: partitioned_lines,
            texture_name: self.texture_name.clone(),
        }
    }

    /// Mirror of [`Segment::left_partition`].
    pub fn right_partition(&self, vertical_line: &VerticalLine, _precision: f64) -> Segment {
        let mut partitioned_lines = SmallVec::new();
        for line in &self.lines {
            let flat_distance_p1 = (line.flat_p1() - self.left.flat_point()).length();
            let flat_distance_p2 = (line.flat_p2() - self.left.flat_point()).length();
            let flat_distance_cut =
                (vertical_line.flat_point() - self.left.flat_point()).length();

            if flat_distance_p1 >= flat_distance_cut && flat_distance_p2 >= flat_distance_cut {
                partitioned_lines.push(*line);
            } else if flat_distance_p1 <= flat_distance_cut
                && flat_distance_p2 >= flat_distance_cut
            {
                partitioned_lines.push(line.p2_partition(vertical_line));
            } else if flat_distance_p2 <= flat_distance_cut
                && flat_distance_p1 >= flat_distance_cut
            {
                partitioned_lines.push(line.p1_partition(vertical_line));
            }
        }

        Segment {
            left: *vertical_line,
            right: self.right,
            normal: self.normal,
            lines: partitioned_lines,
            texture_name: self.texture_name.clone(),
        }
    }
}

/*────────────────────────────── spans ────────────────────────────────*/

/// A textured vertical interval within a block.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
    pub texture_name: String,
}

impl Span {
    /// Same texture and overlapping vertical interval.
    pub fn is_continuation_to(&self, other: &Span, precision: f64) -> bool {
        self.texture_name == other.texture_name
            && self.top + precision > other.bottom
            && self.bottom - precision < other.top
    }
}

/// Sort spans top-first and fuse continuations, keeping the lower
/// bottom. The result has no overlapping same-texture neighbors.
pub fn collapse_spans(mut spans: Vec<Span>, precision: f64) -> Vec<Span> {
    if spans.is_empty() {
        return spans;
    }

    spans.sort_by(|a, b| b.top.total_cmp(&a.top));

    let mut result = vec![spans[0].clone()];
    for current in &spans {
        let last = result.last_mut().unwrap();
        if current.is_continuation_to(last, precision) {
            last.bottom = last.bottom.min(current.bottom);
        } else {
            result.push(current.clone());
        }
    }
    result
}

/*────────────────────────────── blocks ───────────────────────────────*/

/// One or more spans stacked between a shared pair of vertical edges.
#[derive(Clone, Debug)]
pub struct Block {
    pub left: VerticalLine,
    pub right: VerticalLine,
    pub normal: DVec3,
    pub spans: Vec<Span>,
}

impl Block {
    pub fn is_aligned_to(&self, other: &Block, precision: f64) -> bool {
        self.left.equal(&other.left, precision) && self.right.equal(&other.right, precision)
    }
}

/// Merge aligned blocks by concatenating their spans, then collapse
/// each surviving block's spans.
pub fn merge_blocks(mut blocks: Vec<Block>, precision: f64) -> Vec<Block> {
    let mut result: Vec<Block> = Vec::new();
    while let Some(mut block) = blocks.pop() {
        let mut was_merged = false;
        for target in blocks.iter_mut() {
            if target.is_aligned_to(&block, precision) {
                target.spans.append(&mut block.spans);
                was_merged = true;
                break;
            }
        }
        if !was_merged {
            result.push(block);
        }
    }
    for block in &mut result {
        block.spans = collapse_spans(std::mem::take(&mut block.spans), precision);
    }
    result
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn span(top: f64, bottom: f64, texture: &str) -> Span {
        Span {
            top,
            bottom,
            texture_name: texture.into(),
        }
    }

    fn wall_segment(left_x: f64, right_x: f64) -> Segment {
        // Upright quad-half in the XZ=0 plane between left_x and right_x.
        let bl = DVec3::new(left_x, 0.0, 0.0);
        let br = DVec3::new(right_x, 0.0, 0.0);
        let tr = DVec3::new(right_x, 2.0, 0.0);
        Segment {
            left: VerticalLine::new(left_x, 0.0),
            right: VerticalLine::new(right_x, 0.0),
            normal: DVec3::new(0.0, 0.0, 1.0),
            lines: smallvec![Line::new(bl, br), Line::new(br, tr), Line::new(tr, bl)],
            texture_name: "brick".into(),
        }
    }

    #[test]
    fn segment_extents() {
        let segment = wall_segment(0.0, 4.0);
        assert_eq!(segment.top(), 2.0);
        assert_eq!(segment.bottom(), 0.0);
        let middle = segment.middle();
        assert_eq!((middle.x, middle.z), (2.0, 0.0));
    }

    #[test]
    fn interior_line_is_contained_endpoints_are_not() {
        let segment = wall_segment(0.0, 4.0);
        assert!(segment.contains_vertical_line(&VerticalLine::new(1.5, 0.0), 1e-3));
        // Off-plane misses.
        assert!(!segment.contains_vertical_line(&VerticalLine::new(1.5, 0.5), 1e-3));
        // Beyond the ends misses.
        assert!(!segment.contains_vertical_line(&VerticalLine::new(5.0, 0.0), 1e-3));
    }

    #[test]
    fn partition_splits_boundary_lines() {
        let segment = wall_segment(0.0, 4.0);
        let cut = VerticalLine::new(3.0, 0.0);

        let left = segment.left_partition(&cut, 1e-3);
        assert_eq!(left.left, segment.left);
        assert_eq!(left.right, cut);
        // Every kept line stays on the near side of the cut.
        for line in &left.lines {
            assert!(line.p1.x <= 3.0 + 1e-9 && line.p2.x <= 3.0 + 1e-9);
        }
        assert_eq!(left.top(), 2.0);

        let right = segment.right_partition(&cut, 1e-3);
        assert_eq!(right.left, cut);
        assert_eq!(right.right, segment.right);
        for line in &right.lines {
            assert!(line.p1.x >= 3.0 - 1e-9 && line.p2.x >= 3.0 - 1e-9);
        }
    }

    #[test]
    fn collapse_fuses_overlapping_same_texture_spans() {
        let spans = vec![
            span(1.0, 0.0, "brick"),
            span(3.0, 0.9, "brick"),
            span(5.0, 4.0, "stone"),
        ];
        let collapsed = collapse_spans(spans, 1e-3);
        assert_eq!(
            collapsed,
            vec![span(5.0, 4.0, "stone"), span(3.0, 0.0, "brick")]
        );
    }

    #[test]
    fn collapse_is_idempotent() {
        let spans = vec![
            span(2.0, 1.0, "brick"),
            span(1.5, 0.0, "brick"),
            span(-1.0, -2.0, "brick"),
            span(5.0, 3.0, "stone"),
        ];
        let once = collapse_spans(spans, 1e-3);
        let twice = collapse_spans(once.clone(), 1e-3);
        assert_eq!(once, twice);

        // Adjacent survivors never overlap: either textures differ or
        // there is a genuine gap.
        for pair in once.windows(2) {
            assert!(
                pair[0].texture_name != pair[1].texture_name
                    || pair[0].bottom >= pair[1].top + 1e-3
            );
        }
    }

    #[test]
    fn merge_groups_aligned_blocks_in_any_order() {
        let block = |top: f64, bottom: f64, x: f64| Block {
            left: VerticalLine::new(x, 0.0),
            right: VerticalLine::new(x + 2.0, 0.0),
            normal: DVec3::new(0.0, 0.0, 1.0),
            spans: vec![span(top, bottom, "brick")],
        };

        let blocks = vec![block(1.0, 0.0, 0.0), block(2.0, 0.9, 0.0), block(1.0, 0.0, 5.0)];

        // Any permutation produces the same set of merged blocks.
        let canonical = |mut merged: Vec<Block>| -> Vec<(f64, Vec<Span>)> {
            merged.sort_by(|a, b| a.left.x.total_cmp(&b.left.x));
            merged.into_iter().map(|b| (b.left.x, b.spans)).collect()
        };

        let expected = canonical(merge_blocks(blocks.clone(), 1e-3));
        let permutations: [[usize; 3]; 5] = [
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in permutations {
            let shuffled: Vec<Block> = order.iter().map(|&i| blocks[i].clone()).collect();
            assert_eq!(canonical(merge_blocks(shuffled, 1e-3)), expected);
        }

        let merged = merge_blocks(blocks, 1e-3);
        assert_eq!(merged.len(), 2);
        let tall = merged
            .iter()
            .find(|b| (b.left.x - 0.0).abs() < 1e-9)
            .unwrap();
        assert_eq!(tall.spans, vec![span(2.0, 0.0, "brick")]);
    }
}
