//! The compile pipeline: OBJ triangle soup in, compact JSON level out.
//!
//! Phases: scale → vertical-line extraction → triangle classification →
//! segment build and partition → block merge → wall build → BSP
//! partition → flat pre-order emission. Geometry that cannot be
//! resolved (odd span counts, missing floor/ceiling neighbors) is
//! dropped with a warning; the rest of the level still compiles.

use std::io;

use anyhow::Context;
use glam::DVec3;
use smallvec::smallvec;

use crate::level;

use super::PRECISION;
use super::geom::{self, VerticalLine};
use super::obj;
use super::scene::{self, Block, Segment, Span};
use super::triangle::Triangle;
use super::wall::{self, Extrusion, Wall};

pub fn run<R: io::Read, W: io::Write>(input: R, out: W, scale: f64) -> anyhow::Result<()> {
    let mut model =
        obj::Model::decode(io::BufReader::new(input)).context("failed to decode obj file")?;

    log::info!("scaling model (factor: {scale})...");
    model.scale(scale);

    log::info!("extracting vertical lines...");
    let vertical_lines = extract_vertical_lines(&model);
    log::info!("\tfound: {}", vertical_lines.len());
    let vertical_lines = geom::dedupe_vertical_lines(&vertical_lines, PRECISION);
    log::info!("\tunique: {}", vertical_lines.len());

    log::info!("extracting floor triangles...");
    let floor_triangles = extract_triangles(&model, |triangle| triangle.is_floor(PRECISION));
    log::info!("\tfound: {}", floor_triangles.len());

    log::info!("extracting ceiling triangles...");
    let ceiling_triangles = extract_triangles(&model, |triangle| triangle.is_ceiling(PRECISION));
    log::info!("\tfound: {}", ceiling_triangles.len());

    log::info!("extracting vertical triangles...");
    let vertical_triangles = extract_triangles(&model, |triangle| triangle.is_vertical(PRECISION));
    log::info!("\tfound: {}", vertical_triangles.len());

    log::info!("building segments...");
    let segments = build_segments(&vertical_triangles);
    log::info!("\ttotal: {}", segments.len());
    let segments = partition_segments(segments, &vertical_lines);
    log::info!("\tpartitioned: {}", segments.len());

    log::info!("building blocks...");
    let blocks = build_blocks(segments);
    log::info!("\ttotal: {}", blocks.len());
    let blocks = scene::merge_blocks(blocks, PRECISION);
    log::info!("\tmerged: {}", blocks.len());

    log::info!("building walls...");
    let walls = build_walls(blocks, &floor_triangles, &ceiling_triangles);
    log::info!("\ttotal: {}", walls.len());

    log::info!("partitioning walls...");
    let tree = wall::partition(walls, PRECISION);
    log::info!("\ttotal: {}", tree.as_ref().map_or(0, |root| root.count()));

    let json_level = build_level(tree.as_deref());
    level::save(out, &json_level).context("failed to encode json level")?;
    Ok(())
}

/*──────────────────────────── extraction ─────────────────────────────*/

fn extract_vertical_lines(model: &obj::Model) -> Vec<VerticalLine> {
    model
        .edges()
        .iter()
        .filter(|edge| edge.is_vertical(PRECISION))
        .map(|edge| VerticalLine::new(edge.p1.x, edge.p1.z))
        .collect()
}

fn extract_triangles(model: &obj::Model, keep: impl Fn(&Triangle) -> bool) -> Vec<Triangle> {
    model
        .triangles()
        .into_iter()
        .map(|triangle| Triangle {
            p1: triangle.p1,
            p2: triangle.p2,
            p3: triangle.p3,
            texture_name: triangle.material_name,
        })
        .filter(|triangle| keep(triangle))
        .collect()
}

/*──────────────────────────── segments ───────────────────────────────*/

fn build_segments(vertical_triangles: &[Triangle]) -> Vec<Segment> {
    vertical_triangles
        .iter()
        .map(|triangle| Segment {
            left: triangle.left(),
            right: triangle.right(),
            normal: triangle.normal(),
            lines: smallvec![triangle.line1(), triangle.line2(), triangle.line3()],
            texture_name: triangle.texture_name.clone(),
        })
        .collect()
}

fn partition_segments(segments: Vec<Segment>, vertical_lines: &[VerticalLine]) -> Vec<Segment> {
    let mut result = Vec::new();
    for segment in segments {
        result.extend(partition_segment(segment, vertical_lines));
    }
    result
}

/// Split the segment at the first vertical line crossing its interior
/// and recurse on both halves with the remaining lines, so each line
/// induces at most one cut per descendant.
fn partition_segment(segment: Segment, vertical_lines: &[VerticalLine]) -> Vec<Segment> {
    for (i, vertical_line) in vertical_lines.iter().enumerate() {
        let is_partitioned = !vertical_line.equal(&segment.left, PRECISION)
            && !vertical_line.equal(&segment.right, PRECISION)
            && segment.contains_vertical_line(vertical_line, PRECISION);

        if is_partitioned {
            let remaining = &vertical_lines[i + 1..];

            let left_segment = segment.left_partition(vertical_line, PRECISION);
            let mut result = partition_segment(left_segment, remaining);

            let right_segment = segment.right_partition(vertical_line, PRECISION);
            result.extend(partition_segment(right_segment, remaining));

            return result;
        }
    }

    vec![segment]
}

/*────────────────────────────── blocks ───────────────────────────────*/

fn build_blocks(segments: Vec<Segment>) -> Vec<Block> {
    let mut result = Vec::new();
    for segment in segments {
        if segment.lines.is_empty() {
            log::warn!("skipping segment: no lines present");
            continue;
        }
        result.push(Block {
            left: segment.left,
            right: segment.right,
            normal: segment.normal,
            spans: vec![Span {
                top: segment.top(),
                bottom: segment.bottom(),
                texture_name: segment.texture_name.clone(),
            }],
        });
    }
    result
}

/*─────────────────────────────── walls ───────────────────────────────*/

fn build_walls(
    blocks: Vec<Block>,
    floor_triangles: &[Triangle],
    ceiling_triangles: &[Triangle],
) -> Vec<Wall> {
    let mut walls = Vec::new();
    for block in blocks {
        match build_wall(&block, floor_triangles, ceiling_triangles) {
            Ok(wall) => walls.push(wall),
            Err(err) => log::warn!("skipping block: {err}"),
        }
    }
    walls
}

fn build_wall(
    block: &Block,
    floor_triangles: &[Triangle],
    ceiling_triangles: &[Triangle],
) -> anyhow::Result<Wall> {
    let mut wall = Wall {
        left_x: block.left.x,
        left_z: block.left.z,
        right_x: block.right.x,
        right_z: block.right.z,
        ..Default::default()
    };

    match block.spans.len() {
        2 => {
            // A split wall: the upper span is the ceiling extrusion, the
            // lower one the floor extrusion. All four horizontal
            // neighbors must exist for the texture lookups.
            let outer_ceiling =
                find_horizontal_triangle(ceiling_triangles, span_middle_top(block, &block.spans[0]));
            let inner_ceiling = find_horizontal_triangle(
                ceiling_triangles,
                span_middle_bottom(block, &block.spans[0]),
            );
            let inner_floor =
                find_horizontal_triangle(floor_triangles, span_middle_top(block, &block.spans[1]));
            let outer_floor = find_horizontal_triangle(
                floor_triangles,
                span_middle_bottom(block, &block.spans[1]),
            );
            let (Some(outer_ceiling), Some(inner_ceiling), Some(inner_floor), Some(outer_floor)) =
                (outer_ceiling, inner_ceiling, inner_floor, outer_floor)
            else {
                anyhow::bail!("could not find all floors and ceilings for block");
            };
            wall.ceiling = Some(Extrusion {
                top: block.spans[0].top,
                bottom: block.spans[0].bottom,
                outer_texture_name: outer_ceiling.texture_name.clone(),
                face_texture_name: block.spans[0].texture_name.clone(),
                inner_texture_name: inner_ceiling.texture_name.clone(),
            });
            wall.floor = Some(Extrusion {
                top: block.spans[1].top,
                bottom: block.spans[1].bottom,
                inner_texture_name: inner_floor.texture_name.clone(),
                face_texture_name: block.spans[1].texture_name.clone(),
                outer_texture_name: outer_floor.texture_name.clone(),
            });
            Ok(wall)
        }

        1 => {
            let span = &block.spans[0];
            let outer_ceiling =
                find_horizontal_triangle(ceiling_triangles, span_middle_top(block, span));
            let outer_floor =
                find_horizontal_triangle(floor_triangles, span_middle_bottom(block, span));

            match (outer_ceiling, outer_floor) {
                (Some(outer_ceiling), Some(outer_floor)) => {
                    // Solid wall top-to-bottom, split artificially at the
                    // midpoint. Inner textures are never rendered for a
                    // solid wall; they are set to something valid.
                    let middle = (span.top + span.bottom) / 2.0;
                    wall.ceiling = Some(Extrusion {
                        top: span.top,
                        bottom: middle,
                        outer_texture_name: outer_ceiling.texture_name.clone(),
                        face_texture_name: span.texture_name.clone(),
                        inner_texture_name: outer_ceiling.texture_name.clone(),
                    });
                    wall.floor = Some(Extrusion {
                        top: middle,
                        bottom: span.bottom,
                        inner_texture_name: outer_floor.texture_name.clone(),
                        face_texture_name: span.texture_name.clone(),
                        outer_texture_name: outer_floor.texture_name.clone(),
                    });
                    Ok(wall)
                }

                (Some(outer_ceiling), None) => {
                    let inner_ceiling = find_horizontal_triangle(
                        ceiling_triangles,
                        span_middle_bottom(block, span),
                    )
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "could not find inner ceiling texture for ceiling extrusion"
                        )
                    })?;
                    wall.ceiling = Some(Extrusion {
                        top: span.top,
                        bottom: span.bottom,
                        outer_texture_name: outer_ceiling.texture_name.clone(),
                        face_texture_name: span.texture_name.clone(),
                        inner_texture_name: inner_ceiling.texture_name.clone(),
                    });
                    Ok(wall)
                }

                (None, Some(outer_floor)) => {
                    let inner_floor =
                        find_horizontal_triangle(floor_triangles, span_middle_top(block, span))
                            .ok_or_else(|| {
                                anyhow::anyhow!(
                                    "could not find inner floor texture for floor extrusion"
                                )
                            })?;
                    wall.floor = Some(Extrusion {
                        top: span.top,
                        bottom: span.bottom,
                        inner_texture_name: inner_floor.texture_name.clone(),
                        face_texture_name: span.texture_name.clone(),
                        outer_texture_name: outer_floor.texture_name.clone(),
                    });
                    Ok(wall)
                }

                (None, None) => {
                    anyhow::bail!("could not find floor or ceiling texture for block")
                }
            }
        }

        span_count => anyhow::bail!("unexpected span count: {span_count}"),
    }
}

fn span_middle_top(block: &Block, span: &Span) -> DVec3 {
    DVec3::new(
        (block.left.x + block.right.x) / 2.0,
        span.top,
        (block.left.z + block.right.z) / 2.0,
    )
}

fn span_middle_bottom(block: &Block, span: &Span) -> DVec3 {
    DVec3::new(
        (block.left.x + block.right.x) / 2.0,
        span.bottom,
        (block.left.z + block.right.z) / 2.0,
    )
}

fn find_horizontal_triangle(triangles: &[Triangle], edge_point: DVec3) -> Option<&Triangle> {
    triangles.iter().find(|triangle| {
        triangle.line1().contains_point(edge_point, PRECISION)
            || triangle.line2().contains_point(edge_point, PRECISION)
            || triangle.line3().contains_point(edge_point, PRECISION)
    })
}

/*──────────────────────────── emission ───────────────────────────────*/

/// Flatten the tree into the persisted format: walls in pre-order with
/// child indices, texture names interned into one deduplicated list,
/// and Y/Z negated into the runtime's screen-down axis convention.
fn build_level(root: Option<&Wall>) -> level::Level {
    let mut emitter = LevelEmitter::default();
    emitter.process_wall(root);
    level::Level {
        textures: emitter.textures,
        walls: emitter.walls,
    }
}

#[derive(Default)]
struct LevelEmitter {
    textures: Vec<String>,
    walls: Vec<level::Wall>,
}

impl LevelEmitter {
    fn register_texture(&mut self, texture_name: &str) -> i32 {
        if let Some(index) = self.textures.iter().position(|name| name == texture_name) {
            return index as i32;
        }
        self.textures.push(texture_name.to_owned());
        (self.textures.len() - 1) as i32
    }

    fn process_wall(&mut self, wall: Option<&Wall>) -> i32 {
        let Some(wall) = wall else {
            return -1;
        };

        // Reserve this wall's pre-order slot before descending.
        let index = self.walls.len();
        self.walls.push(level::Wall::default());

        let front_wall = self.process_wall(wall.front.as_deref());
        let back_wall = self.process_wall(wall.back.as_deref());

        let floor = wall.floor.as_ref().map(|floor| level::Extrusion {
            top: -(floor.top as f32),
            bottom: -(floor.bottom as f32),
            outer_texture: self.register_texture(&floor.outer_texture_name),
            face_texture: self.register_texture(&floor.face_texture_name),
            inner_texture: self.register_texture(&floor.inner_texture_name),
        });
        let ceiling = wall.ceiling.as_ref().map(|ceiling| level::Extrusion {
            top: -(ceiling.top as f32),
            bottom: -(ceiling.bottom as f32),
            inner_texture: self.register_texture(&ceiling.inner_texture_name),
            face_texture: self.register_texture(&ceiling.face_texture_name),
            outer_texture: self.register_texture(&ceiling.outer_texture_name),
        });

        self.walls[index] = level::Wall {
            left_edge_x: wall.left_x as f32,
            left_edge_z: -(wall.left_z as f32),
            right_edge_x: wall.right_x as f32,
            right_edge_z: -(wall.right_z as f32),
            ceiling,
            floor,
            front_wall,
            back_wall,
        };
        index as i32
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    /// A 1×1 vertical quad (two triangles) with a floor triangle along
    /// its base and a ceiling triangle along its top edge.
    const SOLID_WALL_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0.5 0 -1
v 0.5 1 -1
usemtl face
f 1 2 3
f 1 3 4
usemtl floor
f 1 2 5
usemtl ceil
f 3 4 6
";

    #[test]
    fn solid_quad_compiles_to_one_wall() {
        let mut out = Vec::new();
        run(SOLID_WALL_OBJ.as_bytes(), &mut out, 1.0).unwrap();
        let level = crate::level::load(out.as_slice()).unwrap();

        assert_eq!(level.walls.len(), 1);
        let wall = &level.walls[0];
        assert_eq!(wall.front_wall, -1);
        assert_eq!(wall.back_wall, -1);

        // Base endpoints of the quad; Z is negated on persist (here 0).
        let endpoints = [
            (wall.left_edge_x, wall.left_edge_z),
            (wall.right_edge_x, wall.right_edge_z),
        ];
        assert!(endpoints.contains(&(0.0, 0.0)));
        assert!(endpoints.contains(&(1.0, -0.0)) || endpoints.contains(&(1.0, 0.0)));

        // The solid wall splits artificially at half height; persisted Y
        // is negated.
        let ceiling = wall.ceiling.as_ref().unwrap();
        let floor = wall.floor.as_ref().unwrap();
        assert_eq!((ceiling.top, ceiling.bottom), (-1.0, -0.5));
        assert_eq!((floor.top, floor.bottom), (-0.5, 0.0));

        let texture = |index: i32| level.textures[index as usize].as_str();
        assert_eq!(texture(ceiling.outer_texture), "ceil");
        assert_eq!(texture(ceiling.face_texture), "face");
        assert_eq!(texture(floor.outer_texture), "floor");
        assert_eq!(texture(floor.face_texture), "face");
        // Inner textures of a solid wall fall back to the outer ones.
        assert_eq!(texture(ceiling.inner_texture), "ceil");
        assert_eq!(texture(floor.inner_texture), "floor");
    }

    /// A wall with a window: an upper and a lower quad over the same
    /// base line, with horizontal neighbors at all four heights.
    const WINDOW_WALL_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 2 0
v 1 2 0
v 1 3 0
v 0 3 0
v 0.5 0 -1
v 0.5 1 -1
v 0.5 2 -1
v 0.5 3 -1
usemtl face
f 1 2 3
f 1 3 4
f 5 6 7
f 5 7 8
usemtl floor
f 1 2 9
usemtl sill
f 4 3 10
usemtl lintel
f 6 5 11
usemtl ceil
f 7 8 12
";

    #[test]
    fn window_wall_compiles_to_split_wall() {
        let mut out = Vec::new();
        run(WINDOW_WALL_OBJ.as_bytes(), &mut out, 1.0).unwrap();
        let level = crate::level::load(out.as_slice()).unwrap();

        assert_eq!(level.walls.len(), 1);
        let wall = &level.walls[0];
        let ceiling = wall.ceiling.as_ref().unwrap();
        let floor = wall.floor.as_ref().unwrap();

        assert_eq!((ceiling.top, ceiling.bottom), (-3.0, -2.0));
        assert_eq!((floor.top, floor.bottom), (-1.0, 0.0));

        let texture = |index: i32| level.textures[index as usize].as_str();
        assert_eq!(texture(ceiling.outer_texture), "ceil");
        assert_eq!(texture(ceiling.inner_texture), "lintel");
        assert_eq!(texture(floor.outer_texture), "floor");
        assert_eq!(texture(floor.inner_texture), "sill");
    }

    #[test]
    fn classification_failure_drops_block_but_compiles() {
        // The quad has no floor or ceiling neighbors at all.
        let source = "\
v 0 0 0
v 1 0 0
v 1 1 0
usemtl face
f 1 2 3
";
        let mut out = Vec::new();
        run(source.as_bytes(), &mut out, 1.0).unwrap();
        let level = crate::level::load(out.as_slice()).unwrap();
        assert!(level.walls.is_empty());
        assert!(level.textures.is_empty());
    }

    #[test]
    fn scale_is_applied_before_everything() {
        let mut out = Vec::new();
        run(SOLID_WALL_OBJ.as_bytes(), &mut out, 64.0).unwrap();
        let level = crate::level::load(out.as_slice()).unwrap();
        let wall = &level.walls[0];
        assert_eq!(wall.right_edge_x, 64.0);
        assert_eq!(wall.ceiling.as_ref().unwrap().top, -64.0);
    }

    #[test]
    fn interior_vertical_line_partitions_segments() {
        use smallvec::smallvec;

        let base = |x0: f64, x1: f64| Segment {
            left: VerticalLine::new(x0, 0.0),
            right: VerticalLine::new(x1, 0.0),
            normal: DVec3::new(0.0, 0.0, 1.0),
            lines: smallvec![
                geom::Line::new(DVec3::new(x0, 0.0, 0.0), DVec3::new(x1, 0.0, 0.0)),
                geom::Line::new(DVec3::new(x1, 0.0, 0.0), DVec3::new(x1, 2.0, 0.0)),
                geom::Line::new(DVec3::new(x1, 2.0, 0.0), DVec3::new(x0, 0.0, 0.0)),
            ],
            texture_name: "brick".into(),
        };

        // A line at an endpoint never splits; an interior one does.
        let lines = [VerticalLine::new(0.0, 0.0), VerticalLine::new(1.0, 0.0)];
        let parts = partition_segment(base(0.0, 2.0), &lines);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].right, lines[1]);
        assert_eq!(parts[1].left, lines[1]);

        let parts = partition_segment(base(1.0, 2.0), &lines);
        assert_eq!(parts.len(), 1);
    }
}
