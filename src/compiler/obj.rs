//! Wavefront OBJ decoding, reduced to what the compiler consumes:
//! vertex positions, faces with their active material, and the edges of
//! the triangulated faces. Texture/normal reference fields and unknown
//! directives are ignored.

use std::io::{self, BufRead};

use glam::DVec3;

use super::geom::Line;

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A triangulated face corner-fan triangle with its material.
#[derive(Clone, Debug)]
pub struct Triangle {
    pub p1: DVec3,
    pub p2: DVec3,
    pub p3: DVec3,
    pub material_name: String,
}

#[derive(Clone, Debug)]
struct Face {
    material_name: String,
    /// Zero-based vertex indices, already bounds-checked.
    references: Vec<usize>,
}

/// An OBJ model held fully in memory.
#[derive(Clone, Debug, Default)]
pub struct Model {
    vertices: Vec<DVec3>,
    faces: Vec<Face>,
}

impl Model {
    pub fn decode<R: BufRead>(reader: R) -> Result<Model, ObjError> {
        let mut model = Model::default();
        let mut material_name = String::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let vertex = parse_vertex(tokens, number)?;
                    model.vertices.push(vertex);
                }
                Some("f") => {
                    let face = parse_face(tokens, number, model.vertices.len())?;
                    model.faces.push(Face {
                        material_name: material_name.clone(),
                        references: face,
                    });
                }
                Some("usemtl") => {
                    material_name = tokens.next().unwrap_or_default().to_owned();
                }
                // Groups, objects, normals, texture coordinates, mtllib
                // references and comments carry nothing we need.
                _ => {}
            }
        }
        Ok(model)
    }

    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            *vertex *= factor;
        }
    }

    /// All faces as triangles, fanning polygons around their first
    /// vertex. Faces with fewer than three corners are skipped with a
    /// warning.
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut result = Vec::new();
        for face in &self.faces {
            let vertex_count = face.references.len();
            if vertex_count < 3 {
                log::warn!("skipping face: insufficient number of vertices: {vertex_count}");
                continue;
            }

            let vertex1 = self.vertices[face.references[0]];
            let mut vertex2 = self.vertices[face.references[1]];
            for &reference in &face.references[2..] {
                let vertex3 = self.vertices[reference];
                result.push(Triangle {
                    p1: vertex1,
                    p2: vertex2,
                    p3: vertex3,
                    material_name: face.material_name.clone(),
                });
                vertex2 = vertex3;
            }
        }
        result
    }

    /// The three edges of every triangle, in face order.
    pub fn edges(&self) -> Vec<Line> {
        let mut result = Vec::new();
        for triangle in self.triangles() {
            result.push(Line::new(triangle.p1, triangle.p2));
            result.push(Line::new(triangle.p2, triangle.p3));
            result.push(Line::new(triangle.p3, triangle.p1));
        }
        result
    }
}

fn parse_vertex<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<DVec3, ObjError> {
    let mut component = |axis: &str| -> Result<f64, ObjError> {
        tokens
            .next()
            .ok_or_else(|| ObjError::Parse {
                line,
                message: format!("vertex is missing its {axis} component"),
            })?
            .parse()
            .map_err(|err| ObjError::Parse {
                line,
                message: format!("bad vertex {axis} component: {err}"),
            })
    };
    Ok(DVec3::new(component("x")?, component("y")?, component("z")?))
}

fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
    vertex_count: usize,
) -> Result<Vec<usize>, ObjError> {
    let mut references = Vec::new();
    for token in tokens {
        // `v`, `v/vt`, `v//vn`, `v/vt/vn` — only the vertex index matters.
        let field = token.split('/').next().unwrap_or_default();
        let index: i64 = field.parse().map_err(|err| ObjError::Parse {
            line,
            message: format!("bad face vertex reference {token:?}: {err}"),
        })?;

        // Negative references count back from the latest vertex.
        let resolved = if index < 0 {
            vertex_count as i64 + index
        } else {
            index - 1
        };
        if resolved < 0 || resolved >= vertex_count as i64 {
            return Err(ObjError::Parse {
                line,
                message: format!("face vertex reference {index} out of range"),
            });
        }
        references.push(resolved as usize);
    }
    Ok(references)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a single textured quad
mtllib scene.mtl
o wall
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
usemtl brick
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn quad_becomes_two_fan_triangles() {
        let model = Model::decode(QUAD.as_bytes()).unwrap();
        let triangles = model.triangles();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].material_name, "brick");

        // Fan around vertex 1: (1,2,3) and (1,3,4).
        assert_eq!(triangles[0].p1, DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(triangles[0].p3, DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].p2, DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].p3, DVec3::new(0.0, 1.0, 0.0));

        assert_eq!(model.edges().len(), 6);
    }

    #[test]
    fn materials_switch_between_faces() {
        let source = "\
v 0 0 0
v 1 0 0
v 1 1 0
usemtl brick
f 1 2 3
usemtl stone
f 3 2 1
f 1 3 2
";
        let model = Model::decode(source.as_bytes()).unwrap();
        let triangles = model.triangles();
        assert_eq!(triangles[0].material_name, "brick");
        assert_eq!(triangles[1].material_name, "stone");
        assert_eq!(triangles[2].material_name, "stone");
    }

    #[test]
    fn negative_references_resolve_backward() {
        let source = "\
v 0 0 0
v 1 0 0
v 1 1 0
f -3 -2 -1
";
        let model = Model::decode(source.as_bytes()).unwrap();
        let triangles = model.triangles();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].p3, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn scale_multiplies_vertices() {
        let mut model = Model::decode(QUAD.as_bytes()).unwrap();
        model.scale(64.0);
        let triangles = model.triangles();
        assert_eq!(triangles[0].p3, DVec3::new(64.0, 64.0, 0.0));
    }

    #[test]
    fn short_faces_are_skipped() {
        let source = "\
v 0 0 0
v 1 0 0
f 1 2
";
        let model = Model::decode(source.as_bytes()).unwrap();
        assert!(model.triangles().is_empty());
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = Model::decode("v 0 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Parse { line: 1, .. }));

        let err = Model::decode("v 0 0 0\nf 1 2 9\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::Parse { line: 2, .. }));
    }
}
