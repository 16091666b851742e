//! Compact level format.
//!
//! A level is a flat JSON document: a deduplicated texture-name list
//! plus the BSP walls in pre-order (the root is index 0). Extrusion
//! texture fields are indices into the name list; child fields are wall
//! indices with `-1` meaning "none". The compiler emits this format
//! with Y and Z already negated into the runtime's screen-down axis
//! convention, so the loader applies no axis fixup.

pub mod loader;

use std::io;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode json level: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub textures: Vec<String>,
    pub walls: Vec<Wall>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    #[serde(rename = "lx")]
    pub left_edge_x: f32,
    #[serde(rename = "lz")]
    pub left_edge_z: f32,
    #[serde(rename = "rx")]
    pub right_edge_x: f32,
    #[serde(rename = "rz")]
    pub right_edge_z: f32,

    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Extrusion>,
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Extrusion>,

    #[serde(rename = "fw")]
    pub front_wall: i32,
    #[serde(rename = "bw")]
    pub back_wall: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extrusion {
    #[serde(rename = "t")]
    pub top: f32,
    #[serde(rename = "b")]
    pub bottom: f32,

    #[serde(rename = "ot")]
    pub outer_texture: i32,
    #[serde(rename = "ft")]
    pub face_texture: i32,
    #[serde(rename = "it")]
    pub inner_texture: i32,
}

pub fn save<W: io::Write>(out: W, level: &Level) -> Result<(), LevelError> {
    serde_json::to_writer(out, level)?;
    Ok(())
}

pub fn load<R: io::Read>(input: R) -> Result<Level, LevelError> {
    Ok(serde_json::from_reader(input)?)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level() -> Level {
        Level {
            textures: vec!["brick".into(), "stone".into()],
            walls: vec![
                Wall {
                    left_edge_x: -1.0,
                    left_edge_z: -2.0,
                    right_edge_x: 1.0,
                    right_edge_z: -2.0,
                    ceiling: Some(Extrusion {
                        top: -4.0,
                        bottom: -2.0,
                        outer_texture: 0,
                        face_texture: 1,
                        inner_texture: 0,
                    }),
                    floor: None,
                    front_wall: 1,
                    back_wall: -1,
                },
                Wall {
                    left_edge_x: 0.0,
                    left_edge_z: 0.0,
                    right_edge_x: 2.0,
                    right_edge_z: 0.0,
                    ceiling: None,
                    floor: Some(Extrusion {
                        top: -1.0,
                        bottom: 0.0,
                        outer_texture: 1,
                        face_texture: 1,
                        inner_texture: 1,
                    }),
                    front_wall: -1,
                    back_wall: -1,
                },
            ],
        }
    }

    #[test]
    fn round_trip() {
        let level = sample_level();
        let mut buffer = Vec::new();
        save(&mut buffer, &level).unwrap();
        let decoded = load(buffer.as_slice()).unwrap();
        assert_eq!(decoded, level);
    }

    #[test]
    fn wire_field_names() {
        let level = sample_level();
        let mut buffer = Vec::new();
        save(&mut buffer, &level).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        let wall = &json["walls"][0];
        assert_eq!(wall["lx"], -1.0);
        assert_eq!(wall["fw"], 1);
        assert_eq!(wall["bw"], -1);
        assert_eq!(wall["c"]["ot"], 0);
        // Absent extrusions are omitted, not null.
        assert!(wall.get("f").is_none());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(load(&b"not json"[..]).is_err());
    }
}
