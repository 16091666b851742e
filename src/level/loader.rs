// ──────────────────────────────────────────────────────────────────────────
// level/loader.rs
//
//  *   level JSON  (level::Level)       ──╮
//  *   one PNG per referenced texture     │   --->  Scene (runtime walls
//  *   TextureBank (new)                  ╯          + populated bank)
// ──────────────────────────────────────────────────────────────────────────

use std::fs::File;
use std::path::Path;

use anyhow::{Context, bail};

use crate::graphics::{TILE_SIZE, Texture};
use crate::level;
use crate::world::{Extrusion, TextureBank, TextureId, Wall, WallId};

/// Everything the frame loop needs from a loaded level. The wall arena
/// is pre-order with the BSP root at index 0.
pub struct Scene {
    pub bank: TextureBank,
    pub walls: Vec<Wall>,
}

/// Load the level at `level_path` and every texture it references from
/// `texture_dir` (`<name>.png`, 64×64). Initialization is
/// all-or-nothing: any missing or malformed asset is an error.
pub fn load_scene(level_path: &Path, texture_dir: &Path) -> anyhow::Result<Scene> {
    let file = File::open(level_path)
        .with_context(|| format!("failed to open level {}", level_path.display()))?;
    let level = level::load(file)
        .with_context(|| format!("failed to load level {}", level_path.display()))?;

    let mut bank = TextureBank::new();
    for name in &level.textures {
        let path = texture_dir.join(format!("{name}.png"));
        let texture =
            load_texture(&path).with_context(|| format!("failed to fetch texture {name:?}"))?;
        bank.insert(name.clone(), texture)
            .with_context(|| format!("failed to register texture {name:?}"))?;
    }

    let walls = build_walls(&level)?;
    Ok(Scene { bank, walls })
}

/// Decode one 64×64 PNG into the column-major texel layout the plotter
/// samples.
pub fn load_texture(path: &Path) -> anyhow::Result<Texture> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode png image {}", path.display()))?
        .to_rgba8();

    let (width, height) = image.dimensions();
    if width != TILE_SIZE as u32 || height != TILE_SIZE as u32 {
        bail!(
            "texture {} is {width}x{height}, expected {TILE_SIZE}x{TILE_SIZE}",
            path.display()
        );
    }

    let mut texels = Vec::with_capacity((TILE_SIZE * TILE_SIZE * 4) as usize);
    for x in 0..width {
        for y in 0..height {
            texels.extend_from_slice(&image.get_pixel(x, y).0);
        }
    }
    Ok(Texture::new(texels))
}

fn build_walls(level: &level::Level) -> anyhow::Result<Vec<Wall>> {
    let texture_count = level.textures.len() as i32;
    let wall_count = level.walls.len() as i32;

    // Out-of-range texture indices mean "no texture" and skip the
    // surface; out-of-range child indices would crash the traversal, so
    // they are load errors.
    let texture = |index: i32| -> Option<TextureId> {
        (0..texture_count).contains(&index).then(|| index as TextureId)
    };
    let child = |index: i32| -> anyhow::Result<Option<WallId>> {
        if index < 0 {
            return Ok(None);
        }
        if index >= wall_count {
            bail!("wall child index {index} out of range ({wall_count} walls)");
        }
        Ok(Some(index as WallId))
    };
    let extrusion = |source: &level::Extrusion| Extrusion {
        top: source.top,
        bottom: source.bottom,
        outer_texture: texture(source.outer_texture),
        face_texture: texture(source.face_texture),
        inner_texture: texture(source.inner_texture),
    };

    let mut walls = Vec::with_capacity(level.walls.len());
    for level_wall in &level.walls {
        let delta_x = (level_wall.right_edge_x - level_wall.left_edge_x) as f64;
        let delta_z = (level_wall.right_edge_z - level_wall.left_edge_z) as f64;
        walls.push(Wall {
            left_x: level_wall.left_edge_x,
            left_z: level_wall.left_edge_z,
            right_x: level_wall.right_edge_x,
            right_z: level_wall.right_edge_z,
            length: (delta_x * delta_x + delta_z * delta_z).sqrt() as f32,
            ceiling: level_wall.ceiling.as_ref().map(|e| extrusion(e)),
            floor: level_wall.floor.as_ref().map(|e| extrusion(e)),
            front: child(level_wall.front_wall)?,
            back: child(level_wall.back_wall)?,
        });
    }
    Ok(walls)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn level_with_indices(front: i32, back: i32, texture: i32) -> level::Level {
        level::Level {
            textures: vec!["brick".into()],
            walls: vec![level::Wall {
                left_edge_x: 0.0,
                left_edge_z: 0.0,
                right_edge_x: 3.0,
                right_edge_z: 4.0,
                ceiling: Some(level::Extrusion {
                    top: -2.0,
                    bottom: 0.0,
                    outer_texture: texture,
                    face_texture: texture,
                    inner_texture: texture,
                }),
                floor: None,
                front_wall: front,
                back_wall: back,
            }],
        }
    }

    #[test]
    fn wall_length_is_precomputed() {
        let walls = build_walls(&level_with_indices(-1, -1, 0)).unwrap();
        assert!((walls[0].length - 5.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_texture_becomes_none() {
        let walls = build_walls(&level_with_indices(-1, -1, 7)).unwrap();
        let ceiling = walls[0].ceiling.as_ref().unwrap();
        assert_eq!(ceiling.outer_texture, None);
        assert_eq!(ceiling.face_texture, None);
        assert_eq!(ceiling.inner_texture, None);
    }

    #[test]
    fn negative_child_is_none_but_bad_child_fails() {
        let walls = build_walls(&level_with_indices(-1, -1, 0)).unwrap();
        assert_eq!(walls[0].front, None);
        assert_eq!(walls[0].back, None);

        assert!(build_walls(&level_with_indices(5, -1, 0)).is_err());
    }

    #[test]
    fn scene_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("wallcast-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // One green 64×64 texture.
        let png = image::RgbaImage::from_pixel(64, 64, image::Rgba([0, 200, 0, 255]));
        png.save(dir.join("grass.png")).unwrap();

        let mut level = level_with_indices(-1, -1, 0);
        level.textures = vec!["grass".into()];
        let level_path = dir.join("level.json");
        level::save(File::create(&level_path).unwrap(), &level).unwrap();

        let scene = load_scene(&level_path, &dir).unwrap();
        assert_eq!(scene.walls.len(), 1);
        let id = scene.bank.id("grass").unwrap();
        let texture = scene.bank.texture(id).unwrap();
        assert_eq!(&texture.texels[0..4], &[0, 200, 0, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_texture_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("wallcast-missing-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let level_path = dir.join("level.json");
        level::save(
            File::create(&level_path).unwrap(),
            &level_with_indices(-1, -1, 0),
        )
        .unwrap();

        assert!(load_scene(&level_path, &dir).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
