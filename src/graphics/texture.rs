// Raw texel storage sampled by the plotter inner loops. The world-level
// registry that maps names to these lives in `world::texture`.

/// Tile edge length in texels. Sampling masks coordinates with
/// [`TILE_MASK`], so every texture tiles at this period.
pub const TILE_SIZE: i32 = 64;

/// `TILE_SIZE - 1`; valid because the tile dimension is a power of two.
pub const TILE_MASK: i32 = TILE_SIZE - 1;

/// Number of bytes per texel (RGBA).
pub const TEXEL_BYTES: i32 = 4;

/// A 64×64 RGBA texture stored column-major: the texel at (u, v) starts
/// at byte offset `(u * 64 + v) * 4`. Column-major keeps vertical stripe
/// sampling sequential in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub texels: Vec<u8>,
}

impl Texture {
    pub fn new(texels: Vec<u8>) -> Self {
        debug_assert_eq!(texels.len(), (TILE_SIZE * TILE_SIZE * TEXEL_BYTES) as usize);
        Self { texels }
    }

    /// Uniformly colored tile, handy in tests.
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        let mut texels = Vec::with_capacity((TILE_SIZE * TILE_SIZE * TEXEL_BYTES) as usize);
        for _ in 0..TILE_SIZE * TILE_SIZE {
            texels.extend_from_slice(&[r, g, b, a]);
        }
        Self { texels }
    }
}
