use crate::world::texture::{CubeFace, NO_TEXTURE, TILE_SIZE, Texture, TextureError, TextureId};

/// One grid cell as reported by a [`World`].
///
/// Heights and the cut-off are in texel rows of a [`TILE_SIZE`]-tall wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub wall: TextureId,
    pub floor: TextureId,
    pub ceil: TextureId,
    /// Partial-height clip: `> 0` removes that many rows from the top of the
    /// wall texture, `< 0` removes them from the bottom.
    pub cut_off: i16,
    /// Static brightness multiplier.
    pub light_level: f32,
    /// Lamp marker: this texture replaces the ceiling and is drawn unfogged.
    pub light: Option<TextureId>,
    /// Raises the floor of this tile.
    pub wall_height: u8,
    /// Lowers the ceiling of this tile.
    pub ceil_height: u8,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            wall: NO_TEXTURE,
            floor: NO_TEXTURE,
            ceil: NO_TEXTURE,
            cut_off: 0,
            light_level: 1.0,
            light: None,
            wall_height: 0,
            ceil_height: 0,
        }
    }
}

impl Tile {
    /// A plain solid wall.
    pub fn wall(id: TextureId) -> Self {
        Self {
            wall: id,
            ..Self::default()
        }
    }

    /// An open cell with the given floor and ceiling.
    pub fn open(floor: TextureId, ceil: TextureId) -> Self {
        Self {
            floor,
            ceil,
            ..Self::default()
        }
    }

    /// Blocks movement.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.wall != NO_TEXTURE
    }

    /// How far the floor surface of this tile is lifted, as a fraction of a
    /// full wall.
    pub fn floor_raise(&self) -> f32 {
        let tile = TILE_SIZE as f32;
        let mut raise = self.wall_height as f32 / tile;
        if self.wall != NO_TEXTURE && self.cut_off > 0 {
            raise += (tile - self.cut_off as f32) / tile;
        }
        raise
    }

    /// How far the ceiling surface of this tile is lowered, as a fraction of
    /// a full wall.
    pub fn ceil_drop(&self) -> f32 {
        let tile = TILE_SIZE as f32;
        let mut drop = self.ceil_height as f32 / tile;
        if self.wall != NO_TEXTURE && self.cut_off < 0 {
            drop += (tile + self.cut_off as f32) / tile;
        }
        drop
    }
}

/// Everything the renderer needs from the outside world.
///
/// * `tile` is queried per grid cell during every frame and must accept any
///   coordinate, returning `None` for "no tile at all" (rendered as sky).
/// * The two texture hooks are called once, from the renderer's
///   `initialize()`.
pub trait World {
    fn tile(&self, x: i32, y: i32) -> Option<Tile>;

    /// `Ok(None)` means the id is simply unused.
    fn wall_texture(&self, id: TextureId) -> Result<Option<Texture>, TextureError>;

    fn skybox_face(&self, face: CubeFace) -> Result<Texture, TextureError>;
}
