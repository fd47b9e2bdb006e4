//! Reference [`World`]: a rectangular grid of tiles plus an [`Atlas`].
//!
//! Coordinates outside the grid but within `margin` cells of it report an
//! empty tile (open floor, sky above); anything farther is `None`.

use crate::world::{
    atlas::Atlas,
    texture::{CubeFace, NO_TEXTURE, Texture, TextureError, TextureId},
    tile::{Tile, World},
};

/// Default exterior margin, in cells.
pub const DEFAULT_MARGIN: i32 = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map layout is empty")]
    Empty,

    #[error("row {row} has {got} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, got: usize },

    #[error("unknown cell `{ch}` at row {row}, column {col}")]
    BadCell { row: usize, col: usize, ch: char },
}

pub struct GridMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    margin: i32,
    atlas: Atlas,
}

impl GridMap {
    /// `width × height` grid filled with `fill`.
    pub fn new(width: usize, height: usize, fill: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
            margin: DEFAULT_MARGIN,
            atlas: Atlas::default(),
        }
    }

    /// Build from text, one line per row (`y`), one char per column (`x`).
    ///
    /// * `1`-`9`, `a`-`z` → wall id 1-9, 10-35
    /// * `0`, `.`, space  → open tile
    ///
    /// Every tile, walls included, gets `floor` as floor texture.
    pub fn parse(layout: &str, floor: TextureId) -> Result<Self, MapError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(MapError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);

        for (row, line) in rows.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    got,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let wall = match ch {
                    '0' | '.' | ' ' => NO_TEXTURE,
                    '1'..='9' | 'a'..='z' => ch.to_digit(36).unwrap_or(0) as TextureId,
                    _ => return Err(MapError::BadCell { row, col, ch }),
                };
                tiles.push(Tile {
                    wall,
                    floor,
                    ..Tile::default()
                });
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
            margin: DEFAULT_MARGIN,
            atlas: Atlas::default(),
        })
    }

    pub fn with_atlas(mut self, atlas: Atlas) -> Self {
        self.atlas = atlas;
        self
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin.max(0);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut Atlas {
        &mut self.atlas
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// In-grid tile only.
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|i| &mut self.tiles[i])
    }

    /// Replace an in-grid tile. Returns `false` if `(x, y)` is outside.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.get_mut(x, y) {
            Some(t) => {
                *t = tile;
                true
            }
            None => false,
        }
    }

    /// Apply `f` to every tile in the inclusive rectangle, clipped to the grid.
    pub fn edit_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mut f: impl FnMut(&mut Tile)) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(t) = self.get_mut(x, y) {
                    f(t);
                }
            }
        }
    }
}

impl World for GridMap {
    fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if let Some(t) = self.get(x, y) {
            return Some(*t);
        }
        let m = self.margin;
        let (w, h) = (self.width as i32, self.height as i32);
        if x < -m || y < -m || x >= w + m || y >= h + m {
            return None;
        }
        Some(Tile::default())
    }

    fn wall_texture(&self, id: TextureId) -> Result<Option<Texture>, TextureError> {
        Ok(self.atlas.wall(id).cloned())
    }

    fn skybox_face(&self, face: CubeFace) -> Result<Texture, TextureError> {
        self.atlas
            .sky(face)
            .cloned()
            .ok_or(TextureError::MissingFace(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_lookup() {
        let map = GridMap::parse("12\n0a", 4).unwrap();
        assert_eq!((map.width(), map.height()), (2, 2));
        assert_eq!(map.tile(0, 0).unwrap().wall, 1);
        assert_eq!(map.tile(1, 0).unwrap().wall, 2);
        assert_eq!(map.tile(0, 1).unwrap().wall, NO_TEXTURE);
        assert_eq!(map.tile(1, 1).unwrap().wall, 10);
        assert_eq!(map.tile(0, 1).unwrap().floor, 4);
    }

    #[test]
    fn parse_rejects_bad_layouts() {
        assert_eq!(GridMap::parse("", 0).err(), Some(MapError::Empty));
        assert_eq!(
            GridMap::parse("111\n11", 0).err(),
            Some(MapError::Ragged {
                row: 1,
                expected: 3,
                got: 2
            })
        );
        assert!(matches!(
            GridMap::parse("1#1", 0),
            Err(MapError::BadCell { ch: '#', col: 1, .. })
        ));
    }

    #[test]
    fn margin_synthesises_void_then_refuses() {
        let map = GridMap::parse("1", 0).unwrap();
        let void = map.tile(-2, 0).expect("inside margin");
        assert_eq!(void.wall, NO_TEXTURE);
        assert_eq!(void.floor, NO_TEXTURE);
        assert!(map.tile(-3, 0).is_none());
        assert!(map.tile(0, 3).is_none());
        assert!(map.tile(i32::MIN, i32::MAX).is_none());

        let tight = GridMap::parse("1", 0).unwrap().with_margin(0);
        assert!(tight.tile(1, 0).is_none());
    }

    #[test]
    fn missing_sky_face_is_an_error() {
        let map = GridMap::parse("1", 0).unwrap();
        assert!(matches!(
            map.skybox_face(CubeFace::NegZ),
            Err(TextureError::MissingFace(CubeFace::NegZ))
        ));
    }
}
