//! Texture source for [`GridMap`](crate::world::GridMap): PNG tilesets and
//! skybox crosses decoded with `image`, or a generated fallback set.

use std::path::Path;

use crate::world::texture::{
    CubeFace, NO_TEXTURE, Rgba, TEXTURE_SLOTS, TILE_SIZE, Texture, TextureError, TextureId,
};

/// Ids used by [`Atlas::procedural`].
pub mod ids {
    use crate::world::texture::TextureId;

    pub const BRICK: TextureId = 1;
    pub const STONE: TextureId = 2;
    pub const WOOD: TextureId = 3;
    pub const MOSS: TextureId = 4;
    pub const GRATE: TextureId = 5;
    pub const TILES: TextureId = 6;
    pub const PLANKS: TextureId = 7;
    pub const METAL: TextureId = 8;
    pub const BARREL: TextureId = 10;
    pub const PILLAR: TextureId = 11;
    pub const LAMP: TextureId = 15;
    /// First of four angle frames (front, left, back, right).
    pub const GUARD: TextureId = 20;
}

/// `(column, row)` of each face inside a horizontal-cross skybox image.
const CROSS_LAYOUT: [(usize, usize); 6] = [(0, 1), (2, 1), (1, 0), (1, 2), (1, 1), (3, 1)];

/// Id-addressed textures plus up to six skybox faces.
#[derive(Clone, Debug)]
pub struct Atlas {
    walls: Vec<Option<Texture>>,
    sky: [Option<Texture>; 6],
}

impl Default for Atlas {
    fn default() -> Self {
        Self {
            walls: vec![None; TEXTURE_SLOTS],
            sky: Default::default(),
        }
    }
}

/// Decode any PNG into a [`Texture`].
pub fn load_png(path: impl AsRef<Path>) -> Result<Texture, TextureError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Texture::from_rgba(w as usize, h as usize, img.into_raw())
}

impl Atlas {
    pub fn wall(&self, id: TextureId) -> Option<&Texture> {
        if id == NO_TEXTURE {
            return None;
        }
        self.walls[id as usize].as_ref()
    }

    pub fn sky(&self, face: CubeFace) -> Option<&Texture> {
        self.sky[face.index()].as_ref()
    }

    pub fn insert(&mut self, id: TextureId, tex: Texture) {
        if id != NO_TEXTURE {
            self.walls[id as usize] = Some(tex);
        }
    }

    pub fn set_sky(&mut self, face: CubeFace, tex: Texture) {
        self.sky[face.index()] = Some(tex);
    }

    /// Slice a horizontal strip of `tile × tile` squares; square `i` gets id
    /// `i + 1`. Ids past the end of the strip stay empty.
    pub fn add_tileset(&mut self, strip: &Texture, tile: usize) -> Result<usize, TextureError> {
        if tile == 0 {
            return Err(TextureError::Empty { w: tile, h: tile });
        }
        let count = (strip.w / tile).min(TEXTURE_SLOTS - 1);
        for i in 0..count {
            self.walls[i + 1] = Some(strip.crop(i * tile, 0, tile, tile.min(strip.h))?);
        }
        Ok(count)
    }

    /// Slice a horizontal-cross skybox made of `size × size` faces.
    pub fn add_skybox_cross(&mut self, cross: &Texture, size: usize) -> Result<(), TextureError> {
        for face in CubeFace::ALL {
            let (col, row) = CROSS_LAYOUT[face.index()];
            self.sky[face.index()] = Some(cross.crop(col * size, row * size, size, size)?);
        }
        Ok(())
    }

    /// Tileset strip from a PNG file, `TILE_SIZE` squares.
    pub fn load_tileset(&mut self, path: impl AsRef<Path>) -> Result<usize, TextureError> {
        let strip = load_png(path)?;
        self.add_tileset(&strip, TILE_SIZE)
    }

    /// Skybox cross from a PNG file; the face size is a quarter of its width.
    pub fn load_skybox(&mut self, path: impl AsRef<Path>) -> Result<(), TextureError> {
        let cross = load_png(path)?;
        self.add_skybox_cross(&cross, (cross.w / 4).max(1))
    }

    /*──────────────────────── generated set ───────────────────────*/

    /// Self-contained textures for demos and tests; see [`ids`].
    pub fn procedural() -> Self {
        let mut atlas = Self::default();
        atlas.insert(ids::BRICK, bricks([150, 60, 45, 255], [90, 85, 80, 255]));
        atlas.insert(ids::STONE, noise([120, 120, 125, 255], 0x1234));
        atlas.insert(ids::WOOD, stripes([130, 90, 50, 255], 8));
        atlas.insert(ids::MOSS, noise([60, 110, 55, 255], 0xBEEF));
        atlas.insert(ids::GRATE, grate([70, 70, 80, 255]));
        atlas.insert(ids::TILES, checker([200, 200, 190, 255], [60, 60, 70, 255], 16));
        atlas.insert(ids::PLANKS, stripes([160, 120, 70, 255], 16));
        atlas.insert(ids::METAL, noise([90, 100, 120, 255], 0x77));
        atlas.insert(ids::BARREL, disc([140, 80, 30, 255], 24));
        atlas.insert(ids::PILLAR, column([210, 205, 190, 255]));
        atlas.insert(ids::LAMP, disc([255, 240, 180, 255], 30));
        for (frame, color) in [
            [200, 40, 40, 255],
            [40, 200, 40, 255],
            [40, 40, 200, 255],
            [200, 200, 40, 255],
        ]
        .into_iter()
        .enumerate()
        {
            atlas.insert(ids::GUARD + frame as TextureId, figure(color));
        }
        for face in CubeFace::ALL {
            atlas.set_sky(face, sky_gradient(face));
        }
        atlas
    }
}

fn shade(c: Rgba, f: f32) -> Rgba {
    let s = |v: u8| (v as f32 * f).clamp(0.0, 255.0) as u8;
    [s(c[0]), s(c[1]), s(c[2]), c[3]]
}

fn generate(mut f: impl FnMut(usize, usize) -> Rgba) -> Texture {
    let mut tex = Texture::filled(TILE_SIZE, TILE_SIZE, [0, 0, 0, 255]);
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            tex.set_pixel(x as i32, y as i32, f(x, y));
        }
    }
    tex
}

/// Cheap integer hash used for texture grain.
fn hash(x: usize, y: usize, seed: u32) -> u32 {
    let mut h = (x as u32).wrapping_mul(374_761_393) ^ (y as u32).wrapping_mul(668_265_263) ^ seed;
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^ (h >> 16)
}

fn noise(base: Rgba, seed: u32) -> Texture {
    generate(|x, y| shade(base, 0.75 + (hash(x, y, seed) & 0xFF) as f32 / 1024.0))
}

fn bricks(brick: Rgba, mortar: Rgba) -> Texture {
    generate(|x, y| {
        let row = y / 16;
        let offset = if row % 2 == 0 { 0 } else { 16 };
        if y % 16 == 0 || (x + offset) % 32 == 0 {
            mortar
        } else {
            shade(brick, 0.85 + (hash(x, y, 7) & 0x3F) as f32 / 400.0)
        }
    })
}

fn stripes(base: Rgba, period: usize) -> Texture {
    generate(|x, _| if x % period == 0 { shade(base, 0.6) } else { base })
}

fn checker(a: Rgba, b: Rgba, cell: usize) -> Texture {
    generate(|x, y| if (x / cell + y / cell) % 2 == 0 { a } else { b })
}

fn grate(bar: Rgba) -> Texture {
    generate(|x, y| {
        if x % 16 < 4 || y % 16 < 4 {
            bar
        } else {
            [0, 0, 0, 0]
        }
    })
}

fn disc(color: Rgba, radius: usize) -> Texture {
    let c = TILE_SIZE as f32 * 0.5;
    let r2 = (radius * radius) as f32;
    generate(|x, y| {
        let (dx, dy) = (x as f32 + 0.5 - c, y as f32 + 0.5 - c);
        if dx * dx + dy * dy <= r2 {
            color
        } else {
            [0, 0, 0, 0]
        }
    })
}

fn column(color: Rgba) -> Texture {
    generate(|x, _| {
        if (20..44).contains(&x) {
            shade(color, 0.7 + 0.3 * ((x - 20) as f32 / 24.0))
        } else {
            [0, 0, 0, 0]
        }
    })
}

fn figure(color: Rgba) -> Texture {
    generate(|x, y| {
        let head = (28..36).contains(&x) && (8..18).contains(&y);
        let body = (22..42).contains(&x) && (18..64).contains(&y);
        if head {
            [230, 190, 160, 255]
        } else if body {
            color
        } else {
            [0, 0, 0, 0]
        }
    })
}

fn sky_gradient(face: CubeFace) -> Texture {
    let tint = match face {
        CubeFace::PosX | CubeFace::NegX => 1.0,
        CubeFace::PosZ => 0.95,
        _ => 0.9,
    };
    generate(|x, y| {
        let t = y as f32 / TILE_SIZE as f32;
        let glow = if (hash(x, y, face.index() as u32) & 0x1FF) == 0 {
            1.3
        } else {
            1.0
        };
        shade(
            [
                (40.0 + 150.0 * t) as u8,
                (70.0 + 140.0 * t) as u8,
                (160.0 + 80.0 * t) as u8,
                255,
            ],
            tint * glow,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tileset_strip_is_one_based() {
        let mut strip = Texture::filled(8, 4, [0, 0, 0, 255]);
        strip.set_pixel(4, 0, [255, 0, 0, 255]);
        let mut atlas = Atlas::default();
        assert_eq!(atlas.add_tileset(&strip, 4).unwrap(), 2);
        assert!(atlas.wall(NO_TEXTURE).is_none());
        assert_eq!(atlas.wall(1).unwrap().pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(atlas.wall(2).unwrap().pixel(0, 0), [255, 0, 0, 255]);
        assert!(atlas.wall(3).is_none());
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let strip = Texture::filled(8, 4, [0, 0, 0, 255]);
        let mut atlas = Atlas::default();
        let err = atlas.add_tileset(&strip, 0).unwrap_err();
        assert!(matches!(err, TextureError::Empty { w: 0, h: 0 }));
        assert!(atlas.wall(1).is_none());
    }

    #[test]
    fn skybox_cross_faces() {
        let mut cross = Texture::filled(8, 6, [0, 0, 0, 255]);
        // +Y sits at column 1, row 0
        cross.set_pixel(2, 0, [1, 2, 3, 255]);
        let mut atlas = Atlas::default();
        atlas.add_skybox_cross(&cross, 2).unwrap();
        assert_eq!(atlas.sky(CubeFace::PosY).unwrap().pixel(0, 0), [1, 2, 3, 255]);
        assert!(CubeFace::ALL.iter().all(|f| atlas.sky(*f).is_some()));

        let small = Texture::filled(4, 4, [0, 0, 0, 255]);
        assert!(atlas.add_skybox_cross(&small, 2).is_err());
    }

    #[test]
    fn procedural_set_is_complete() {
        let atlas = Atlas::procedural();
        assert!(atlas.wall(ids::GRATE).unwrap().has_transparency());
        assert!(!atlas.wall(ids::BRICK).unwrap().has_transparency());
        assert!(atlas.wall(ids::GUARD + 3).is_some());
        assert!(CubeFace::ALL.iter().all(|f| atlas.sky(*f).is_some()));
    }

    #[test]
    fn missing_png_reports_path() {
        let err = load_png("/definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("not/here.png"));
    }
}
