// Format-agnostic RGBA8 textures and the bank the renderer samples from.
// The renderer and world logic interact through `TextureId` only.

use std::path::PathBuf;

/// Runtime handle for a wall/floor/ceiling/sprite texture.
///
/// Index **0** is reserved: a tile whose `wall` is `NO_TEXTURE` is open.
pub type TextureId = u8;

/// `TextureId` meaning "no surface here".
pub const NO_TEXTURE: TextureId = 0;

/// Number of addressable texture slots (ids `1..=255`, slot 0 stays empty).
pub const TEXTURE_SLOTS: usize = 256;

/// Texel edge length of one world tile. World coordinates are scaled by this
/// when wrap-sampling floors and ceilings.
pub const TILE_SIZE: usize = 64;

/// One pixel, `[r, g, b, a]`.
pub type Rgba = [u8; 4];

/// What `Texture::pixel` returns outside the texture.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// The six faces of a skybox cube, in loader order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Things that can go wrong while building or loading textures.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Width or height is zero.
    #[error("texture must not be empty (got {w}×{h})")]
    Empty { w: usize, h: usize },

    /// Pixel vector length does not match `w * h * 4`.
    #[error("pixel buffer of {len} bytes does not match {w}×{h} RGBA8")]
    BadSize { w: usize, h: usize, len: usize },

    /// `crop` rectangle leaves the source image.
    #[error("crop {w}×{h} at ({x}, {y}) is outside the {src_w}×{src_h} source")]
    CropOutOfBounds {
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        src_w: usize,
        src_h: usize,
    },

    /// The world could not produce one of the six skybox faces.
    #[error("skybox face {0:?} is missing")]
    MissingFace(CubeFace),

    /// Image file could not be opened or decoded.
    #[error("failed to decode `{path}`")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// CPU-side RGBA8 pixels in row-major order.
///
/// `has_transparency` latches to `true` the first time a pixel with zero
/// alpha is stored; the wall caster uses it to decide whether a ray has to
/// keep marching past this surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pixels: Vec<u8>,
    has_transparency: bool,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = [0xC0, 0xC0, 0xC0, 0xFF];
        const DARK: Rgba = [0x40, 0x40, 0x40, 0xFF];
        let mut tex = Texture::filled(8, 8, DARK);
        for y in 0..8 {
            for x in 0..8 {
                if (x ^ y) & 1 == 0 {
                    tex.set_pixel(x, y, LIGHT);
                }
            }
        }
        tex
    }
}

impl Texture {
    /// A fully transparent `w × h` texture.
    pub fn new(w: usize, h: usize) -> Result<Self, TextureError> {
        if w == 0 || h == 0 {
            return Err(TextureError::Empty { w, h });
        }
        Ok(Self {
            w,
            h,
            pixels: vec![0; w * h * 4],
            has_transparency: false,
        })
    }

    /// Wrap an existing RGBA8 buffer.
    pub fn from_rgba(w: usize, h: usize, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if w == 0 || h == 0 {
            return Err(TextureError::Empty { w, h });
        }
        if pixels.len() != w * h * 4 {
            return Err(TextureError::BadSize {
                w,
                h,
                len: pixels.len(),
            });
        }
        let has_transparency = pixels.chunks_exact(4).any(|p| p[3] == 0);
        Ok(Self {
            w,
            h,
            pixels,
            has_transparency,
        })
    }

    /// Single-colour texture. Panics on zero size; meant for procedural assets.
    pub fn filled(w: usize, h: usize, color: Rgba) -> Self {
        assert!(w > 0 && h > 0, "filled texture must not be empty");
        let pixels = color.iter().copied().cycle().take(w * h * 4).collect();
        Self {
            w,
            h,
            pixels,
            has_transparency: color[3] == 0,
        }
    }

    /// Store one pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return;
        }
        let ofs = (y as usize * self.w + x as usize) * 4;
        self.pixels[ofs..ofs + 4].copy_from_slice(&color);
        if color[3] == 0 {
            self.has_transparency = true;
        }
    }

    /// Point sample. Outside the texture this is [`TRANSPARENT`].
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return TRANSPARENT;
        }
        let ofs = (y as usize * self.w + x as usize) * 4;
        [
            self.pixels[ofs],
            self.pixels[ofs + 1],
            self.pixels[ofs + 2],
            self.pixels[ofs + 3],
        ]
    }

    /// Point sample with both coordinates wrapped into the texture.
    #[inline]
    pub fn pixel_wrapped(&self, x: i32, y: i32) -> Rgba {
        self.pixel(x.rem_euclid(self.w as i32), y.rem_euclid(self.h as i32))
    }

    #[inline]
    pub fn has_transparency(&self) -> bool {
        self.has_transparency
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy the `w × h` rectangle at `(x, y)` into a new texture.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Result<Texture, TextureError> {
        if x + w > self.w || y + h > self.h {
            return Err(TextureError::CropOutOfBounds {
                x,
                y,
                w,
                h,
                src_w: self.w,
                src_h: self.h,
            });
        }
        let mut out = Texture::new(w, h)?;
        for j in 0..h {
            for i in 0..w {
                out.set_pixel(
                    i as i32,
                    j as i32,
                    self.pixel((x + i) as i32, (y + j) as i32),
                );
            }
        }
        Ok(out)
    }
}

/// Immutable texture cache owned by the renderer.
///
/// * Filled once by the renderer's `initialize()` from a `World`.
/// * Slot **0** is always empty.
/// * Exactly six skybox faces, indexed by [`CubeFace`].
#[derive(Clone, Debug)]
pub struct TextureBank {
    walls: Vec<Option<Texture>>,
    skybox: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self {
            walls: vec![None; TEXTURE_SLOTS],
            skybox: vec![Texture::default(); CubeFace::ALL.len()],
        }
    }
}

impl TextureBank {
    /// Borrow a surface texture; `NO_TEXTURE` and unloaded ids give `None`.
    #[inline]
    pub fn wall(&self, id: TextureId) -> Option<&Texture> {
        if id == NO_TEXTURE {
            return None;
        }
        self.walls[id as usize].as_ref()
    }

    #[inline]
    pub fn sky(&self, face: CubeFace) -> &Texture {
        &self.skybox[face.index()]
    }

    /// Put `tex` into slot `id`. Writing slot 0 is ignored.
    pub fn set_wall(&mut self, id: TextureId, tex: Option<Texture>) {
        if id != NO_TEXTURE {
            self.walls[id as usize] = tex;
        }
    }

    pub fn set_sky(&mut self, face: CubeFace, tex: Texture) {
        self.skybox[face.index()] = tex;
    }

    /// Number of occupied surface slots.
    pub fn len(&self) -> usize {
        self.walls.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
