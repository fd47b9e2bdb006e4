//! Built-in 24×24 level and the scene bootstrap shared by the binaries.

use std::path::{Path, PathBuf};

use glam::{Vec2, vec2};

use crate::{
    renderer::{RenderConfig, RenderError, Software, Sprite},
    world::{Atlas, Camera, GridMap, MapError, TextureError, TextureId, Tile, World, atlas::ids},
};

pub const MAP_SIZE: usize = 24;

/// Indexed `[x][y]`.
#[rustfmt::skip]
const WALLS: [[u8; MAP_SIZE]; MAP_SIZE] = [
    [4,4,4,4,4,4,4,4,4,4,4,4,4,4,4,4,7,7,7,7,7,7,7,7],
    [4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,7,0,0,0,0,0,0,7],
    [4,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,7],
    [4,0,2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,7],
    [4,0,3,0,0,0,0,0,0,0,0,0,0,0,0,0,7,0,0,0,0,0,0,7],
    [4,0,4,0,0,0,0,5,5,5,5,5,5,5,5,5,7,7,0,7,7,7,7,7],
    [4,0,5,0,0,0,0,5,0,5,0,5,0,5,0,5,7,0,0,0,7,7,7,1],
    [4,0,6,0,0,0,0,5,0,0,0,0,0,0,0,5,7,0,0,0,0,0,0,8],
    [4,0,7,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,7,7,7,1],
    [4,0,8,0,0,0,0,5,0,0,0,0,0,0,0,5,7,0,0,0,0,0,0,8],
    [4,0,0,0,0,0,0,5,0,0,0,0,0,0,0,5,7,0,0,0,7,7,7,1],
    [4,0,0,0,0,0,0,5,5,5,5,0,5,5,5,5,7,7,7,7,7,7,7,1],
    [6,6,6,6,6,6,6,6,6,6,6,9,6,6,6,6,6,6,6,6,6,6,6,6],
    [8,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,4],
    [6,6,6,6,6,6,0,6,6,6,6,0,6,6,6,6,6,6,6,6,6,6,6,6],
    [4,4,4,4,4,4,0,4,4,4,6,0,6,2,2,2,2,2,2,2,3,3,3,3],
    [4,0,0,0,0,0,0,0,0,4,6,0,6,2,0,0,0,0,0,2,0,0,0,2],
    [4,0,0,0,0,0,0,0,0,0,0,0,6,2,0,0,5,0,0,2,0,0,0,2],
    [4,0,0,0,0,0,0,0,0,4,6,0,6,2,0,0,0,0,0,2,2,0,2,2],
    [4,0,6,0,6,0,0,0,0,4,6,0,0,0,0,0,5,0,0,0,0,0,0,2],
    [4,0,0,5,0,0,0,0,0,4,6,0,6,2,0,0,0,0,0,2,2,0,2,2],
    [4,0,6,0,6,0,0,0,0,4,6,0,6,2,0,0,5,0,0,2,0,0,0,2],
    [4,0,0,0,0,0,0,0,0,4,6,0,6,2,0,0,0,0,0,2,0,0,0,2],
    [4,4,4,4,4,4,4,4,4,4,1,1,1,2,2,2,2,2,2,3,3,3,3,3],
];

/// Layout value → atlas id. 9 is the see-through gate into the corridor.
const PALETTE: [TextureId; 10] = [
    0,
    ids::BRICK,
    ids::STONE,
    ids::WOOD,
    ids::MOSS,
    ids::METAL,
    ids::TILES,
    ids::PLANKS,
    ids::BRICK,
    ids::GRATE,
];

/// Start pose: east end of the lit corridor, looking west.
pub fn camera(view_height: usize) -> Camera {
    Camera::new(vec2(22.0, 11.5), vec2(-1.0, 0.0), vec2(0.0, 0.66), view_height)
}

/// The level, textured from `atlas`.
///
/// Rows `9..=13` have a low plank ceiling at half brightness, with a lamp at
/// `(18, 11)`; two half-height crates stand at `(15, 10)` and `(16, 10)`.
pub fn map(atlas: Atlas) -> GridMap {
    let mut map = GridMap::new(MAP_SIZE, MAP_SIZE, Tile::open(ids::TILES, 0)).with_atlas(atlas);

    for (x, column) in WALLS.iter().enumerate() {
        for (y, &cell) in column.iter().enumerate() {
            let (x, y) = (x as i32, y as i32);
            let mut tile = Tile::open(ids::TILES, 0);
            tile.wall = PALETTE[cell as usize];
            if (9..=13).contains(&y) {
                tile.ceil = ids::PLANKS;
                tile.light_level = 0.5;
            }
            if y == 9 {
                tile.ceil_height = 24;
            }
            map.set(x, y, tile);
        }
    }

    map.edit_rect(17, 9, 17, 9, |t| t.ceil_height = 20);
    map.edit_rect(18, 11, 18, 11, |t| t.light = Some(ids::LAMP));
    for (x, cut) in [(15, 48), (16, 40)] {
        map.edit_rect(x, 10, x, 10, |t| {
            t.wall = ids::WOOD;
            t.cut_off = cut;
            t.floor = ids::PLANKS;
        });
    }
    map
}

/// Procedural textures, overridden by a tileset strip and / or a skybox
/// cross when given.
pub fn atlas(tileset: Option<&Path>, skybox: Option<&Path>) -> Result<Atlas, TextureError> {
    let mut atlas = Atlas::procedural();
    if let Some(path) = tileset {
        let count = atlas.load_tileset(path)?;
        log::info!("loaded {count} tiles from {}", path.display());
    }
    if let Some(path) = skybox {
        atlas.load_skybox(path)?;
        log::info!("loaded skybox from {}", path.display());
    }
    Ok(atlas)
}

/// Camera in the centre of the first open cell of `map`, scanning rows
/// top to bottom.
pub fn spawn(map: &GridMap, view_height: usize) -> Option<Camera> {
    let (w, h) = (map.width() as i32, map.height() as i32);
    (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .find(|&(x, y)| map.tile(x, y).is_some_and(|t| !t.is_solid()))
        .map(|(x, y)| {
            let pos = vec2(x as f32 + 0.5, y as f32 + 0.5);
            Camera::new(pos, vec2(1.0, 0.0), vec2(0.0, -0.66), view_height)
        })
}

/// Props along the corridor.
pub fn sprites() -> Vec<Sprite> {
    vec![
        Sprite::new(vec2(20.0, 11.5), ids::BARREL).with_offset(4),
        Sprite::new(vec2(18.5, 11.5), ids::PILLAR),
        Sprite::new(vec2(17.0, 11.5), ids::BARREL),
        Sprite::new(vec2(15.0, 11.5), ids::GUARD).with_frames(4, 0.0),
        Sprite::new(vec2(10.0, 11.5), ids::PILLAR),
        Sprite::new(vec2(18.0, 11.5), ids::LAMP)
            .with_offset(-24)
            .emissive(),
    ]
}

/*──────────────────────── host bootstrap ───────────────────────*/

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: MapError,
    },

    #[error("`{0}` has no open cell to start in")]
    NoSpawn(PathBuf),
}

/// Everything a host needs to start rendering.
pub struct Scene {
    pub map: GridMap,
    pub camera: Camera,
    pub sprites: Vec<Sprite>,
}

impl Scene {
    /// The built-in level when `layout` is `None`, otherwise the text layout
    /// at that path (floored with [`ids::TILES`], no sprites).
    pub fn load(
        layout: Option<&Path>,
        tileset: Option<&Path>,
        skybox: Option<&Path>,
        view_height: usize,
    ) -> Result<Self, SceneError> {
        let atlas = atlas(tileset, skybox)?;
        let Some(path) = layout else {
            return Ok(Self {
                map: map(atlas),
                camera: camera(view_height),
                sprites: sprites(),
            });
        };

        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let map = GridMap::parse(&text, ids::TILES)
            .map_err(|source| SceneError::Parse {
                path: path.to_path_buf(),
                source,
            })?
            .with_atlas(atlas);
        let camera = spawn(&map, view_height).ok_or_else(|| SceneError::NoSpawn(path.into()))?;
        log::info!("loaded {}×{} map from {}", map.width(), map.height(), path.display());
        Ok(Self {
            map,
            camera,
            sprites: Vec::new(),
        })
    }

    /// Initialised software renderer with this scene's sprites registered.
    pub fn renderer(&self, width: usize, height: usize) -> Result<Software, RenderError> {
        let mut renderer = Software::new(width, height, RenderConfig::default())?;
        renderer.initialize(&self.map)?;
        for &sprite in &self.sprites {
            renderer.add_sprite(sprite);
        }
        Ok(renderer)
    }
}

/// Terminal logger on stderr; `verbose` lowers the level to debug.
pub fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    use simplelog::LevelFilter::{Debug, Info, Off};
    simplelog::TermLogger::init(
        if verbose { Debug } else { Info },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
}

/// Drag-to-look: pointer motion, as a fraction of the view, becomes turn
/// and pitch, smoothed over frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct MouseLook {
    last: Option<Vec2>,
    smoothed: Vec2,
}

impl MouseLook {
    pub const GAIN: f32 = 32.0;

    /// Feed the pointer position for this frame, or `None` while not
    /// dragging. Returns `(turn, look)` for [`Camera::rotate`] and
    /// [`Camera::look`].
    pub fn update(&mut self, pointer: Option<(f32, f32)>, view: (usize, usize)) -> (f32, f32) {
        let now = pointer.map(|(x, y)| vec2(x, y));
        let raw = match (self.last, now) {
            (Some(last), Some(now)) => (last - now) / vec2(view.0 as f32, view.1 as f32),
            _ => Vec2::ZERO,
        };
        self.last = now;
        self.smoothed = self.smoothed.lerp(raw, 0.5);
        let step = self.smoothed * Self::GAIN;
        (step.x, step.y)
    }
}
