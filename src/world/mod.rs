pub mod atlas;
mod camera;
mod grid;
mod texture;
mod tile;

pub use atlas::{Atlas, load_png};

pub use camera::{Camera, Collider, LOOK_LIMIT, LOOK_SPEED};

pub use grid::{DEFAULT_MARGIN, GridMap, MapError};

pub use texture::{
    CubeFace, NO_TEXTURE, Rgba, TEXTURE_SLOTS, TILE_SIZE, TRANSPARENT, Texture, TextureBank,
    TextureError, TextureId,
};

pub use tile::{Tile, World};
