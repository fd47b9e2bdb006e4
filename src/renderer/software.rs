//! ---------------------------------------------------------------------------
//! Software (CPU) raycasting backend
//!
//! * One ray per screen column, stepped through the tile grid (`walls`).
//! * Floor and ceiling rows are projected from the last wall hit (`planes`).
//! * Billboards are sorted far to near and drawn last (`sprites`).
//!
//! Every stage writes through [`depth::DepthTarget`]: a pixel only changes when
//! the new sample is strictly nearer than what is already there.
//! ---------------------------------------------------------------------------

mod depth;
mod planes;
mod renderer;
pub mod sky;
mod sprites;
pub mod walls;

pub use depth::SKY_DEPTH;
pub use renderer::Software;
pub use sprites::{QueuedSprite, Sprite, SpriteFlags, comb_sort};
