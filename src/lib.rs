//! Tile-grid raycaster: DDA walls with transparent layers, projected floors
//! and ceilings, cubemap sky and depth-tested billboard sprites.

pub mod demo;
pub mod renderer;
pub mod world;
