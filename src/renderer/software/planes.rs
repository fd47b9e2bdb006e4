//! Floor and ceiling projection below / above the wall span of a column.
//!
//! Each row's distance comes from intersecting the row's ray with the
//! horizontal plane at camera height (`H / (2y - H)`, mirrored for the
//! ceiling). The world point is interpolated between the camera and the
//! spot where the last hit's wall meets the floor.

use std::ops::Range;

use glam::{Vec2, vec2};

use crate::{
    renderer::software::{
        Software,
        depth::SKY_DEPTH,
        sky,
        walls::{ColumnSpan, HitAxis, Ray},
    },
    world::{Camera, NO_TEXTURE, TILE_SIZE, TextureBank, Tile, World},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    Floor,
    Ceiling,
}

/// World position of the floor texel right at the base of the last wall.
pub fn floor_anchor(ray: &Ray, span: &ColumnSpan) -> Vec2 {
    let cell = span.last.cell.as_vec2();
    match span.last.axis {
        HitAxis::X => {
            let x = if ray.dir.x > 0.0 { cell.x } else { cell.x + 1.0 };
            vec2(x, cell.y + span.wall_x)
        }
        HitAxis::Y => {
            let y = if ray.dir.y > 0.0 { cell.y } else { cell.y + 1.0 };
            vec2(cell.x + span.wall_x, y)
        }
    }
}

/// A full-height opaque wall: nothing can be seen on its floor or ceiling.
#[inline]
fn occludes(bank: &TextureBank, tile: &Tile) -> bool {
    tile.wall != NO_TEXTURE
        && tile.cut_off == 0
        && bank.wall(tile.wall).is_some_and(|t| !t.has_transparency())
}

impl Software {
    /// Fill floor rows `[draw_end, max_y)` and ceiling rows
    /// `[min_y, draw_start)` of column `x`.
    pub(super) fn draw_planes<W: World + ?Sized>(
        &mut self,
        x: i32,
        ray: &Ray,
        span: &ColumnSpan,
        camera: &Camera,
        world: &W,
    ) {
        let anchor = floor_anchor(ray, span);
        let floor_rows = span.draw_end..camera.max_y();
        let ceil_rows = camera.min_y()..span.draw_start;
        self.draw_plane_rows(x, Plane::Floor, floor_rows, ray, span, anchor, camera, world);
        self.draw_plane_rows(x, Plane::Ceiling, ceil_rows, ray, span, anchor, camera, world);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_plane_rows<W: World + ?Sized>(
        &mut self,
        x: i32,
        plane: Plane,
        rows: Range<i32>,
        ray: &Ray,
        span: &ColumnSpan,
        anchor: Vec2,
        camera: &Camera,
        world: &W,
    ) {
        let h_f = self.height as f32;
        let offset = camera.draw_offset();
        let pos = camera.pos();
        let tile_f = TILE_SIZE as f32;

        for y in rows {
            let denom = match plane {
                Plane::Floor => 2.0 * y as f32 - h_f,
                Plane::Ceiling => h_f - 2.0 * y as f32,
            };
            // the horizon row projects to infinity
            if denom <= 0.0 {
                let color = sky::sample(&self.bank, camera, ray.dir, y);
                self.target.write(x, y, offset, color, 1.0, SKY_DEPTH);
                continue;
            }
            let dist = h_f / denom;
            let weight = dist / span.dist;
            let point = pos.lerp(anchor, weight);
            let cell = point.floor().as_ivec2();

            let tile = world.tile(cell.x, cell.y);
            if let Some(t) = tile {
                // rows at or past the anchor belong to the last wall's base
                if weight < 1.0 && occludes(&self.bank, &t) {
                    continue;
                }

                let (id, emissive) = match plane {
                    Plane::Floor => (t.floor, false),
                    Plane::Ceiling => match t.light {
                        Some(lamp) if self.bank.wall(lamp).is_some() => (lamp, true),
                        _ => (t.ceil, false),
                    },
                };

                if let Some(tex) = self.bank.wall(id) {
                    let color = tex.pixel_wrapped(
                        (point.x * tile_f).floor() as i32,
                        (point.y * tile_f).floor() as i32,
                    );
                    let scale = if emissive {
                        1.0
                    } else {
                        self.config.fog.scale(dist) * t.light_level
                    };
                    // raised floors move up, lowered ceilings move down
                    let shift = match plane {
                        Plane::Floor => -((t.floor_raise() * h_f / dist).floor() as i32),
                        Plane::Ceiling => (t.ceil_drop() * h_f / dist).floor() as i32,
                    };
                    self.target.write(x, y + shift, offset, color, scale, dist);
                    continue;
                }
            }

            let color = sky::sample(&self.bank, camera, ray.dir, y);
            self.target.write(x, y, offset, color, 1.0, SKY_DEPTH);
        }
    }
}
