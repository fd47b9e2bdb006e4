//! Per-column grid DDA and wall slice drawing.
//!
//! A ray keeps marching past walls whose texture has transparency or whose
//! tile has a cut-off, collecting up to `hit_cap` hits nearest-first. Every
//! hit is drawn; the depth buffer sorts out what is visible.

use glam::{IVec2, Vec2, ivec2};
use smallvec::SmallVec;

use crate::{
    renderer::{
        config::{MAX_HITS, RenderConfig},
        software::{Software, depth::SKY_DEPTH, sky},
    },
    world::{Camera, NO_TEXTURE, TILE_SIZE, TextureBank, TextureId, World},
};

/// Which grid line family the ray crossed to enter the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitAxis {
    X,
    Y,
}

/// One wall intersection along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapHit {
    pub cell: IVec2,
    pub axis: HitAxis,
    /// Wall texture, or `None` when the surface resolves to sky.
    pub texture: Option<TextureId>,
    pub cut_off: i16,
    pub light_level: f32,
    /// The ray left the world here.
    pub miss: bool,
}

pub type HitList = SmallVec<[MapHit; MAX_HITS]>;

/// Screen extent of the last hit of a column; anchors floor and ceiling.
#[derive(Clone, Copy, Debug)]
pub struct ColumnSpan {
    pub draw_start: i32,
    pub draw_end: i32,
    pub dist: f32,
    pub wall_x: f32,
    pub last: MapHit,
}

/// DDA state for one screen column.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec2,
    pub dir: Vec2,
    step: IVec2,
    delta: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        Self {
            origin,
            dir,
            step: ivec2(
                if dir.x < 0.0 { -1 } else { 1 },
                if dir.y < 0.0 { -1 } else { 1 },
            ),
            delta: Vec2::new((1.0 / dir.x).abs(), (1.0 / dir.y).abs()),
        }
    }

    /// Walk the grid, appending hits to `hits` (which is cleared first).
    /// Always records at least one hit: a miss if nothing else.
    pub fn march<W: World + ?Sized>(
        &self,
        world: &W,
        bank: &TextureBank,
        config: &RenderConfig,
        hits: &mut HitList,
    ) {
        hits.clear();
        let cap = config.hit_cap();

        let mut map = self.origin.floor().as_ivec2();
        let mut side = Vec2::new(
            if self.dir.x < 0.0 {
                (self.origin.x - map.x as f32) * self.delta.x
            } else {
                (map.x as f32 + 1.0 - self.origin.x) * self.delta.x
            },
            if self.dir.y < 0.0 {
                (self.origin.y - map.y as f32) * self.delta.y
            } else {
                (map.y as f32 + 1.0 - self.origin.y) * self.delta.y
            },
        );

        let mut steps = 0;
        loop {
            let axis = if side.x < side.y {
                side.x += self.delta.x;
                map.x += self.step.x;
                HitAxis::X
            } else {
                side.y += self.delta.y;
                map.y += self.step.y;
                HitAxis::Y
            };
            steps += 1;

            let tile = match world.tile(map.x, map.y) {
                Some(t) if steps <= config.max_ray_steps => t,
                _ => {
                    hits.push(MapHit {
                        cell: map,
                        axis,
                        texture: None,
                        cut_off: 0,
                        light_level: 1.0,
                        miss: true,
                    });
                    return;
                }
            };
            if tile.wall == NO_TEXTURE {
                continue;
            }

            let tex = bank.wall(tile.wall);
            hits.push(MapHit {
                cell: map,
                axis,
                texture: tex.map(|_| tile.wall),
                cut_off: tile.cut_off,
                light_level: tile.light_level,
                miss: false,
            });

            let see_through = tex.is_some_and(|t| t.has_transparency()) || tile.cut_off != 0;
            if !see_through || hits.len() >= cap {
                return;
            }
        }
    }

    /// Distance along the camera forward axis (no fisheye).
    #[inline]
    pub fn perp_distance(&self, hit: &MapHit) -> f32 {
        match hit.axis {
            HitAxis::X => {
                (hit.cell.x as f32 - self.origin.x + (1 - self.step.x) as f32 * 0.5) / self.dir.x
            }
            HitAxis::Y => {
                (hit.cell.y as f32 - self.origin.y + (1 - self.step.y) as f32 * 0.5) / self.dir.y
            }
        }
    }

    /// Fractional position of the hit along the crossed face, in `[0, 1)`.
    #[inline]
    pub fn wall_x(&self, hit: &MapHit, dist: f32) -> f32 {
        let w = match hit.axis {
            HitAxis::X => self.origin.y + dist * self.dir.y,
            HitAxis::Y => self.origin.x + dist * self.dir.x,
        };
        w - w.floor()
    }

    /// Texture column for `wall_x`, mirrored so faces read the same way from
    /// both sides.
    #[inline]
    pub fn tex_x(&self, hit: &MapHit, wall_x: f32, tex_w: usize) -> i32 {
        let tx = ((wall_x * tex_w as f32) as i32).min(tex_w as i32 - 1);
        let mirror = match hit.axis {
            HitAxis::X => self.dir.x > 0.0,
            HitAxis::Y => self.dir.y < 0.0,
        };
        if mirror { tex_w as i32 - tx - 1 } else { tx }
    }
}

/// Projected height of a wall `dist` away, capped so span maths stays in
/// `i32`.
#[inline]
pub fn line_height(screen_h: f32, dist: f32) -> i32 {
    (screen_h / dist).min(screen_h * 1024.0).floor() as i32
}

impl Software {
    /// Draw every hit of column `x`; returns the span of the last one.
    pub(super) fn draw_wall_hits(
        &mut self,
        x: i32,
        ray: &Ray,
        hits: &HitList,
        camera: &Camera,
    ) -> Option<ColumnSpan> {
        debug_assert!(!hits.is_empty(), "a ray always records at least a miss");

        let h = self.height as i32;
        let h_f = self.height as f32;
        let offset = camera.draw_offset();
        let mut span = None;

        for hit in hits {
            let dist = ray.perp_distance(hit);
            let line_h = line_height(h_f, dist);
            let draw_start = ((h - line_h) / 2).max(camera.min_y());
            let draw_end = ((line_h + h) / 2).min(camera.max_y());
            let wall_x = ray.wall_x(hit, dist);

            match hit.texture.and_then(|id| self.bank.wall(id)) {
                Some(tex) => {
                    let tex_x = ray.tex_x(hit, wall_x, tex.w);
                    let mut scale = self.config.fog.scale(dist) * hit.light_level;
                    if hit.axis == HitAxis::Y {
                        scale *= self.config.side_shade;
                    }
                    let tex_h = tex.h as i32;
                    let cut = hit.cut_off as i32 * tex_h / TILE_SIZE as i32;
                    let half_line = line_h as f32 * 0.5;

                    for y in draw_start..draw_end {
                        let d = y as f32 - h_f * 0.5 + half_line;
                        let tex_y = ((d * tex.h as f32) / line_h as f32).abs().floor() as i32;
                        if (cut > 0 && tex_y < cut) || (cut < 0 && tex_y >= tex_h + cut) {
                            continue;
                        }
                        let color = tex.pixel(tex_x, tex_y);
                        if color[3] == 0 {
                            continue;
                        }
                        self.target.write(x, y, offset, color, scale, dist);
                    }
                }
                None => {
                    let depth = if hit.miss { SKY_DEPTH } else { dist };
                    for y in draw_start..draw_end {
                        let color = sky::sample(&self.bank, camera, ray.dir, y);
                        self.target.write(x, y, offset, color, 1.0, depth);
                    }
                }
            }

            span = Some(ColumnSpan {
                draw_start,
                draw_end,
                dist,
                wall_x,
                last: *hit,
            });
        }
        span
    }
}
