use glam::{Vec2, vec2};

use crate::world::tile::World;

/// Pixels of pitch per unit passed to [`Camera::look`].
pub const LOOK_SPEED: f32 = 128.0;

/// Maximum pitch as a fraction of the view height (64 rows at 144).
pub const LOOK_LIMIT: f32 = 64.0 / 144.0;

/// Tile-grid collision for [`Camera::move_forward`] / [`Camera::strafe`].
///
/// The point `radius` units beyond the destination, along the motion, must
/// be an existing non-solid tile or the whole step is cancelled. This is not
/// swept: steps longer than a tile can tunnel through thin walls.
#[derive(Clone, Copy)]
pub struct Collider<'a> {
    pub world: &'a dyn World,
    pub radius: f32,
}

/// Player view-point on the tile grid.
///
/// * `dir` is the facing vector, `plane` the camera plane; `|plane| / |dir|`
///   is `tan(fov / 2)`. Rotations are applied incrementally and never
///   renormalised.
/// * Pitch is faked by shifting every written row by `draw_offset`; the
///   drawable window before the shift is `min_y .. max_y`.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2,
    dir: Vec2,
    plane: Vec2,
    look_offset: f32,
    draw_offset: i32,
    min_y: i32,
    max_y: i32,
    view_height: usize,
}

impl Camera {
    /// Create a camera for an output `view_height` pixels tall.
    pub fn new(pos: Vec2, dir: Vec2, plane: Vec2, view_height: usize) -> Self {
        let mut cam = Self {
            pos,
            dir,
            plane,
            look_offset: 0.0,
            draw_offset: 0,
            min_y: 0,
            max_y: view_height as i32,
            view_height,
        };
        cam.update_window();
        cam
    }

    /// Camera facing `dir` with horizontal field of view `fov` (radians).
    /// The plane points to the right of `dir`.
    pub fn with_fov(pos: Vec2, dir: Vec2, fov: f32, view_height: usize) -> Self {
        let plane = vec2(dir.y, -dir.x) * (fov * 0.5).tan();
        Self::new(pos, dir, plane, view_height)
    }

    /*──────────────────────── accessors ───────────────────────*/

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    #[inline]
    pub fn draw_offset(&self) -> i32 {
        self.draw_offset
    }

    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Exclusive.
    #[inline]
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    #[inline]
    pub fn look_offset(&self) -> f32 {
        self.look_offset
    }

    #[inline]
    pub fn view_height(&self) -> usize {
        self.view_height
    }

    /// Largest absolute pitch in pixels.
    #[inline]
    pub fn look_limit(&self) -> f32 {
        self.view_height as f32 * LOOK_LIMIT
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Ray direction for the signed screen offset `camera_x ∈ [-1, 1]`.
    #[inline]
    pub fn ray_dir(&self, camera_x: f32) -> Vec2 {
        self.dir + self.plane * camera_x
    }

    /// Transform world point `p` by the inverse of the `[plane dir]` matrix:
    ///  .x = lateral offset in plane units (+ right)
    ///  .y = depth along `dir`
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let rel = p - self.pos;
        let inv_det = 1.0 / (self.plane.x * self.dir.y - self.dir.x * self.plane.y);
        vec2(
            inv_det * (self.dir.y * rel.x - self.dir.x * rel.y),
            inv_det * (-self.plane.y * rel.x + self.plane.x * rel.y),
        )
    }

    /*──────────────────────── movement ──────────────────────*/

    /// Walk `speed` units along `dir`. Returns whether the camera moved.
    pub fn move_forward(&mut self, speed: f32, collider: Option<Collider<'_>>) -> bool {
        self.try_step(self.dir * speed, collider)
    }

    /// Side-step `speed` units to the right (negative = left).
    pub fn strafe(&mut self, speed: f32, collider: Option<Collider<'_>>) -> bool {
        self.try_step(vec2(self.dir.y, -self.dir.x) * speed, collider)
    }

    fn try_step(&mut self, delta: Vec2, collider: Option<Collider<'_>>) -> bool {
        let target = self.pos + delta;
        if let Some(c) = collider {
            let probe = target + delta.normalize_or_zero() * c.radius;
            let blocked = c
                .world
                .tile(probe.x.floor() as i32, probe.y.floor() as i32)
                .is_none_or(|t| t.is_solid());
            if blocked {
                return false;
            }
        }
        self.pos = target;
        true
    }

    /// Rotate `dir` and `plane` together by `angle` radians (positive = left).
    pub fn rotate(&mut self, angle: f32) {
        let rot = Vec2::from_angle(angle);
        self.dir = rot.rotate(self.dir);
        self.plane = rot.rotate(self.plane);
    }

    /// Pitch up (positive) or down by `angle`, clamped to [`LOOK_LIMIT`].
    pub fn look(&mut self, angle: f32) {
        self.look_offset += angle * LOOK_SPEED;
        self.update_window();
    }

    fn update_window(&mut self) {
        let limit = self.look_limit();
        self.look_offset = self.look_offset.clamp(-limit, limit);
        self.draw_offset = self.look_offset.floor() as i32;
        self.min_y = -self.draw_offset;
        self.max_y = self.view_height as i32 - self.draw_offset;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
