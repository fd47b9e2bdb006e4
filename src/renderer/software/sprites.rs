use bitflags::bitflags;
use glam::Vec2;

use crate::{
    renderer::software::Software,
    world::{Camera, TextureId},
};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpriteFlags: u8 {
        /// Drawn at full brightness regardless of fog.
        const EMISSIVE = 0x01;
    }
}

/// A camera-facing billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub texture: TextureId,
    /// Vertical shift in screen pixels at distance one: negative floats up,
    /// positive sinks into the floor.
    pub v_offset: i32,
    /// Facing, in degrees, added to the viewing angle before picking a frame.
    pub rotation: f32,
    /// Number of consecutive textures, starting at `texture`, covering 360°.
    pub angle_frames: u8,
    pub flags: SpriteFlags,
}

impl Sprite {
    pub fn new(pos: Vec2, texture: TextureId) -> Self {
        Self {
            pos,
            texture,
            v_offset: 0,
            rotation: 0.0,
            angle_frames: 1,
            flags: SpriteFlags::empty(),
        }
    }

    pub fn with_offset(mut self, v_offset: i32) -> Self {
        self.v_offset = v_offset;
        self
    }

    pub fn with_frames(mut self, angle_frames: u8, rotation: f32) -> Self {
        self.angle_frames = angle_frames;
        self.rotation = rotation;
        self
    }

    pub fn emissive(mut self) -> Self {
        self.flags |= SpriteFlags::EMISSIVE;
        self
    }

    /// Texture to show when seen from `viewer`.
    pub fn frame_texture(&self, viewer: Vec2) -> TextureId {
        if self.angle_frames <= 1 {
            return self.texture;
        }
        let to = self.pos - viewer;
        let angle = (to.y.atan2(to.x).to_degrees() + self.rotation).rem_euclid(360.0);
        let slice = 360.0 / self.angle_frames as f32;
        let frame = ((angle / slice) as u8).min(self.angle_frames - 1);
        self.texture.saturating_add(frame)
    }
}

/// Sort entry: index into the sprite list plus squared distance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QueuedSprite {
    pub index: usize,
    pub distance: f32,
}

/// Comb sort, farthest first. Gap shrinks by 10/13 (9 and 10 jump to 11)
/// and the sort ends after a swap-free pass at gap 1. Not stable.
pub fn comb_sort(queue: &mut [QueuedSprite]) {
    let amount = queue.len();
    let mut gap = amount;
    let mut swapped = false;
    while gap > 1 || swapped {
        gap = (gap * 10) / 13;
        if gap == 9 || gap == 10 {
            gap = 11;
        }
        if gap < 1 {
            gap = 1;
        }
        swapped = false;
        for i in 0..amount.saturating_sub(gap) {
            let j = i + gap;
            if queue[i].distance < queue[j].distance {
                queue.swap(i, j);
                swapped = true;
            }
        }
    }
}

impl Software {
    /// Fill and sort the sprite queue for a viewer at `eye`.
    pub(super) fn sort_sprites(&mut self, eye: Vec2) {
        self.sprite_queue.clear();
        self.sprite_queue
            .extend(self.sprites.iter().enumerate().map(|(index, s)| QueuedSprite {
                index,
                distance: (eye - s.pos).length_squared(),
            }));
        comb_sort(&mut self.sprite_queue);
    }

    pub(super) fn draw_sprites(&mut self, camera: &Camera) {
        self.sort_sprites(camera.pos());
        for i in 0..self.sprite_queue.len() {
            let sprite = self.sprites[self.sprite_queue[i].index];
            self.draw_sprite(&sprite, camera);
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, camera: &Camera) {
        let w = self.width as i32;
        let h_f = self.height as f32;

        let t = camera.to_cam(sprite.pos);
        // behind the camera plane
        if t.y <= 0.0 {
            return;
        }
        let Some(tex) = self.bank.wall(sprite.frame_texture(camera.pos())) else {
            return;
        };

        let screen_x = (self.width as f32 * 0.5) * (1.0 + t.x / t.y);
        let v_move = sprite.v_offset as f32 / t.y;
        // square on screen: width and height both follow depth
        let size = h_f / t.y;
        let left = -size * 0.5 + screen_x;

        let start_x = (left.floor() as i32).max(0);
        let end_x = ((size * 0.5 + screen_x).floor() as i32).min(w);

        let screen_y = h_f * 0.5 + v_move;
        let start_y = ((-size * 0.5 + screen_y).floor() as i32).max(camera.min_y());
        let end_y = ((size * 0.5 + screen_y).floor() as i32).min(camera.max_y());

        let scale = if sprite.flags.contains(SpriteFlags::EMISSIVE) {
            1.0
        } else {
            self.config.fog.scale(t.y)
        };
        let offset = camera.draw_offset();

        for stripe in start_x..end_x {
            if t.y >= self.column_dist[stripe as usize] {
                continue;
            }
            let tex_x = ((stripe as f32 - left) * tex.w as f32 / size).floor() as i32;
            for y in start_y..end_y {
                let d = (y as f32 - v_move) - h_f * 0.5 + size * 0.5;
                let tex_y = (d * tex.h as f32 / size).floor() as i32;
                let color = tex.pixel(tex_x, tex_y);
                if color[3] == 0 {
                    continue;
                }
                self.target.write(stripe, y, offset, color, scale, t.y);
            }
        }
    }
}
