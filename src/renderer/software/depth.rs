//! Depth-tested pixel sink shared by every drawing stage.

use crate::{renderer::framebuffer::Framebuffer, world::Rgba};

/// Depth written by sky samples: farther than any surface, nearer than the
/// cleared buffer.
pub const SKY_DEPTH: f32 = f32::MAX * 0.5;

/// Framebuffer plus one depth value per pixel.
///
/// Invariant: a pixel is replaced only by a strictly nearer sample, so the
/// stages may draw in any order.
pub struct DepthTarget {
    pub frame: Framebuffer,
    depth: Vec<f32>,
}

impl DepthTarget {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: Framebuffer::new(width, height),
            depth: vec![f32::MAX; width * height],
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.frame.fill(color);
        self.depth.fill(f32::MAX);
    }

    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.frame.width() + x]
    }

    /// Composite one sample.
    ///
    /// * `y` is shifted by `draw_offset` (camera pitch) first.
    /// * Off-screen samples and samples not strictly nearer than the stored
    ///   depth are dropped; ties keep the earlier write.
    /// * RGB is multiplied by `scale`; alpha is forced opaque.
    ///
    /// Returns whether the pixel was written.
    #[inline]
    pub fn write(
        &mut self,
        x: i32,
        y: i32,
        draw_offset: i32,
        color: Rgba,
        scale: f32,
        depth: f32,
    ) -> bool {
        let y = y + draw_offset;
        let (w, h) = (self.frame.width() as i32, self.frame.height() as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            return false;
        }
        let idx = (y * w + x) as usize;
        if self.depth[idx] <= depth {
            return false;
        }
        self.depth[idx] = depth;

        let s = |c: u8| (c as f32 * scale).clamp(0.0, 255.0) as u8;
        self.frame
            .put(idx, [s(color[0]), s(color[1]), s(color[2]), 0xFF]);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [200, 0, 0, 255];

    #[test]
    fn nearest_wins_ties_keep_first() {
        let mut t = DepthTarget::new(2, 2);
        assert!(t.write(0, 0, 0, RED, 1.0, 5.0));
        assert!(!t.write(0, 0, 0, [0, 200, 0, 255], 1.0, 5.0));
        assert!(!t.write(0, 0, 0, [0, 200, 0, 255], 1.0, 6.0));
        assert_eq!(t.frame.pixel(0, 0), Some(RED));
        assert!(t.write(0, 0, 0, [0, 0, 200, 255], 1.0, 4.0));
        assert_eq!(t.frame.pixel(0, 0), Some([0, 0, 200, 255]));
        assert_eq!(t.depth_at(0, 0), 4.0);
    }

    #[test]
    fn offset_scale_and_clip() {
        let mut t = DepthTarget::new(2, 2);
        assert!(t.write(1, 0, 1, RED, 0.5, 1.0));
        assert_eq!(t.frame.pixel(1, 1), Some([100, 0, 0, 255]));
        assert!(!t.write(1, 1, 1, RED, 1.0, 1.0), "shifted below the frame");
        assert!(!t.write(-1, 0, 0, RED, 1.0, 1.0));
        assert!(!t.write(2, 0, 0, RED, 1.0, 1.0));
    }

    #[test]
    fn stored_depth_is_min_of_all_candidates() {
        let mut t = DepthTarget::new(4, 1);
        let mut seen = [f32::MAX; 4];
        let mut z = 0x9E37_79B9u32;
        for _ in 0..200 {
            z ^= z << 13;
            z ^= z >> 17;
            z ^= z << 5;
            let x = (z % 4) as usize;
            let depth = (z >> 8) as f32 / 1000.0;
            t.write(x as i32, 0, 0, RED, 1.0, depth);
            seen[x] = seen[x].min(depth);
        }
        for (x, min) in seen.iter().enumerate() {
            assert_eq!(t.depth_at(x, 0), *min);
        }
    }

    #[test]
    fn clear_resets_depth() {
        let mut t = DepthTarget::new(1, 1);
        t.write(0, 0, 0, RED, 1.0, 1.0);
        t.clear([0, 0, 0, 255]);
        assert_eq!(t.depth_at(0, 0), f32::MAX);
        assert!(t.write(0, 0, 0, RED, 1.0, SKY_DEPTH));
    }
}
