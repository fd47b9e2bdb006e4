use crate::world::Rgba;

/// Fixed-size RGBA8 output image, row-major.
///
/// Fully repopulated by every frame; presentation layers only read it.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA8 bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let ofs = (y * self.width + x) * 4;
        Some([
            self.pixels[ofs],
            self.pixels[ofs + 1],
            self.pixels[ofs + 2],
            self.pixels[ofs + 3],
        ])
    }

    /// Unchecked in release; callers clip first.
    #[inline]
    pub(crate) fn put(&mut self, index: usize, color: Rgba) {
        let ofs = index * 4;
        self.pixels[ofs..ofs + 4].copy_from_slice(&color);
    }

    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Convert into `0x00RRGGBB` words (minifb's format).
    pub fn copy_to_argb(&self, dst: &mut [u32]) {
        debug_assert_eq!(dst.len(), self.width * self.height);
        for (out, px) in dst.iter_mut().zip(self.pixels.chunks_exact(4)) {
            *out = (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_convert() {
        let mut fb = Framebuffer::new(3, 2);
        fb.fill([0x12, 0x34, 0x56, 0xFF]);
        fb.put(4, [0xFF, 0, 0, 0xFF]);
        assert_eq!(fb.pixel(1, 1), Some([0xFF, 0, 0, 0xFF]));
        assert_eq!(fb.pixel(3, 0), None);

        let mut argb = vec![0u32; 6];
        fb.copy_to_argb(&mut argb);
        assert_eq!(argb[0], 0x00_123456);
        assert_eq!(argb[4], 0x00_FF0000);
    }
}
