use crate::world::Rgba;

/// Most hits one ray may record (transparent / partial walls stacked along
/// one line of sight). Layers past this are silently not drawn.
pub const MAX_HITS: usize = 4;

/// Linear distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogParams {
    /// Full brightness closer than this.
    pub near: f32,
    /// Distance past `near` over which brightness falls to `floor`.
    pub range: f32,
    /// Lowest scale fog may produce.
    pub floor: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            near: 3.0,
            range: 8.0,
            floor: 0.0,
        }
    }
}

impl FogParams {
    /// Brightness multiplier for a sample `dist` units away, in `[floor, 1]`.
    #[inline]
    pub fn scale(&self, dist: f32) -> f32 {
        if dist < self.near {
            return 1.0;
        }
        let fade = 1.0 - ((dist - self.near) / self.range).abs().min(1.0);
        fade.max(self.floor).max(0.0)
    }
}

/// Knobs of the software renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Hit cap per ray, clamped to `1..=MAX_HITS`.
    pub max_hits: usize,
    /// Cells a ray may cross before it is treated as a miss.
    pub max_ray_steps: u32,
    pub fog: FogParams,
    /// Extra darkening of walls crossed on the Y axis.
    pub side_shade: f32,
    /// Colour of pixels nothing was drawn on.
    pub clear_color: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_hits: MAX_HITS,
            max_ray_steps: 512,
            fog: FogParams::default(),
            side_shade: 0.5,
            clear_color: [0x20, 0x20, 0x20, 0xFF],
        }
    }
}

impl RenderConfig {
    #[inline]
    pub fn hit_cap(&self) -> usize {
        self.max_hits.clamp(1, MAX_HITS)
    }
}
