use crate::{
    renderer::{
        RenderError, Renderer,
        config::RenderConfig,
        framebuffer::Framebuffer,
        software::{
            depth::DepthTarget,
            sprites::{QueuedSprite, Sprite},
            walls::{HitList, Ray},
        },
    },
    world::{Camera, CubeFace, TEXTURE_SLOTS, TextureBank, TextureId, World},
};

/// Sprite queue slots reserved up front.
const SPRITE_RESERVE: usize = 128;

/// CPU column raycaster.
///
/// All scratch (depth, column distances, sprite queue) is sized once in
/// [`Software::new`]; frames reuse it.
pub struct Software {
    pub(super) target: DepthTarget,
    /// Distance of the last wall hit per column; sprites behind it are culled.
    pub(super) column_dist: Vec<f32>,
    pub(super) sprites: Vec<Sprite>,
    pub(super) sprite_queue: Vec<QueuedSprite>,

    pub(super) bank: TextureBank,
    pub(super) config: RenderConfig,
    initialized: bool,

    pub(super) width: usize,
    pub(super) height: usize,
}

impl Software {
    pub fn new(width: usize, height: usize, config: RenderConfig) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::BadResolution {
                w: width,
                h: height,
            });
        }
        let mut target = DepthTarget::new(width, height);
        target.clear(config.clear_color);
        Ok(Self {
            target,
            column_dist: vec![f32::INFINITY; width],
            sprites: Vec::with_capacity(SPRITE_RESERVE),
            sprite_queue: Vec::with_capacity(SPRITE_RESERVE),
            bank: TextureBank::default(),
            config,
            initialized: false,
            width,
            height,
        })
    }

    /// Pull every wall texture (ids `1..=255`) and the six skybox faces from
    /// `world`. Must run exactly once, before the first frame.
    pub fn initialize<W: World + ?Sized>(&mut self, world: &W) -> Result<(), RenderError> {
        if self.initialized {
            return Err(RenderError::AlreadyInitialized);
        }

        let mut bank = TextureBank::default();
        let mut loaded = 0usize;
        for id in 1..TEXTURE_SLOTS {
            let id = id as TextureId;
            if let Some(tex) = world.wall_texture(id)? {
                bank.set_wall(id, Some(tex));
                loaded += 1;
            }
        }
        for face in CubeFace::ALL {
            bank.set_sky(face, world.skybox_face(face)?);
        }

        log::debug!(
            "software renderer ready: {}x{}, {loaded} wall textures",
            self.width,
            self.height
        );
        self.bank = bank;
        self.initialized = true;
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Clear and draw one full frame into [`Software::frame`].
    ///
    /// `camera` should be built for this renderer's height.
    pub fn render<W: World + ?Sized>(
        &mut self,
        camera: &Camera,
        world: &W,
    ) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        self.begin_frame();
        self.draw_world(camera, world);
        Ok(())
    }

    /*──────────────────────── sprites ───────────────────────*/

    /// Register a sprite; returns its index. Sprites are never removed.
    pub fn add_sprite(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Mutable view for moving or re-skinning sprites between frames.
    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    /*──────────────────────── accessors ───────────────────────*/

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.target.frame
    }

    /// Per-column distance of the last hit in the last frame
    /// (`f32::INFINITY` where the ray left the world).
    pub fn column_distances(&self) -> &[f32] {
        &self.column_dist
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.target.depth_at(x, y)
    }

    pub fn bank(&self) -> &TextureBank {
        &self.bank
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self) {
        self.target.clear(self.config.clear_color);
        self.column_dist.fill(f32::INFINITY);
    }

    fn draw_world<W: World + ?Sized>(&mut self, camera: &Camera, world: &W) {
        if !self.initialized {
            log::warn!("draw_world called before initialize(); frame left blank");
            return;
        }

        let w_f = self.width as f32;
        let mut hits = HitList::new();

        for x in 0..self.width {
            let camera_x = 2.0 * x as f32 / w_f - 1.0;
            let ray = Ray::new(camera.pos(), camera.ray_dir(camera_x));
            ray.march(world, &self.bank, &self.config, &mut hits);

            let Some(span) = self.draw_wall_hits(x as i32, &ray, &hits, camera) else {
                continue;
            };
            self.column_dist[x] = if span.last.miss {
                f32::INFINITY
            } else {
                span.dist
            };
            self.draw_planes(x as i32, &ray, &span, camera, world);
        }

        self.draw_sprites(camera);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&Framebuffer),
    {
        submit(&self.target.frame);
    }
}
