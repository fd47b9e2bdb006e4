//! Rendering abstraction layer.
//!
//! *The rest of the program never touches a pixel buffer directly.*
//! It owns a [`Camera`] and a [`World`] and hands both to a type that
//! implements [`Renderer`] once per frame.
//!
//! * A backend draws into its own [`Framebuffer`] and loans it out in
//!   `end_frame`, so presentation (window, PNG, test assertions) stays
//!   outside the renderer.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::world::{Camera, TextureError, World};

pub mod config;
pub mod framebuffer;
pub mod software;

pub use config::{FogParams, MAX_HITS, RenderConfig};
pub use framebuffer::Framebuffer;
pub use software::{Software, Sprite, SpriteFlags};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer is already initialised")]
    AlreadyInitialized,

    #[error("renderer used before initialize()")]
    NotInitialized,

    #[error("resolution {w}×{h} has no pixels")]
    BadResolution { w: usize, h: usize },

    #[error("failed to load texture")]
    Texture(#[from] TextureError),
}

/// A renderer that owns an internal framebuffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// Clear colour and depth for a new frame.
    fn begin_frame(&mut self);

    /// Draw `world` as seen from `camera` into the internal buffer.
    fn draw_world<W: World + ?Sized>(&mut self, camera: &Camera, world: &W);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&Framebuffer)` is run exactly once per frame.
    /// * A window caller converts with [`Framebuffer::copy_to_argb`].
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&Framebuffer);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<W, F>(&mut self, camera: &Camera, world: &W, submit: F)
    where
        W: World + ?Sized,
        F: FnOnce(&Framebuffer),
    {
        self.begin_frame();
        self.draw_world(camera, world);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
