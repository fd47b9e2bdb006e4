//! Skybox lookup for rays that leave the world or hit no surface.
//!
//! Only the horizontal direction goes through the cube mapping; the vertical
//! texture coordinate is the row's position inside the pitched draw window.

use glam::{Vec2, Vec3, vec2, vec3};

use crate::world::{Camera, CubeFace, Rgba, TextureBank};

/// Map a direction to its cube face and face-local UV in `[0, 1]`.
///
/// The largest absolute component picks the axis (ties go X, then Y, then
/// Z) and its sign picks the face. `u` is flipped so that turning right moves
/// the sky left.
pub fn cubemap_coords(d: Vec3) -> (CubeFace, Vec2) {
    let a = d.abs();
    let (face, major, uc, vc) = if a.x >= a.y && a.x >= a.z {
        if d.x > 0.0 {
            (CubeFace::PosX, a.x, -d.z, d.y)
        } else {
            (CubeFace::NegX, a.x, d.z, d.y)
        }
    } else if a.y >= a.z {
        if d.y > 0.0 {
            (CubeFace::PosY, a.y, d.x, -d.z)
        } else {
            (CubeFace::NegY, a.y, d.x, d.z)
        }
    } else if d.z > 0.0 {
        (CubeFace::PosZ, a.z, d.x, d.y)
    } else {
        (CubeFace::NegZ, a.z, -d.x, d.y)
    };

    let u = 0.5 * (uc / major + 1.0);
    let v = 0.5 * (vc / major + 1.0);
    (face, vec2(1.0 - u, v))
}

/// Sky colour for the ray `ray_dir` at (unshifted) screen row `y`.
#[inline]
pub fn sample(bank: &TextureBank, camera: &Camera, ray_dir: Vec2, y: i32) -> Rgba {
    let n = vec3(ray_dir.x, 0.0, ray_dir.y).normalize_or_zero();
    let (face, uv) = cubemap_coords(n);

    let limit = camera.look_limit();
    let rows = camera.view_height() as f32 + 2.0 * limit;
    let v = (y as f32 + limit) / rows;

    // u and v reach exactly 1.0 on diagonals and at the window edge
    let tex = bank.sky(face);
    let (w, h) = (tex.w as i32, tex.h as i32);
    tex.pixel(
        ((uv.x * w as f32) as i32).clamp(0, w - 1),
        ((v * h as f32) as i32).clamp(0, h - 1),
    )
}
