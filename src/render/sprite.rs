use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::error::{PenError, PenResult};
use crate::render::cpu::{affine_to_cpu, bezpath_to_cpu, color_to_cpu, pixmap_from_premul_bytes};

/// Side length of the generated sprites, in pixels.
pub const SPRITE_SIZE: u16 = 32;

/// A robot image facing +x, ready to be used as a `vello_cpu` paint.
#[derive(Clone)]
pub struct Sprite {
    pub(crate) paint: vello_cpu::Image,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Sprite {
    /// Decode a PNG (or any format `image` understands) from disk.
    pub fn load(path: &Path) -> PenResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| PenError::asset(format!("read sprite '{}': {e}", path.display())))?;
        Self::decode(&bytes)
    }

    /// Decode encoded image bytes.
    pub fn decode(bytes: &[u8]) -> PenResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode sprite image")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut premul);
        let pixmap = pixmap_from_premul_bytes(&premul, width, height)?;
        Ok(Self::from_pixmap(pixmap, width, height))
    }

    /// Draw the built-in robot: a tinted disc with a nose pointing along +x.
    pub fn procedural(tint: Rgba8) -> Self {
        let size = SPRITE_SIZE;
        let s = f64::from(size);
        let c = Point::new(s / 2.0, s / 2.0);

        let mut ctx = vello_cpu::RenderContext::new(size, size);
        ctx.set_transform(affine_to_cpu(Affine::IDENTITY));

        let body = kurbo::Circle::new(c, s * 0.36).to_path(0.1);
        ctx.set_paint(color_to_cpu(tint));
        ctx.fill_path(&bezpath_to_cpu(&body));

        let mut nose = BezPath::new();
        nose.move_to((c.x, c.y - s * 0.2));
        nose.line_to((s - 1.0, c.y));
        nose.line_to((c.x, c.y + s * 0.2));
        nose.close_path();
        ctx.set_paint(color_to_cpu(Rgba8::opaque(40, 40, 40)));
        ctx.fill_path(&bezpath_to_cpu(&nose));

        let eye = kurbo::Circle::new(Point::new(c.x + s * 0.12, c.y), s * 0.07).to_path(0.1);
        ctx.set_paint(color_to_cpu(Rgba8::WHITE));
        ctx.fill_path(&bezpath_to_cpu(&eye));

        let mut pixmap = vello_cpu::Pixmap::new(size, size);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Self::from_pixmap(pixmap, u32::from(size), u32::from(size))
    }

    fn from_pixmap(pixmap: vello_cpu::Pixmap, width: u32, height: u32) -> Self {
        Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        }
    }

    /// Transform that draws this sprite centred on `position`, rotated by `orientation` radians.
    pub fn placement(&self, position: Point, orientation: f64) -> Affine {
        Affine::translate(position.to_vec2())
            * Affine::rotate(orientation)
            * Affine::translate((-f64::from(self.width) / 2.0, -f64::from(self.height) / 2.0))
    }
}

/// Pen-up and pen-down variants of the robot.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    /// Shown while the pen is up.
    pub pen_up: Sprite,
    /// Shown while the pen is down.
    pub pen_down: Sprite,
}

impl SpriteSet {
    /// Red pen-up and green pen-down procedural robots.
    pub fn procedural() -> Self {
        Self {
            pen_up: Sprite::procedural(Rgba8::RED),
            pen_down: Sprite::procedural(Rgba8::GREEN),
        }
    }

    /// Load either sprite from disk when a path is given; fall back to the procedural one.
    pub fn load(pen_up: Option<&Path>, pen_down: Option<&Path>) -> PenResult<Self> {
        let pen_up = match pen_up {
            Some(p) => Sprite::load(p)?,
            None => Sprite::procedural(Rgba8::RED),
        };
        let pen_down = match pen_down {
            Some(p) => Sprite::load(p)?,
            None => Sprite::procedural(Rgba8::GREEN),
        };
        Ok(Self { pen_up, pen_down })
    }

    /// Sprite for the given pen state.
    pub fn for_pen(&self, pen_down: bool) -> &Sprite {
        if pen_down {
            &self.pen_down
        } else {
            &self.pen_up
        }
    }
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::procedural()
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sprite.rs"]
mod tests;
