use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8};
use crate::foundation::error::{PenError, PenResult};
use crate::render::backend::FrameRGBA;
use crate::render::sprite::SpriteSet;
use crate::scene::model::{SceneSnapshot, Segment};

/// Options for the CPU renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Background color the frame is cleared to every tick.
    pub clear_rgba: [u8; 4],
    /// Skip drawing the robot sprite (line layers only).
    pub hide_robot: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            clear_rgba: [255, 255, 255, 255],
            hide_robot: false,
        }
    }
}

/// Cached rasterization of both line layers at a given revision.
struct LayerCache {
    revision: u64,
    paint: vello_cpu::Image,
}

/// `vello_cpu` renderer turning [`SceneSnapshot`]s into frames.
///
/// Line layers are re-stroked only when the snapshot's layer revision changes; between changes the
/// cached layer image is composited under the sprite.
pub struct CpuRenderer {
    canvas: Canvas,
    width: u16,
    height: u16,
    opts: RenderOpts,
    sprites: SpriteSet,
    ctx: Option<vello_cpu::RenderContext>,
    layers: Option<LayerCache>,
}

impl CpuRenderer {
    /// Create a renderer for `canvas`.
    pub fn new(canvas: Canvas, opts: RenderOpts, sprites: SpriteSet) -> PenResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PenError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PenError::render("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            opts,
            sprites,
            ctx: None,
            layers: None,
        })
    }

    /// Canvas this renderer draws.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render one frame: background, commanded layer, robot layer, robot sprite.
    pub fn render(&mut self, snapshot: &SceneSnapshot) -> PenResult<FrameRGBA> {
        let layers = self.layer_paint(snapshot);
        let (w, h) = (self.width, self.height);
        let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
        let opts = self.opts;

        let mut ctx = self.take_ctx();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let [r, g, b, a] = opts.clear_rgba;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&full);

        ctx.set_paint(layers);
        ctx.fill_rect(&full);

        if !opts.hide_robot {
            let robot = snapshot.robot;
            let sprite = self.sprites.for_pen(robot.pen_down);
            let tr = sprite.placement(robot.position, robot.orientation);
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(sprite.paint.clone());
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(sprite.width),
                f64::from(sprite.height),
            ));
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn take_ctx(&mut self) -> vello_cpu::RenderContext {
        let mut ctx = self
            .ctx
            .take()
            .unwrap_or_else(|| vello_cpu::RenderContext::new(self.width, self.height));
        ctx.reset();
        ctx
    }

    /// Image of both line layers, re-stroked only when the revision changed.
    fn layer_paint(&mut self, snapshot: &SceneSnapshot) -> vello_cpu::Image {
        if let Some(cache) = &self.layers
            && cache.revision == snapshot.layers_revision
        {
            return cache.paint.clone();
        }

        let mut ctx = self.take_ctx();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        stroke_segments(&mut ctx, &snapshot.commanded);
        stroke_segments(&mut ctx, &snapshot.robot_path);
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.layers = Some(LayerCache {
            revision: snapshot.layers_revision,
            paint: paint.clone(),
        });
        paint
    }
}

fn stroke_segments(ctx: &mut vello_cpu::RenderContext, segments: &[Segment]) {
    for seg in segments {
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(vello_cpu::kurbo::Point::new(seg.from.x, seg.from.y));
        path.line_to(vello_cpu::kurbo::Point::new(seg.to.x, seg.to.y));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(seg.width));
        ctx.set_paint(color_to_cpu(seg.color));
        ctx.stroke_path(&path);
    }
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PenResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PenError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PenError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PenError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
