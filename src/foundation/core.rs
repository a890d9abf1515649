use std::time::Duration;

use crate::foundation::error::{PenError, PenResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Drawing surface dimensions in pixels.
///
/// Canvas space has its origin at the top-left corner with Y growing downward. Incoming Scratch
/// coordinates ("stage" space) are centred on the canvas with Y growing upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas. Both sides must be non-zero and fit the rasterizer (`u16`).
    pub fn new(width: u32, height: u32) -> PenResult<Self> {
        if width == 0 || height == 0 {
            return Err(PenError::config("canvas width and height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(PenError::config("canvas dimensions exceed u16"));
        }
        Ok(Self { width, height })
    }

    /// Canvas centre, which is the stage origin.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Convert a stage point (origin centred, Y up) into canvas space.
    pub fn stage_to_canvas(self, x: f64, y: f64) -> Point {
        let c = self.center();
        Point::new(x + c.x, c.y - y)
    }

    /// Inverse of [`Canvas::stage_to_canvas`].
    pub fn canvas_to_stage(self, p: Point) -> (f64, f64) {
        let c = self.center();
        (p.x - c.x, c.y - p.y)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Ticks-per-second of a fixed-rate loop, as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (ticks).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated rate.
    pub fn new(num: u32, den: u32) -> PenResult<Self> {
        if den == 0 {
            return Err(PenError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PenError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Duration of one tick.
    pub fn tick_duration(self) -> Duration {
        Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white (canvas background).
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black (robot path).
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque light green (commanded path preview).
    pub const LIGHT_GREEN: Self = Self::opaque(0, 255, 0);
    /// Pen-up sprite tint.
    pub const RED: Self = Self::opaque(220, 40, 40);
    /// Pen-down sprite tint.
    pub const GREEN: Self = Self::opaque(30, 170, 60);

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Wrap an angle in radians into `(-PI, PI]`.
pub fn wrap_angle(rad: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let mut a = rad.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
