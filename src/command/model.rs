use crate::foundation::core::{Point, Vec2};

/// A directive to move the robot from `previous` to `target`, both in canvas coordinates.
///
/// Immutable once enqueued; the animator consumes each command exactly once.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Command {
    /// Where the move ends.
    pub target: Point,
    /// Where the move starts (the pen position the sender believed the robot had).
    pub previous: Point,
}

impl Command {
    /// Build a command from canvas-space coordinates.
    pub fn new(x: f64, y: f64, old_x: f64, old_y: f64) -> Self {
        Self {
            target: Point::new(x, y),
            previous: Point::new(old_x, old_y),
        }
    }

    /// Displacement from `previous` to `target`.
    pub fn delta(&self) -> Vec2 {
        self.target - self.previous
    }

    /// Heading of the move in radians, `atan2(dy, dx)` in canvas space.
    ///
    /// Zero-length moves have heading 0.
    pub fn heading(&self) -> f64 {
        let d = self.delta();
        d.y.atan2(d.x)
    }

    /// Euclidean length of the move.
    pub fn length(&self) -> f64 {
        self.delta().hypot()
    }
}
