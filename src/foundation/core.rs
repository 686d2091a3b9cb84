pub use kurbo::Point;

/// Axis-aligned box in canvas pixel coordinates.
///
/// A box is *valid* while `x2 > x1` and `y2 > y1`. Stages replace boxes rather than
/// editing them, so every value seen downstream is a complete snapshot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle covered by a placed foreground.
    pub fn from_placement(p: &Placement) -> Self {
        Self {
            x1: f64::from(p.x),
            y1: f64::from(p.y),
            x2: f64::from(p.x) + f64::from(p.width),
            y2: f64::from(p.y) + f64::from(p.height),
        }
    }

    /// Smallest axis-aligned box containing every point, `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut out = Self::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            out.x1 = out.x1.min(p.x);
            out.y1 = out.y1.min(p.y);
            out.x2 = out.x2.max(p.x);
            out.y2 = out.y2.max(p.y);
        }
        Some(out)
    }

    pub fn width(self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(self) -> f64 {
        self.y2 - self.y1
    }

    pub fn is_valid(self) -> bool {
        self.x2 > self.x1 && self.y2 > self.y1
    }

    /// Corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y1),
            Point::new(self.x2, self.y2),
            Point::new(self.x1, self.y2),
        ]
    }

    /// Clamp every coordinate into `[0, size]`.
    pub fn clamped(self, size: f64) -> Self {
        Self {
            x1: self.x1.clamp(0.0, size),
            y1: self.y1.clamp(0.0, size),
            x2: self.x2.clamp(0.0, size),
            y2: self.y2.clamp(0.0, size),
        }
    }
}

/// Where a resized foreground lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Drawn fraction of the canvas's shorter side.
    pub scale: f64,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Zero-padded, 1-based output identity of a sample.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SampleId(pub u64);

impl SampleId {
    pub fn file_stem(self) -> String {
        format!("{:06}", self.0)
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
