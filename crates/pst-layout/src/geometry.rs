//! Renderer-neutral drawing primitives
//!
//! Diagrams are described in canvas pixels with the origin at the top left,
//! y growing downwards.

use serde::Serialize;

/// Fixed diagram palette
pub mod palette {
    /// Event fill
    pub const EVENT: &str = "#B2643C";
    /// Event outline
    pub const EVENT_STROKE: &str = "#8D4B2B";
    /// Source fill
    pub const SOURCE: &str = "#52796F";
    /// Source outline
    pub const SOURCE_STROKE: &str = "#3A5D54";
    /// Lost source fill on the timeline
    pub const LOST: &str = "#C0C7C4";
    /// Source-to-event edges
    pub const RELATES: &str = "#84A98C";
    /// Declared source-to-source edges
    pub const DECLARED: &str = "#B2643C";
    /// Lost source outline on the timeline
    pub const MUTED: &str = "#8D99AE";
}

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point {
    /// Create new point
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle given by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Rectangle of the given size centred horizontally on `center_x`
    #[inline]
    #[must_use]
    pub fn centered_at(center_x: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            x: center_x - width / 2.0,
            y: top,
            width,
            height,
        }
    }

    /// Horizontal centre
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Bottom edge
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Straight line between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Start
    pub from: Point,
    /// End
    pub to: Point,
}

/// Fill colour with opacity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    /// CSS colour
    pub color: String,
    /// 0.0 - 1.0
    pub opacity: f64,
}

impl Fill {
    /// Create new fill
    #[inline]
    #[must_use]
    pub fn new(color: &str, opacity: f64) -> Self {
        Self {
            color: color.to_string(),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Line style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    /// CSS colour
    pub color: String,
    /// Line width
    pub width: f64,
    /// Dash pattern, empty for a solid line
    pub dash: Vec<f64>,
}

impl Stroke {
    /// Solid line
    #[inline]
    #[must_use]
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Vec::new(),
        }
    }

    /// Dashed line with equal dash and gap
    #[inline]
    #[must_use]
    pub fn dashed(color: &str, width: f64, dash: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: vec![dash, dash],
        }
    }

    /// Whether a dash pattern is set
    #[inline]
    #[must_use]
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_centres_on_x() {
        let rect = Rect::centered_at(100.0, 20.0, 140.0, 60.0);
        assert_eq!(rect.x, 30.0);
        assert_eq!(rect.center_x(), 100.0);
        assert_eq!(rect.bottom(), 80.0);
    }

    #[test]
    fn fill_clamps_opacity() {
        assert_eq!(Fill::new("#fff", 1.4).opacity, 1.0);
    }

    #[test]
    fn dashed_stroke_has_pattern() {
        assert!(Stroke::dashed("#000", 1.0, 4.0).is_dashed());
        assert!(!Stroke::solid("#000", 1.0).is_dashed());
    }
}
