//! Shape Classifier — freehand stroke → labelled shape guess.
//!
//! A fixed decision tree over three features of the finished stroke:
//! the bounding-box aspect ratio, the accumulated turning angle, and
//! whether the stroke returns near its starting point. Each call is
//! stateless; the same stroke always yields the same result.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{BoundingBox, Point, distance};
use crate::stroke::Stroke;

/// Strokes shorter than this are not classified.
pub const MIN_CLASSIFY_POINTS: usize = 3;

/// A stroke whose endpoints are closer than this (px) counts as closed.
pub const CLOSED_DISTANCE_PX: f64 = 30.0;

/// Open strokes with fewer points than this read as a line.
pub const LINE_MAX_POINTS: usize = 10;

// ── Labels ──────────────────────────────────────────────────

/// Shape vocabulary understood by the page.
///
/// `Triangle`, `Heart` and `Star` have icons and names but no rule in
/// [`classify`] produces them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeLabel {
    Circle,
    Rectangle,
    Line,
    Zigzag,
    Spiral,
    Triangle,
    Heart,
    Star,
    Unknown,
}

impl ShapeLabel {
    pub const ALL: [ShapeLabel; 9] = [
        ShapeLabel::Circle,
        ShapeLabel::Rectangle,
        ShapeLabel::Line,
        ShapeLabel::Zigzag,
        ShapeLabel::Spiral,
        ShapeLabel::Triangle,
        ShapeLabel::Heart,
        ShapeLabel::Star,
        ShapeLabel::Unknown,
    ];

    /// Icon shown next to the recognition result.
    pub fn icon(&self) -> &'static str {
        match self {
            ShapeLabel::Circle => "⭕",
            ShapeLabel::Rectangle => "⬜",
            ShapeLabel::Line => "📏",
            ShapeLabel::Zigzag => "⚡",
            ShapeLabel::Spiral => "🌀",
            ShapeLabel::Triangle => "🔺",
            ShapeLabel::Heart => "❤️",
            ShapeLabel::Star => "⭐",
            ShapeLabel::Unknown => "❓",
        }
    }

    /// Chinese word displayed and spoken for the shape.
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeLabel::Circle => "圆形",
            ShapeLabel::Rectangle => "方形",
            ShapeLabel::Line => "直线",
            ShapeLabel::Zigzag => "闪电",
            ShapeLabel::Spiral => "螺旋",
            ShapeLabel::Triangle => "三角形",
            ShapeLabel::Heart => "爱心",
            ShapeLabel::Star => "星星",
            ShapeLabel::Unknown => "未知",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeLabel::Circle => "circle",
            ShapeLabel::Rectangle => "rectangle",
            ShapeLabel::Line => "line",
            ShapeLabel::Zigzag => "zigzag",
            ShapeLabel::Spiral => "spiral",
            ShapeLabel::Triangle => "triangle",
            ShapeLabel::Heart => "heart",
            ShapeLabel::Star => "star",
            ShapeLabel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeResult {
    pub label: ShapeLabel,
    /// Fixed per-rule confidence in [0, 1].
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

// ── Options ─────────────────────────────────────────────────

/// How successive heading changes are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleAccumulation {
    /// Absolute difference of raw `atan2` headings. A turn across the ±π
    /// seam counts as almost a full revolution.
    #[default]
    Raw,
    /// Each difference is first brought into (−π, π].
    Wrapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierOptions {
    pub angle_accumulation: AngleAccumulation,
}

// ── Features ────────────────────────────────────────────────

/// Measurements the decision tree runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeFeatures {
    pub bounding_box: BoundingBox,
    pub aspect_ratio: Option<f64>,
    pub total_angle_change: f64,
    pub is_closed: bool,
    pub point_count: usize,
}

impl StrokeFeatures {
    /// Measure `points`; `None` for an empty slice.
    pub fn measure(points: &[Point], options: &ClassifierOptions) -> Option<Self> {
        let bounding_box = BoundingBox::from_points(points)?;
        let first = points.first()?;
        let last = points.last()?;
        Some(StrokeFeatures {
            bounding_box,
            aspect_ratio: bounding_box.aspect_ratio(),
            total_angle_change: total_angle_change(points, options.angle_accumulation),
            is_closed: distance(first, last) < CLOSED_DISTANCE_PX,
            point_count: points.len(),
        })
    }
}

/// Sum of absolute heading changes over the interior points of `points`.
pub fn total_angle_change(points: &[Point], mode: AngleAccumulation) -> f64 {
    points
        .windows(3)
        .map(|w| {
            let before = w[0].heading_to(&w[1]);
            let after = w[1].heading_to(&w[2]);
            let delta = after - before;
            match mode {
                AngleAccumulation::Raw => delta.abs(),
                AngleAccumulation::Wrapped => wrap_angle(delta).abs(),
            }
        })
        .sum()
}

/// Bring an angle into (−π, π].
fn wrap_angle(a: f64) -> f64 {
    let mut a = a % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

// ── Classification ──────────────────────────────────────────

/// Classify a finished stroke with default options.
///
/// Returns `None` when the stroke has fewer than [`MIN_CLASSIFY_POINTS`].
pub fn classify(stroke: &Stroke) -> Option<ShapeResult> {
    classify_with(stroke, &ClassifierOptions::default())
}

/// Classify a finished stroke.
pub fn classify_with(stroke: &Stroke, options: &ClassifierOptions) -> Option<ShapeResult> {
    let points = stroke.points();
    if points.len() < MIN_CLASSIFY_POINTS {
        return None;
    }

    let features = StrokeFeatures::measure(points, options)?;

    // Zero height leaves the aspect ratio undefined
    if !points.iter().all(Point::is_finite) || features.aspect_ratio.is_none() {
        warn!(points = points.len(), "degenerate stroke, no shape");
        return Some(unknown(features.bounding_box));
    }

    let (label, confidence) = decide(&features);
    debug!(
        %label,
        confidence,
        angle = features.total_angle_change,
        closed = features.is_closed,
        points = features.point_count,
        "stroke classified"
    );
    Some(ShapeResult {
        label,
        confidence,
        bounding_box: features.bounding_box,
    })
}

/// The decision tree. First matching rule wins.
fn decide(f: &StrokeFeatures) -> (ShapeLabel, f64) {
    if f.is_closed && f.total_angle_change < PI {
        return (ShapeLabel::Circle, 0.8);
    }
    if f.is_closed && f.aspect_ratio.is_some_and(|r| r > 0.8 && r < 1.2) {
        return (ShapeLabel::Rectangle, 0.7);
    }
    if f.total_angle_change > 2.0 * PI {
        return (ShapeLabel::Spiral, 0.6);
    }
    if f.point_count < LINE_MAX_POINTS {
        return (ShapeLabel::Line, 0.9);
    }
    (ShapeLabel::Zigzag, 0.6)
}

fn unknown(bounding_box: BoundingBox) -> ShapeResult {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    ShapeResult {
        label: ShapeLabel::Unknown,
        confidence: 0.0,
        bounding_box: BoundingBox {
            min_x: finite(bounding_box.min_x),
            min_y: finite(bounding_box.min_y),
            max_x: finite(bounding_box.max_x),
            max_y: finite(bounding_box.max_y),
        },
    }
}
