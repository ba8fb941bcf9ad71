//! Canvas-space geometry shared by the recorder and the classifier.

use serde::{Deserialize, Serialize};

/// A point in canvas pixel coordinates (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Heading of the vector `self → other`, in radians from `atan2`.
    pub fn heading_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: &Point, b: &Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounds of `points`, or `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points[1..].iter().fold(init, |b, p| BoundingBox {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `width / height`; `None` when the box has no height.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let h = self.height();
        if h > 0.0 {
            Some(self.width() / h)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_of_identical_points_is_zero() {
        let p = Point::new(12.5, -3.0);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(-7.0, 19.5);
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert!((distance(&Point::new(0.0, 0.0), &a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [
            Point::new(10.0, 20.0),
            Point::new(-5.0, 40.0),
            Point::new(30.0, 0.0),
        ];
        let b = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(b.min_x, -5.0);
        assert_eq!(b.max_x, 30.0);
        assert_eq!(b.min_y, 0.0);
        assert_eq!(b.max_y, 40.0);
        assert_eq!(b.width(), 35.0);
        assert_eq!(b.height(), 40.0);
    }

    #[test]
    fn empty_slice_has_no_bounds() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn flat_box_has_no_aspect_ratio() {
        let flat = [Point::new(0.0, 5.0), Point::new(80.0, 5.0)];
        let b = BoundingBox::from_points(&flat).unwrap();
        assert_eq!(b.aspect_ratio(), None);
        assert_eq!(b.width(), 80.0);
    }

    #[test]
    fn bounding_box_serializes_camel_case() {
        let b = BoundingBox {
            min_x: 1.0,
            min_y: 2.0,
            max_x: 3.0,
            max_y: 4.0,
        };
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"minX\":1.0"), "unexpected json: {json}");
        assert!(json.contains("\"maxY\":4.0"), "unexpected json: {json}");
    }
}
