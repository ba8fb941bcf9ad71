//! Stroke Recorder — accumulates the points of one pointer gesture.
//!
//! The recorder is the only stateful piece of the brush core. It moves
//! between two states: `Idle` and `Recording`. Points are only accepted
//! while recording; everything else is a no-op rather than an error, since
//! gesture ordering is guaranteed by the input device.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::{Point, distance};

/// Smallest elapsed time used when dividing distance into speed.
pub const MIN_ELAPSED_MS: f64 = 1.0;

/// An ordered run of points from gesture start to gesture end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Stroke { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Sum of segment lengths along the stroke.
    pub fn path_length(&self) -> f64 {
        self.points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
    }
}

/// Movement between the previous point and the one just appended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Euclidean distance in pixels.
    pub distance: f64,
    /// Milliseconds between the two timestamps (never negative).
    pub elapsed_ms: f64,
    /// Pixels per millisecond.
    pub speed: f64,
}

impl Segment {
    fn between(prev: &Point, prev_t: f64, next: &Point, next_t: f64) -> Self {
        let distance = distance(prev, next);
        let elapsed_ms = (next_t - prev_t).max(0.0);
        let speed = distance / elapsed_ms.max(MIN_ELAPSED_MS);
        Segment {
            distance,
            elapsed_ms,
            speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    Recording {
        stroke: Vec<Point>,
        last_t_ms: f64,
    },
}

/// Records one gesture at a time.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    state: State,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        StrokeRecorder { state: State::Idle }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, State::Recording { .. })
    }

    /// Number of points in the open stroke (0 when idle).
    pub fn point_count(&self) -> usize {
        match &self.state {
            State::Idle => 0,
            State::Recording { stroke, .. } => stroke.len(),
        }
    }

    /// Start a new stroke at `point`, dropping any stroke still open.
    pub fn begin(&mut self, point: Point, t_ms: f64) {
        if let State::Recording { stroke, .. } = &self.state {
            debug!(points = stroke.len(), "discarding unfinished stroke");
        }
        debug!(x = point.x, y = point.y, "stroke begin");
        self.state = State::Recording {
            stroke: vec![point],
            last_t_ms: t_ms,
        };
    }

    /// Append a point to the open stroke.
    ///
    /// Returns the segment travelled since the previous point, or `None`
    /// when no stroke is open.
    pub fn extend(&mut self, point: Point, t_ms: f64) -> Option<Segment> {
        let State::Recording { stroke, last_t_ms } = &mut self.state else {
            return None;
        };
        // `begin` always seeds the stroke with one point
        let prev = *stroke.last()?;
        let segment = Segment::between(&prev, *last_t_ms, &point, t_ms);
        stroke.push(point);
        *last_t_ms = t_ms;
        trace!(
            distance = segment.distance,
            speed = segment.speed,
            "stroke extend"
        );
        Some(segment)
    }

    /// Close the open stroke and hand it to the caller.
    pub fn end(&mut self) -> Option<Stroke> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Recording { stroke, .. } => {
                debug!(points = stroke.len(), "stroke end");
                Some(Stroke::new(stroke))
            }
        }
    }

    /// Abandon the open stroke (pointer left the surface, gesture cancelled).
    pub fn cancel(&mut self) {
        if self.end().is_some() {
            debug!("stroke cancelled");
        }
    }
}

/// Running speed statistics for a drawing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedStats {
    samples: Vec<f64>,
}

impl SpeedStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one speed sample. Negative or non-finite values are dropped.
    pub fn push(&mut self, speed: f64) {
        if speed.is_finite() && speed >= 0.0 {
            self.samples.push(speed);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of all samples, 0.0 before the first one.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f64>() / self.samples.len() as f64
        }
    }

    pub fn max(&self) -> f64 {
        self.samples.iter().copied().fold(0.0, f64::max)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
