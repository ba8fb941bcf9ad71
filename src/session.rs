//! Brush session — the per-page handle tying recorder, mapper and
//! classifier together.
//!
//! The page creates one session and forwards pointer events to it:
//! `begin` on press, `extend` on move, `end` on release (or `cancel` when
//! the pointer leaves the surface). Every extension yields fresh audio
//! parameters; every release yields a shape guess.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::{AudioMapper, AudioParams, CanvasSize};
use crate::config::CoreConfig;
use crate::geometry::Point;
use crate::shape::{ClassifierOptions, ShapeResult, classify_with};
use crate::stroke::{Segment, SpeedStats, StrokeRecorder};

/// Result of one pointer move inside a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSample {
    pub segment: Segment,
    pub audio: AudioParams,
}

/// Summary of a finished gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeOutcome {
    pub point_count: usize,
    pub path_length: f64,
    /// `None` when the stroke was too short to classify.
    pub shape: Option<ShapeResult>,
}

#[derive(Debug, Clone)]
pub struct BrushSession {
    recorder: StrokeRecorder,
    mapper: AudioMapper,
    classifier: ClassifierOptions,
    canvas: CanvasSize,
    speeds: SpeedStats,
    stroke_count: usize,
}

impl BrushSession {
    pub fn new(config: &CoreConfig, canvas: CanvasSize) -> Self {
        BrushSession {
            recorder: StrokeRecorder::new(),
            mapper: AudioMapper::new(config.audio),
            classifier: config.classifier,
            canvas,
            speeds: SpeedStats::new(),
            stroke_count: 0,
        }
    }

    /// Update the drawing surface size after a layout change.
    pub fn resize(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Pointer pressed. Returns the parameters for the initial tone.
    pub fn begin(&mut self, point: Point, t_ms: f64) -> AudioParams {
        self.recorder.begin(point, t_ms);
        self.mapper.map(point, self.canvas, 0.0)
    }

    /// Pointer moved. `None` outside a gesture.
    pub fn extend(&mut self, point: Point, t_ms: f64) -> Option<BrushSample> {
        let segment = self.recorder.extend(point, t_ms)?;
        self.speeds.push(segment.speed);
        Some(BrushSample {
            segment,
            audio: self.mapper.map(point, self.canvas, segment.speed),
        })
    }

    /// Pointer released. `None` outside a gesture.
    pub fn end(&mut self) -> Option<StrokeOutcome> {
        let stroke = self.recorder.end()?;
        self.stroke_count += 1;
        let shape = classify_with(&stroke, &self.classifier);
        debug!(
            strokes = self.stroke_count,
            shape = shape.map(|s| s.label.as_str()).unwrap_or("none"),
            "gesture finished"
        );
        Some(StrokeOutcome {
            point_count: stroke.point_count(),
            path_length: stroke.path_length(),
            shape,
        })
    }

    /// Gesture abandoned by the platform; nothing is classified.
    pub fn cancel(&mut self) {
        self.recorder.cancel();
    }

    /// Mean drawing speed over the whole session (px/ms).
    pub fn mean_speed(&self) -> f64 {
        self.speeds.mean()
    }

    pub fn speed_stats(&self) -> &SpeedStats {
        &self.speeds
    }

    /// Completed (not cancelled) strokes so far.
    pub fn stroke_count(&self) -> usize {
        self.stroke_count
    }

    /// Forget the session statistics; an open stroke is dropped too.
    pub fn clear(&mut self) {
        self.recorder.cancel();
        self.speeds.clear();
        self.stroke_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::EnvelopeClass;
    use crate::shape::ShapeLabel;

    fn session() -> BrushSession {
        BrushSession::new(&CoreConfig::default(), CanvasSize::new(800.0, 600.0))
    }

    #[test]
    fn full_gesture_classifies_on_release() {
        let mut s = session();
        s.begin(Point::new(0.0, 300.0), 0.0);
        s.extend(Point::new(100.0, 350.0), 100.0).unwrap();
        s.extend(Point::new(200.0, 400.0), 200.0).unwrap();
        let out = s.end().unwrap();
        assert_eq!(out.point_count, 3);
        assert!((out.path_length - 2.0 * 12_500f64.sqrt()).abs() < 1e-9);
        let shape = out.shape.expect("three points should classify");
        assert_eq!(shape.label, ShapeLabel::Line);
        assert_eq!(s.stroke_count(), 1);
        assert!(!s.is_drawing());
    }

    #[test]
    fn short_gesture_has_no_shape() {
        let mut s = session();
        s.begin(Point::new(10.0, 10.0), 0.0);
        s.extend(Point::new(20.0, 10.0), 16.0);
        let out = s.end().unwrap();
        assert!(out.shape.is_none());
        assert_eq!(s.stroke_count(), 1);
    }

    #[test]
    fn events_outside_a_gesture_are_ignored() {
        let mut s = session();
        assert!(s.extend(Point::new(1.0, 1.0), 1.0).is_none());
        assert!(s.end().is_none());
        assert_eq!(s.stroke_count(), 0);
        assert!(s.speed_stats().is_empty());
    }

    #[test]
    fn extension_feeds_audio_and_speed() {
        let mut s = session();
        let start = s.begin(Point::new(0.0, 0.0), 0.0);
        assert_eq!(start.frequency, 800.0);
        assert_eq!(start.envelope, EnvelopeClass::Calm);

        let slow = s.extend(Point::new(10.0, 0.0), 10.0).unwrap();
        assert_eq!(slow.segment.speed, 1.0);
        assert_eq!(slow.audio.envelope, EnvelopeClass::Calm);

        let fast = s.extend(Point::new(10.0, 300.0), 20.0).unwrap();
        assert_eq!(fast.segment.speed, 30.0);
        assert_eq!(fast.audio.envelope, EnvelopeClass::Energetic);
        assert_eq!(fast.audio.frequency, 500.0);

        assert_eq!(s.mean_speed(), 15.5);
    }

    #[test]
    fn cancel_does_not_count_a_stroke() {
        let mut s = session();
        s.begin(Point::new(0.0, 0.0), 0.0);
        s.extend(Point::new(50.0, 50.0), 10.0);
        s.cancel();
        assert!(!s.is_drawing());
        assert_eq!(s.stroke_count(), 0);
        assert_eq!(s.speed_stats().len(), 1);
    }

    #[test]
    fn resize_changes_pitch_mapping() {
        let mut s = session();
        s.resize(CanvasSize::new(800.0, 1200.0));
        let p = s.begin(Point::new(0.0, 600.0), 0.0);
        assert_eq!(p.frequency, 500.0);
    }

    #[test]
    fn clear_resets_statistics() {
        let mut s = session();
        s.begin(Point::new(0.0, 0.0), 0.0);
        s.extend(Point::new(3.0, 4.0), 5.0);
        s.end();
        s.clear();
        assert_eq!(s.stroke_count(), 0);
        assert_eq!(s.mean_speed(), 0.0);
    }
}
