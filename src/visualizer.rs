//! Welding point-cloud visualizer model.
//!
//! The page only *pretends* to render a point cloud: every number it shows
//! is drawn from a random source. This module owns those numbers and the
//! panel settings, and returns the toast text for each action so the page
//! just has to display it. Randomness is injected, so a fixed seed gives a
//! reproducible session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, VisualizerError};
use crate::random::RandomSource;

pub const MIN_POINT_SIZE: u32 = 1;
pub const MAX_POINT_SIZE: u32 = 10;
pub const DEFAULT_POINT_SIZE: u32 = 3;

const PANEL_BACKDROP: &str = "linear-gradient(135deg, #1e3c72, #2a5298)";

// ── Statistics ──────────────────────────────────────────────

/// Weld-pool temperature span in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeldingStats {
    pub point_count: u32,
    pub temperature_range: TemperatureRange,
    /// Percentage with one decimal place.
    pub quality_score: f64,
}

/// Panel strings, formatted the way the page shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsText {
    pub point_count: String,
    pub temperature_range: String,
    pub quality_score: String,
}

impl WeldingStats {
    pub fn text(&self) -> StatsText {
        StatsText {
            point_count: group_thousands(self.point_count),
            temperature_range: format!(
                "{}°C - {}°C",
                self.temperature_range.min, self.temperature_range.max
            ),
            quality_score: format!("{:.1}%", self.quality_score),
        }
    }
}

/// Fresh random statistics for the idle panel.
pub fn generate_stats(rng: &mut impl RandomSource) -> WeldingStats {
    let point_count = rng.next_in(1000, 5000);
    let min = rng.next_in(800, 200);
    let max = rng.next_in(1200, 300);
    let quality_score = round_tenth(rng.next_range(70.0, 30.0));
    WeldingStats {
        point_count,
        temperature_range: TemperatureRange { min, max },
        quality_score,
    }
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Demo presets ────────────────────────────────────────────

/// One of the gallery scenes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoPreset {
    pub key: &'static str,
    pub name: &'static str,
    /// Point count is drawn from `[points_low, points_low + points_span)`.
    pub points_low: u32,
    pub points_span: u32,
    pub temperature_range: TemperatureRange,
    /// Quality is drawn from `[quality_low, quality_low + quality_span)`.
    pub quality_low: f64,
    pub quality_span: f64,
}

pub static DEMO_PRESETS: [DemoPreset; 4] = [
    DemoPreset {
        key: "weld1",
        name: "焊缝质量分析",
        points_low: 2000,
        points_span: 3000,
        temperature_range: TemperatureRange {
            min: 850,
            max: 1150,
        },
        quality_low: 80.0,
        quality_span: 15.0,
    },
    DemoPreset {
        key: "weld2",
        name: "温度分布图",
        points_low: 3000,
        points_span: 4000,
        temperature_range: TemperatureRange {
            min: 900,
            max: 1300,
        },
        quality_low: 75.0,
        quality_span: 20.0,
    },
    DemoPreset {
        key: "weld3",
        name: "深度轮廓图",
        points_low: 1500,
        points_span: 2500,
        temperature_range: TemperatureRange {
            min: 800,
            max: 1100,
        },
        quality_low: 70.0,
        quality_span: 25.0,
    },
    DemoPreset {
        key: "weld4",
        name: "缺陷检测图",
        points_low: 2500,
        points_span: 3500,
        temperature_range: TemperatureRange {
            min: 950,
            max: 1250,
        },
        quality_low: 85.0,
        quality_span: 10.0,
    },
];

/// Index of the preset for a gallery key; unknown keys fall back to the first.
pub fn demo_index(key: &str) -> usize {
    DEMO_PRESETS.iter().position(|p| p.key == key).unwrap_or(0)
}

impl DemoPreset {
    pub fn sample(&self, rng: &mut impl RandomSource) -> WeldingStats {
        WeldingStats {
            point_count: rng.next_in(self.points_low, self.points_span),
            temperature_range: self.temperature_range,
            quality_score: round_tenth(rng.next_range(self.quality_low, self.quality_span)),
        }
    }
}

// ── Color modes ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Temperature,
    Depth,
    Quality,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Temperature => "temperature",
            ColorMode::Depth => "depth",
            ColorMode::Quality => "quality",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ColorMode::Temperature => "温度模式",
            ColorMode::Depth => "深度模式",
            ColorMode::Quality => "质量模式",
        }
    }

    /// CSS background for the point-cloud panel.
    pub fn background(&self) -> String {
        let stops = match self {
            ColorMode::Temperature => "#ff6b6b 0%, #feca57 50%, #48cae4 100%",
            ColorMode::Depth => "#4ecdc4 0%, #45b7d1 50%, #96ceb4 100%",
            ColorMode::Quality => "#a8e6cf 0%, #ff8b94 50%, #ffd3a5 100%",
        };
        format!("radial-gradient(circle, {stops}), {PANEL_BACKDROP}")
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = VisualizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(ColorMode::Temperature),
            "depth" => Ok(ColorMode::Depth),
            "quality" => Ok(ColorMode::Quality),
            other => Err(VisualizerError::UnknownColorMode(other.to_string())),
        }
    }
}

// ── Background particles ────────────────────────────────────

/// Placement and animation of one floating background dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub width_px: f64,
    pub height_px: f64,
    pub alpha: f64,
    pub top_pct: f64,
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

pub fn particles(rng: &mut impl RandomSource, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            width_px: rng.next_range(1.0, 4.0),
            height_px: rng.next_range(1.0, 4.0),
            alpha: rng.next_range(0.2, 0.6),
            top_pct: rng.next_range(0.0, 100.0),
            left_pct: rng.next_range(0.0, 100.0),
            duration_s: rng.next_range(4.0, 3.0),
            delay_s: rng.next_range(0.0, 2.0),
        })
        .collect()
}

// ── Export ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub point_size: u32,
    pub color_mode: ColorMode,
}

/// The downloadable snapshot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    /// ISO-8601 timestamp supplied by the page clock.
    pub timestamp: String,
    pub point_count: u32,
    pub temperature_range: TemperatureRange,
    pub quality_score: f64,
    pub settings: ExportSettings,
}

/// A rendered export: file name plus pretty-printed JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub json: String,
}

// ── Visualizer ──────────────────────────────────────────────

/// Page-owned visualizer state. One instance per page load.
#[derive(Debug, Clone)]
pub struct Visualizer<R: RandomSource> {
    rng: R,
    stats: WeldingStats,
    point_size: u32,
    color_mode: ColorMode,
    active: bool,
}

impl<R: RandomSource> Visualizer<R> {
    /// Create the visualizer and draw the initial statistics.
    pub fn new(mut rng: R) -> Self {
        let stats = generate_stats(&mut rng);
        Visualizer {
            rng,
            stats,
            point_size: DEFAULT_POINT_SIZE,
            color_mode: ColorMode::default(),
            active: false,
        }
    }

    pub fn stats(&self) -> &WeldingStats {
        &self.stats
    }

    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Blur radius (px) applied to the cloud: larger points render sharper.
    pub fn blur_px(&self) -> u32 {
        3u32.saturating_sub(self.point_size)
    }

    pub fn start(&mut self) -> String {
        self.active = true;
        debug!("visualization started");
        "可视化体验已启动！".to_string()
    }

    /// Replace the statistics with a fresh random draw.
    pub fn regenerate(&mut self) -> String {
        self.stats = generate_stats(&mut self.rng);
        debug!(points = self.stats.point_count, "stats regenerated");
        "已生成新的随机数据！".to_string()
    }

    /// Load a gallery scene by index; out-of-range indices load the first.
    pub fn load_demo(&mut self, index: usize) -> String {
        let preset = DEMO_PRESETS.get(index).unwrap_or(&DEMO_PRESETS[0]);
        self.stats = preset.sample(&mut self.rng);
        debug!(
            demo = preset.key,
            points = self.stats.point_count,
            "demo loaded"
        );
        format!("已加载: {}", preset.name)
    }

    /// Load a gallery scene by its key (`weld1`..`weld4`).
    pub fn load_demo_key(&mut self, key: &str) -> String {
        self.load_demo(demo_index(key))
    }

    pub fn set_point_size(&mut self, size: u32) -> Result<String, CoreError> {
        if !(MIN_POINT_SIZE..=MAX_POINT_SIZE).contains(&size) {
            warn!(size, "point size rejected");
            return Err(VisualizerError::PointSizeOutOfRange {
                size,
                min: MIN_POINT_SIZE,
                max: MAX_POINT_SIZE,
            }
            .into());
        }
        self.point_size = size;
        Ok(format!("点云大小已调整至: {size}"))
    }

    pub fn set_color_mode(&mut self, mode: &str) -> Result<String, CoreError> {
        let mode = mode
            .parse::<ColorMode>()
            .inspect_err(|e| warn!(%e, "color mode rejected"))?;
        self.color_mode = mode;
        Ok(format!("颜色模式已切换至: {}", mode.display_name()))
    }

    /// Restore the default panel settings and draw new statistics.
    pub fn reset(&mut self) -> String {
        self.point_size = DEFAULT_POINT_SIZE;
        self.color_mode = ColorMode::default();
        self.active = false;
        self.stats = generate_stats(&mut self.rng);
        debug!("visualization reset");
        "可视化已重置！".to_string()
    }

    pub fn export_record(&self, timestamp: &str) -> ExportRecord {
        ExportRecord {
            timestamp: timestamp.to_string(),
            point_count: self.stats.point_count,
            temperature_range: self.stats.temperature_range,
            quality_score: self.stats.quality_score,
            settings: ExportSettings {
                point_size: self.point_size,
                color_mode: self.color_mode,
            },
        }
    }

    /// Render the snapshot download. `timestamp` is the page's ISO clock,
    /// `epoch_ms` names the file.
    pub fn export(&self, timestamp: &str, epoch_ms: u64) -> Result<ExportFile, CoreError> {
        let record = self.export_record(timestamp);
        let json = serde_json::to_string_pretty(&record).map_err(CoreError::Export)?;
        Ok(ExportFile {
            file_name: format!("welding_data_{epoch_ms}.json"),
            json,
        })
    }

    pub fn particles(&mut self, count: usize) -> Vec<Particle> {
        particles(&mut self.rng, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Lcg, Sequence};

    #[test]
    fn stats_within_page_ranges() {
        let mut rng = Lcg::new(2024);
        for _ in 0..500 {
            let s = generate_stats(&mut rng);
            let points = s.point_count;
            assert!((1000..6000).contains(&points), "points {points}");
            assert!((800..1000).contains(&s.temperature_range.min));
            assert!((1200..1500).contains(&s.temperature_range.max));
            assert!(s.quality_score >= 70.0 && s.quality_score <= 100.0);
            assert_eq!(round_tenth(s.quality_score), s.quality_score);
        }
    }

    #[test]
    fn pinned_samples_give_exact_stats() {
        let mut seq = Sequence::new(vec![0.5, 0.25, 0.0, 0.5]);
        let s = generate_stats(&mut seq);
        assert_eq!(s.point_count, 3500);
        let expected = TemperatureRange {
            min: 850,
            max: 1200,
        };
        assert_eq!(s.temperature_range, expected);
        assert_eq!(s.quality_score, 85.0);
    }

    #[test]
    fn same_seed_same_session() {
        let mut a = Visualizer::new(Lcg::new(9));
        let mut b = Visualizer::new(Lcg::new(9));
        assert_eq!(a.stats(), b.stats());
        a.regenerate();
        b.regenerate();
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn stats_text_formatting() {
        let s = WeldingStats {
            point_count: 4321,
            temperature_range: TemperatureRange {
                min: 812,
                max: 1333,
            },
            quality_score: 85.0,
        };
        let t = s.text();
        assert_eq!(t.point_count, "4,321");
        assert_eq!(t.temperature_range, "812°C - 1333°C");
        assert_eq!(t.quality_score, "85.0%");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn demo_keys_map_to_presets() {
        assert_eq!(demo_index("weld1"), 0);
        assert_eq!(demo_index("weld2"), 1);
        assert_eq!(demo_index("weld3"), 2);
        assert_eq!(demo_index("weld4"), 3);
        assert_eq!(demo_index("weld9"), 0);
        assert_eq!(demo_index(""), 0);
    }

    #[test]
    fn loading_a_demo_uses_its_ranges() {
        let mut v = Visualizer::new(Lcg::new(3));
        for (i, preset) in DEMO_PRESETS.iter().enumerate() {
            let msg = v.load_demo(i);
            assert_eq!(msg, format!("已加载: {}", preset.name));
            let s = v.stats();
            assert_eq!(s.temperature_range, preset.temperature_range);
            assert!(s.point_count >= preset.points_low);
            assert!(s.point_count < preset.points_low + preset.points_span);
            assert!(s.quality_score >= preset.quality_low);
            assert!(s.quality_score <= preset.quality_low + preset.quality_span);
        }
        let msg = v.load_demo_key("weld4");
        assert_eq!(msg, "已加载: 缺陷检测图");
    }

    #[test]
    fn out_of_range_demo_loads_first() {
        let mut v = Visualizer::new(Lcg::new(3));
        assert_eq!(v.load_demo(17), "已加载: 焊缝质量分析");
    }

    #[test]
    fn point_size_and_blur() {
        let mut v = Visualizer::new(Lcg::new(1));
        assert_eq!(v.point_size(), 3);
        assert_eq!(v.blur_px(), 0);
        assert_eq!(v.set_point_size(1).unwrap(), "点云大小已调整至: 1");
        assert_eq!(v.blur_px(), 2);
        v.set_point_size(8).unwrap();
        assert_eq!(v.blur_px(), 0);
        let err = v.set_point_size(0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Visualizer(VisualizerError::PointSizeOutOfRange {
                size: 0,
                min: 1,
                max: 10,
            })
        ));
        assert_eq!(v.point_size(), 8);
    }

    #[test]
    fn color_modes() {
        let mut v = Visualizer::new(Lcg::new(1));
        assert_eq!(v.color_mode(), ColorMode::Temperature);
        assert_eq!(v.set_color_mode("depth").unwrap(), "颜色模式已切换至: 深度模式");
        assert_eq!(v.color_mode(), ColorMode::Depth);
        assert_eq!(v.color_mode(), ColorMode::Depth);
        let bg = ColorMode::Quality.background();
        assert!(bg.starts_with("radial-gradient(circle, #a8e6cf 0%"), "{bg}");
        assert!(bg.ends_with("#2a5298)"), "{bg}");
    }

    #[test]
    fn rejected_color_mode_surfaces_as_core_error() {
        let mut v = Visualizer::new(Lcg::new(1));
        let err = v.set_color_mode("neon").unwrap_err();
        assert!(matches!(
            &err,
            CoreError::Visualizer(VisualizerError::UnknownColorMode(m)) if m == "neon"
        ));
        let msg = err.to_string();
        assert_eq!(msg, "Visualizer error: Unknown color mode 'neon'");
        assert_eq!(v.color_mode(), ColorMode::Temperature);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut v = Visualizer::new(Lcg::new(5));
        v.start();
        v.set_point_size(7).unwrap();
        v.set_color_mode("quality").unwrap();
        assert!(v.is_active());
        assert_eq!(v.reset(), "可视化已重置！");
        assert_eq!(v.point_size(), DEFAULT_POINT_SIZE);
        assert_eq!(v.color_mode(), ColorMode::Temperature);
        assert!(!v.is_active());
    }

    #[test]
    fn export_document_shape() {
        let mut v = Visualizer::new(Sequence::new(vec![0.5, 0.25, 0.0, 0.5]));
        v.set_color_mode("depth").unwrap();
        let file = v.export("2026-10-19T08:00:00.000Z", 1_790_000_000_000).unwrap();
        assert_eq!(file.file_name, "welding_data_1790000000000.json");

        let doc: serde_json::Value = serde_json::from_str(&file.json).unwrap();
        assert_eq!(doc["timestamp"], "2026-10-19T08:00:00.000Z");
        assert_eq!(doc["pointCount"], 3500);
        assert_eq!(doc["temperatureRange"]["min"], 850);
        assert_eq!(doc["temperatureRange"]["max"], 1200);
        assert_eq!(doc["qualityScore"], 85.0);
        assert_eq!(doc["settings"]["pointSize"], 3);
        assert_eq!(doc["settings"]["colorMode"], "depth");

        let back: ExportRecord = serde_json::from_str(&file.json).unwrap();
        assert_eq!(back, v.export_record("2026-10-19T08:00:00.000Z"));
    }

    #[test]
    fn particles_stay_in_bounds() {
        let mut v = Visualizer::new(Lcg::new(77));
        let ps = v.particles(50);
        assert_eq!(ps.len(), 50);
        for p in ps {
            assert!((1.0..5.0).contains(&p.width_px));
            assert!((1.0..5.0).contains(&p.height_px));
            assert!((0.2..0.8).contains(&p.alpha));
            assert!((0.0..100.0).contains(&p.top_pct));
            assert!((0.0..100.0).contains(&p.left_pct));
            assert!((4.0..7.0).contains(&p.duration_s));
            assert!((0.0..2.0).contains(&p.delay_s));
        }
    }
}
