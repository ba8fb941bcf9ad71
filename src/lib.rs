pub mod audio;
pub mod config;
pub mod error;
pub mod geometry;
pub mod random;
pub mod session;
pub mod shape;
pub mod stroke;
pub mod visualizer;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioMapper, CanvasSize};
use crate::config::CoreConfig;
use crate::geometry::Point;
use crate::random::Lcg;
use crate::session::BrushSession;
use crate::shape::ShapeLabel;
use crate::stroke::Stroke;
use crate::visualizer::Visualizer;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the brushwork-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn config_from_js(value: JsValue) -> Result<CoreConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CoreConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Config error: {e}")))
}

/// WASM-exposed: classify an array of `{x, y}` points.
/// Returns `undefined` for strokes shorter than three points.
#[wasm_bindgen]
pub fn classify_stroke(points: JsValue) -> Result<JsValue, JsValue> {
    let points: Vec<Point> = serde_wasm_bindgen::from_value(points).map_err(js_error)?;
    to_js(&shape::classify(&Stroke::new(points)))
}

/// WASM-exposed: audio parameters for one pointer sample, default tuning.
#[wasm_bindgen]
pub fn map_audio(x: f64, y: f64, width: f64, height: f64, speed: f64) -> Result<JsValue, JsValue> {
    let position = Point::new(x, y);
    let canvas = CanvasSize::new(width, height);
    to_js(&AudioMapper::default().map(position, canvas, speed))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeEntry {
    label: ShapeLabel,
    icon: &'static str,
    display_name: &'static str,
}

/// WASM-exposed: icon and spoken name for every shape label.
#[wasm_bindgen]
pub fn shape_vocabulary() -> Result<JsValue, JsValue> {
    let entries: Vec<ShapeEntry> = ShapeLabel::ALL
        .iter()
        .map(|&label| ShapeEntry {
            label,
            icon: label.icon(),
            display_name: label.display_name(),
        })
        .collect();
    to_js(&entries)
}

/// WASM-exposed handle for the magic-brush canvas. One per page.
#[wasm_bindgen]
pub struct BrushCanvas {
    session: BrushSession,
}

#[wasm_bindgen]
impl BrushCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config: JsValue) -> Result<BrushCanvas, JsValue> {
        let config = config_from_js(config)?;
        Ok(BrushCanvas {
            session: BrushSession::new(&config, CanvasSize::new(width, height)),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.resize(CanvasSize::new(width, height));
    }

    /// Pointer down; returns the initial `AudioParams`.
    pub fn begin(&mut self, x: f64, y: f64, t_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.session.begin(Point::new(x, y), t_ms))
    }

    /// Pointer move; returns `{segment, audio}` or `undefined` when idle.
    pub fn extend(&mut self, x: f64, y: f64, t_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.session.extend(Point::new(x, y), t_ms))
    }

    /// Pointer up; returns the stroke outcome or `undefined` when idle.
    pub fn end(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.session.end())
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    pub fn mean_speed(&self) -> f64 {
        self.session.mean_speed()
    }

    pub fn stroke_count(&self) -> usize {
        self.session.stroke_count()
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }
}

/// WASM-exposed handle for the welding point-cloud page.
#[wasm_bindgen]
pub struct WeldingVisualizer {
    inner: Visualizer<Lcg>,
    particle_count: usize,
}

#[wasm_bindgen]
impl WeldingVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WeldingVisualizer, JsValue> {
        let config = config_from_js(config)?;
        Ok(WeldingVisualizer {
            inner: Visualizer::new(Lcg::new(config.visualizer.seed)),
            particle_count: config.visualizer.particle_count,
        })
    }

    /// Current statistics plus their formatted panel text.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        #[derive(Serialize)]
        struct StatsView<'a> {
            stats: &'a visualizer::WeldingStats,
            text: visualizer::StatsText,
        }
        let stats = self.inner.stats();
        to_js(&StatsView {
            stats,
            text: stats.text(),
        })
    }

    pub fn start(&mut self) -> String {
        self.inner.start()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    pub fn regenerate(&mut self) -> String {
        self.inner.regenerate()
    }

    pub fn load_demo(&mut self, key: &str) -> String {
        self.inner.load_demo_key(key)
    }

    pub fn set_point_size(&mut self, size: u32) -> Result<String, JsValue> {
        self.inner.set_point_size(size).map_err(js_error)
    }

    pub fn blur_px(&self) -> u32 {
        self.inner.blur_px()
    }

    pub fn set_color_mode(&mut self, mode: &str) -> Result<String, JsValue> {
        self.inner.set_color_mode(mode).map_err(js_error)
    }

    /// CSS background for the active color mode.
    pub fn background(&self) -> String {
        self.inner.color_mode().background()
    }

    pub fn reset(&mut self) -> String {
        self.inner.reset()
    }

    /// Returns `{fileName, json}` for the download link.
    pub fn export_json(&self, timestamp: &str, epoch_ms: f64) -> Result<JsValue, JsValue> {
        let file = self
            .inner
            .export(timestamp, epoch_ms.max(0.0) as u64)
            .map_err(js_error)?;
        to_js(&file)
    }

    /// Background particle layout; `count` of 0 uses the configured amount.
    pub fn particles(&mut self, count: usize) -> Result<JsValue, JsValue> {
        let n = if count == 0 { self.particle_count } else { count };
        to_js(&self.inner.particles(n))
    }
}
