//! Runtime configuration, supplied by the page as a JSON object.
//!
//! Every field is optional; missing sections fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::audio::AudioMapperConfig;
use crate::error::CoreError;
use crate::shape::ClassifierOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    pub audio: AudioMapperConfig,
    pub classifier: ClassifierOptions,
    pub visualizer: VisualizerConfig,
}

/// Visualizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizerConfig {
    /// Seed for the demo data generator.
    pub seed: u64,
    /// Floating background dots created on page load.
    pub particle_count: usize,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        VisualizerConfig {
            seed: 0x5eed,
            particle_count: 50,
        }
    }
}

impl CoreConfig {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(CoreError::Config)
    }
}
