use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    /// Configuration JSON could not be read.
    Config(serde_json::Error),
    /// Export document could not be written.
    Export(serde_json::Error),
    Visualizer(VisualizerError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualizerError {
    UnknownColorMode(String),
    PointSizeOutOfRange { size: u32, min: u32, max: u32 },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Config(e) => write!(f, "Config error: {e}"),
            CoreError::Export(e) => write!(f, "Export error: {e}"),
            CoreError::Visualizer(e) => write!(f, "Visualizer error: {e}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Config(e) | CoreError::Export(e) => Some(e),
            CoreError::Visualizer(e) => Some(e),
        }
    }
}

impl fmt::Display for VisualizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualizerError::UnknownColorMode(mode) => write!(f, "Unknown color mode '{mode}'"),
            VisualizerError::PointSizeOutOfRange { size, min, max } => {
                write!(f, "Point size {size} outside {min}..={max}")
            }
        }
    }
}

impl std::error::Error for VisualizerError {}

impl From<VisualizerError> for CoreError {
    fn from(e: VisualizerError) -> Self {
        CoreError::Visualizer(e)
    }
}
