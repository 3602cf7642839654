//! Configuration of the `plate_edges` tool.
//!
//! ```json
//! {
//!   "input": "car.png",
//!   "region": { "x": 410, "y": 300, "width": 180, "height": 90 },
//!   "text_lines": [
//!     { "text_area": [[20,30],[160,30],[160,58],[20,58]],
//!       "line_polygon": [[18,28],[162,28],[162,60],[18,60]] }
//!   ],
//!   "plate": { "plate_width_mm": 304.8 },
//!   "output": { "report_json": "out/report.json", "canonical_image": "out/crop.png" }
//! }
//! ```
use super::PlateConfig;
use crate::geometry::{Crop, Point, Rect};
use crate::refine::EdgeScanParams;
use crate::text_lines::TextLine;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct EdgeToolConfig {
    pub input: PathBuf,
    /// Placement of the plate candidate crop in the input image.
    pub region: Rect,
    /// Text lines in crop-local pixel coordinates.
    pub text_lines: Vec<TextLineConfig>,
    #[serde(default)]
    pub plate: PlateConfig,
    #[serde(default)]
    pub refiner: EdgeScanParams,
    pub output: EdgeOutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TextLineConfig {
    pub text_area: [[f32; 2]; 4],
    pub line_polygon: [[f32; 2]; 4],
}

impl TextLineConfig {
    pub fn to_text_line(&self) -> TextLine<Crop> {
        TextLine::new(
            self.text_area.map(Point::from_array),
            self.line_polygon.map(Point::from_array),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct EdgeOutputConfig {
    pub report_json: PathBuf,
    #[serde(default)]
    pub canonical_image: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<EdgeToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
