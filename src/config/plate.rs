use crate::error::EdgeFinderError;
use serde::{Deserialize, Serialize};

/// Physical-to-pixel calibration for one plate style.
///
/// Defaults describe a US plate (12" × 6" with 70 mm characters) and a
/// 120 × 60 px canonical template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// Plate width in millimetres.
    pub plate_width_mm: f32,
    /// Plate height in millimetres.
    pub plate_height_mm: f32,
    /// Character height in millimetres.
    pub char_height_mm: f32,
    /// Maximum width of the canonical crop in pixels.
    pub template_width_px: u32,
    /// Maximum height of the canonical crop in pixels.
    pub template_height_px: u32,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            plate_width_mm: 304.8,
            plate_height_mm: 152.4,
            char_height_mm: 70.0,
            template_width_px: 120,
            template_height_px: 60,
        }
    }
}

impl PlateConfig {
    /// Plate width expressed in character heights.
    pub fn char_height_to_plate_width_ratio(&self) -> f32 {
        self.plate_width_mm / self.char_height_mm
    }

    /// Plate height expressed in character heights.
    pub fn char_height_to_plate_height_ratio(&self) -> f32 {
        self.plate_height_mm / self.char_height_mm
    }

    pub fn validate(&self) -> Result<(), EdgeFinderError> {
        let lengths = [
            ("plate_width_mm", self.plate_width_mm),
            ("plate_height_mm", self.plate_height_mm),
            ("char_height_mm", self.char_height_mm),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(EdgeFinderError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.template_width_px == 0 || self.template_height_px == 0 {
            return Err(EdgeFinderError::InvalidConfig(format!(
                "template size must be non-zero, got {}x{}",
                self.template_width_px, self.template_height_px
            )));
        }
        Ok(())
    }
}
