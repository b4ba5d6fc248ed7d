use crate::constants::DEFAULT_PAGES_PER_SECTION;
use crate::pages::Sections;
use crate::text::Direction;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// PDF export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    // Paper
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: MarginPreset,

    // Images
    pub jpeg_quality: u8,

    // Text
    pub page_numbers: bool,
    pub title_font_size: f32,
    pub text_font_size: f32,
    /// Alignment of slot texts and text annotations
    pub direction: Direction,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: MarginPreset::Default,
            jpeg_quality: 90,
            page_numbers: true,
            title_font_size: 16.0,
            text_font_size: 11.0,
            direction: Direction::default(),
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page size in millimeters, orientation applied
    pub fn page_size_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_with_orientation(self.orientation)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(LayoutError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        let (w, h) = self.page_size_mm();
        if !(w > 0.0 && h > 0.0) {
            return Err(LayoutError::Config(format!(
                "Paper dimensions must be positive, got {}x{}mm",
                w, h
            )));
        }

        let margin = self.margins.margin_mm();
        if margin * 2.0 >= w || margin * 2.0 >= h {
            return Err(LayoutError::Config(format!(
                "{:?} margins leave no printable area on a {}x{}mm page",
                self.margins, w, h
            )));
        }

        if self.title_font_size <= 0.0 || self.text_font_size <= 0.0 {
            return Err(LayoutError::Config(
                "Font sizes must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings of the paginated page view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub pages_per_section: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            pages_per_section: DEFAULT_PAGES_PER_SECTION,
        }
    }
}

impl From<ViewSettings> for Sections {
    fn from(settings: ViewSettings) -> Self {
        Sections::new(settings.pages_per_section)
    }
}
