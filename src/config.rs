use serde::{Deserialize, Serialize};

use crate::Result;

/// Physical page layout, all values in millimetres. Defaults describe A4 portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_x: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub content_top_margin: f32,
    pub block_gap: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_x: 12.0,
            header_height: 16.0,
            footer_height: 10.0,
            content_top_margin: 6.0,
            block_gap: 4.0,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_x
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height - self.header_height - self.footer_height - self.content_top_margin
    }

    /// Top edge of the content area, measured from the top of the page.
    pub fn content_top(&self) -> f32 {
        self.header_height + self.content_top_margin
    }

    pub fn footer_top(&self) -> f32 {
        self.page_height - self.footer_height
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub cover_background: Color,
    pub cover_text: Color,
    pub band_background: Color,
    pub band_text: Color,
    pub muted_text: Color,
    pub debug_frame: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            cover_background: Color::new(17, 24, 39),
            cover_text: Color::white(),
            band_background: Color::new(243, 244, 246),
            band_text: Color::new(17, 24, 39),
            muted_text: Color::new(107, 114, 128),
            debug_frame: Color::new(240, 64, 64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub theme: Theme,
    pub confidentiality_label: String,
    pub fallback_client_slug: String,
    pub file_extension: String,
    /// Minimum width pinned on each section while it is captured.
    pub capture_min_width_px: Option<u32>,
    pub debug_frame: bool,
    pub debug_page_breaks: bool,
}

impl ReportConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_confidentiality_label(mut self, label: impl Into<String>) -> Self {
        self.confidentiality_label = label.into();
        self
    }

    pub fn with_capture_min_width_px(mut self, min_width: Option<u32>) -> Self {
        self.capture_min_width_px = min_width;
        self
    }

    pub fn with_debug_frame(mut self, debug_frame: bool) -> Self {
        self.debug_frame = debug_frame;
        self
    }

    pub fn with_debug_page_breaks(mut self, debug_page_breaks: bool) -> Self {
        self.debug_page_breaks = debug_page_breaks;
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            theme: Theme::default(),
            confidentiality_label: "Confidential".into(),
            fallback_client_slug: "client".into(),
            file_extension: "pdf".into(),
            capture_min_width_px: Some(1024),
            debug_frame: false,
            debug_page_breaks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{PageGeometry, ReportConfig};

    #[test]
    fn a4_usable_area() {
        let geometry = PageGeometry::a4();

        assert_eq!(geometry.usable_width(), 186.0);
        assert_eq!(geometry.usable_height(), 265.0);
        assert_eq!(geometry.content_top(), 22.0);
        assert_eq!(geometry.footer_top(), 287.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ReportConfig::from_json(
            r#"{ "confidentiality_label": "Internal", "geometry": { "block_gap": 6.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.confidentiality_label, "Internal");
        assert_eq!(config.geometry.block_gap, 6.0);
        assert_eq!(config.geometry.page_width, 210.0);
        assert_eq!(config.file_extension, "pdf");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let error = ReportConfig::from_json("{ geometry: ").unwrap_err();

        assert!(matches!(error, crate::Error::Config(_)));
    }
}
