//! Chart rendering trait shared by all chart types

use crate::{ColorScheme, GraphConfig, StyleConfig};
use async_trait::async_trait;
use mastgraph_common::Result;
use plotters::prelude::*;
use std::path::Path;

/// Trait for rendering charts with shared styling helpers
#[async_trait]
pub trait GraphRenderer {
    /// Render the chart to an image file
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()>;

    /// Default style configuration for this renderer
    fn default_style(&self) -> StyleConfig {
        StyleConfig::default()
    }

    /// Resolve a color scheme to a concrete palette
    fn palette(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
            ],
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
                RGBColor(192, 192, 192),
                RGBColor(224, 224, 224),
            ],
            ColorScheme::Custom(colors) => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
        }
    }

    /// Parse a hex color string to an RGBColor, falling back to black
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        RGBColor(0, 0, 0)
    }

    /// Background color from the style config
    fn background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullRenderer;

    #[async_trait]
    impl GraphRenderer for NullRenderer {
        async fn render_to_file(&self, _config: &GraphConfig, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_palette() {
        let renderer = NullRenderer;
        let colors = renderer.palette(&ColorScheme::Default);
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0], RGBColor(31, 119, 180));
    }

    #[test]
    fn test_custom_palette() {
        let renderer = NullRenderer;
        let scheme = ColorScheme::Custom(vec![
            "#FF0000".to_string(),
            "#00FF00".to_string(),
            "#0000FF".to_string(),
        ]);
        let colors = renderer.palette(&scheme);
        assert_eq!(
            colors,
            vec![
                RGBColor(255, 0, 0),
                RGBColor(0, 255, 0),
                RGBColor(0, 0, 255)
            ]
        );
    }

    #[test]
    fn test_color_parsing_fallback() {
        let renderer = NullRenderer;
        assert_eq!(renderer.parse_color("#FF0000"), RGBColor(255, 0, 0));
        assert_eq!(renderer.parse_color("invalid"), RGBColor(0, 0, 0));
        assert_eq!(renderer.parse_color("#ZZ0000"), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_background_color() {
        let renderer = NullRenderer;
        let mut config = GraphConfig::default();

        assert_eq!(renderer.background_color(&config), RGBColor(255, 255, 255));

        config.style.background_color = Some("#112233".to_string());
        assert_eq!(renderer.background_color(&config), RGBColor(17, 34, 51));

        config.style.background_color = None;
        assert_eq!(renderer.background_color(&config), RGBColor(255, 255, 255));
    }
}
