//! Usage breakdown pie chart
//!
//! One slice per category value (instrument, data product type), sized by
//! observation count.

use crate::{GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use mastgraph_common::{MastGraphError, Result};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// One pie slice: a category value and its observation count
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSlice {
    pub name: String,
    pub count: u64,
    /// Share of the total, filled in by [`UsageBreakdownGraph::set_counts`]
    pub percentage: Option<f64>,
}

/// Pie chart of observation counts per category value
#[derive(Debug)]
pub struct UsageBreakdownGraph {
    /// Slices sorted by count (descending)
    pub slices: Vec<UsageSlice>,
    /// Whether to draw percentage labels inside the slices
    pub show_percentages: bool,
    /// What the categories are (e.g. "Instrument"), used in labels and logs
    pub category: String,
}

impl UsageBreakdownGraph {
    /// Create a new usage breakdown chart for a category
    pub fn new(category: &str) -> Self {
        Self {
            slices: Vec::new(),
            show_percentages: true,
            category: category.to_string(),
        }
    }

    /// Create a chart together with a configured [`GraphConfig`]
    pub fn with_config(title: &str, category: &str) -> (Self, GraphConfig) {
        let graph = Self::new(category);
        let config = GraphConfig {
            graph_type: GraphType::Pie,
            title: title.to_string(),
            ..Default::default()
        };
        (graph, config)
    }

    /// Create without percentage labels
    pub fn without_percentages(category: &str) -> Self {
        Self {
            slices: Vec::new(),
            show_percentages: false,
            category: category.to_string(),
        }
    }

    /// Set the slice data from a value → count mapping.
    ///
    /// Slices are sorted by count descending (ties broken by name) and
    /// percentages are computed from the total.
    pub fn set_counts(&mut self, counts: &BTreeMap<String, u64>) {
        let mut slices: Vec<UsageSlice> = counts
            .iter()
            .map(|(name, &count)| UsageSlice {
                name: name.clone(),
                count,
                percentage: None,
            })
            .collect();

        slices.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        let total: u64 = slices.iter().map(|s| s.count).sum();
        if total > 0 {
            for slice in &mut slices {
                slice.percentage = Some(slice.count as f64 / total as f64 * 100.0);
            }
        }

        self.slices = slices;
    }

    /// The slice data as a value → count mapping
    pub fn counts(&self) -> BTreeMap<String, u64> {
        self.slices
            .iter()
            .map(|s| (s.name.clone(), s.count))
            .collect()
    }

    /// Slice label with the observation count
    fn format_label(&self, slice: &UsageSlice) -> String {
        format!("{} ({})", slice.name, slice.count)
    }
}

impl Default for UsageBreakdownGraph {
    fn default() -> Self {
        Self::new("Category")
    }
}

#[async_trait]
impl GraphRenderer for UsageBreakdownGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if self.slices.is_empty() {
            return Err(MastGraphError::graph(format!(
                "No data available for the {} usage chart",
                self.category.to_lowercase()
            )));
        }

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        let bg_color = self.background_color(config);
        root.fill(&bg_color)?;

        let title_style = TextStyle::from(
            (
                config.style.title_font.family.as_str(),
                config.style.title_font.size,
            )
                .into_font(),
        )
        .color(&BLACK);
        let chart_area = root.titled(&config.title, title_style)?;

        let (width, height) = chart_area.dim_in_pixel();
        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = f64::from(width.min(height)) * 0.35;

        let sizes: Vec<f64> = self.slices.iter().map(|s| s.count as f64).collect();
        let palette = self.palette(&config.style.color_scheme);
        let colors: Vec<RGBColor> = (0..self.slices.len())
            .map(|i| palette[i % palette.len()])
            .collect();
        let labels: Vec<String> = self.slices.iter().map(|s| self.format_label(s)).collect();

        let label_font = (
            config.style.label_font.family.as_str(),
            config.style.label_font.size,
        );

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(label_font.into_font().color(&BLACK));
        if self.show_percentages {
            pie.percentages(label_font.into_font().color(&BLACK));
        }
        chart_area.draw(&pie)?;

        root.present()?;
        tracing::info!(
            "Rendered {} usage chart to {}",
            self.category,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_of(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_creation() {
        let graph = UsageBreakdownGraph::new("Instrument");
        assert!(graph.slices.is_empty());
        assert!(graph.show_percentages);
        assert_eq!(graph.category, "Instrument");

        let plain = UsageBreakdownGraph::without_percentages("Instrument");
        assert!(!plain.show_percentages);
    }

    #[test]
    fn test_with_config() {
        let (graph, config) = UsageBreakdownGraph::with_config("Instrument Usage", "Instrument");
        assert_eq!(config.title, "Instrument Usage");
        assert_eq!(config.graph_type, GraphType::Pie);
        assert!(graph.slices.is_empty());
    }

    #[test]
    fn test_set_counts_sorts_descending() {
        let mut graph = UsageBreakdownGraph::new("Instrument");
        graph.set_counts(&counts_of(&[("MIRI", 1), ("NIRCam", 2)]));

        assert_eq!(graph.slices.len(), 2);
        assert_eq!(graph.slices[0].name, "NIRCam");
        assert_eq!(graph.slices[0].count, 2);
        assert_eq!(graph.slices[1].name, "MIRI");
        assert_eq!(graph.slices[1].count, 1);
    }

    #[test]
    fn test_set_counts_percentages() {
        let mut graph = UsageBreakdownGraph::new("Instrument");
        graph.set_counts(&counts_of(&[("NIRCam", 3), ("MIRI", 1)]));

        let pct: Vec<f64> = graph
            .slices
            .iter()
            .map(|s| s.percentage.unwrap())
            .collect();
        assert!((pct[0] - 75.0).abs() < 1e-9);
        assert!((pct[1] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_counts_tie_break_by_name() {
        let mut graph = UsageBreakdownGraph::new("Instrument");
        graph.set_counts(&counts_of(&[("WFC3", 2), ("ACS", 2), ("COS", 5)]));

        let names: Vec<&str> = graph.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["COS", "ACS", "WFC3"]);
    }

    #[test]
    fn test_counts_round_trip() {
        let mut graph = UsageBreakdownGraph::new("Instrument");
        let counts = counts_of(&[("NIRCam", 2), ("MIRI", 1)]);
        graph.set_counts(&counts);
        assert_eq!(graph.counts(), counts);
    }

    #[test]
    fn test_format_label() {
        let graph = UsageBreakdownGraph::new("Instrument");
        let slice = UsageSlice {
            name: "NIRSpec".to_string(),
            count: 7,
            percentage: Some(50.0),
        };
        assert_eq!(graph.format_label(&slice), "NIRSpec (7)");
    }

    #[tokio::test]
    async fn test_render_empty_fails() {
        let (graph, config) = UsageBreakdownGraph::with_config("Instrument Usage", "Instrument");
        let result = graph
            .render_to_file(&config, Path::new("/tmp/unused.png"))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, MastGraphError::Graph { .. }));
        assert!(err.to_string().contains("No data available"));
    }
}
