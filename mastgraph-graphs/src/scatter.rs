//! Scatter chart over two numeric archive columns

use crate::{GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use mastgraph_common::{MastGraphError, Result};
use plotters::prelude::*;
use std::path::Path;

/// Scatter chart comparing two numeric columns of a result set
#[derive(Debug)]
pub struct FieldScatterGraph {
    /// Column plotted on the x axis
    pub x_field: String,
    /// Column plotted on the y axis
    pub y_field: String,
    /// Extracted (x, y) pairs
    pub points: Vec<(f64, f64)>,
}

impl FieldScatterGraph {
    /// Create a new scatter chart for a pair of columns
    pub fn new(x_field: &str, y_field: &str) -> Self {
        Self {
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            points: Vec::new(),
        }
    }

    /// Create a chart together with a configured [`GraphConfig`]
    pub fn with_config(x_field: &str, y_field: &str, title: &str) -> (Self, GraphConfig) {
        let graph = Self::new(x_field, y_field);
        let mut config = GraphConfig {
            graph_type: GraphType::Scatter,
            title: title.to_string(),
            x_label: Some(x_field.to_string()),
            y_label: Some(y_field.to_string()),
            ..Default::default()
        };

        config.width = 900;
        config.height = 600;
        config.style.margins.bottom = 60;
        config.style.margins.left = 80;

        (graph, config)
    }

    /// Set the extracted point data
    pub fn set_points(&mut self, points: Vec<(f64, f64)>) {
        self.points = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
    }

    /// Axis ranges with a little padding on every side
    fn ranges(&self) -> (f64, f64, f64, f64) {
        if self.points.is_empty() {
            return (0.0, 1.0, 0.0, 1.0);
        }

        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for &(x, y) in &self.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let x_padding = ((x_max - x_min) * 0.05).max(0.5);
        let y_padding = ((y_max - y_min) * 0.05).max(0.5);

        (
            x_min - x_padding,
            x_max + x_padding,
            y_min - y_padding,
            y_max + y_padding,
        )
    }
}

#[async_trait]
impl GraphRenderer for FieldScatterGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if self.points.is_empty() {
            return Err(MastGraphError::graph(format!(
                "No points to plot for columns '{}' and '{}'",
                self.x_field, self.y_field
            )));
        }

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        let bg_color = self.background_color(config);
        root.fill(&bg_color)?;

        let (x_min, x_max, y_min, y_max) = self.ranges();

        let title_font = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or(&self.x_field))
            .y_desc(config.y_label.as_deref().unwrap_or(&self.y_field))
            .draw()?;

        let colors = self.palette(&config.style.color_scheme);
        let color = colors[0];

        chart.draw_series(
            self.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
        )?;

        root.present()?;
        tracing::info!(
            "Rendered {} vs {} scatter chart to {}",
            self.x_field,
            self.y_field,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let graph = FieldScatterGraph::new("t_exptime", "t_min");
        assert_eq!(graph.x_field, "t_exptime");
        assert_eq!(graph.y_field, "t_min");
        assert!(graph.points.is_empty());
    }

    #[test]
    fn test_with_config_labels_axes() {
        let (_, config) = FieldScatterGraph::with_config("t_exptime", "t_min", "Comparison");
        assert_eq!(config.graph_type, GraphType::Scatter);
        assert_eq!(config.x_label.as_deref(), Some("t_exptime"));
        assert_eq!(config.y_label.as_deref(), Some("t_min"));
    }

    #[test]
    fn test_set_points_filters_non_finite() {
        let mut graph = FieldScatterGraph::new("a", "b");
        graph.set_points(vec![(1.0, 2.0), (f64::NAN, 1.0), (2.0, f64::INFINITY)]);
        assert_eq!(graph.points, vec![(1.0, 2.0)]);
    }

    #[test]
    fn test_ranges_padded() {
        let mut graph = FieldScatterGraph::new("a", "b");
        graph.set_points(vec![(1.0, 10.0), (3.0, 40.0)]);

        let (x_min, x_max, y_min, y_max) = graph.ranges();
        assert!(x_min < 1.0);
        assert!(x_max > 3.0);
        assert!(y_min < 10.0);
        assert!(y_max > 40.0);
    }

    #[test]
    fn test_ranges_empty_default() {
        let graph = FieldScatterGraph::new("a", "b");
        assert_eq!(graph.ranges(), (0.0, 1.0, 0.0, 1.0));
    }

    #[tokio::test]
    async fn test_render_empty_fails() {
        let (graph, config) = FieldScatterGraph::with_config("a", "b", "Comparison");
        let result = graph
            .render_to_file(&config, Path::new("/tmp/unused.png"))
            .await;

        assert!(matches!(result.unwrap_err(), MastGraphError::Graph { .. }));
    }
}
