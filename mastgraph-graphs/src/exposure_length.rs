//! Exposure length histogram

use crate::{GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use mastgraph_common::{MastGraphError, Result};
use plotters::prelude::*;
use std::path::Path;

/// Histogram of observation exposure lengths
#[derive(Debug)]
pub struct ExposureLengthGraph {
    /// Exposure lengths in seconds
    pub exposures: Vec<f64>,
    /// Number of buckets the value range is divided into
    pub bucket_count: usize,
    /// Whether to use a logarithmic count axis
    pub log_scale: bool,
}

impl ExposureLengthGraph {
    /// Create a new exposure length histogram
    pub fn new() -> Self {
        Self {
            exposures: Vec::new(),
            bucket_count: 30,
            log_scale: false,
        }
    }

    /// Create a chart together with a configured [`GraphConfig`]
    pub fn with_config(title: &str) -> (Self, GraphConfig) {
        let graph = Self::new();
        let mut config = GraphConfig {
            graph_type: GraphType::Histogram,
            title: title.to_string(),
            x_label: Some("Exposure Length (s)".to_string()),
            y_label: Some("# of Observations".to_string()),
            ..Default::default()
        };

        config.width = 1000;
        config.height = 500;
        config.style.margins.bottom = 60;
        config.style.margins.left = 80;

        (graph, config)
    }

    /// Create with a logarithmic count axis
    pub fn with_log_scale() -> Self {
        Self {
            log_scale: true,
            ..Self::new()
        }
    }

    /// Set the exposure data, discarding non-finite and negative values
    pub fn set_data(&mut self, exposures: Vec<f64>) {
        self.exposures = exposures
            .into_iter()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .collect();
    }

    /// Divide the value range into equal-width buckets and count into them
    fn buckets(&self) -> Vec<(f64, f64, u32)> {
        if self.exposures.is_empty() {
            return Vec::new();
        }

        let bucket_count = self.bucket_count.max(1);
        let min = self.exposures.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self
            .exposures
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let span = (max - min).max(1e-9);
        let width = span / bucket_count as f64;

        let mut counts = vec![0u32; bucket_count];
        for &value in &self.exposures {
            let index = (((value - min) / width) as usize).min(bucket_count - 1);
            counts[index] += 1;
        }

        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                (
                    min + i as f64 * width,
                    min + (i + 1) as f64 * width,
                    count,
                )
            })
            .collect()
    }

    /// Max bucket count for y-axis scaling
    fn max_count(&self) -> f64 {
        let max = self
            .buckets()
            .iter()
            .map(|&(_, _, count)| count as f64)
            .fold(0.0, f64::max);
        if max <= 0.0 {
            10.0
        } else {
            max * 1.1
        }
    }
}

impl Default for ExposureLengthGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphRenderer for ExposureLengthGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if self.exposures.is_empty() {
            return Err(MastGraphError::graph(
                "No exposure data available for a histogram",
            ));
        }

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        let bg_color = self.background_color(config);
        root.fill(&bg_color)?;

        let buckets = self.buckets();
        let x_min = buckets.first().map(|b| b.0).unwrap_or(0.0);
        let x_max = buckets.last().map(|b| b.1).unwrap_or(1.0);
        let max_count = self.max_count();

        let title_font = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        );
        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left);

        let colors = self.palette(&config.style.color_scheme);
        let bar_color = colors[0];
        let x_desc = config.x_label.as_deref().unwrap_or("Exposure Length (s)");
        let y_desc = config.y_label.as_deref().unwrap_or("# of Observations");

        if self.log_scale {
            let mut chart =
                builder.build_cartesian_2d(x_min..x_max, (1.0..max_count).log_scale())?;
            chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

            // A bar from the 1.0 baseline collapses for empty buckets, so
            // those are skipped outright.
            for (lower, upper, count) in buckets.iter().filter(|b| b.2 > 0) {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(*lower, 1.0), (*upper, *count as f64)],
                    bar_color.filled(),
                )))?;
            }
        } else {
            let mut chart = builder.build_cartesian_2d(x_min..x_max, 0.0..max_count)?;
            chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

            for (lower, upper, count) in &buckets {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(*lower, 0.0), (*upper, *count as f64)],
                    bar_color.filled(),
                )))?;
            }
        }

        root.present()?;
        tracing::info!("Rendered exposure length histogram to {}", path.display());
        Ok(())
    }
}
