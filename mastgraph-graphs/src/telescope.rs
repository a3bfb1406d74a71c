//! Telescope observation accessor and its derived views

use crate::{ExposureLengthGraph, FieldScatterGraph, GraphConfig, UsageBreakdownGraph};
use mastgraph_common::mast::{ArchiveClient, Observation};
use mastgraph_common::{result_with_context, MastGraphError, Result, Telescope, TimeRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

/// Observations fetched for one telescope and time window.
///
/// The record set is owned exclusively by this value and is immutable after
/// the fetch; querying a different telescope or window means constructing a
/// new one. Derived views (usage counts, charts) are recomputed on demand
/// from the stored set.
#[derive(Debug, Clone)]
pub struct TelescopeData {
    telescope: Telescope,
    range: TimeRange,
    observations: Vec<Observation>,
}

/// Typed columns persisted by CSV export
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    obs_id: Option<String>,
    obs_collection: Option<String>,
    instrument_name: Option<String>,
    dataproduct_type: Option<String>,
    target_name: Option<String>,
    t_min: Option<f64>,
    t_max: Option<f64>,
    t_exptime: Option<f64>,
}

impl From<&Observation> for CsvRow {
    fn from(obs: &Observation) -> Self {
        Self {
            obs_id: obs.obs_id.clone(),
            obs_collection: obs.obs_collection.clone(),
            instrument_name: obs.instrument_name.clone(),
            dataproduct_type: obs.dataproduct_type.clone(),
            target_name: obs.target_name.clone(),
            t_min: obs.t_min,
            t_max: obs.t_max,
            t_exptime: obs.t_exptime,
        }
    }
}

impl From<CsvRow> for Observation {
    fn from(row: CsvRow) -> Self {
        Self {
            obs_id: row.obs_id,
            obs_collection: row.obs_collection,
            instrument_name: row.instrument_name,
            dataproduct_type: row.dataproduct_type,
            target_name: row.target_name,
            t_min: row.t_min,
            t_max: row.t_max,
            t_exptime: row.t_exptime,
            extra: serde_json::Map::new(),
        }
    }
}

impl TelescopeData {
    /// Query the archive and retain the result.
    ///
    /// Returns once the query has fully resolved; there is no cancellation or
    /// progress reporting, so wide windows against the larger missions can
    /// take a while. The whole result set is held in memory (narrow the
    /// window or configure a record cap on the client to bound it).
    #[instrument(skip(client), fields(telescope = %telescope))]
    pub async fn fetch(
        client: &dyn ArchiveClient,
        telescope: Telescope,
        range: TimeRange,
        limit: Option<usize>,
    ) -> Result<Self> {
        info!("Loading {} observations {}", telescope, range.label());
        let observations = client.query_observations(telescope, &range, limit).await?;
        info!("Retained {} observations", observations.len());

        Ok(Self {
            telescope,
            range,
            observations,
        })
    }

    /// Wrap an already-materialized record set
    pub fn from_observations(
        telescope: Telescope,
        range: TimeRange,
        observations: Vec<Observation>,
    ) -> Self {
        Self {
            telescope,
            range,
            observations,
        }
    }

    /// Read a record set previously written by [`TelescopeData::export_csv`]
    pub fn from_csv_file(telescope: Telescope, range: TimeRange, path: &Path) -> Result<Self> {
        let mut reader = result_with_context!(
            csv::Reader::from_path(path),
            "Failed to open {} for CSV import",
            path.display()
        )?;

        let mut observations = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = result_with_context!(row, "Malformed CSV row in {}", path.display())?;
            observations.push(row.into());
        }

        info!(
            "Read {} observations from {}",
            observations.len(),
            path.display()
        );
        Ok(Self::from_observations(telescope, range, observations))
    }

    pub fn telescope(&self) -> Telescope {
        self.telescope
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Count observations per distinct value of a column
    fn value_counts<F>(&self, column: F) -> BTreeMap<String, u64>
    where
        F: Fn(&Observation) -> Option<&str>,
    {
        let mut counts = BTreeMap::new();
        for obs in &self.observations {
            if let Some(value) = column(obs) {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Observation count per instrument.
    ///
    /// An empty record set yields an empty map. Rows with no instrument value
    /// are not counted. Calling this repeatedly without a new fetch yields
    /// identical results.
    pub fn instrument_usage(&self) -> BTreeMap<String, u64> {
        self.value_counts(|obs| obs.instrument_name.as_deref())
    }

    /// Observation count per data product type
    pub fn data_product_usage(&self) -> BTreeMap<String, u64> {
        self.value_counts(|obs| obs.dataproduct_type.as_deref())
    }

    fn title_for(&self, prefix: &str) -> String {
        format!(
            "{} {} Observations ({})",
            prefix,
            self.telescope,
            self.range.label()
        )
    }

    /// Build the instrument usage pie chart from the stored set
    pub fn instrument_usage_graph(&self) -> Result<(UsageBreakdownGraph, GraphConfig)> {
        let counts = self.instrument_usage();
        if counts.is_empty() {
            return Err(MastGraphError::graph(format!(
                "No observations to chart for {}",
                self.telescope
            )));
        }

        let (mut graph, config) = UsageBreakdownGraph::with_config(
            &self.title_for("Instrument Usage in"),
            "Instrument",
        );
        graph.set_counts(&counts);
        Ok((graph, config))
    }

    /// Build the data product type pie chart from the stored set
    pub fn data_product_graph(&self) -> Result<(UsageBreakdownGraph, GraphConfig)> {
        let counts = self.data_product_usage();
        if counts.is_empty() {
            return Err(MastGraphError::graph(format!(
                "No observations to chart for {}",
                self.telescope
            )));
        }

        let (mut graph, config) = UsageBreakdownGraph::with_config(
            &self.title_for("Data Product Types of"),
            "Data Product Type",
        );
        graph.set_counts(&counts);
        Ok((graph, config))
    }

    /// Build the exposure length histogram from the stored set
    pub fn exposure_length_graph(&self, log_scale: bool) -> (ExposureLengthGraph, GraphConfig) {
        let (mut graph, config) =
            ExposureLengthGraph::with_config(&self.title_for("Exposure Length of"));
        graph.log_scale = log_scale;
        graph.set_data(
            self.observations
                .iter()
                .filter_map(|obs| obs.t_exptime)
                .collect(),
        );
        (graph, config)
    }

    /// Build a scatter chart of two numeric archive columns.
    ///
    /// Rows missing either value are skipped; if nothing remains the column
    /// names were likely wrong or non-numeric.
    pub fn field_scatter_graph(
        &self,
        x_field: &str,
        y_field: &str,
    ) -> Result<(FieldScatterGraph, GraphConfig)> {
        let points: Vec<(f64, f64)> = self
            .observations
            .iter()
            .filter_map(|obs| {
                Some((obs.numeric_field(x_field)?, obs.numeric_field(y_field)?))
            })
            .collect();

        if points.is_empty() {
            return Err(MastGraphError::validation_field(
                format!(
                    "Columns '{}' and '{}' produced no numeric point pairs",
                    x_field, y_field
                ),
                x_field,
            ));
        }

        let title = format!("{} vs {} in {} Observations", x_field, y_field, self.telescope);
        let (mut graph, config) = FieldScatterGraph::with_config(x_field, y_field, &title);
        graph.set_points(points);
        Ok((graph, config))
    }

    /// Write the typed columns of the record set to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer = result_with_context!(
            csv::Writer::from_path(path),
            "Failed to open {} for CSV export",
            path.display()
        )?;

        for obs in &self.observations {
            result_with_context!(
                writer.serialize(CsvRow::from(obs)),
                "Failed to write CSV row to {}",
                path.display()
            )?;
        }
        writer.flush()?;

        info!(
            "Exported {} observations to {}",
            self.observations.len(),
            path.display()
        );
        Ok(())
    }
}
