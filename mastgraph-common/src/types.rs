//! Shared types for telescope metadata queries

use crate::error::{MastGraphError, Result};
use crate::utils::{format_date, parse_time_bound};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type used throughout the application
pub type Timestamp = DateTime<Utc>;

/// Telescope missions queryable through the MAST archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Telescope {
    Jwst,
    Hst,
    Tess,
}

impl Telescope {
    /// All supported missions
    pub const ALL: [Telescope; 3] = [Telescope::Jwst, Telescope::Hst, Telescope::Tess];

    /// Mission name as the archive spells it in the `obs_collection` column
    pub fn collection(&self) -> &'static str {
        match self {
            Telescope::Jwst => "JWST",
            Telescope::Hst => "HST",
            Telescope::Tess => "TESS",
        }
    }
}

impl FromStr for Telescope {
    type Err = MastGraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jwst" => Ok(Telescope::Jwst),
            "hst" => Ok(Telescope::Hst),
            "tess" => Ok(Telescope::Tess),
            _ => Err(MastGraphError::unsupported_telescope(s.trim())),
        }
    }
}

impl fmt::Display for Telescope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Observation time window for an archive query.
///
/// A missing bound leaves that side of the query unconstrained, so a default
/// `TimeRange` covers the archive's full history for the mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl TimeRange {
    /// Create a time range, rejecting windows whose start is after their end
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(MastGraphError::time_range(format!(
                    "start {} is after end {}",
                    format_date(&s),
                    format_date(&e)
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// A range with no bounds on either side
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse both endpoints from user input.
    ///
    /// Each endpoint accepts whatever [`parse_time_bound`] accepts: an ISO
    /// date, an ISO date-time, or the literal "now".
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(parse_time_bound).transpose()?;
        let end = end.map(parse_time_bound).transpose()?;
        Self::new(start, end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Human-readable window description for chart titles
    pub fn label(&self) -> String {
        let start = self
            .start
            .map(|t| format_date(&t))
            .unwrap_or_else(|| "mission start".to_string());
        let end = self
            .end
            .map(|t| format_date(&t))
            .unwrap_or_else(|| "now".to_string());
        format!("between {} and {}", start, end)
    }
}
