//! Ingestion configuration for mocap-motion-core.

use serde::{Deserialize, Serialize};

/// Unit of the raw values found in a table's time column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Division factor that turns a raw duration in this unit into seconds.
    #[inline]
    pub fn divisor(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Millisecond => 1e3,
            TimeUnit::Microsecond => 1e6,
            TimeUnit::Nanosecond => 1e9,
        }
    }

    /// Unit guessed from the raw (un-zeroed) duration of a time column.
    pub fn detect(raw_duration: f64) -> Self {
        if raw_duration > 1e9 {
            TimeUnit::Nanosecond
        } else if raw_duration > 1e6 {
            TimeUnit::Microsecond
        } else if raw_duration > 1e3 {
            TimeUnit::Millisecond
        } else {
            TimeUnit::Second
        }
    }

    /// Number of successive `/ 1000` passes autodetection applies for this unit.
    #[inline]
    pub fn staged_passes(self) -> usize {
        match self {
            TimeUnit::Second => 0,
            TimeUnit::Millisecond => 1,
            TimeUnit::Microsecond => 2,
            TimeUnit::Nanosecond => 3,
        }
    }
}

/// Options controlling tabular ingestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Explicit unit of the time column; `None` autodetects from the raw duration.
    pub time_unit: Option<TimeUnit>,
    /// Value substituted for empty or non-numeric data cells. With `None`,
    /// empty cells are skipped and text cells are rejected.
    pub fill_bad_cells_with: Option<f64>,
    /// Drop a row that equals the row right before it.
    pub remove_duplicate_rows: bool,
    /// Consecutive descending timestamps tolerated before a data-quality
    /// error is reported.
    pub max_descending_run: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            time_unit: None,
            fill_bad_cells_with: Some(0.0),
            remove_duplicate_rows: true,
            max_descending_run: 5,
        }
    }
}

impl IngestConfig {
    /// Default config with an explicit time unit.
    pub fn with_time_unit(unit: TimeUnit) -> Self {
        Self {
            time_unit: Some(unit),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_thresholds_are_strict() {
        assert_eq!(TimeUnit::detect(1e3), TimeUnit::Second);
        assert_eq!(TimeUnit::detect(1e3 + 1.0), TimeUnit::Millisecond);
        assert_eq!(TimeUnit::detect(1e6 + 1.0), TimeUnit::Microsecond);
        assert_eq!(TimeUnit::detect(5e9), TimeUnit::Nanosecond);
    }

    #[test]
    fn unit_names_are_lowercase_in_json() {
        let unit: TimeUnit = serde_json::from_str("\"millisecond\"").unwrap();
        assert_eq!(unit, TimeUnit::Millisecond);
        assert_eq!(serde_json::to_string(&TimeUnit::Second).unwrap(), "\"second\"");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: IngestConfig = serde_json::from_str(r#"{"time_unit":"second"}"#).unwrap();
        assert_eq!(cfg.time_unit, Some(TimeUnit::Second));
        assert_eq!(cfg.max_descending_run, 5);
        assert_eq!(cfg.fill_bad_cells_with, Some(0.0));
    }
}
