//! Motion tables: ingestion from rows, evaluation at a query time, export.
//!
//! A table is a zero-based, strictly increasing time axis plus two families
//! of channels sampled along it:
//! - structural channels (position, rotation, scale), keyed `<body><KEY>`
//!   where `KEY` is one of [`ChannelKey`]'s canonical names;
//! - generic channels, usually one joint angle per column.
//!
//! Channels may be shorter than the time axis. All reads clamp.
//!
//! Tables are immutable once built; share them as `Arc<MotionTable>` and use
//! [`MotionTable::deep_clone`] for an independent copy.

use std::fmt::Write as _;

use indexmap::{IndexMap, IndexSet};

use crate::channel::{self, ChannelKey};
use crate::config::{IngestConfig, TimeUnit};
use crate::coords;
use crate::error::MotionError;
use crate::frame::{Axes3, Frame, Quat};
use crate::ids::TableId;
use crate::interp::{lerp, slerp_quat};
use crate::sampling::{self, SamplePair};
use crate::tabular::{self, Cell};
use crate::target::{LogReporter, Reporter};
use crate::Result;

pub const DEFAULT_TABLE_NAME: &str = "Unnamed Animation";

/// Named channels in insertion order.
pub type ChannelMap = IndexMap<String, Vec<f64>>;

#[derive(Clone, Debug, PartialEq)]
pub struct MotionTable {
    id: TableId,
    name: String,
    url: Option<String>,
    time_axis: Vec<f64>,
    structural: ChannelMap,
    generic: ChannelMap,
    body_names: IndexSet<String>,
    source_convention: bool,
}

impl MotionTable {
    fn empty(time_axis: Vec<f64>) -> Self {
        Self {
            id: TableId::generate(),
            name: DEFAULT_TABLE_NAME.to_string(),
            url: None,
            time_axis,
            structural: ChannelMap::new(),
            generic: ChannelMap::new(),
            body_names: IndexSet::new(),
            source_convention: false,
        }
    }

    /// Parse raw rows, reporting problems through [`LogReporter`].
    pub fn from_rows(rows: &[Vec<Cell>], config: &IngestConfig) -> Result<Self> {
        Self::from_rows_reported(rows, config, &LogReporter)
    }

    /// Parse CSV text. See [`MotionTable::from_rows`].
    pub fn from_csv_text(text: &str, config: &IngestConfig) -> Result<Self> {
        Self::from_rows(&tabular::parse_csv_text(text), config)
    }

    /// Parse raw rows, sending warnings and errors to `reporter`.
    ///
    /// Fatal problems are reported and returned. A long run of descending
    /// timestamps is reported but does not stop parsing.
    pub fn from_rows_reported(
        rows: &[Vec<Cell>],
        config: &IngestConfig,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        Self::parse(rows, config, reporter).map_err(|err| {
            reporter.error(&err);
            err
        })
    }

    fn parse(rows: &[Vec<Cell>], config: &IngestConfig, reporter: &dyn Reporter) -> Result<Self> {
        let cleaned = tabular::clean_rows(rows, config)?;

        let mut columns = ChannelMap::new();
        let mut body_names = IndexSet::new();
        for (column, header) in cleaned.header.iter().enumerate() {
            let header = match header {
                Cell::Text(text) => text,
                Cell::Number(found) => {
                    return Err(MotionError::MalformedHeader {
                        column,
                        found: *found,
                    })
                }
            };
            let values: Vec<f64> = cleaned
                .rows
                .iter()
                .filter_map(|row| row.get(column).copied().flatten())
                .collect();

            let normalized = header.trim().replacen(' ', "_", 1);
            // Only `body-rest` headers name a body; plain headers carry none.
            if let Some((body, _)) = normalized.split_once('-') {
                body_names.insert(body.to_string());
            }
            columns.insert(normalized.replacen('-', "", 1), values);
        }

        let time_key = match (columns.contains_key("time"), columns.contains_key("timestamp")) {
            (true, true) => return Err(MotionError::AmbiguousTimeColumn),
            (true, false) => "time",
            (false, true) => "timestamp",
            (false, false) => return Err(MotionError::MissingTimeColumn),
        };
        let mut time = columns.shift_remove(time_key).unwrap_or_default();

        repair_ascending(&mut time, &mut columns, config.max_descending_run, reporter);
        zero_base(&mut time, config.time_unit);

        let mut table = Self::empty(time);
        for (header, values) in columns {
            match channel::classify(&header).map(|found| found.canonical_name()) {
                Some(canonical) => {
                    table.structural.insert(canonical, values);
                }
                None => {
                    table.generic.insert(header, values);
                }
            }
        }
        table.body_names = body_names;
        Ok(table)
    }

    /// Table of joint channels for one body; every key is prefixed by `body`.
    pub fn from_joint_motion(body: &str, time_axis: Vec<f64>, joints: ChannelMap) -> Self {
        let mut table = Self::empty(time_axis);
        table.generic = prefix_keys(body, joints);
        if !body.is_empty() {
            table.body_names.insert(body.to_string());
        }
        table
    }

    /// Table of structural channels for one body; every key is prefixed by `body`.
    pub fn from_transforms(body: &str, time_axis: Vec<f64>, transforms: ChannelMap) -> Self {
        let mut table = Self::empty(time_axis);
        table.structural = prefix_keys(body, transforms);
        if !body.is_empty() {
            table.body_names.insert(body.to_string());
        }
        table
    }

    pub fn with_id(mut self, id: TableId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.name = name.as_ref().trim().to_string();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark position/rotation values as authored in the robotics convention.
    pub fn with_source_convention(mut self, enabled: bool) -> Self {
        self.source_convention = enabled;
        self
    }

    /// Replace the structural channels, keeping everything else.
    pub fn with_structural_channels(mut self, structural: ChannelMap) -> Self {
        self.structural = structural;
        self
    }

    /// Independent copy with a fresh id.
    pub fn deep_clone(&self) -> Self {
        Self {
            id: TableId::generate(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn id(&self) -> &TableId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[inline]
    pub fn time_axis(&self) -> &[f64] {
        &self.time_axis
    }

    #[inline]
    pub fn structural_channels(&self) -> &ChannelMap {
        &self.structural
    }

    #[inline]
    pub fn generic_channels(&self) -> &ChannelMap {
        &self.generic
    }

    #[inline]
    pub fn body_names(&self) -> &IndexSet<String> {
        &self.body_names
    }

    #[inline]
    pub fn source_convention(&self) -> bool {
        self.source_convention
    }

    pub fn start_time(&self) -> f64 {
        self.time_axis.first().copied().unwrap_or(0.0)
    }

    pub fn end_time(&self) -> f64 {
        self.time_axis.last().copied().unwrap_or(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Longest channel across both families.
    pub fn channel_len_max(&self) -> usize {
        self.structural
            .values()
            .chain(self.generic.values())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Interpolated frame at `time`, preferring channels prefixed by `body_name`.
    pub fn evaluate(&self, time: f64, body_name: Option<&str>) -> Frame {
        let pair = sampling::resolve(&self.time_axis, time, self.channel_len_max());
        let mut frame = Frame {
            time,
            position: self.axes(ChannelKey::POSITION, body_name, pair),
            rotation: self.rotation(body_name, pair),
            scale: self.axes(ChannelKey::SCALE, body_name, pair),
            joints: self.joints(body_name, pair),
        };
        if self.source_convention {
            coords::frame_to_canonical(&mut frame);
        }
        frame
    }

    fn structural_channel(&self, key: ChannelKey, body_name: Option<&str>) -> Option<&[f64]> {
        body_name
            .and_then(|body| self.structural.get(&channel::prefixed(body, key.as_str())))
            .or_else(|| self.structural.get(key.as_str()))
            .map(Vec::as_slice)
    }

    fn axes(&self, keys: [ChannelKey; 3], body_name: Option<&str>, pair: SamplePair) -> Option<Axes3> {
        let [x, y, z] =
            keys.map(|key| self.structural_channel(key, body_name).map(|ch| blend(ch, pair)));
        Axes3 { x, y, z }.non_empty()
    }

    fn quat_at(&self, body_name: Option<&str>, i: usize) -> Option<[f64; 4]> {
        let mut q = [0.0; 4];
        for (slot, key) in q.iter_mut().zip(ChannelKey::ROTATION) {
            *slot = sampling::value_at(self.structural_channel(key, body_name)?, i);
        }
        Some(q)
    }

    fn rotation(&self, body_name: Option<&str>, pair: SamplePair) -> Option<Quat> {
        let a = self.quat_at(body_name, pair.a)?;
        let b = self.quat_at(body_name, pair.b)?;
        Some(Quat::from_array(slerp_quat(a, b, pair.t)))
    }

    fn joints(&self, body_name: Option<&str>, pair: SamplePair) -> IndexMap<String, f64> {
        let mut joints: IndexMap<String, f64> = self
            .generic
            .iter()
            .map(|(name, ch)| (name.clone(), blend(ch, pair)))
            .collect();
        if let Some(body) = body_name {
            let stripped: Vec<(String, f64)> = joints
                .iter()
                .filter_map(|(name, v)| name.strip_prefix(body).map(|rest| (rest.to_string(), *v)))
                .collect();
            joints.extend(stripped);
        }
        joints
    }

    /// Tabular form: `time`, then structural, then generic columns. Short
    /// columns repeat their final value (or `0` when empty).
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        let columns: Vec<(&str, &[f64])> = std::iter::once(("time", self.time_axis.as_slice()))
            .chain(self.structural.iter().map(|(k, v)| (k.as_str(), v.as_slice())))
            .chain(self.generic.iter().map(|(k, v)| (k.as_str(), v.as_slice())))
            .collect();
        let height = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let mut rows = Vec::with_capacity(height + 1);
        rows.push(columns.iter().map(|(h, _)| Cell::from(*h)).collect());
        for i in 0..height {
            rows.push(
                columns
                    .iter()
                    .map(|(_, v)| Cell::Number(v.get(i).or(v.last()).copied().unwrap_or(0.0)))
                    .collect(),
            );
        }
        rows
    }

    /// [`MotionTable::to_rows`] rendered as CSV text.
    pub fn to_csv_text(&self) -> String {
        let mut out = String::new();
        for (r, row) in self.to_rows().iter().enumerate() {
            if r > 0 {
                out.push('\n');
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    out.push(',');
                }
                match cell {
                    Cell::Number(n) => {
                        let _ = write!(out, "{n}");
                    }
                    Cell::Text(text) if text.contains(&[',', '"', '\n', '\r'][..]) => {
                        let _ = write!(out, "\"{}\"", text.replace('"', "\"\""));
                    }
                    Cell::Text(text) => out.push_str(text),
                }
            }
        }
        out
    }
}

#[inline]
fn blend(channel: &[f64], pair: SamplePair) -> f64 {
    lerp(
        sampling::value_at(channel, pair.a),
        sampling::value_at(channel, pair.b),
        pair.t,
    )
}

fn prefix_keys(body: &str, map: ChannelMap) -> ChannelMap {
    map.into_iter()
        .map(|(key, values)| (channel::prefixed(body, &key), values))
        .collect()
}

/// Drop rows whose timestamp does not increase, retrying the same index after
/// each removal. Runs longer than `max_run` are reported on every further step.
fn repair_ascending(
    time: &mut Vec<f64>,
    columns: &mut ChannelMap,
    max_run: usize,
    reporter: &dyn Reporter,
) {
    let mut descending = 0usize;
    let mut i = 1;
    while i < time.len() {
        let (prev, curr) = (time[i - 1], time[i]);
        let remove = if prev > curr {
            let message = format!(
                "time column must be ascending; dropping row {i} ({curr} follows {prev})"
            );
            reporter.warn(&message);
            descending += 1;
            if descending > max_run {
                let err = MotionError::ExcessiveDescendingTimestamps { count: descending };
                reporter.error(&err);
            }
            true
        } else if prev == curr {
            true
        } else {
            descending = 0;
            false
        };

        if remove {
            time.remove(i);
            for values in columns.values_mut() {
                if i < values.len() {
                    values.remove(i);
                }
            }
        } else {
            i += 1;
        }
    }
}

/// Shift the axis to start at zero and convert it to seconds.
fn zero_base(time: &mut [f64], unit: Option<TimeUnit>) {
    let (Some(&first), Some(&last)) = (time.first(), time.last()) else {
        return;
    };
    match unit {
        Some(unit) => {
            let divisor = unit.divisor();
            for t in time.iter_mut() {
                *t = (*t - first) / divisor;
            }
        }
        None => {
            let passes = TimeUnit::detect(last - first).staged_passes();
            for t in time.iter_mut() {
                *t -= first;
                for _ in 0..passes {
                    *t /= 1000.0;
                }
            }
        }
    }
}
