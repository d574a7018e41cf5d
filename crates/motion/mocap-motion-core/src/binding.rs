//! A binding plays one shared motion table on one target body.
//!
//! The binding owns only its own timing (`offset`, `lengthen`); the table is
//! shared through an `Arc` and the body lives in the host.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::MotionError;
use crate::frame::Frame;
use crate::ids::{BindingId, BodyId, TableId};
use crate::interp::lerp;
use crate::table::MotionTable;
use crate::target::{BodyResolver, Renderer};
use crate::Result;

/// Original body id to the id of its duplicate.
pub type BodyRemap = HashMap<BodyId, BodyId>;

/// Original table id to its already-made copy, so shared tables stay shared.
pub type TableMemo = HashMap<TableId, Arc<MotionTable>>;

#[derive(Clone, Debug)]
pub struct Binding {
    id: BindingId,
    body: BodyId,
    table: Arc<MotionTable>,
    offset: f64,
    lengthen: f64,
}

impl Binding {
    pub fn new(body: BodyId, table: Arc<MotionTable>) -> Self {
        Self::with_timing(body, table, 0.0, 0.0)
    }

    pub fn with_timing(body: BodyId, table: Arc<MotionTable>, offset: f64, lengthen: f64) -> Self {
        Self {
            id: BindingId::next(),
            body,
            table,
            offset,
            lengthen,
        }
    }

    #[inline]
    pub fn id(&self) -> BindingId {
        self.id
    }

    #[inline]
    pub fn body(&self) -> &BodyId {
        &self.body
    }

    #[inline]
    pub fn table(&self) -> &Arc<MotionTable> {
        &self.table
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn lengthen(&self) -> f64 {
        self.lengthen
    }

    pub fn set_offset(&mut self, offset: f64, renderer: &dyn Renderer) {
        self.offset = offset;
        renderer.request_render();
        renderer.update_ui();
    }

    pub fn set_lengthen(&mut self, lengthen: f64, renderer: &dyn Renderer) {
        self.lengthen = lengthen;
        renderer.request_render();
        renderer.update_ui();
    }

    pub fn start_time(&self) -> f64 {
        self.table.start_time() + self.offset
    }

    pub fn end_time(&self) -> f64 {
        self.table.end_time() + self.offset + self.lengthen
    }

    /// Map a global time onto the table's own time axis.
    ///
    /// The lengthening share subtracted is `lengthen * (t + start) / (end + start)`,
    /// with a zero share when `end + start == 0`. The result is held inside
    /// `[start, end]`.
    pub fn local_time(&self, global_time: f64) -> f64 {
        let mut t = global_time + self.offset;
        let (start, end) = (self.start_time(), self.end_time());
        let z_end = end + start;
        let z_cur = t + start;
        let ratio = if z_end == 0.0 { 0.0 } else { z_cur / z_end };
        t -= lerp(0.0, self.lengthen, ratio);
        if t < start {
            t = start;
        }
        if t > end {
            t = end;
        }
        t
    }

    /// Frame for `global_time`, picking channels prefixed by `body_name`.
    pub fn evaluate(&self, global_time: f64, body_name: Option<&str>) -> Frame {
        self.table.evaluate(self.local_time(global_time), body_name)
    }

    /// Evaluate and push the frame onto the bound body. Returns `false` when
    /// the body is not currently resolvable.
    pub fn update(&self, global_time: f64, bodies: &mut dyn BodyResolver) -> bool {
        let Some(body) = bodies.body_mut(&self.body) else {
            log::debug!("binding {:?}: body {} not present, skipped", self.id, self.body);
            return false;
        };
        let frame = self.evaluate(global_time, Some(body.name()));
        body.apply_frame(&frame);
        true
    }

    /// Duplicate onto the remapped body with a copied table.
    ///
    /// The table is copied once per `tables` memo; bindings that shared a table
    /// share its copy too.
    pub fn clone_with(&self, bodies: &BodyRemap, tables: &mut TableMemo) -> Result<Self> {
        let body = bodies
            .get(&self.body)
            .cloned()
            .ok_or_else(|| MotionError::unresolved_body(self.body.as_str()))?;
        let table = tables
            .entry(self.table.id().clone())
            .or_insert_with(|| Arc::new(self.table.deep_clone()))
            .clone();
        Ok(Self::with_timing(body, table, self.offset, self.lengthen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::target::NullRenderer;

    fn table(text: &str) -> Arc<MotionTable> {
        Arc::new(MotionTable::from_csv_text(text, &IngestConfig::default()).unwrap())
    }

    #[test]
    fn extent_includes_offset_and_lengthen() {
        let b = Binding::with_timing("r".into(), table("time,a\n2,0\n10,1"), 1.0, 3.0);
        // Time axis is zero-based: [0, 8].
        assert_eq!(b.start_time(), 1.0);
        assert_eq!(b.end_time(), 12.0);
    }

    #[test]
    fn local_time_without_lengthen_is_shifted_and_clamped() {
        let b = Binding::with_timing("r".into(), table("time,a\n0,0\n4,1"), 1.0, 0.0);
        assert_eq!(b.local_time(2.0), 3.0);
        assert_eq!(b.local_time(-10.0), 1.0);
        assert_eq!(b.local_time(99.0), 5.0);
    }

    #[test]
    fn lengthen_remap_follows_formula() {
        let b = Binding::with_timing("r".into(), table("time,a\n0,0\n4,1"), 0.0, 4.0);
        // start 0, end 8: t -= 4 * t / 8
        assert_eq!(b.local_time(4.0), 2.0);
        assert_eq!(b.local_time(8.0), 4.0);
    }

    #[test]
    fn zero_extent_does_not_produce_nan() {
        let b = Binding::with_timing("r".into(), table("time,a\n0,0\n4,1"), 0.0, -4.0);
        assert!(b.local_time(0.0).is_finite());
    }

    #[test]
    fn zero_extent_sum_leaves_shifted_time_to_the_clamp() {
        // start -3, end 3: end + start == 0 while t + start != 0. The
        // lengthening share is taken as zero, so t stays at 1 - 3 = -2
        // instead of being pushed to an extent edge.
        let b = Binding::with_timing("r".into(), table("time,a\n0,0\n4,1"), -3.0, 2.0);
        assert_eq!((b.start_time(), b.end_time()), (-3.0, 3.0));
        assert_eq!(b.local_time(1.0), -2.0);
        assert_eq!(b.local_time(10.0), 3.0);
    }

    #[test]
    fn setters_update_timing() {
        let mut b = Binding::new("r".into(), table("time,a\n0,0\n4,1"));
        b.set_offset(-1.5, &NullRenderer);
        b.set_lengthen(2.0, &NullRenderer);
        assert_eq!(b.offset(), -1.5);
        assert_eq!(b.lengthen(), 2.0);
    }
}
