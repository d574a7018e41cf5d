//! Time-axis search and per-channel clamped access.
//!
//! Model:
//! - A table's time axis is sorted, zero-based and strictly increasing.
//! - Channels may be shorter than the axis; every read clamps to the
//!   channel's own valid range instead of failing.
//!
//! API:
//! - lower_bound(axis, time) finds the first sample at or after `time`.
//! - resolve(axis, time, max_len) turns a query time into a `SamplePair`.
//! - value_at(channel, i) reads a channel with clamping.

/// Pair of sample indices plus the blend factor between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePair {
    pub a: usize,
    pub b: usize,
    pub t: f64,
}

impl SamplePair {
    #[inline]
    pub fn at(i: usize) -> Self {
        Self { a: i, b: i, t: 0.0 }
    }
}

/// First index whose value is `>= time`, or `axis.len()` when every value is smaller.
pub fn lower_bound(axis: &[f64], time: f64) -> usize {
    axis.partition_point(|&v| v < time)
}

/// Resolve `time` against `axis`.
///
/// Edge cases:
/// - `time <= axis[0]` (or an empty axis) samples index 0 verbatim.
/// - `time >= axis[last]` samples index `max_len`, which every channel clamps
///   to its own final value.
/// - A query landing exactly on a stored time samples that index verbatim.
/// - A NaN query, or an axis starting with NaN, samples index 0.
pub fn resolve(axis: &[f64], time: f64, max_len: usize) -> SamplePair {
    let Some((&first, &last)) = axis.first().zip(axis.last()) else {
        return SamplePair::at(0);
    };
    if time.is_nan() || time <= first {
        return SamplePair::at(0);
    }
    if time >= last {
        return SamplePair::at(max_len);
    }
    let i = lower_bound(axis, time);
    if i == 0 {
        return SamplePair::at(0);
    }
    if axis[i] == time {
        return SamplePair::at(i);
    }
    let (t0, t1) = (axis[i - 1], axis[i]);
    SamplePair {
        a: i - 1,
        b: i,
        t: (time - t0) / (t1 - t0),
    }
}

/// Clamped read: index 0 and below gives the first value, anything at or past
/// the end gives the last. An empty channel reads as `0.0`.
#[inline]
pub fn value_at(channel: &[f64], i: usize) -> f64 {
    match channel.len() {
        0 => 0.0,
        n if i >= n - 1 => channel[n - 1],
        _ => channel[i],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bound_finds_first_not_less() {
        let axis = [0.0, 1.0, 1.0, 3.0];
        assert_eq!(lower_bound(&axis, -1.0), 0);
        assert_eq!(lower_bound(&axis, 1.0), 1);
        assert_eq!(lower_bound(&axis, 2.0), 3);
        assert_eq!(lower_bound(&axis, 9.0), 4);
    }

    #[test]
    fn resolve_interior_and_edges() {
        let axis = [0.0, 1.0, 3.0];
        assert_eq!(resolve(&axis, -5.0, 3), SamplePair::at(0));
        assert_eq!(resolve(&axis, 3.0, 7), SamplePair::at(7));
        assert_eq!(resolve(&axis, 1.0, 3), SamplePair::at(1));
        let mid = resolve(&axis, 2.0, 3);
        assert_eq!((mid.a, mid.b), (1, 2));
        assert!((mid.t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn resolve_empty_axis() {
        assert_eq!(resolve(&[], 4.0, 0), SamplePair::at(0));
    }

    #[test]
    fn resolve_never_indexes_before_start() {
        assert_eq!(resolve(&[0.0, 1.0], f64::NAN, 2), SamplePair::at(0));
        let poisoned = [f64::NAN, 1.0, 2.0];
        assert_eq!(resolve(&poisoned, 0.5, 3), SamplePair::at(0));
    }

    #[test]
    fn value_at_clamps() {
        let ch = [1.0, 2.0, 3.0];
        assert_eq!(value_at(&ch, 0), 1.0);
        assert_eq!(value_at(&ch, 1), 2.0);
        assert_eq!(value_at(&ch, 40), 3.0);
        assert_eq!(value_at(&[], 2), 0.0);
    }
}
