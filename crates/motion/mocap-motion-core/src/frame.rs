//! Interpolated pose produced by evaluating a motion table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Three optional axis values. A table may carry only some axes of a
/// position or scale; the missing ones stay `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes3 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Axes3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// `None` when no axis is present.
    #[inline]
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    /// Missing axes read as zero.
    pub fn or_zero(&self) -> [f64; 3] {
        [
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        ]
    }
}

/// Quaternion (x, y, z, w).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    #[inline]
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub fn from_array(q: [f64; 4]) -> Self {
        Self::new(q[0], q[1], q[2], q[3])
    }

    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }
}

/// Fully interpolated pose at one query time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Query time the frame was evaluated at (table-local seconds).
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Axes3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Quat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Axes3>,
    /// Joint name to joint value (radians for revolute joints).
    #[serde(default)]
    pub joints: IndexMap<String, f64>,
}

impl Frame {
    #[inline]
    pub fn joint(&self, name: &str) -> Option<f64> {
        self.joints.get(name).copied()
    }
}
