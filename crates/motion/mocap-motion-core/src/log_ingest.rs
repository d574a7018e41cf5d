//! Tables from decoded robotics log messages.
//!
//! Reading the log container is left to the host; this module takes already
//! decoded joint-state and transform messages and aligns them onto zero-based
//! time axes.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::channel::ChannelKey;
use crate::table::{ChannelMap, MotionTable};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub sec: i64,
    pub nsec: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub seq: u32,
    pub stamp: Stamp,
    #[serde(default)]
    pub frame_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointStateMessage {
    pub header: Header,
    pub name: Vec<String>,
    pub position: Vec<f64>,
    #[serde(default)]
    pub velocity: Vec<f64>,
    #[serde(default)]
    pub effort: Vec<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub transform: Transform,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TfMessage {
    pub transforms: Vec<TransformStamped>,
}

/// Seconds from `first` to `stamp`.
#[inline]
pub fn align_stamps(first: Stamp, stamp: Stamp) -> f64 {
    (stamp.sec - first.sec) as f64 + 1e-9 * (stamp.nsec - first.nsec) as f64
}

/// Joint positions of one topic on a shared time axis.
#[derive(Clone, Debug, PartialEq)]
pub struct JointMotion {
    pub name: String,
    pub time: Vec<f64>,
    pub joints: ChannelMap,
}

impl JointMotion {
    /// Table for `body`; joint keys get the body prefix.
    pub fn into_table(self, body: &str) -> MotionTable {
        MotionTable::from_joint_motion(body, self.time, self.joints).with_name(self.name)
    }
}

/// Collect the joint states published on `topic`. Joints are those named by
/// the first message; `None` when there are no messages.
pub fn joint_motion_from_messages(topic: &str, messages: &[JointStateMessage]) -> Option<JointMotion> {
    let first = messages.first()?;
    let mut joints: ChannelMap = first
        .name
        .iter()
        .map(|name| (name.clone(), Vec::with_capacity(messages.len())))
        .collect();
    let mut time = Vec::with_capacity(messages.len());

    for msg in messages {
        time.push(align_stamps(first.header.stamp, msg.header.stamp));
        for (name, position) in msg.name.iter().zip(&msg.position) {
            if let Some(channel) = joints.get_mut(name) {
                channel.push(*position);
            }
        }
    }
    Some(JointMotion {
        name: topic.to_string(),
        time,
        joints,
    })
}

/// Frames that only ever appear as parents, in first-seen order.
pub fn root_frames(tf: &[TfMessage], tf_static: &[TfMessage]) -> IndexSet<String> {
    let mut parents = IndexSet::new();
    let mut children = IndexSet::new();
    for record in tf.iter().chain(tf_static).flat_map(|m| &m.transforms) {
        parents.shift_remove(&record.child_frame_id);
        children.insert(record.child_frame_id.clone());
        if !children.contains(&record.header.frame_id) {
            parents.insert(record.header.frame_id.clone());
        }
    }
    parents
}

/// Structural channels of one child frame hanging off a root frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformTrack {
    pub name: String,
    pub child_frame: String,
    pub root_frame: String,
    pub time: Vec<f64>,
    pub channels: ChannelMap,
}

impl TransformTrack {
    /// Table for `body`; channel keys get the body prefix.
    pub fn into_table(self, body: &str) -> MotionTable {
        MotionTable::from_transforms(body, self.time, self.channels).with_name(self.name)
    }
}

fn transform_channels(samples: impl Iterator<Item = Transform>) -> ChannelMap {
    let mut columns: [Vec<f64>; 7] = Default::default();
    for tf in samples {
        let t = tf.translation;
        let r = tf.rotation;
        for (column, value) in columns.iter_mut().zip([t.x, t.y, t.z, r.x, r.y, r.z, r.w]) {
            column.push(value);
        }
    }
    let keys = ChannelKey::POSITION.into_iter().chain(ChannelKey::ROTATION);
    keys.zip(columns)
        .map(|(key, values)| (key.as_str().to_string(), values))
        .collect()
}

/// Tracks for every transform whose parent is a root frame.
///
/// The time axis comes from the first transform of each dynamic message.
/// Static transforms are held constant across that axis. Nothing is produced
/// without dynamic messages.
pub fn transform_tracks(
    source_name: &str,
    tf: &[TfMessage],
    tf_static: &[TfMessage],
) -> Vec<TransformTrack> {
    let Some(first) = tf.first().and_then(|m| m.transforms.first()) else {
        return Vec::new();
    };
    let roots = root_frames(tf, tf_static);
    let time: Vec<f64> = tf
        .iter()
        .filter_map(|m| m.transforms.first())
        .map(|r| align_stamps(first.header.stamp, r.header.stamp))
        .collect();
    let count = tf.len();

    let mut tracks = Vec::new();
    for record in tf_static.iter().flat_map(|m| &m.transforms) {
        if !roots.contains(&record.header.frame_id) {
            continue;
        }
        tracks.push(TransformTrack {
            name: format!("{source_name} {}", record.child_frame_id),
            child_frame: record.child_frame_id.clone(),
            root_frame: record.header.frame_id.clone(),
            time: time.clone(),
            channels: transform_channels(std::iter::repeat(record.transform).take(count)),
        });
    }

    for (index, record) in tf[0].transforms.iter().enumerate() {
        if !roots.contains(&record.header.frame_id) {
            continue;
        }
        let samples = tf
            .iter()
            .filter_map(|m| m.transforms.get(index))
            .map(|r| r.transform);
        tracks.push(TransformTrack {
            name: format!("{source_name} {}", record.child_frame_id),
            child_frame: record.child_frame_id.clone(),
            root_frame: record.header.frame_id.clone(),
            time: time.clone(),
            channels: transform_channels(samples),
        });
    }
    tracks
}
