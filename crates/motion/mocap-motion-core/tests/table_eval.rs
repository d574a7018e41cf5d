mod common;

use approx::assert_relative_eq;
use common::approx;
use mocap_motion_core::{
    interp::slerp_quat, ChannelMap, IngestConfig, MotionTable, Quat, TimeUnit,
};
use mocap_test_fixtures::tables;

fn wave() -> MotionTable {
    let text = tables::csv("two-arm-wave").unwrap();
    MotionTable::from_csv_text(&text, &IngestConfig::default()).unwrap()
}

/// Joint channels of different lengths over a five-sample axis.
fn ragged() -> MotionTable {
    let mut joints = ChannelMap::new();
    joints.insert("hip".into(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    joints.insert("knee".into(), vec![10.0, 20.0]);
    joints.insert("toe".into(), vec![7.0]);
    MotionTable::from_joint_motion("", vec![0.0, 1.0, 2.0, 3.0, 4.0], joints)
}

#[test]
fn before_start_returns_first_samples() {
    let table = wave();
    for time in [-3.0, 0.0] {
        let frame = table.evaluate(time, Some("left"));
        let pos = frame.position.unwrap();
        assert_eq!(pos.x, Some(0.0));
        assert_eq!(frame.rotation, Some(Quat::IDENTITY));
        assert_eq!(frame.joint("shoulder"), Some(0.0));
        assert_eq!(frame.time, time);
    }
}

#[test]
fn after_end_each_channel_returns_its_own_last_sample() {
    let table = ragged();
    for time in [4.0, 100.0] {
        let frame = table.evaluate(time, None);
        assert_eq!(frame.joint("hip"), Some(4.0));
        assert_eq!(frame.joint("knee"), Some(20.0));
        assert_eq!(frame.joint("toe"), Some(7.0));
    }
}

#[test]
fn stored_times_reproduce_stored_values() {
    let table = ragged();
    for (i, &t) in table.time_axis().iter().enumerate() {
        let frame = table.evaluate(t, None);
        assert_eq!(frame.joint("hip"), Some(i as f64));
    }
    let wave = wave();
    let frame = wave.evaluate(1.0, Some("right"));
    assert_eq!(frame.position.unwrap().x, Some(1.2));
    assert_eq!(frame.joint("elbow"), Some(-1.0));
}

#[test]
fn interior_times_interpolate_linearly() {
    let table = ragged();
    let frame = table.evaluate(2.25, None);
    assert!(approx(frame.joint("hip").unwrap(), 2.25, 1e-12));
    // knee is clamped to its last sample on both sides of the pair
    assert_eq!(frame.joint("knee"), Some(20.0));
}

#[test]
fn rotation_is_spherically_interpolated() {
    let table = wave();
    // halfway between 0 and 45 degrees about z
    let q = table.evaluate(0.25, Some("left")).rotation.unwrap();
    let half = std::f64::consts::PI / 16.0;
    assert_relative_eq!(q.z, half.sin(), epsilon = 1e-9);
    assert_relative_eq!(q.w, half.cos(), epsilon = 1e-9);
    assert_relative_eq!(q.length(), 1.0, epsilon = 1e-9);
}

#[test]
fn equal_quaternions_blend_to_themselves() {
    let q = [0.1825741858, 0.3651483717, 0.5477225575, 0.7302967433];
    for t in [0.0, 0.1, 0.5, 0.77, 1.0] {
        let out = slerp_quat(q, q, t);
        for (a, b) in out.iter().zip(q.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}

#[test]
fn bodies_without_structural_channels_get_none() {
    let table = wave();
    let frame = table.evaluate(0.5, Some("right"));
    let pos = frame.position.unwrap();
    assert_eq!(pos.y, None);
    assert!(frame.rotation.is_none());
    assert!(frame.scale.is_none());
}

#[test]
fn export_then_parse_reproduces_table() {
    let table = wave();
    let rows = table.to_rows();
    let again = MotionTable::from_rows(&rows, &IngestConfig::with_time_unit(TimeUnit::Second))
        .unwrap();
    assert_eq!(again.time_axis().len(), table.time_axis().len());
    for (a, b) in again.time_axis().iter().zip(table.time_axis()) {
        assert!(approx(*a, *b, 1e-12));
    }
    assert_eq!(again.structural_channels(), table.structural_channels());
    assert_eq!(again.generic_channels(), table.generic_channels());

    let text = table.to_csv_text();
    let from_text =
        MotionTable::from_csv_text(&text, &IngestConfig::with_time_unit(TimeUnit::Second)).unwrap();
    assert_eq!(from_text.generic_channels(), table.generic_channels());
}

#[test]
fn source_convention_remaps_position_and_rotation() {
    let mut transforms = ChannelMap::new();
    transforms.insert("X_POS".into(), vec![1.0, 1.0]);
    transforms.insert("Y_POS".into(), vec![2.0, 2.0]);
    transforms.insert("Z_POS".into(), vec![3.0, 3.0]);
    let table = MotionTable::from_transforms("", vec![0.0, 1.0], transforms)
        .with_source_convention(true);
    let pos = table.evaluate(0.5, None).position.unwrap();
    assert_relative_eq!(pos.x.unwrap(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(pos.y.unwrap(), 3.0, epsilon = 1e-9);
    assert_relative_eq!(pos.z.unwrap(), 1.0, epsilon = 1e-9);
    assert!(table.evaluate(0.5, None).rotation.is_none());
}

#[test]
fn extent_metadata() {
    let table = ragged();
    assert_eq!(table.start_time(), 0.0);
    assert_eq!(table.end_time(), 4.0);
    assert_eq!(table.duration(), 4.0);
    assert_eq!(table.channel_len_max(), 5);
    assert_eq!(table.name(), "Unnamed Animation");
}

#[test]
fn nan_query_reads_first_samples() {
    let table = wave();
    let frame = table.evaluate(f64::NAN, Some("left"));
    assert_eq!(frame.position.unwrap().x, Some(0.0));
    assert_eq!(frame.rotation, Some(Quat::IDENTITY));
    assert_eq!(frame.joint("shoulder"), Some(0.0));
    assert!(frame.time.is_nan());
}
