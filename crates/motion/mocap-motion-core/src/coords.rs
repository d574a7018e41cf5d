//! Change of basis from the robotics (Z-up, X-forward) convention into the
//! renderer's Y-up convention.

use nalgebra::{Rotation3, Vector3};

use crate::frame::{Axes3, Frame, Quat};

const AXIS_EPSILON: f64 = 1e-8;

/// Re-express a rotation by converting it to axis/angle, cycling the axis
/// `(x, y, z) -> (y, z, x)` and rebuilding the quaternion.
pub fn rotation_to_canonical(q: Quat) -> Quat {
    let w = q.w.clamp(-1.0, 1.0);
    let angle = 2.0 * w.acos();
    let denom = (1.0 - w * w).sqrt().max(AXIS_EPSILON);
    let axis = Vector3::new(q.x / denom, q.y / denom, q.z / denom);
    let cycled = Vector3::new(axis.y, axis.z, axis.x);
    let half = angle / 2.0;
    let s = half.sin();
    Quat::new(cycled.x * s, cycled.y * s, cycled.z * s, half.cos())
}

/// Swap Y and Z, mirror X, then turn a quarter about +Y.
pub fn position_to_canonical(p: [f64; 3]) -> [f64; 3] {
    let swapped = Vector3::new(-p[0], p[2], p[1]);
    let turn = Rotation3::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
    let out = turn * swapped;
    [out.x, out.y, out.z]
}

/// Convert the position and rotation of `frame` in place. Absent fields stay
/// absent; a partial position has its missing axes read as zero.
pub fn frame_to_canonical(frame: &mut Frame) {
    if let Some(rotation) = frame.rotation {
        frame.rotation = Some(rotation_to_canonical(rotation));
    }
    if let Some(position) = frame.position {
        let [x, y, z] = position_to_canonical(position.or_zero());
        frame.position = Some(Axes3::new(x, y, z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn position_axes_cycle() {
        let [x, y, z] = position_to_canonical([1.0, 2.0, 3.0]);
        assert!(close(x, 2.0));
        assert!(close(y, 3.0));
        assert!(close(z, 1.0));
    }

    #[test]
    fn identity_rotation_survives() {
        let q = rotation_to_canonical(Quat::IDENTITY);
        assert!(close(q.w, 1.0));
        assert!(close(q.length(), 1.0));
    }

    #[test]
    fn rotation_axis_cycles() {
        // Quarter turn about robotics Z becomes a quarter turn about Y.
        let h = std::f64::consts::FRAC_PI_4;
        let q = rotation_to_canonical(Quat::new(0.0, 0.0, h.sin(), h.cos()));
        assert!(close(q.x, 0.0));
        assert!(close(q.y, h.sin()));
        assert!(close(q.z, 0.0));
        assert!(close(q.w, h.cos()));
    }

    #[test]
    fn absent_fields_are_left_alone() {
        let mut frame = Frame::default();
        frame_to_canonical(&mut frame);
        assert!(frame.position.is_none());
        assert!(frame.rotation.is_none());
    }
}
