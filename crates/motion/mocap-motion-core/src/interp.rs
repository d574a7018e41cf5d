//! Interpolation helpers:
//! - lerp (scalar linear blend)
//! - slerp_quat (spherical blend with shortest-arc correction)
//! - nlerp fallback for nearly parallel quaternions

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
fn dot4(a: [f64; 4], b: [f64; 4]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
pub fn normalize4(mut q: [f64; 4]) -> [f64; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Spherical linear interpolation of (x, y, z, w) quaternions.
///
/// Endpoints are returned untouched at `t == 0` and `t == 1`. The second
/// quaternion is negated when needed so the blend follows the shortest arc;
/// nearly parallel inputs fall back to a normalized linear blend.
pub fn slerp_quat(a: [f64; 4], b: [f64; 4], t: f64) -> [f64; 4] {
    if t == 0.0 {
        return a;
    }
    if t == 1.0 {
        return b;
    }

    let mut b = b;
    let mut cos_half = dot4(a, b);
    if cos_half < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
        cos_half = -cos_half;
    }
    if cos_half >= 1.0 {
        return a;
    }

    let sqr_sin_half = 1.0 - cos_half * cos_half;
    if sqr_sin_half <= f64::EPSILON {
        let s = 1.0 - t;
        return normalize4([
            s * a[0] + t * b[0],
            s * a[1] + t * b[1],
            s * a[2] + t * b[2],
            s * a[3] + t * b[3],
        ]);
    }

    let sin_half = sqr_sin_half.sqrt();
    let half = sin_half.atan2(cos_half);
    let ratio_a = ((1.0 - t) * half).sin() / sin_half;
    let ratio_b = (t * half).sin() / sin_half;
    [
        a[0] * ratio_a + b[0] * ratio_b,
        a[1] * ratio_a + b[1] * ratio_b,
        a[2] * ratio_a + b[2] * ratio_b,
        a[3] * ratio_a + b[3] * ratio_b,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx4(a: [f64; 4], b: [f64; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn lerp_midpoint() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
    }

    #[test]
    fn slerp_identity_stays_identity() {
        let id = [0.0, 0.0, 0.0, 1.0];
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert!(approx4(slerp_quat(id, id, t), id));
        }
    }

    #[test]
    fn slerp_halfway_about_z() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let half = std::f64::consts::FRAC_PI_4;
        let b = [0.0, 0.0, half.sin(), half.cos()];
        let q = slerp_quat(a, b, 0.5);
        let quarter = std::f64::consts::FRAC_PI_8;
        assert!(approx4(q, [0.0, 0.0, quarter.sin(), quarter.cos()]));
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 0.0, 0.0, -1.0];
        let q = slerp_quat(a, b, 0.5);
        assert!(approx4(q, a));
    }
}
