// angle.rs: degree arithmetic shared by every driver

/// Bound `v` to `[lo, hi]`. A NaN `v` collapses to `lo`.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Replace a non-finite value with `fallback`.
#[inline]
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// Map any degree value to `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_angle(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Map any degree value to `(-180, 180]`. Non-finite input maps to 0.
///
/// Values already inside the range are returned untouched, which keeps the
/// function exactly idempotent.
pub fn wrap_angle_signed(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    if deg > -180.0 && deg <= 180.0 {
        return deg;
    }
    let a = normalize_angle(deg + 180.0) - 180.0;
    if a <= -180.0 {
        a + 360.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamp_bounds_value() {
        assert_eq!(clamp(5.0, -2.0, 2.0), 2.0);
        assert_eq!(clamp(-5.0, -2.0, 2.0), -2.0);
        assert_eq!(clamp(0.4, -2.0, 2.0), 0.4);
        assert_eq!(clamp(f64::NAN, -2.0, 2.0), -2.0);
    }

    #[test]
    fn wrap_edges() {
        assert_eq!(wrap_angle_signed(180.0), 180.0);
        assert_eq!(wrap_angle_signed(-180.0), 180.0);
        assert_eq!(wrap_angle_signed(540.0), 180.0);
        assert_eq!(wrap_angle_signed(190.0), -170.0);
        assert_eq!(wrap_angle_signed(-190.0), 170.0);
        assert_eq!(wrap_angle_signed(720.0), 0.0);
        assert_eq!(wrap_angle_signed(f64::INFINITY), 0.0);
    }

    #[test]
    fn normalize_edges() {
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(-1e-20), 0.0);
        assert_eq!(normalize_angle(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn wrap_stays_in_half_open_range(d in -1.0e9f64..1.0e9) {
            let w = wrap_angle_signed(d);
            prop_assert!(w > -180.0 && w <= 180.0, "{} -> {}", d, w);
        }

        #[test]
        fn wrap_is_idempotent(d in -1.0e9f64..1.0e9) {
            let w = wrap_angle_signed(d);
            prop_assert_eq!(wrap_angle_signed(w), w);
        }

        #[test]
        fn normalize_stays_in_range(d in -1.0e9f64..1.0e9) {
            let n = normalize_angle(d);
            prop_assert!((0.0..360.0).contains(&n), "{} -> {}", d, n);
        }
    }
}
