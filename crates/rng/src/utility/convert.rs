/// Converts a `u64` value into a `f32` value in the range `[0.0, 1.0)`.
///
/// Only the 24 most significant bits are used, which is exactly the precision of the mantissa.
#[inline]
pub fn f32_from_u64_01(x: u64) -> f32 {
    (x >> 40) as f32 * (1.0 / (1u64 << 24) as f32)
}

/// Converts a `u64` value into a `f64` value in the range `[0.0, 1.0)`.
#[inline]
pub fn f64_from_u64_01(x: u64) -> f64 {
    (x >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Converts a `u64` value into a `f32` value in the range `(-1.0, 1.0)`.
#[inline]
pub fn f32_from_u64_11(x: u64) -> f32 {
    // `f32_from_u64_01` only looks at the top 24 bits, the lowest bit is free for the sign.
    if x & 1 != 0 {
        -f32_from_u64_01(x)
    } else {
        f32_from_u64_01(x)
    }
}

/// Returns the largest `i32` value that is less than or equal to `x`.
#[inline]
pub fn floor_i32(x: f32) -> i32 {
    let i = x as i32;
    if x < i as f32 {
        i - 1
    } else {
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_negative_integers() {
        assert_eq!(floor_i32(-1.0), -1);
        assert_eq!(floor_i32(-0.5), -1);
        assert_eq!(floor_i32(2.999), 2);
        assert_eq!(floor_i32(0.0), 0);
    }

    #[test]
    fn unit_conversions_stay_below_one() {
        assert!(f32_from_u64_01(u64::MAX) < 1.0);
        assert!(f64_from_u64_01(u64::MAX) < 1.0);
        assert_eq!(f32_from_u64_01(0), 0.0);
    }
}
