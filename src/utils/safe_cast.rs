//! Safe casting utilities for screen coordinates

/// Clamp and convert f64 to i16 for pixel coordinates, rounding to nearest
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i16_clamp(value: f64, min: i16, max: i16) -> i16 {
    // Ensure min <= max
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.round().clamp(f64::from(min), f64::from(max));
    (clamped as i16).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_f64_to_i16_clamp() {
        assert_eq!(f64_to_i16_clamp(50.4, 0, 100), 50);
        assert_eq!(f64_to_i16_clamp(50.6, 0, 100), 51);
        assert_eq!(f64_to_i16_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i16_clamp(150.0, 0, 100), 100);
        assert_eq!(f64_to_i16_clamp(f64::NAN, 0, 100), 0);
        assert_eq!(f64_to_i16_clamp(f64::INFINITY, 0, 100), 0);

        // Swapped bounds
        assert_eq!(f64_to_i16_clamp(150.0, 100, 0), 100);
    }

    proptest! {
        #[test]
        fn prop_f64_to_i16_clamp_always_within_bounds(
            value in any::<f64>(),
            min in any::<i16>(),
            max in any::<i16>()
        ) {
            let (min, max) = if min <= max { (min, max) } else { (max, min) };
            let result = f64_to_i16_clamp(value, min, max);
            prop_assert!(result >= min);
            prop_assert!(result <= max);
        }

        #[test]
        fn prop_f64_to_i16_clamp_preserves_in_range(value in any::<i16>()) {
            prop_assert_eq!(f64_to_i16_clamp(f64::from(value), i16::MIN, i16::MAX), value);
        }
    }
}
