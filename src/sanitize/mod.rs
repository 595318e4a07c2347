//! Input Sanitization
//!
//! Numeric domain normalization shared by the engine components.
//!
//! Every public computation in this crate is total: out-of-domain input is
//! clamped or floored here rather than rejected.

/// Returns true when the value is NaN or infinite
pub fn is_invalid(x: f64) -> bool {
    x.is_nan() || x.is_infinite()
}

/// Replace a non-finite value with `fallback`
pub fn finite_or(x: f64, fallback: f64) -> f64 {
    if is_invalid(x) {
        fallback
    } else {
        x
    }
}

/// Clamp into `[min, max]`; NaN maps to `min`
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    if x.is_nan() {
        return min;
    }
    x.clamp(min, max)
}

/// Clamp into `[0, 1]`
pub fn clamp01(x: f64) -> f64 {
    clamp(x, 0.0, 1.0)
}

/// Floor a signed count at zero
pub fn non_negative(n: i64) -> u64 {
    n.max(0) as u64
}

/// Normalize a 1..5 self-rating into `[0, 1]`
pub fn normalize_confidence(confidence: f64) -> f64 {
    clamp01((confidence - 1.0) / 4.0)
}

/// Ratio with a zero denominator guard
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_invalid() {
        assert!(is_invalid(f64::NAN));
        assert!(is_invalid(f64::INFINITY));
        assert!(is_invalid(f64::NEG_INFINITY));
        assert!(!is_invalid(0.0));
        assert!(!is_invalid(-1e300));
    }

    #[test]
    fn test_finite_or() {
        assert_eq!(finite_or(f64::NAN, 0.5), 0.5);
        assert_eq!(finite_or(2.0, 0.5), 2.0);
    }

    #[test]
    fn test_clamp_nan_goes_to_min() {
        assert_eq!(clamp(f64::NAN, 0.3, 365.0), 0.3);
        assert_eq!(clamp(1000.0, 0.3, 365.0), 365.0);
        assert_eq!(clamp(f64::NEG_INFINITY, 0.1, 0.95), 0.1);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-7), 0);
        assert_eq!(non_negative(0), 0);
        assert_eq!(non_negative(12), 12);
    }

    #[test]
    fn test_normalize_confidence_bounds() {
        assert_eq!(normalize_confidence(1.0), 0.0);
        assert_eq!(normalize_confidence(3.0), 0.5);
        assert_eq!(normalize_confidence(5.0), 1.0);
        // out of range ratings clamp instead of failing
        assert_eq!(normalize_confidence(-4.0), 0.0);
        assert_eq!(normalize_confidence(9.0), 1.0);
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 4.0), 0.75);
    }
}
