use crate::CoreError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::NonPositive { what, value: v })
    }
}

/// `n` evenly spaced values over `[start, end]`, both ends included.
///
/// The last value is pinned to `end` so accumulated rounding never pushes
/// the grid past the interval.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|k| start + step * k as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(1e-9, "c").is_ok());
        assert!(matches!(
            ensure_positive(0.0, "c"),
            Err(CoreError::NonPositive { what: "c", .. })
        ));
        assert!(ensure_positive(-1.0, "c").is_err());
        assert!(ensure_positive(f64::INFINITY, "c").is_err());
    }

    #[test]
    fn linspace_endpoints_and_spacing() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_non_decreasing(end in 0.0_f64..1e4, n in 2_usize..500) {
            let v = linspace(0.0, end, n);
            prop_assert_eq!(v.len(), n);
            prop_assert!(v.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(v[n - 1], end);
        }
    }
}
