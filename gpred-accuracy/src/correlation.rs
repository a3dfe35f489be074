use crate::errors::{AccuracyError, Result};

/// Pearson product-moment correlation coefficient between `x` and `y`.
///
/// Returns NaN when fewer than two observations are given or either series
/// is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(AccuracyError::LengthMismatch(x.len(), y.len()));
    }
    if x.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = x.len() as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return Ok(f64::NAN);
    }
    Ok((cov / denom).clamp(-1.0, 1.0))
}

/// `log2(v + 1)` of every value.
pub fn log2p1(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| (v + 1.0).log2()).collect()
}

/// Pearson correlation of `log2(target + 1)` against `log2(pred + 1)`.
pub fn log_pearson(targets: &[f64], preds: &[f64]) -> Result<f64> {
    pearson(&log2p1(targets), &log2p1(preds))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_perfect_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[rstest]
    #[case(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0])]
    #[case(&[0.0, 0.0, 0.0, 0.0], &[0.0, 0.0, 0.0, 0.0])]
    #[case(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0])]
    #[case(&[1.0], &[1.0])]
    #[case(&[], &[])]
    fn test_undefined_is_nan(#[case] x: &[f64], #[case] y: &[f64]) {
        assert!(pearson(x, y).unwrap().is_nan());
    }

    #[rstest]
    fn test_log_pearson_all_zero_is_nan() {
        assert!(log_pearson(&[0.0; 4], &[0.0; 4]).unwrap().is_nan());
    }

    #[rstest]
    fn test_length_mismatch() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(AccuracyError::LengthMismatch(2, 1))
        ));
    }

    #[rstest]
    fn test_log2p1() {
        assert_eq!(log2p1(&[0.0, 1.0, 3.0, 7.0]), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[rstest]
    fn test_log_pearson_uses_log_scale() {
        // linear in log space, not in raw space
        let targets = [0.0, 1.0, 3.0, 7.0];
        let preds = [1.0, 3.0, 7.0, 15.0];
        let r = log_pearson(&targets, &preds).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }
}
