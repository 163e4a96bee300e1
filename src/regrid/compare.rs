use ndarray::Array3;

use crate::error::RegridError;

/// Element-wise comparison of two same-shaped field arrays. Positions
/// where either side is NaN are skipped and counted separately.
#[derive(Debug, Clone, Default)]
pub struct DiffStats {
    /// Positions compared (finite in both arrays)
    pub compared: usize,
    /// Positions skipped because either side was NaN
    pub skipped: usize,
    /// Mean of (a - b)
    pub bias: f64,
    /// Mean absolute difference
    pub mae: f64,
    /// Root mean square difference
    pub rmse: f64,
    /// Largest absolute difference
    pub max_abs: f64,
}

/// Compare two regridded fields of identical shape.
pub fn compare_fields(a: &Array3<f64>, b: &Array3<f64>) -> Result<DiffStats, RegridError> {
    if a.dim() != b.dim() {
        return Err(RegridError::ShapeMismatch {
            context: "field comparison".to_string(),
            expected: a.shape().to_vec(),
            found: b.shape().to_vec(),
        });
    }
    let mut stats = DiffStats::default();
    let mut sum = 0.0;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va.is_nan() || vb.is_nan() {
            stats.skipped += 1;
            continue;
        }
        let diff = va - vb;
        stats.compared += 1;
        sum += diff;
        abs_sum += diff.abs();
        sq_sum += diff * diff;
        stats.max_abs = stats.max_abs.max(diff.abs());
    }
    if stats.compared > 0 {
        let n = stats.compared as f64;
        stats.bias = sum / n;
        stats.mae = abs_sum / n;
        stats.rmse = (sq_sum / n).sqrt();
    }
    Ok(stats)
}

impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} compared, {} skipped, bias={:.6}, mae={:.6}, rmse={:.6}, max|diff|={:.6}",
            self.compared, self.skipped, self.bias, self.mae, self.rmse, self.max_abs
        )
    }
}
