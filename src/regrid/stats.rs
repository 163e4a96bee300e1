use ndarray::Array3;

use super::BandOutput;

/// Summary of one regridded output array: NaN coverage and the range of
/// finite values. Widespread NaN is a data-quality signal for downstream
/// consumers, not a regrid failure.
#[derive(Debug, Clone)]
pub struct FieldStats {
    pub name: String,
    pub total: usize,
    pub nan_count: usize,
    /// Minimum finite value; NaN when nothing was finite
    pub min: f64,
    /// Maximum finite value; NaN when nothing was finite
    pub max: f64,
    /// Mean of finite values; NaN when nothing was finite
    pub mean: f64,
}

impl FieldStats {
    pub fn from_array(name: &str, array: &Array3<f64>) -> Self {
        let total = array.len();
        let mut nan_count = 0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in array.iter() {
            if value.is_nan() {
                nan_count += 1;
            } else {
                min = min.min(value);
                max = max.max(value);
                sum += value;
            }
        }
        let finite = total - nan_count;
        let (min, max, mean) = if finite == 0 {
            (f64::NAN, f64::NAN, f64::NAN)
        } else {
            (min, max, sum / finite as f64)
        };
        Self {
            name: name.to_string(),
            total,
            nan_count,
            min,
            max,
            mean,
        }
    }

    pub fn nan_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.nan_count as f64 / self.total as f64
        }
    }
}

impl std::fmt::Display for FieldStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} ({:.2}%) NaN, finite min={:.4}, max={:.4}, mean={:.4}",
            self.name,
            self.nan_count,
            self.total,
            100.0 * self.nan_fraction(),
            self.min,
            self.max,
            self.mean
        )
    }
}

/// Per-field statistics for one band's output, sorted by field name.
pub fn band_statistics(output: &BandOutput) -> Vec<FieldStats> {
    let mut stats: Vec<FieldStats> = output
        .iter()
        .map(|(name, array)| FieldStats::from_array(name, array))
        .collect();
    stats.sort_by(|a, b| a.name.cmp(&b.name));
    stats
}
