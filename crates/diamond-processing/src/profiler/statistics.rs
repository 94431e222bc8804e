//! Descriptive statistics over plain `f64` slices.

use crate::types::ColumnStats;

/// First quartile, median and third quartile of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    /// Compute quartiles of unsorted values. `None` for an empty slice.
    pub fn of(values: &[f64]) -> Option<Self> {
        let sorted = sorted_copy(values);
        Some(Self {
            q1: percentile(&sorted, 25.0)?,
            median: percentile(&sorted, 50.0)?,
            q3: percentile(&sorted, 75.0)?,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Fence `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub fn fences(&self, multiplier: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - multiplier * iqr, self.q3 + multiplier * iqr)
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of sorted values using linear interpolation between closest
/// ranks (NumPy compatible).
pub fn percentile(sorted_values: &[f64], p: f64) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted_values[0]);
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        Some(sorted_values[lower])
    } else {
        Some(sorted_values[lower] + frac * (sorted_values[upper] - sorted_values[lower]))
    }
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Pearson correlation of two equally long slices.
///
/// `None` when fewer than two pairs exist or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Build the `describe()` row for one column from its non-null values.
pub fn describe(column: &str, values: &[f64]) -> ColumnStats {
    let sorted = sorted_copy(values);
    ColumnStats {
        column: column.to_string(),
        count: values.len(),
        mean: mean(values),
        std: sample_std(values),
        min: sorted.first().copied(),
        q1: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q3: percentile(&sorted, 75.0),
        max: sorted.last().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_copy_is_total_over_negative_zero_and_nan() {
        let sorted = sorted_copy(&[3.0, f64::NAN, -0.0, 1.0, 0.0]);
        assert_eq!(&sorted[..4], &[-0.0, 0.0, 1.0, 3.0]);
        assert!(sorted[0].is_sign_negative());
        assert!(sorted[4].is_nan());
    }

    // ==================== quartile tests ====================

    #[test]
    fn test_quartiles_of_small_column() {
        // [1,2,3,4,100]: Q1 = 2, Q3 = 4, IQR = 2, fences = [-1, 7]
        let quartiles = Quartiles::of(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(quartiles.q1, 2.0);
        assert_eq!(quartiles.median, 3.0);
        assert_eq!(quartiles.q3, 4.0);
        assert_eq!(quartiles.iqr(), 2.0);
        assert_eq!(quartiles.fences(1.5), (-1.0, 7.0));
    }

    #[test]
    fn test_quartiles_unsorted_input() {
        let quartiles = Quartiles::of(&[100.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert_eq!(quartiles.q1, 2.0);
        assert_eq!(quartiles.q3, 4.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        // rank = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 25.0), Some(1.75));
        assert_eq!(percentile(&sorted, 50.0), Some(2.5));
        assert_eq!(percentile(&sorted, 75.0), Some(3.25));
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 25.0), Some(7.0));
        assert!(Quartiles::of(&[]).is_none());
    }

    // ==================== mean / std tests ====================

    #[test]
    fn test_mean_and_std() {
        // Mean = 3, sample variance = 10 / 4 = 2.5
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean(&values), Some(3.0));
        assert!((sample_std(&values).unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_needs_two_values() {
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[5.0, 5.0, 5.0]), Some(0.0));
        assert_eq!(mean(&[]), None);
    }

    // ==================== pearson tests ====================

    #[test]
    fn test_pearson_perfect_linear() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let inverse = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &inverse).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined() {
        assert_eq!(pearson(&[1.0, 2.0], &[3.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }

    // ==================== describe tests ====================

    #[test]
    fn test_describe_column() {
        let stats = describe("EXIT_SPEED", &[90.0, 100.0, 80.0]);
        assert_eq!(stats.column, "EXIT_SPEED");
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(90.0));
        assert_eq!(stats.std, Some(10.0));
        assert_eq!(stats.min, Some(80.0));
        assert_eq!(stats.q1, Some(85.0));
        assert_eq!(stats.median, Some(90.0));
        assert_eq!(stats.q3, Some(95.0));
        assert_eq!(stats.max, Some(100.0));
    }

    #[test]
    fn test_describe_empty_column() {
        let stats = describe("HANG_TIME", &[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.min, None);
        assert_eq!(stats.max, None);
    }
}
