/// Descriptive statistics for a sample of `f64` values.
///
/// Summarizes a dataset with the measures the optimizer needs: the extremes
/// (for min–max normalization) and mean/standard deviation (for convergence
/// reporting).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The population standard deviation of the sample.
    pub std_dev: f64,
}

impl SampleStats {
    /// Computes statistics over an iterator of values.
    ///
    /// Returns `None` if the iterator yields no values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fantaroster_stats::SampleStats;
    /// let stats = SampleStats::new([2.0, 4.0, 6.0]).unwrap();
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 6.0);
    /// assert_eq!(stats.mean, 4.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in &values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        #[expect(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = sum / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Returns the spread between the maximum and minimum values.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Min–max normalizes `value` against this sample's bounds.
    ///
    /// Maps the sample minimum to 0.0 and the sample maximum to 1.0. Returns
    /// `None` when the range is degenerate (all sampled values equal, up to a
    /// scale-relative epsilon), since no meaningful scaling exists; callers
    /// decide what a non-discriminating dimension is worth.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fantaroster_stats::SampleStats;
    /// let stats = SampleStats::new([10.0, 20.0]).unwrap();
    /// assert_eq!(stats.normalized(15.0), Some(0.5));
    ///
    /// let flat = SampleStats::new([3.0, 3.0, 3.0]).unwrap();
    /// assert_eq!(flat.normalized(3.0), None);
    /// ```
    #[must_use]
    pub fn normalized(&self, value: f64) -> Option<f64> {
        let range = self.range();
        if range <= f64::EPSILON * self.max.abs().max(1.0) {
            return None;
        }
        Some((value - self.min) / range)
    }
}
