use std::collections::VecDeque;

/// Mean of the last `period` values, or 0 when fewer than `period` values
/// are supplied. Never a partial average.
pub fn trailing_sma(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return 0.0;
    }
    let window = &values[values.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Rolling simple moving average over a fixed window.
#[derive(Debug, Clone)]
pub struct RollingSma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl RollingSma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
        }
    }

    /// Push a value; returns the average once the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.window.len() == self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }
        self.window.push_back(value);
        self.sum += value;
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.window.len() == self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }
}

/// SMA aligned with `closes`: `None` until the window first fills.
pub fn sma_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut sma = RollingSma::new(period);
    closes.iter().map(|&c| sma.push(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_sma_is_zero_below_window() {
        assert_eq!(trailing_sma(&[], 5), 0.0);
        assert_eq!(trailing_sma(&[1.0, 2.0, 3.0, 4.0], 5), 0.0);
    }

    #[test]
    fn trailing_sma_uses_last_window_only() {
        let v = trailing_sma(&[100.0, 1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert!((v - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rolling_matches_naive_after_many_pushes() {
        let mut sma = RollingSma::new(10);
        let mut seen = Vec::new();
        for i in 0..5_000u64 {
            let val = (i as f64) * 0.1 + 0.01;
            seen.push(val);
            let rolled = sma.push(val);
            if seen.len() < 10 {
                assert_eq!(rolled, None);
            } else {
                let naive = trailing_sma(&seen, 10);
                assert!((rolled.unwrap() - naive).abs() < 1e-8, "drift at i={}", i);
            }
        }
    }

    #[test]
    fn series_has_leading_nones() {
        let out = sma_series(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!((out[2].unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((out[3].unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "SMA period must be > 0")]
    fn zero_period_panics() {
        RollingSma::new(0);
    }
}
