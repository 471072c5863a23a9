use chrono::{DateTime, TimeZone, Utc};

/// Maps a millisecond time domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (i64, i64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale over the min/max of `timestamps`.
    pub fn from_extent<I>(timestamps: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut lo = i64::MAX;
        let mut hi = i64::MIN;
        for t in timestamps {
            let ms = t.timestamp_millis();
            lo = lo.min(ms);
            hi = hi.max(ms);
        }
        if lo > hi {
            (lo, hi) = (0, 0);
        }
        Self::new((lo, hi), range)
    }

    pub fn domain(&self) -> (i64, i64) {
        self.domain
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// A degenerate domain maps everything to the middle of the range.
    pub fn map_ms(&self, ms: i64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let t = (ms - d0) as f64 / (d1 - d0) as f64;
        r0 + t * (r1 - r0)
    }

    /// Tick instants aligned to a calendar-friendly step, at most `max_ticks`.
    pub fn ticks(&self, max_ticks: usize) -> Vec<i64> {
        const STEPS_MS: [i64; 12] = [
            3_600_000,
            3 * 3_600_000,
            6 * 3_600_000,
            12 * 3_600_000,
            86_400_000,
            2 * 86_400_000,
            3 * 86_400_000,
            7 * 86_400_000,
            14 * 86_400_000,
            30 * 86_400_000,
            90 * 86_400_000,
            365 * 86_400_000,
        ];
        let (d0, d1) = self.domain;
        if max_ticks == 0 {
            return Vec::new();
        }
        if d1 <= d0 {
            return vec![d0];
        }
        let span = d1 - d0;
        let step = STEPS_MS
            .iter()
            .copied()
            .find(|step| span / step < max_ticks as i64)
            .unwrap_or(STEPS_MS[STEPS_MS.len() - 1]);
        let first = d0.div_euclid(step) * step + if d0.rem_euclid(step) == 0 { 0 } else { step };
        (0..)
            .map(|i| first + i * step)
            .take_while(|t| *t <= d1)
            .take(max_ticks)
            .collect()
    }
}

/// Format a tick instant as an axis label such as "Mar 01".
pub fn tick_label(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(t) => t.format("%b %d").to_string(),
        None => String::new(),
    }
}

/// Maps a value domain onto a pixel range, inverted for screen y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Extend the domain outward to round tick steps (about ten ticks).
    pub fn nice(mut self) -> Self {
        let (lo, hi) = self.domain;
        let span = hi - lo;
        if !span.is_finite() || span <= 0.0 {
            return self;
        }
        let step = nice_step(span / 10.0);
        self.domain = ((lo / step).floor() * step, (hi / step).ceil() * step);
        self
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_scale_maps_linearly() {
        let s = TimeScale::new((1_000, 3_000), (0.0, 100.0));
        assert_eq!(s.map_ms(1_000), 0.0);
        assert_eq!(s.map_ms(2_000), 50.0);
        assert_eq!(s.map_ms(3_000), 100.0);
    }

    #[test]
    fn degenerate_time_domain_maps_to_middle() {
        let s = TimeScale::new((5, 5), (0.0, 200.0));
        assert_eq!(s.map_ms(5), 100.0);
    }

    #[test]
    fn nice_extends_domain_outward() {
        let s = LinearScale::new((93.7, 101.2), (330.0, 0.0)).nice();
        assert_eq!(s.domain(), (93.0, 102.0));
        assert_eq!(s.map(93.0), 330.0);
        assert_eq!(s.map(102.0), 0.0);
    }

    #[test]
    fn daily_ticks_are_capped() {
        let day = 86_400_000;
        let s = TimeScale::new((0, 90 * day), (0.0, 1.0));
        let ticks = s.ticks(30);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= 30);
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(tick_label(0), "Jan 01");
    }
}
