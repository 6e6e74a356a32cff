//! Publish-history frequency histogram.

/// Counts of published posts bucketed by (day-of-week, hour).
///
/// Day-of-week uses the Postgres `EXTRACT(DOW ...)` convention:
/// 0 = Sunday through 6 = Saturday. Built fresh per request from up to
/// the channel's most recent published posts; never persisted.
#[derive(Debug, Clone, Default)]
pub struct PostHistogram {
    counts: [[u32; 24]; 7],
}

impl PostHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from (day-of-week, hour) buckets.
    ///
    /// Out-of-range buckets (dow > 6 or hour > 23) are ignored rather than
    /// panicking — the values come straight from SQL `EXTRACT` and a bad
    /// row should not take down the request.
    #[must_use]
    pub fn from_buckets<I>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut histogram = Self::new();
        for (dow, hour) in buckets {
            histogram.record(dow, hour);
        }
        histogram
    }

    pub fn record(&mut self, dow: u32, hour: u32) {
        if let Some(bucket) = self
            .counts
            .get_mut(dow as usize)
            .and_then(|day| day.get_mut(hour as usize))
        {
            *bucket += 1;
        }
    }

    #[must_use]
    pub fn count(&self, dow: u32, hour: u32) -> u32 {
        self.counts
            .get(dow as usize)
            .and_then(|day| day.get(hour as usize))
            .copied()
            .unwrap_or(0)
    }

    /// The largest bucket count, used to normalise history scores.
    #[must_use]
    pub fn max_count(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|day| day.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Normalised history signal in [0, 100]: `round(count / max * 100)`.
    ///
    /// Returns 0 for an empty histogram.
    #[must_use]
    pub fn history_score(&self, dow: u32, hour: u32) -> u32 {
        let max = self.max_count();
        if max == 0 {
            return 0;
        }
        let ratio = f64::from(self.count(dow, hour)) / f64::from(max);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (ratio * 100.0).round() as u32
        }
    }
}
