//src/csim/cache_stats.rs

use std::fmt;


#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatistics {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}
impl CacheStatistics {
    /// NaN quand aucun accès n'a été simulé
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            f64::NAN
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }

    pub fn total_accesses(&self) -> usize {
        self.hits + self.misses
    }

    pub fn record(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }


}

impl fmt::Display for CacheStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache Statistics:\n\
             Hit Rate: {:.2}%\n\
             Miss Rate: {:.2}%\n\
             Hits: {}\n\
             Misses: {}\n\
             Evictions: {}\n",
            self.hit_rate() * 100.0,
            self.miss_rate() * 100.0,
            self.hits,
            self.misses,
            self.evictions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_empty_run_are_nan() {
        let stats = CacheStatistics::default();
        assert_eq!(stats.total_accesses(), 0);
        assert!(stats.hit_rate().is_nan());
        assert!(stats.miss_rate().is_nan());
    }

    #[test]
    fn test_rates() {
        let mut stats = CacheStatistics::default();
        stats.record(true);
        stats.record(false);
        stats.record(false);
        stats.record(false);
        assert_eq!(stats.total_accesses(), 4);
        assert!((stats.hit_rate() - 0.25).abs() < 1e-12);
        assert!((stats.miss_rate() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let stats = CacheStatistics { hits: 1, misses: 1, evictions: 0 };
        let text = stats.to_string();
        assert!(text.contains("Hit Rate: 50.00%"));
        assert!(text.contains("Evictions: 0"));
    }
}
