//src/csim/reports.rs

use std::fmt;

use chrono::{DateTime, Utc};

use crate::csim::cache_configs::{CacheGeometry, Organization, ReplacementPolicy};
use crate::csim::cache_stats::CacheStatistics;

/// Résultat d'une simulation, tel que reçu par le reporter.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub organization: Organization,
    pub replacement_policy: Option<ReplacementPolicy>,
    pub ways: usize,
    pub cache_size_bytes: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub miss_rate: f64,
    pub generated_at: DateTime<Utc>,
}

impl SimulationReport {
    pub fn new(
        organization: Organization,
        replacement_policy: Option<ReplacementPolicy>,
        geometry: &CacheGeometry,
        statistics: &CacheStatistics,
    ) -> Self {
        // Pas de politique pour le direct mapped, même si l'appelant en a fourni une
        let replacement_policy = if organization.requires_policy() {
            replacement_policy
        } else {
            None
        };
        Self {
            organization,
            replacement_policy,
            ways: geometry.ways,
            cache_size_bytes: geometry.cache_size(),
            hits: statistics.hits,
            misses: statistics.misses,
            hit_rate: statistics.hit_rate(),
            miss_rate: statistics.miss_rate(),
            generated_at: Utc::now(),
        }
    }

    pub fn policy_label(&self) -> String {
        self.replacement_policy
            .map_or("none".to_string(), |p| p.to_string())
    }

    pub fn title(&self) -> String {
        match (self.organization, self.replacement_policy) {
            (Organization::SetAssociative, Some(policy)) => {
                format!("{} {} Way Set Associative Cache", policy, self.ways)
            }
            (organization, Some(policy)) => format!("{} {} Cache", policy, organization),
            (organization, None) => format!("{} Cache", organization),
        }
    }

    pub fn csv_header() -> &'static str {
        "organization,policy,ways,cache_size_bytes,hits,misses,hit_rate,miss_rate,generated_at"
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{:.6},{:.6},{}",
            self.organization,
            self.policy_label(),
            self.ways,
            self.cache_size_bytes,
            self.hits,
            self.misses,
            self.hit_rate,
            self.miss_rate,
            self.generated_at.to_rfc3339()
        )
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\
             Cache Size: {}B\n\
             Hit Rate: {}\n\
             Miss Rate: {}\n",
            self.title(),
            self.cache_size_bytes,
            format_rate(self.hit_rate),
            format_rate(self.miss_rate)
        )
    }
}

/// Six chiffres significatifs, zéros de fin retirés (0.333333, 0.5, 1, 1e-05)
fn format_rate(rate: f64) -> String {
    if !rate.is_finite() {
        return if rate.is_nan() { "NaN".to_string() } else { rate.to_string() };
    }
    if rate == 0.0 {
        return "0".to_string();
    }

    // L'exposant est lu après arrondi, pour que 0.9999999 donne bien "1"
    let scientific = format!("{:.5e}", rate);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= 6 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (5 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, rate)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hits: usize, misses: usize) -> CacheStatistics {
        CacheStatistics {
            hits,
            misses,
            evictions: 0,
        }
    }

    #[test]
    fn test_fully_associative_display() {
        let report = SimulationReport::new(
            Organization::FullyAssociative,
            Some(ReplacementPolicy::LRU),
            &CacheGeometry::fully_associative(32, 4),
            &stats(1, 1),
        );
        assert_eq!(
            report.to_string(),
            "LRU Fully Associative Cache\nCache Size: 128B\nHit Rate: 0.5\nMiss Rate: 0.5\n"
        );
    }

    #[test]
    fn test_rates_use_six_significant_digits() {
        let report = SimulationReport::new(
            Organization::SetAssociative,
            Some(ReplacementPolicy::LRU),
            &CacheGeometry::set_associative(8, 4, 4),
            &stats(1, 2),
        );
        assert!(report
            .to_string()
            .ends_with("Hit Rate: 0.333333\nMiss Rate: 0.666667\n"));

        assert_eq!(format_rate(1.0), "1");
        assert_eq!(format_rate(0.0), "0");
        assert_eq!(format_rate(0.25), "0.25");
        assert_eq!(format_rate(0.99999999), "1");
        assert_eq!(format_rate(0.0001), "0.0001");
        assert_eq!(format_rate(0.00001234), "1.234e-05");
        assert_eq!(format_rate(f64::NAN), "NaN");
    }

    #[test]
    fn test_set_associative_title() {
        let report = SimulationReport::new(
            Organization::SetAssociative,
            Some(ReplacementPolicy::FIFO),
            &CacheGeometry::set_associative(8, 4, 4),
            &stats(3, 1),
        );
        assert_eq!(report.title(), "FIFO 4 Way Set Associative Cache");
        assert_eq!(report.cache_size_bytes, 128);
    }

    #[test]
    fn test_direct_mapped_drops_policy() {
        let report = SimulationReport::new(
            Organization::DirectMapped,
            Some(ReplacementPolicy::LRU),
            &CacheGeometry::direct_mapped(64, 4),
            &stats(0, 2),
        );
        assert_eq!(report.title(), "Direct Mapped Cache");
        assert_eq!(report.policy_label(), "none");
        assert!(report
            .to_csv_row()
            .starts_with("Direct Mapped,none,1,256,0,2,0.000000,1.000000,"));
    }

    #[test]
    fn test_empty_run_reports_nan() {
        let report = SimulationReport::new(
            Organization::DirectMapped,
            None,
            &CacheGeometry::direct_mapped(4, 4),
            &stats(0, 0),
        );
        assert!(report.hit_rate.is_nan());
        assert!(report.to_string().contains("Hit Rate: NaN"));
        assert_eq!(SimulationReport::csv_header().split(',').count(), 9);
        assert_eq!(report.to_csv_row().split(',').count(), 9);
    }
}
