//src/csim/sweeps.rs

use crate::csim::cache_configs::{Address, CacheGeometry, Organization, ReplacementPolicy};
use crate::csim::caches::CacheModel;
use crate::csim::reports::SimulationReport;
use crate::csim::sim_errors::{SimError, SimResult};

/// Plage de tailles de cache à balayer (taille max exclue), doublée à chaque pas.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub min_cache_size: usize,
    pub max_cache_size: usize,
    pub block_size: usize,
    pub set_associative_ways: usize,
    pub policies: Vec<ReplacementPolicy>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_cache_size: 128,        // 128 octets
            max_cache_size: 8192,       // jusqu'à 4KB inclus
            block_size: 4,              // blocs de 4 octets
            set_associative_ways: 4,    // 4-way set associative
            policies: vec![ReplacementPolicy::LRU, ReplacementPolicy::FIFO],
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.min_cache_size == 0 || self.min_cache_size >= self.max_cache_size {
            return Err(SimError::config_error(&format!(
                "invalid cache size range [{}, {})",
                self.min_cache_size, self.max_cache_size
            )));
        }
        if self.policies.is_empty() {
            return Err(SimError::config_error("sweep needs at least one replacement policy"));
        }
        Ok(())
    }

    pub fn cache_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut size = self.min_cache_size;
        while size > 0 && size < self.max_cache_size {
            sizes.push(size);
            size = size.saturating_mul(2);
        }
        sizes
    }
}

/// Une simulation = un modèle neuf. Réutilisé seulement pour les politiques d'une même géométrie.
fn run_geometry(
    geometry: CacheGeometry,
    organization: Organization,
    policies: &[Option<ReplacementPolicy>],
    addresses: &[Address],
    reports: &mut Vec<SimulationReport>,
) -> SimResult<()> {
    let mut model = CacheModel::new(geometry)?;
    for &policy in policies {
        let statistics = model.simulate(addresses, organization, policy)?;
        reports.push(SimulationReport::new(organization, policy, &geometry, &statistics));
    }
    Ok(())
}

/// Balayage complet: fully associative, puis direct mapped, puis set associative.
pub fn run_sweep(config: &SweepConfig, addresses: &[Address]) -> SimResult<Vec<SimulationReport>> {
    config.validate()?;

    let sizes = config.cache_sizes();
    let policies: Vec<Option<ReplacementPolicy>> =
        config.policies.iter().copied().map(Some).collect();
    let mut reports = Vec::with_capacity(sizes.len() * (2 * policies.len() + 1));

    for &size in &sizes {
        let geometry = CacheGeometry::from_cache_size(
            Organization::FullyAssociative,
            size,
            config.block_size,
            0,
        )?;
        run_geometry(geometry, Organization::FullyAssociative, &policies, addresses, &mut reports)?;
    }

    for &size in &sizes {
        let geometry =
            CacheGeometry::from_cache_size(Organization::DirectMapped, size, config.block_size, 1)?;
        run_geometry(geometry, Organization::DirectMapped, &[None], addresses, &mut reports)?;
    }

    for &size in &sizes {
        let geometry = CacheGeometry::from_cache_size(
            Organization::SetAssociative,
            size,
            config.block_size,
            config.set_associative_ways,
        )?;
        run_geometry(geometry, Organization::SetAssociative, &policies, addresses, &mut reports)?;
    }

    Ok(reports)
}
