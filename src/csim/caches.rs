//src/csim/caches.rs

use std::collections::HashMap;
use std::fmt;

use crate::csim::addresses::{AddressDecoder, DecodedAddress};
use crate::csim::cache_configs::{Address, CacheGeometry, Organization, ReplacementPolicy, Tag};
use crate::csim::cache_stats::CacheStatistics;
use crate::csim::replacements::CacheSet;
use crate::csim::sim_errors::{SimError, SimResult};
use crate::debug::{TraceEvent, Tracer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAccessResult {
    Hit,
    Miss,
}

/// Capacité commune aux trois organisations de cache.
pub trait CacheOrganization: fmt::Debug {
    /// Hit: met à jour la récence avec `stamp`. Retourne false sur un miss.
    fn lookup(&mut self, decoded: &DecodedAddress, stamp: u64) -> bool;

    /// Insère le tag d'un miss, en évinçant si nécessaire. Retourne le tag déplacé.
    fn insert(&mut self, decoded: &DecodedAddress, stamp: u64) -> Option<Tag>;

    /// Evince une ligne du set `index`
    fn evict(&mut self, index: usize) -> Option<Tag>;

    fn resident_count(&self) -> usize;

    fn reset(&mut self);

    fn organization(&self) -> Organization;
}

#[derive(Debug)]
pub struct FullyAssociativeCache {
    set: CacheSet,
    policy: ReplacementPolicy,
}

impl FullyAssociativeCache {
    pub fn new(capacity: usize, policy: ReplacementPolicy) -> Self {
        Self {
            set: CacheSet::new(capacity),
            policy,
        }
    }
}

impl CacheOrganization for FullyAssociativeCache {
    fn lookup(&mut self, decoded: &DecodedAddress, stamp: u64) -> bool {
        self.set.touch(decoded.tag, stamp)
    }

    fn insert(&mut self, decoded: &DecodedAddress, stamp: u64) -> Option<Tag> {
        let evicted = if self.set.is_full() {
            self.evict(0)
        } else {
            None
        };
        self.set.insert(decoded.tag, stamp);
        evicted
    }

    fn evict(&mut self, _index: usize) -> Option<Tag> {
        self.set.evict(self.policy)
    }

    fn resident_count(&self) -> usize {
        self.set.len()
    }

    fn reset(&mut self) {
        self.set.clear();
    }

    fn organization(&self) -> Organization {
        Organization::FullyAssociative
    }
}

/// Une ligne par index. Un tag différent écrase l'ancien sans politique de remplacement.
#[derive(Debug, Default)]
pub struct DirectMappedCache {
    lines: HashMap<usize, Tag>,
}

impl DirectMappedCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheOrganization for DirectMappedCache {
    fn lookup(&mut self, decoded: &DecodedAddress, _stamp: u64) -> bool {
        self.lines.get(&decoded.index) == Some(&decoded.tag)
    }

    fn insert(&mut self, decoded: &DecodedAddress, _stamp: u64) -> Option<Tag> {
        self.lines.insert(decoded.index, decoded.tag)
    }

    fn evict(&mut self, index: usize) -> Option<Tag> {
        self.lines.remove(&index)
    }

    fn resident_count(&self) -> usize {
        self.lines.len()
    }

    fn reset(&mut self) {
        self.lines.clear();
    }

    fn organization(&self) -> Organization {
        Organization::DirectMapped
    }
}

/// Sets créés à la demande au premier accès, chacun avec ses propres trackers.
#[derive(Debug)]
pub struct SetAssociativeCache {
    sets: HashMap<usize, CacheSet>,
    ways: usize,
    policy: ReplacementPolicy,
}

impl SetAssociativeCache {
    pub fn new(ways: usize, policy: ReplacementPolicy) -> Self {
        Self {
            sets: HashMap::new(),
            ways,
            policy,
        }
    }
}

impl CacheOrganization for SetAssociativeCache {
    fn lookup(&mut self, decoded: &DecodedAddress, stamp: u64) -> bool {
        self.sets
            .get_mut(&decoded.index)
            .map_or(false, |set| set.touch(decoded.tag, stamp))
    }

    fn insert(&mut self, decoded: &DecodedAddress, stamp: u64) -> Option<Tag> {
        let ways = self.ways;
        let full = self
            .sets
            .entry(decoded.index)
            .or_insert_with(|| CacheSet::new(ways))
            .is_full();

        let evicted = if full { self.evict(decoded.index) } else { None };
        if let Some(set) = self.sets.get_mut(&decoded.index) {
            set.insert(decoded.tag, stamp);
        }
        evicted
    }

    fn evict(&mut self, index: usize) -> Option<Tag> {
        let policy = self.policy;
        self.sets.get_mut(&index).and_then(|set| set.evict(policy))
    }

    fn resident_count(&self) -> usize {
        self.sets.values().map(|set| set.len()).sum()
    }

    fn reset(&mut self) {
        self.sets.clear();
    }

    fn organization(&self) -> Organization {
        Organization::SetAssociative
    }
}

/// Moteur de simulation: géométrie fixe + état d'une simulation en cours.
#[derive(Debug)]
pub struct CacheModel {
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    // Horloge de récence, avancée à chaque hit et chaque insertion
    clock: u64,
    state: Option<Box<dyn CacheOrganization>>,
    statistics: CacheStatistics,
    tracer: Option<Tracer>,
}

impl CacheModel {
    pub fn new(geometry: CacheGeometry) -> SimResult<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            decoder: AddressDecoder::new(&geometry),
            clock: 0,
            state: None,
            statistics: CacheStatistics::default(),
            tracer: None,
        })
    }

    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn tracer(&self) -> Option<&Tracer> {
        self.tracer.as_ref()
    }

    pub fn take_tracer(&mut self) -> Option<Tracer> {
        self.tracer.take()
    }

    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    pub fn statistics(&self) -> &CacheStatistics {
        &self.statistics
    }

    pub fn resident_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.resident_count())
    }

    /// Rejoue toute la séquence d'adresses puis remet le modèle à zéro.
    pub fn simulate(
        &mut self,
        addresses: &[Address],
        organization: Organization,
        policy: Option<ReplacementPolicy>,
    ) -> SimResult<CacheStatistics> {
        self.begin(organization, policy)?;
        for &addr in addresses {
            self.access(addr)?;
        }
        Ok(self.finish())
    }

    /// Prépare une simulation. Toute erreur est levée avant le premier accès.
    pub fn begin(
        &mut self,
        organization: Organization,
        policy: Option<ReplacementPolicy>,
    ) -> SimResult<()> {
        self.geometry.validate_for(organization)?;

        let state: Box<dyn CacheOrganization> = match (organization, policy) {
            (Organization::DirectMapped, _) => Box::new(DirectMappedCache::new()),
            (Organization::FullyAssociative, Some(policy)) => Box::new(
                FullyAssociativeCache::new(self.geometry.capacity_blocks(), policy),
            ),
            (Organization::SetAssociative, Some(policy)) => {
                Box::new(SetAssociativeCache::new(self.geometry.ways, policy))
            }
            (organization, None) => {
                return Err(SimError::policy_error(&format!(
                    "{} cache requires a replacement policy (LRU or FIFO)",
                    organization
                )))
            }
        };

        self.reset();
        self.state = Some(state);

        let geometry = self.geometry;
        let policy = if organization.requires_policy() { policy } else { None };
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.trace(TraceEvent::RunStarted {
                timestamp: chrono::Utc::now(),
                organization,
                policy,
                geometry,
            });
        }
        Ok(())
    }

    /// Simule un seul accès de la simulation en cours
    pub fn access(&mut self, addr: Address) -> SimResult<CacheAccessResult> {
        let decoded = self.decoder.decode(addr);
        let step = self.clock;

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| SimError::config_error("no simulation in progress, call begin() first"))?;

        let hit = state.lookup(&decoded, step);
        let evicted = if hit { None } else { state.insert(&decoded, step) };
        self.clock += 1;

        self.statistics.record(hit);
        if evicted.is_some() {
            self.statistics.evictions += 1;
        }

        if let Some(tracer) = self.tracer.as_mut() {
            if let Some(tag) = evicted {
                tracer.trace(TraceEvent::Eviction {
                    step,
                    index: decoded.index,
                    tag,
                });
            }
            tracer.trace(TraceEvent::Access {
                step,
                address: addr,
                index: decoded.index,
                tag: decoded.tag,
                hit,
            });
        }

        Ok(if hit {
            CacheAccessResult::Hit
        } else {
            CacheAccessResult::Miss
        })
    }

    /// Termine la simulation en cours et retourne ses statistiques
    pub fn finish(&mut self) -> CacheStatistics {
        let statistics = std::mem::take(&mut self.statistics);
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.trace(TraceEvent::RunFinished {
                step: self.clock,
                hits: statistics.hits,
                misses: statistics.misses,
                evictions: statistics.evictions,
            });
        }
        self.reset();
        statistics
    }

    pub fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.reset();
        }
        self.state = None;
        self.statistics = CacheStatistics::default();
        self.clock = 0;
    }
}
