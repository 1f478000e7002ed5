//src/csim/cache_configs.rs
use std::fmt;
use std::str::FromStr;

use crate::csim::sim_errors::{SimError, SimResult};

/// Largeur fixe d'une adresse mémoire (en bits)
pub const ADDRESS_WIDTH: u32 = 32;

pub type Address = u32;
pub type Tag = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Organization {
    FullyAssociative,
    DirectMapped,
    SetAssociative,
}

impl Organization {
    /// Le direct mapped n'a qu'un seul candidat par index, donc pas de politique
    pub fn requires_policy(&self) -> bool {
        !matches!(self, Organization::DirectMapped)
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Organization::FullyAssociative => write!(f, "Fully Associative"),
            Organization::DirectMapped => write!(f, "Direct Mapped"),
            Organization::SetAssociative => write!(f, "Set Associative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementPolicy {
    LRU,
    FIFO,
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementPolicy::LRU => write!(f, "LRU"),
            ReplacementPolicy::FIFO => write!(f, "FIFO"),
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" => Ok(ReplacementPolicy::LRU),
            "FIFO" => Ok(ReplacementPolicy::FIFO),
            _ => Err(SimError::policy_error(&format!(
                "unknown replacement policy '{}' (expected LRU or FIFO)",
                s
            ))),
        }
    }
}

/// Géométrie du cache: nombre de sets, blocs par set, taille d'un bloc.
/// Fixée à la construction, jamais modifiée pendant une simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    pub num_sets: usize,
    pub ways: usize,
    pub block_size: usize,
}

impl Default for CacheGeometry {
    // Même configuration "sanity" que le simulateur d'origine: un seul bloc de 4 octets
    fn default() -> Self {
        Self {
            num_sets: 1,
            ways: 1,
            block_size: 4,
        }
    }
}

impl CacheGeometry {
    pub fn new(num_sets: usize, ways: usize, block_size: usize) -> Self {
        Self {
            num_sets,
            ways,
            block_size,
        }
    }

    pub fn fully_associative(blocks: usize, block_size: usize) -> Self {
        Self::new(1, blocks, block_size)
    }

    pub fn direct_mapped(lines: usize, block_size: usize) -> Self {
        Self::new(lines, 1, block_size)
    }

    pub fn set_associative(sets: usize, ways: usize, block_size: usize) -> Self {
        Self::new(sets, ways, block_size)
    }

    /// Dérive la géométrie d'une organisation à partir d'une taille totale en octets.
    /// `ways` n'est utilisé que pour le set associative.
    pub fn from_cache_size(
        organization: Organization,
        cache_size: usize,
        block_size: usize,
        ways: usize,
    ) -> SimResult<Self> {
        if block_size == 0 || cache_size % block_size != 0 {
            return Err(SimError::config_error(&format!(
                "cache size {}B is not a multiple of block size {}B",
                cache_size, block_size
            )));
        }
        let blocks = cache_size / block_size;
        let geometry = match organization {
            Organization::FullyAssociative => Self::fully_associative(blocks, block_size),
            Organization::DirectMapped => Self::direct_mapped(blocks, block_size),
            Organization::SetAssociative => {
                if ways == 0 || blocks % ways != 0 {
                    return Err(SimError::config_error(&format!(
                        "{} blocks cannot be split into {}-way sets",
                        blocks, ways
                    )));
                }
                Self::set_associative(blocks / ways, ways, block_size)
            }
        };
        geometry.validate()?;
        geometry.validate_for(organization)?;
        Ok(geometry)
    }

    pub fn cache_size(&self) -> usize {
        self.num_sets * self.ways * self.block_size
    }

    pub fn capacity_blocks(&self) -> usize {
        self.num_sets * self.ways
    }

    pub fn offset_bits(&self) -> u32 {
        self.block_size.trailing_zeros()
    }

    pub fn index_bits(&self) -> u32 {
        self.num_sets.trailing_zeros()
    }

    pub fn tag_bits(&self) -> u32 {
        ADDRESS_WIDTH - self.offset_bits() - self.index_bits()
    }

    /// Vérifie que la géométrie permet un découpage tag/index/offset par décalage de bits
    pub fn validate(&self) -> SimResult<()> {
        if self.num_sets == 0 || self.ways == 0 || self.block_size == 0 {
            return Err(SimError::config_error(&format!(
                "all dimensions must be positive (sets={}, ways={}, block={})",
                self.num_sets, self.ways, self.block_size
            )));
        }
        if !self.block_size.is_power_of_two() {
            return Err(SimError::config_error(&format!(
                "block size {} is not a power of two",
                self.block_size
            )));
        }
        if !self.num_sets.is_power_of_two() {
            return Err(SimError::config_error(&format!(
                "number of sets {} is not a power of two",
                self.num_sets
            )));
        }
        if self.offset_bits() + self.index_bits() > ADDRESS_WIDTH {
            return Err(SimError::config_error(&format!(
                "offset and index fields ({} + {} bits) exceed a {}-bit address",
                self.offset_bits(),
                self.index_bits(),
                ADDRESS_WIDTH
            )));
        }
        // Un set ne peut pas contenir plus de tags distincts que 2^tag_bits
        let max_ways = 1u64 << self.tag_bits();
        if self.ways as u64 > max_ways {
            return Err(SimError::config_error(&format!(
                "{} ways exceed the {} distinct tags a set can hold",
                self.ways, max_ways
            )));
        }
        let size = self
            .num_sets
            .checked_mul(self.ways)
            .and_then(|blocks| blocks.checked_mul(self.block_size));
        if size.is_none() {
            return Err(SimError::config_error(&format!(
                "cache size overflows (sets={}, ways={}, block={})",
                self.num_sets, self.ways, self.block_size
            )));
        }
        Ok(())
    }

    /// Cohérence géométrie / organisation
    pub fn validate_for(&self, organization: Organization) -> SimResult<()> {
        match organization {
            Organization::DirectMapped if self.ways != 1 => Err(SimError::config_error(&format!(
                "direct mapped cache requires 1 way, got {}",
                self.ways
            ))),
            Organization::FullyAssociative if self.num_sets != 1 => {
                Err(SimError::config_error(&format!(
                    "fully associative cache requires a single set, got {}",
                    self.num_sets
                )))
            }
            _ => Ok(()),
        }
    }
}
