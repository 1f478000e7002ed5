//src/csim/replacements.rs

use std::collections::{HashMap, HashSet, VecDeque};

use crate::csim::cache_configs::{ReplacementPolicy, Tag};

/// Dernier passage (hit ou insertion) de chaque tag résident, en valeurs de l'horloge du modèle.
#[derive(Debug, Default, Clone)]
pub struct RecencyTracker {
    stamps: HashMap<Tag, u64>,
}

impl RecencyTracker {
    pub fn touch(&mut self, tag: Tag, stamp: u64) {
        self.stamps.insert(tag, stamp);
    }

    pub fn remove(&mut self, tag: Tag) {
        self.stamps.remove(&tag);
    }

    pub fn stamp(&self, tag: Tag) -> Option<u64> {
        self.stamps.get(&tag).copied()
    }

    /// Tag le moins récemment utilisé. A égalité d'horloge, le plus petit tag gagne.
    pub fn least_recent(&self) -> Option<Tag> {
        self.stamps
            .iter()
            .min_by_key(|(tag, stamp)| (**stamp, **tag))
            .map(|(tag, _)| *tag)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }
}

/// File des tags résidents dans l'ordre d'insertion (front = le plus ancien)
#[derive(Debug, Default, Clone)]
pub struct InsertionOrderTracker {
    queue: VecDeque<Tag>,
}

impl InsertionOrderTracker {
    pub fn push(&mut self, tag: Tag) {
        self.queue.push_back(tag);
    }

    pub fn oldest(&self) -> Option<Tag> {
        self.queue.front().copied()
    }

    pub fn pop_oldest(&mut self) -> Option<Tag> {
        self.queue.pop_front()
    }

    // Utilisé quand LRU choisit une victime qui n'est pas en tête de file
    pub fn remove(&mut self, tag: Tag) {
        if let Some(pos) = self.queue.iter().position(|&t| t == tag) {
            self.queue.remove(pos);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Un set associatif: occupation bornée par `ways` + état de remplacement propre au set.
#[derive(Debug, Clone)]
pub struct CacheSet {
    ways: usize,
    resident: HashSet<Tag>,
    recency: RecencyTracker,
    order: InsertionOrderTracker,
}

impl CacheSet {
    pub fn new(ways: usize) -> Self {
        Self {
            ways,
            resident: HashSet::new(),
            recency: RecencyTracker::default(),
            order: InsertionOrderTracker::default(),
        }
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.resident.contains(&tag)
    }

    pub fn is_full(&self) -> bool {
        self.resident.len() >= self.ways
    }

    pub fn len(&self) -> usize {
        self.resident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    /// Hit: rafraîchit la récence du tag. Retourne false si le tag n'est pas résident.
    pub fn touch(&mut self, tag: Tag, stamp: u64) -> bool {
        if !self.resident.contains(&tag) {
            return false;
        }
        self.recency.touch(tag, stamp);
        true
    }

    /// Insère un tag non résident. Le set ne doit pas être plein.
    pub fn insert(&mut self, tag: Tag, stamp: u64) {
        debug_assert!(!self.is_full(), "insert into a full set");
        if self.resident.insert(tag) {
            self.recency.touch(tag, stamp);
            self.order.push(tag);
        }
    }

    /// Choisit la victime selon la politique sans la retirer
    pub fn victim(&self, policy: ReplacementPolicy) -> Option<Tag> {
        match policy {
            ReplacementPolicy::LRU => self.recency.least_recent(),
            ReplacementPolicy::FIFO => self.order.oldest(),
        }
    }

    /// Retire la victime de l'occupation, du tracker de récence et de la file d'insertion
    pub fn evict(&mut self, policy: ReplacementPolicy) -> Option<Tag> {
        let victim = self.victim(policy)?;
        self.resident.remove(&victim);
        self.recency.remove(victim);
        match policy {
            ReplacementPolicy::FIFO => {
                self.order.pop_oldest();
            }
            ReplacementPolicy::LRU => self.order.remove(victim),
        }
        Some(victim)
    }

    pub fn recency(&self) -> &RecencyTracker {
        &self.recency
    }

    pub fn order(&self) -> &InsertionOrderTracker {
        &self.order
    }

    pub fn clear(&mut self) {
        self.resident.clear();
        self.recency.clear();
        self.order.clear();
    }
}
