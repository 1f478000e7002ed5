//src/debug/mod.rs

use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::csim::cache_configs::{Address, CacheGeometry, Organization, ReplacementPolicy, Tag};
use crate::csim::sim_errors::SimResult;

//configuration du traceur
#[derive(Debug, Clone)]
pub struct TracerConfig {
    pub enabled: bool,
    pub log_to_console: bool,
    pub log_to_file: bool,
    pub log_file_path: Option<String>,
    pub trace_hits: bool,
    pub trace_misses: bool,
    pub trace_evictions: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            trace_hits: true,
            trace_misses: true,
            trace_evictions: true,
        }
    }
}

// Evenement d'une simulation a tracer

#[derive(Debug, Clone)]
pub enum TraceEvent {
    RunStarted {
        timestamp: DateTime<Utc>,
        organization: Organization,
        policy: Option<ReplacementPolicy>,
        geometry: CacheGeometry,
    },

    Access {
        step: u64,
        address: Address,
        index: usize,
        tag: Tag,
        hit: bool,
    },

    Eviction {
        step: u64,
        index: usize,
        tag: Tag,
    },

    RunFinished {
        step: u64,
        hits: usize,
        misses: usize,
        evictions: usize,
    },
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::RunStarted {
                timestamp,
                organization,
                policy,
                geometry,
            } => {
                write!(
                    f,
                    "[{}] RUN: {} POLICY={} SETS={} WAYS={} BLOCK={}B",
                    timestamp.to_rfc3339(),
                    organization,
                    policy.map_or("none".to_string(), |p| p.to_string()),
                    geometry.num_sets,
                    geometry.ways,
                    geometry.block_size
                )
            }
            TraceEvent::Access {
                step,
                address,
                index,
                tag,
                hit,
            } => {
                write!(
                    f,
                    "[{:06}] {}: ADDR=0x{:08X} SET={} TAG=0x{:X}",
                    step,
                    if *hit { "HIT " } else { "MISS" },
                    address,
                    index,
                    tag
                )
            }
            TraceEvent::Eviction { step, index, tag } => {
                write!(f, "[{:06}] EVICT: SET={} TAG=0x{:X}", step, index, tag)
            }
            TraceEvent::RunFinished {
                step,
                hits,
                misses,
                evictions,
            } => {
                write!(
                    f,
                    "[{:06}] DONE: HITS={} MISSES={} EVICTIONS={}",
                    step, hits, misses, evictions
                )
            }
        }
    }
}

pub struct Tracer {
    config: TracerConfig,
    trace_events: Vec<TraceEvent>,
    log_file: Option<File>,
    log_write_failures: usize,
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &self.config)
            .field("events", &self.trace_events.len())
            .field("log_write_failures", &self.log_write_failures)
            .finish()
    }
}

impl Tracer {
    pub fn new(config: TracerConfig) -> SimResult<Self> {
        let log_file = if config.enabled && config.log_to_file {
            let path = config.log_file_path.clone().unwrap_or_else(|| {
                format!("cachesim_trace_{}.log", Utc::now().format("%Y%m%d_%H%M%S"))
            });
            Some(File::create(&path)?)
        } else {
            None
        };

        Ok(Self {
            config,
            trace_events: Vec::new(),
            log_file,
            log_write_failures: 0,
        })
    }

    // Enregistre un événement de traçage
    pub fn trace(&mut self, event: TraceEvent) {
        if !self.config.enabled {
            return;
        }

        let should_log = match &event {
            TraceEvent::Access { hit: true, .. } => self.config.trace_hits,
            TraceEvent::Access { hit: false, .. } => self.config.trace_misses,
            TraceEvent::Eviction { .. } => self.config.trace_evictions,
            _ => true, // Toujours tracer le début et la fin d'une simulation
        };

        if should_log {
            let event_str = format!("{}\n", event);

            if self.config.log_to_console {
                print!("{}", event_str);
            }

            if let Some(file) = &mut self.log_file {
                // Après un échec, le fichier est abandonné; les événements restent en mémoire
                if let Err(e) = file.write_all(event_str.as_bytes()) {
                    eprintln!("cachesim: trace log disabled after write error: {}", e);
                    self.log_file = None;
                    self.log_write_failures += 1;
                }
            }

            self.trace_events.push(event);
        }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.trace_events
    }

    pub fn log_write_failures(&self) -> usize {
        self.log_write_failures
    }

    // Exporte les événements de traçage dans un fichier CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        let mut file = File::create(path)?;

        writeln!(file, "Step,Event,Address,Set,Tag,Details")?;

        for event in &self.trace_events {
            match event {
                TraceEvent::RunStarted {
                    timestamp,
                    organization,
                    policy,
                    geometry,
                } => {
                    let policy_str = policy.map_or("none".to_string(), |p| p.to_string());
                    writeln!(
                        file,
                        "0,RUN,,,,\"{} {} sets={} ways={} block={} at {}\"",
                        policy_str,
                        organization,
                        geometry.num_sets,
                        geometry.ways,
                        geometry.block_size,
                        timestamp.to_rfc3339()
                    )?;
                }
                TraceEvent::Access {
                    step,
                    address,
                    index,
                    tag,
                    hit,
                } => {
                    let kind = if *hit { "HIT" } else { "MISS" };
                    writeln!(file, "{},{},0x{:08X},{},0x{:X},", step, kind, address, index, tag)?;
                }
                TraceEvent::Eviction { step, index, tag } => {
                    writeln!(file, "{},EVICT,,{},0x{:X},", step, index, tag)?;
                }
                TraceEvent::RunFinished {
                    step,
                    hits,
                    misses,
                    evictions,
                } => {
                    writeln!(
                        file,
                        "{},DONE,,,,\"hits={} misses={} evictions={}\"",
                        step, hits, misses, evictions
                    )?;
                }
            }
        }

        Ok(())
    }

    // Génère un rapport de synthèse des événements de traçage
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("=== Rapport de synthèse du traçage ===\n\n");

        let runs = self
            .trace_events
            .iter()
            .filter(|e| matches!(e, TraceEvent::RunStarted { .. }))
            .count();
        let hits = self
            .trace_events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Access { hit: true, .. }))
            .count();
        let misses = self
            .trace_events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Access { hit: false, .. }))
            .count();
        let evictions = self
            .trace_events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Eviction { .. }))
            .count();

        summary.push_str(&format!("Simulations: {}\n", runs));
        summary.push_str(&format!("Hits tracés: {}\n", hits));
        summary.push_str(&format!("Misses tracés: {}\n", misses));
        summary.push_str(&format!("Evictions tracées: {}\n", evictions));

        // Sets les plus sollicités par les évictions
        if evictions > 0 {
            let mut per_set = std::collections::BTreeMap::new();
            for event in &self.trace_events {
                if let TraceEvent::Eviction { index, .. } = event {
                    *per_set.entry(*index).or_insert(0usize) += 1;
                }
            }

            summary.push_str("\nEvictions par set:\n");
            for (index, count) in per_set.iter() {
                summary.push_str(&format!(
                    "  Set {}: {} ({:.1}%)\n",
                    index,
                    count,
                    (*count as f64 / evictions as f64) * 100.0
                ));
            }
        }

        if self.log_write_failures > 0 {
            summary.push_str(&format!(
                "\nEchecs d'écriture du journal: {}\n",
                self.log_write_failures
            ));
        }
        summary
    }
}
