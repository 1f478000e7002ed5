// src/main.rs

use std::env;
use std::process;

use cachesim::csim::{run_sweep, SimulationReport, SweepConfig};
use cachesim::debug::{Tracer, TracerConfig};
use cachesim::{CacheGeometry, CacheModel, Organization, ReplacementPolicy, SimResult, TraceFile};

const DEFAULT_TRACE_PATH: &str = "gcc.trace";
// Nombre d'accès rejoués avec le traceur (--trace-events)
const TRACED_ACCESSES: usize = 32;

struct CliOptions {
    trace_path: String,
    csv: bool,
    trace_events: bool,
}

fn parse_args() -> Result<CliOptions, String> {
    let mut options = CliOptions {
        trace_path: DEFAULT_TRACE_PATH.to_string(),
        csv: false,
        trace_events: false,
    };
    let mut path_set = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--csv" => options.csv = true,
            "--trace-events" => options.trace_events = true,
            "-h" | "--help" => {
                return Err("usage: cachesim [TRACE_PATH] [--csv] [--trace-events]".to_string())
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
            path if !path_set => {
                options.trace_path = path.to_string();
                path_set = true;
            }
            extra => return Err(format!("unexpected argument '{}'", extra)),
        }
    }
    Ok(options)
}

// Rejoue le début de la trace sur un petit cache avec le traceur console
fn run_traced_demo(addresses: &[u32]) -> SimResult<()> {
    let tracer = Tracer::new(TracerConfig {
        enabled: true,
        ..TracerConfig::default()
    })?;
    let geometry = CacheGeometry::set_associative(8, 4, 4);
    let mut model = CacheModel::new(geometry)?.with_tracer(tracer);

    let sample = &addresses[..addresses.len().min(TRACED_ACCESSES)];
    model.simulate(sample, Organization::SetAssociative, Some(ReplacementPolicy::LRU))?;

    if let Some(tracer) = model.tracer() {
        println!("\n{}", tracer.generate_summary());
    }
    Ok(())
}

fn run(options: &CliOptions) -> SimResult<()> {
    let trace = TraceFile::load(&options.trace_path)?;
    let addresses = trace.addresses();

    if options.trace_events {
        run_traced_demo(&addresses)?;
    }

    let reports = run_sweep(&SweepConfig::default(), &addresses)?;

    if options.csv {
        println!("{}", SimulationReport::csv_header());
        for report in &reports {
            println!("{}", report.to_csv_row());
        }
    } else {
        for report in &reports {
            println!("{}", report);
        }
    }
    Ok(())
}

fn main() {
    let options = match parse_args() {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Erreur: {}", e);
        process::exit(1);
    }
}
