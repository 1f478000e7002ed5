//src/csim/sim_errors.rs
use std::fmt;

use std::io::Error;
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    ConfigurationError(String),
    InvalidReplacementPolicy(String),
    TraceError(String),
}



// Constructeurs raccourcis pour chaque type d'erreur
impl SimError {
    pub fn config_error(msg: &str) -> Self {
        SimError::ConfigurationError(msg.to_string())
    }

    pub fn policy_error(msg: &str) -> Self {
        SimError::InvalidReplacementPolicy(msg.to_string())
    }

    pub fn trace_error(msg: &str) -> Self {
        SimError::TraceError(msg.to_string())
    }

    /// Erreur de parsing d'une ligne de trace (numérotation à partir de 1)
    pub fn trace_line_error(line: usize, msg: &str) -> Self {
        SimError::TraceError(format!("line {}: {}", line, msg))
    }
}



impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::ConfigurationError(msg) => write!(f, "ConfigurationError: {}", msg),
            SimError::InvalidReplacementPolicy(msg) => write!(f, "InvalidReplacementPolicy: {}", msg),
            SimError::TraceError(msg) => write!(f, "TraceError: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}


impl From<Error> for SimError {
    fn from(err: Error) -> Self {
        SimError::TraceError(format!("I/O Error: {}", err))
    }
}


/// Resultat type pour les operations du simulateur
pub type SimResult<T> = Result<T, SimError>;
