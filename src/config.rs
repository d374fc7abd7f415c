//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Fornisce validazione robusta dei parametri di input
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `workers`: Numero di worker paralleli per lo scheduling dei layer (default: 4)
//! - `dry_run`: Analizza e riporta senza scrivere archivi di output (default: false)
//! - `output_path`: Directory di output per gli archivi ottimizzati
//!   (default: None = accanto all'input)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::OptimizeError;

/// Configuration for print exposure optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of parallel workers for per-layer scheduling
    pub workers: usize,
    /// Dry run - analyze and report without writing output archives
    pub dry_run: bool,
    /// Output directory for optimized archives (None = beside each input)
    pub output_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 4,
            dry_run: false,
            output_path: None,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.workers == 0 {
            return Err(OptimizeError::Validation(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if let Some(ref output_path) = self.output_path {
            if !output_path.exists() {
                return Err(OptimizeError::Validation(format!(
                    "Output path does not exist: {}",
                    output_path.display()
                )));
            }
            if !output_path.is_dir() {
                return Err(OptimizeError::Validation(format!(
                    "Output path is not a directory: {}",
                    output_path.display()
                )));
            }
        }

        Ok(())
    }
}
