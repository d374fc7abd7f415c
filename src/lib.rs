//! # Print Exposure Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per diverse operazioni
//! - `settings`: Modello del documento di impostazioni (round-trip lossless)
//! - `mask`: Raster delle maschere, costanti canvas, unione e codec PNG
//! - `archive`: Lettura/scrittura del container ZIP del print job
//! - `file_manager`: Discovery archivi e derivazione path di output
//! - `optimizer`: Il cuore dell'ottimizzazione (grouper, scheduler, driver)
//! - `progress`: Progress tracking e statistiche
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use print_exposure_optimizer::optimize_print_file;
//!
//! let output = optimize_print_file(std::path::Path::new("job.zip"), None)?;
//! # Ok::<(), print_exposure_optimizer::OptimizeError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod mask;
pub mod optimizer;
pub mod progress;
pub mod settings;

pub use config::Config;
pub use error::OptimizeError;
pub use optimizer::{optimize_print_file, OptimizeOutcome, PrintFileOptimizer};
pub use settings::{ImageSetting, Layer, PrintSettings};
