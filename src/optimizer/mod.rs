//! # Optimizer Module
//!
//! Modulo che separa le responsabilità dell'ottimizzatore in sottomoduli:
//! - `grouper`: Bucket di compatibilità delle impostazioni
//! - `scheduler`: Algoritmo di scheduling delle maschere (merge + delta)
//! - `layer_optimizer`: Ottimizzazione di un singolo layer
//! - `print_optimizer`: Trasformazione in-memory dell'intero documento
//! - `file_optimizer`: Driver I/O archivio-in, archivio-out

pub mod file_optimizer;
pub mod grouper;
pub mod layer_optimizer;
pub mod print_optimizer;
pub mod scheduler;

pub use file_optimizer::{optimize_print_file, OptimizeOutcome, PrintFileOptimizer};
pub use grouper::group_by_settings;
pub use layer_optimizer::{optimize_layer, NameAllocator};
pub use print_optimizer::optimize_print_settings;
pub use scheduler::{schedule, Pass, PassMask};
