//! # Print Exposure Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Validazione degli input dell'utente
//! - Creazione della configurazione e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (archivio o directory, output, workers, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Valida che l'input esista e prepara la directory di output
//! 4. Crea un oggetto Config e istanzia PrintFileOptimizer
//! 5. Avvia il processo di ottimizzazione (singolo archivio o batch)
//!
//! ## Esempio di utilizzo:
//! ```bash
//! exposure-optimizer /path/to/jobs --workers 8 --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use print_exposure_optimizer::{Config, PrintFileOptimizer};

#[derive(Parser)]
#[command(name = "exposure-optimizer")]
#[command(about = "Optimize exposure schedules of masked resin print jobs")]
struct Args {
    /// Print job archive, or directory containing archives to optimize
    input: PathBuf,

    /// Output directory for optimized archives (if not specified, write next to each input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers for per-layer scheduling
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Dry run - analyze and report without writing output archives
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Validate arguments
    if !args.input.exists() {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            args.input.display()
        ));
    }

    // Validate and create output directory if specified
    if let Some(ref output_dir) = args.output {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)?;
            info!("Created output directory: {}", output_dir.display());
        }
        if !output_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Output path is not a directory: {}",
                output_dir.display()
            ));
        }
    }

    let config = Config {
        workers: args.workers,
        dry_run: args.dry_run,
        output_path: args.output,
    };

    let optimizer = PrintFileOptimizer::new(config)?;
    optimizer.run(&args.input)?;

    Ok(())
}
