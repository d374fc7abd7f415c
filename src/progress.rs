//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di
//! ottimizzazione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time in batch mode
//! - Tracking statistiche cumulative (layer, passaggi, maschere, esposizione)
//! - Report finale con statistiche aggregate
//!
//! ## Statistiche tracciate:
//! - **archives_processed**: Totale archivi elaborati
//! - **layers_processed**: Totale layer ottimizzati
//! - **passes_before / passes_after**: Passaggi del proiettore prima e dopo
//! - **masks_created**: Maschere composite prodotte
//! - **exposure_saved_ms**: Millisecondi di esposizione risparmiati
//! - **errors**: Numero di archivi falliti

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::file_manager::FileManager;
use crate::optimizer::OptimizeOutcome;

/// Manages progress reporting for batch optimization
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_archives: u64) -> Self {
        let bar = ProgressBar::new(total_archives);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for optimization results
#[derive(Debug, Default)]
pub struct OptimizationStats {
    pub archives_processed: usize,
    pub layers_processed: usize,
    pub passes_before: usize,
    pub passes_after: usize,
    pub masks_created: usize,
    pub exposure_saved_ms: u64,
    pub errors: usize,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_optimized(&mut self, outcome: &OptimizeOutcome) {
        self.archives_processed += 1;
        self.layers_processed += outcome.layers;
        self.passes_before += outcome.passes_before;
        self.passes_after += outcome.passes_after;
        self.masks_created += outcome.masks_created;
        self.exposure_saved_ms += outcome.exposure_saved_ms;
    }

    pub fn add_error(&mut self) {
        self.archives_processed += 1;
        self.errors += 1;
    }

    pub fn passes_removed(&self) -> usize {
        self.passes_before.saturating_sub(self.passes_after)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} archives | Layers: {} | Passes: {} -> {} | New masks: {} | Exposure saved: {} | Errors: {}",
            self.archives_processed,
            self.layers_processed,
            self.passes_before,
            self.passes_after,
            self.masks_created,
            FileManager::format_duration(self.exposure_saved_ms),
            self.errors
        )
    }
}
