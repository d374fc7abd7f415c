//! # File Management Module
//!
//! Questo modulo gestisce la discovery degli archivi di stampa e la
//! derivazione dei path di output.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di archivi print job in una directory
//! - Determinazione formato file (solo container `.zip`)
//! - Derivazione del path di output `<stem>_optimized<ext>`
//! - Formattazione human-readable delle durate di esposizione
//!
//! ## Sicurezza operazioni:
//! - L'archivio di input non viene mai modificato: l'output è sempre un
//!   nuovo file, di default accanto all'input

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all print job archives in a directory, in stable path order.
    pub fn find_print_archives(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut archives = Vec::new();

        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_print_archive(path) && !Self::is_optimizer_output(path) {
                archives.push(path.to_path_buf());
            }
        }

        archives.sort();
        Ok(archives)
    }

    /// Check if a file looks like a print job archive
    pub fn is_print_archive(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            ext.to_string_lossy().to_lowercase() == "zip"
        } else {
            false
        }
    }

    /// Check if a file was produced by a previous optimizer run, so batch
    /// mode never re-optimizes its own output
    pub fn is_optimizer_output(path: &Path) -> bool {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().ends_with("_optimized"))
            .unwrap_or(false)
    }

    /// Derive the output path for an input archive: `<stem>_optimized<ext>`,
    /// beside the input or inside `output_dir` when one is configured.
    pub fn optimized_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "print".to_string());

        let file_name = match input.extension() {
            Some(ext) => format!("{}_optimized.{}", stem, ext.to_string_lossy()),
            None => format!("{}_optimized", stem),
        };

        match output_dir {
            Some(dir) => dir.join(file_name),
            None => input.with_file_name(file_name),
        }
    }

    /// Get human-readable exposure duration
    pub fn format_duration(ms: u64) -> String {
        if ms < 1000 {
            format!("{} ms", ms)
        } else if ms < 60_000 {
            format!("{:.2} s", ms as f64 / 1000.0)
        } else {
            format!("{:.2} min", ms as f64 / 60_000.0)
        }
    }
}
