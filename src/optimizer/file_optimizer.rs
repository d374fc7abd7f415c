//! # Print File Optimizer
//!
//! Orchestratore I/O: legge un archivio di stampa, decodifica e valida le
//! maschere, invoca l'ottimizzatore di impostazioni e scrive il nuovo
//! archivio. L'archivio di input non viene mai modificato.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::archive::{read_print_archive, write_print_archive};
use crate::config::Config;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::mask;
use crate::optimizer::print_optimizer::optimize_print_settings;
use crate::progress::{OptimizationStats, ProgressManager};

/// What one archive optimization produced.
#[derive(Debug)]
pub struct OptimizeOutcome {
    /// Target archive path (the would-be target in dry-run mode).
    pub output_path: PathBuf,
    /// False when dry-run skipped the write.
    pub written: bool,
    pub layers: usize,
    pub passes_before: usize,
    pub passes_after: usize,
    pub masks_created: usize,
    pub exposure_saved_ms: u64,
}

/// Orchestratore principale
pub struct PrintFileOptimizer {
    config: Config,
    pool: rayon::ThreadPool,
}

impl PrintFileOptimizer {
    /// Crea nuova istanza dell'ottimizzatore
    pub fn new(config: Config) -> Result<Self, OptimizeError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|err| {
                OptimizeError::Validation(format!("failed to build worker pool: {}", err))
            })?;
        Ok(Self { config, pool })
    }

    /// Optimize one archive to its derived output path.
    pub fn optimize_file(&self, input: &Path) -> Result<OptimizeOutcome, OptimizeError> {
        let target = FileManager::optimized_output_path(input, self.config.output_path.as_deref());
        self.optimize_file_to(input, &target)
    }

    /// Optimize one archive to an explicit output path.
    pub fn optimize_file_to(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<OptimizeOutcome, OptimizeError> {
        debug!("Optimizing print archive: {}", input.display());
        let archive = read_print_archive(input)?;

        // decode and canvas-validate every referenced mask once, up front
        let mut images = HashMap::with_capacity(archive.mask_bytes.len());
        for (name, bytes) in &archive.mask_bytes {
            let decoded = mask::decode_png(bytes)?;
            mask::validate_dimensions(name, &decoded)?;
            images.insert(name.clone(), decoded);
        }

        let (optimized, new_images) = self
            .pool
            .install(|| optimize_print_settings(&archive.settings, &images))?;

        let outcome = OptimizeOutcome {
            output_path: output.to_path_buf(),
            written: !self.config.dry_run,
            layers: optimized.layers.len(),
            passes_before: archive.settings.pass_count(),
            passes_after: optimized.pass_count(),
            masks_created: new_images.len(),
            exposure_saved_ms: archive
                .settings
                .total_exposure_ms()
                .saturating_sub(optimized.total_exposure_ms()),
        };

        if self.config.dry_run {
            info!(
                "Dry run: {} would shrink {} -> {} passes, saving {}",
                input.display(),
                outcome.passes_before,
                outcome.passes_after,
                FileManager::format_duration(outcome.exposure_saved_ms)
            );
        } else {
            write_print_archive(output, &optimized, &archive.mask_bytes, &new_images)?;
            info!(
                "✅ {}: {} -> {} passes, saved {}, wrote {}",
                input.display(),
                outcome.passes_before,
                outcome.passes_after,
                FileManager::format_duration(outcome.exposure_saved_ms),
                output.display()
            );
        }

        Ok(outcome)
    }

    /// Ottimizza un singolo archivio o, se l'input è una directory, tutti
    /// gli archivi trovati al suo interno.
    pub fn run(&self, input: &Path) -> anyhow::Result<()> {
        if !input.is_dir() {
            let outcome = self.optimize_file(input)?;
            info!(
                "Done: {} layers, removed {} passes",
                outcome.layers,
                outcome.passes_before.saturating_sub(outcome.passes_after)
            );
            return Ok(());
        }

        let archives = FileManager::find_print_archives(input)?;
        if archives.is_empty() {
            warn!("No print archives found in {}", input.display());
            return Ok(());
        }

        info!(
            "🔧 Found {} print archive(s) to optimize",
            archives.len()
        );
        let progress = ProgressManager::new(archives.len() as u64);
        let mut stats = OptimizationStats::new();

        for archive_path in &archives {
            let name = archive_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.optimize_file(archive_path) {
                Ok(outcome) => {
                    progress.update(&format!(
                        "{}: {} -> {} passes",
                        name, outcome.passes_before, outcome.passes_after
                    ));
                    stats.add_optimized(&outcome);
                }
                Err(err) => {
                    error!("Failed to optimize {}: {}", archive_path.display(), err);
                    progress.update(&format!("❌ {}", name));
                    stats.add_error();
                }
            }
        }

        progress.finish(&stats.format_summary());
        info!("{}", stats.format_summary());
        Ok(())
    }
}

/// Optimize a single print archive with default settings.
///
/// The standalone batch entry point: `output_path` defaults to
/// `<stem>_optimized<ext>` beside the input. Returns the written path.
pub fn optimize_print_file(
    input: &Path,
    output_path: Option<&Path>,
) -> Result<PathBuf, OptimizeError> {
    let optimizer = PrintFileOptimizer::new(Config::default())?;
    let outcome = match output_path {
        Some(output) => optimizer.optimize_file_to(input, output)?,
        None => optimizer.optimize_file(input)?,
    };
    Ok(outcome.output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{BufReader, Write};

    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::{ZipArchive, ZipWriter};

    use crate::archive::{SETTINGS_FILE_NAME, SLICES_DIR};
    use crate::mask::{GrayImage, CANVAS_HEIGHT, CANVAS_WIDTH};
    use crate::settings::PrintSettings;

    fn canvas_mask_with_square(x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut mask = GrayImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        for y in y0..y1 {
            for x in x0..x1 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        mask
    }

    fn write_job_archive(path: &Path, settings_json: &str, masks: &[(&str, &GrayImage)]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        writer
            .start_file(SETTINGS_FILE_NAME, FileOptions::default())
            .unwrap();
        writer.write_all(settings_json.as_bytes()).unwrap();
        for (name, mask_image) in masks {
            writer
                .start_file(format!("{}/{}", SLICES_DIR, name), FileOptions::default())
                .unwrap();
            writer
                .write_all(&crate::mask::encode_png(mask_image).unwrap())
                .unwrap();
        }
        writer.finish().unwrap();
    }

    fn read_output(path: &Path) -> (PrintSettings, Vec<String>) {
        let file = File::open(path).unwrap();
        let mut zip = ZipArchive::new(BufReader::new(file)).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        let mut raw = String::new();
        std::io::Read::read_to_string(&mut zip.by_name(SETTINGS_FILE_NAME).unwrap(), &mut raw)
            .unwrap();
        (PrintSettings::from_json(&raw).unwrap(), names)
    }

    #[test]
    fn test_missing_slices_dir_still_optimizes() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("test.zip");
        write_job_archive(&input, r#"{"Layers":[{"Image settings list":[]}]}"#, &[]);

        let output = optimize_print_file(&input, None).unwrap();
        assert_eq!(output, temp_dir.path().join("test_optimized.zip"));
        assert!(output.exists());

        let (settings, names) = read_output(&output);
        assert_eq!(settings.layers.len(), 1);
        assert!(settings.layers[0].image_settings.is_empty());
        assert_eq!(names, vec![SETTINGS_FILE_NAME.to_string()]);
    }

    #[test]
    fn test_invalid_json_fails_and_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("test.zip");

        let file = File::create(&input).unwrap();
        let mut writer = ZipWriter::new(file);
        writer
            .start_file(SETTINGS_FILE_NAME, FileOptions::default())
            .unwrap();
        writer.write_all(b"invalid json").unwrap();
        writer.finish().unwrap();

        let err = optimize_print_file(&input, None).unwrap_err();
        assert!(matches!(err, OptimizeError::Settings(_)));
        assert!(!temp_dir.path().join("test_optimized.zip").exists());
    }

    #[test]
    fn test_custom_output_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("test.zip");
        let custom = temp_dir.path().join("custom_output.zip");
        write_job_archive(&input, r#"{"Layers":[{"Image settings list":[]}]}"#, &[]);

        let output = optimize_print_file(&input, Some(&custom)).unwrap();
        assert_eq!(output, custom);
        assert!(custom.exists());
    }

    #[test]
    fn test_end_to_end_merge_and_passthrough() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("job.zip");

        let img1 = canvas_mask_with_square(0, 0, 100, 100);
        let img2 = canvas_mask_with_square(200, 200, 300, 300);
        let img3 = canvas_mask_with_square(50, 50, 150, 150);

        let doc = r#"{"Layers":[
            {"Image settings list":[
                {"Image file":"image1.png","Layer exposure time (ms)":1000,"Other setting":"value1"},
                {"Image file":"image2.png","Layer exposure time (ms)":1000,"Other setting":"value1"}
            ]},
            {"Image settings list":[
                {"Image file":"image3.png","Layer exposure time (ms)":2000,"Other setting":"value1"}
            ]}
        ]}"#;
        write_job_archive(
            &input,
            doc,
            &[("image1.png", &img1), ("image2.png", &img2), ("image3.png", &img3)],
        );

        let output = optimize_print_file(&input, None).unwrap();
        let (optimized, names) = read_output(&output);

        // layer 0 merged into a single composite pass
        assert_eq!(optimized.layers[0].image_settings.len(), 1);
        let merged = &optimized.layers[0].image_settings[0];
        assert_eq!(merged.exposure_ms, 1000);
        assert!(merged.image_file.contains("_opt_"));
        assert_eq!(merged.extra["Other setting"], "value1");

        // layer 1 passed through untouched
        assert_eq!(optimized.layers[1].image_settings.len(), 1);
        assert_eq!(optimized.layers[1].image_settings[0].image_file, "image3.png");

        // the output store holds exactly the referenced masks
        assert!(names.contains(&format!("{}/{}", SLICES_DIR, merged.image_file)));
        assert!(names.contains(&format!("{}/image3.png", SLICES_DIR)));
        assert!(!names.iter().any(|n| n.contains("image1.png")));
        assert!(!names.iter().any(|n| n.contains("image2.png")));

        // composite content is the union of its sources
        let file = File::open(&output).unwrap();
        let mut zip = ZipArchive::new(BufReader::new(file)).unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(
            &mut zip
                .by_name(&format!("{}/{}", SLICES_DIR, merged.image_file))
                .unwrap(),
            &mut bytes,
        )
        .unwrap();
        let composite = crate::mask::decode_png(&bytes).unwrap();
        let mut expected = img1.clone();
        crate::mask::union_into(&mut expected, &img2);
        assert_eq!(composite, expected);
    }

    #[test]
    fn test_kept_originals_are_copied_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("job.zip");

        let img = canvas_mask_with_square(0, 0, 64, 64);
        let doc = r#"{"Layers":[{"Image settings list":[
            {"Image file":"only.png","Layer exposure time (ms)":1500}
        ]}]}"#;
        write_job_archive(&input, doc, &[("only.png", &img)]);

        let original_bytes = {
            let file = File::open(&input).unwrap();
            let mut zip = ZipArchive::new(BufReader::new(file)).unwrap();
            let mut bytes = Vec::new();
            std::io::Read::read_to_end(
                &mut zip.by_name(&format!("{}/only.png", SLICES_DIR)).unwrap(),
                &mut bytes,
            )
            .unwrap();
            bytes
        };

        let output = optimize_print_file(&input, None).unwrap();

        let file = File::open(&output).unwrap();
        let mut zip = ZipArchive::new(BufReader::new(file)).unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(
            &mut zip.by_name(&format!("{}/only.png", SLICES_DIR)).unwrap(),
            &mut bytes,
        )
        .unwrap();
        assert_eq!(bytes, original_bytes);
    }

    #[test]
    fn test_wrong_canvas_size_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("job.zip");

        let tiny = GrayImage::new(64, 64);
        let doc = r#"{"Layers":[{"Image settings list":[
            {"Image file":"tiny.png","Layer exposure time (ms)":1000}
        ]}]}"#;
        write_job_archive(&input, doc, &[("tiny.png", &tiny)]);

        let err = optimize_print_file(&input, None).unwrap_err();
        assert!(matches!(err, OptimizeError::Validation(_)));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("job.zip");
        write_job_archive(&input, r#"{"Layers":[{"Image settings list":[]}]}"#, &[]);

        let optimizer = PrintFileOptimizer::new(Config {
            dry_run: true,
            ..Config::default()
        })
        .unwrap();
        let outcome = optimizer.optimize_file(&input).unwrap();

        assert!(!outcome.written);
        assert!(!outcome.output_path.exists());
        assert_eq!(outcome.layers, 1);
    }
}
