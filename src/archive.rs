//! # Print Archive Module
//!
//! Questo modulo è l'unico punto del crate che conosce il layout del
//! container ZIP di un print job.
//!
//! ## Layout dell'archivio:
//! - `print_settings.json`: documento di impostazioni al top level
//! - `slices/<nome>.png`: le maschere raster referenziate dal documento
//!
//! ## Responsabilità:
//! - Lettura: decodifica il documento e carica i byte delle maschere
//!   referenziate (directory `slices/` assente = nessuna maschera, non errore)
//! - Scrittura: produce un nuovo archivio con il documento ricodificato, le
//!   maschere originali ancora referenziate copiate byte per byte e le
//!   composite codificate in PNG grayscale
//! - Pubblicazione atomica: staging su file temporaneo nella directory di
//!   destinazione e `persist` finale, così una scrittura fallita non lascia
//!   mai un output parziale visibile

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::OptimizeError;
use crate::mask::{self, GrayImage};
use crate::settings::PrintSettings;

/// Fixed top-level name of the settings document.
pub const SETTINGS_FILE_NAME: &str = "print_settings.json";

/// Fixed sub-path holding the mask rasters.
pub const SLICES_DIR: &str = "slices";

/// A print job archive loaded into memory: the decoded settings document
/// plus the raw PNG bytes of every referenced mask.
#[derive(Debug)]
pub struct PrintArchive {
    pub settings: PrintSettings,
    pub mask_bytes: HashMap<String, Vec<u8>>,
}

/// Read a print job archive.
///
/// A malformed settings document fails fast with the decode error. A mask
/// referenced by the document but absent from the image store is fatal;
/// an absent store with nothing referenced is simply an empty mapping.
pub fn read_print_archive(path: &Path) -> Result<PrintArchive, OptimizeError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut raw_settings = String::new();
    archive
        .by_name(SETTINGS_FILE_NAME)?
        .read_to_string(&mut raw_settings)?;
    let settings = PrintSettings::from_json(&raw_settings)?;

    let referenced: Vec<String> = settings
        .referenced_masks()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut mask_bytes = HashMap::with_capacity(referenced.len());
    for name in referenced {
        let entry_name = format!("{}/{}", SLICES_DIR, name);
        let mut entry = match archive.by_name(&entry_name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(OptimizeError::MissingMask(name)),
            Err(err) => return Err(err.into()),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        mask_bytes.insert(name, bytes);
    }

    debug!(
        "Read archive {}: {} layers, {} masks",
        path.display(),
        settings.layers.len(),
        mask_bytes.len()
    );

    Ok(PrintArchive {
        settings,
        mask_bytes,
    })
}

/// Write an optimized print job archive.
///
/// Only masks still referenced by `settings` are written: originals keep
/// their stored bytes unchanged, composites are encoded as 8-bit grayscale
/// PNG. The archive is staged in a temporary file beside the target and
/// persisted in one step.
pub fn write_print_archive(
    path: &Path,
    settings: &PrintSettings,
    original_masks: &HashMap<String, Vec<u8>>,
    new_masks: &HashMap<String, GrayImage>,
) -> Result<(), OptimizeError> {
    let buffer = Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(buffer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(SETTINGS_FILE_NAME, options)?;
    writer.write_all(settings.to_json()?.as_bytes())?;

    for name in settings.referenced_masks() {
        let entry_name = format!("{}/{}", SLICES_DIR, name);
        if let Some(bytes) = original_masks.get(name) {
            writer.start_file(entry_name, options)?;
            writer.write_all(bytes)?;
        } else if let Some(composite) = new_masks.get(name) {
            writer.start_file(entry_name, options)?;
            writer.write_all(&mask::encode_png(composite)?)?;
        } else {
            return Err(OptimizeError::MissingMask(name.to_string()));
        }
    }

    let buffer = writer.finish()?;

    let target_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut staged = match target_dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    staged.write_all(buffer.get_ref())?;
    staged
        .persist(path)
        .map_err(|err| OptimizeError::Io(err.error))?;

    debug!("Wrote archive {}", path.display());
    Ok(())
}
