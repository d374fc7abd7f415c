//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//! - Supporta error chaining per mantenere il contesto degli errori
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Archive`: Errori del container ZIP (archivio corrotto, entry mancante)
//! - `Settings`: Documento di impostazioni non decodificabile (JSON malformato)
//! - `Image`: Errori di decodifica/codifica delle maschere PNG
//! - `MissingMask`: Maschera referenziata nelle impostazioni ma assente dall'archivio
//! - `Validation`: Errori di validazione input (dimensioni canvas, parametri)
//!
//! ## Vantaggi:
//! - Errori tipizzati per handling specifico
//! - Automatic conversion da errori standard
//! - Integration con `anyhow` per error propagation nel binario

/// Custom error types for print exposure optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Settings decode error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Mask image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Mask referenced in settings but missing from archive: {0}")]
    MissingMask(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
