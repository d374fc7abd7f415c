//! # Print Settings Optimizer
//!
//! Applica l'ottimizzazione layer per layer all'intero documento di
//! impostazioni. Trasformazione puramente in-memory: non apre mai file.
//!
//! I layer sono indipendenti tra loro, quindi il lavoro viene distribuito
//! sul worker pool di rayon e i risultati vengono raccolti nell'ordine di
//! indice originale. I nomi delle maschere composite restano deterministici
//! perché l'allocatore di ogni layer è inizializzato con l'indice del layer.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::OptimizeError;
use crate::mask::GrayImage;
use crate::optimizer::layer_optimizer::{optimize_layer, NameAllocator};
use crate::settings::{Layer, PrintSettings};

/// Optimize every layer of a settings document against the shared mask store.
///
/// Layer count, layer order and all unrecognized fields are preserved; only
/// each layer's pass list is replaced. The returned map holds the composite
/// masks created across all layers, keyed by their job-unique fresh names.
pub fn optimize_print_settings(
    settings: &PrintSettings,
    images: &HashMap<String, GrayImage>,
) -> Result<(PrintSettings, HashMap<String, GrayImage>), OptimizeError> {
    let per_layer: Vec<(Layer, HashMap<String, GrayImage>)> = settings
        .layers
        .par_iter()
        .enumerate()
        .map(|(index, layer)| {
            let mut names = NameAllocator::new(index);
            let (image_settings, new_images) =
                optimize_layer(&layer.image_settings, images, &mut names)?;
            Ok((
                Layer {
                    image_settings,
                    extra: layer.extra.clone(),
                },
                new_images,
            ))
        })
        .collect::<Result<_, OptimizeError>>()?;

    let mut layers = Vec::with_capacity(per_layer.len());
    let mut all_new_images = HashMap::new();
    for (layer, new_images) in per_layer {
        layers.push(layer);
        // keys are unique by construction: every allocator carries its layer index
        all_new_images.extend(new_images);
    }

    Ok((
        PrintSettings {
            layers,
            extra: settings.extra.clone(),
        },
        all_new_images,
    ))
}
