//! # Layer Optimizer
//!
//! Ottimizza un singolo layer: raggruppa le impostazioni compatibili, invoca
//! lo scheduler su ogni gruppo e raccoglie le maschere composite appena
//! create, assegnando a ciascuna un nome univoco a livello di job.

use std::collections::HashMap;
use std::path::Path;

use crate::error::OptimizeError;
use crate::mask::GrayImage;
use crate::optimizer::grouper::group_by_settings;
use crate::optimizer::scheduler::{self, PassMask};
use crate::settings::ImageSetting;

/// Allocates collision-free file names for composite masks.
///
/// Naming state is an explicit value threaded from the job-level optimizer
/// into each layer call, never hidden process-wide state. Seeding with the
/// layer index keeps names unique across layers even when layers are
/// optimized in parallel.
#[derive(Debug)]
pub struct NameAllocator {
    layer: usize,
    next: usize,
}

impl NameAllocator {
    pub fn new(layer: usize) -> Self {
        Self { layer, next: 0 }
    }

    /// Fresh composite name derived from a source file's stem, e.g.
    /// `image1_opt_3_0.png` for the first composite of layer 3.
    pub fn allocate(&mut self, base: &str) -> String {
        let stem = Path::new(base)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mask".to_string());
        let name = format!("{}_opt_{}_{}.png", stem, self.layer, self.next);
        self.next += 1;
        name
    }
}

/// Optimize one layer's pass list against the job's mask store.
///
/// Returns the replacement settings plus the masks created while merging.
/// Single-entry groups pass through untouched and contribute no new masks;
/// every composed pass gets a fresh name and the shared fields of its group.
/// A setting referencing a mask absent from `images` aborts the whole run:
/// emitting a pass against a non-existent mask would silently corrupt the job.
pub fn optimize_layer(
    settings: &[ImageSetting],
    images: &HashMap<String, GrayImage>,
    names: &mut NameAllocator,
) -> Result<(Vec<ImageSetting>, HashMap<String, GrayImage>), OptimizeError> {
    let mut optimized = Vec::new();
    let mut new_images = HashMap::new();

    for group in group_by_settings(settings) {
        let mut entries: Vec<(&GrayImage, u64)> = Vec::with_capacity(group.len());
        for setting in &group {
            let mask = images
                .get(&setting.image_file)
                .ok_or_else(|| OptimizeError::MissingMask(setting.image_file.clone()))?;
            entries.push((mask, setting.exposure_ms));
        }

        // pixel-wise composition requires one common raster size
        if let Some(&(first, _)) = entries.first() {
            for (mask, _) in &entries {
                if mask.dimensions() != first.dimensions() {
                    return Err(OptimizeError::Validation(format!(
                        "masks of group starting at {} disagree on dimensions",
                        group[0].image_file
                    )));
                }
            }
        }

        for pass in scheduler::schedule(&entries) {
            match pass.mask {
                PassMask::Original(index) => {
                    // true 1:1 passthrough: original name, original mask
                    optimized.push(group[index].clone());
                }
                PassMask::Composite(composite) => {
                    let name = names.allocate(&group[0].image_file);
                    optimized.push(ImageSetting {
                        image_file: name.clone(),
                        exposure_ms: pass.duration_ms,
                        extra: group[0].extra.clone(),
                    });
                    new_images.insert(name, composite);
                }
            }
        }
    }

    Ok((optimized, new_images))
}
