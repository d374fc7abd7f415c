//! # Mask Scheduler
//!
//! Questo modulo contiene l'algoritmo centrale dell'ottimizzatore: dato un
//! gruppo di maschere compatibili con le rispettive durate di esposizione,
//! produce la sequenza minima di passaggi del proiettore che consegna a ogni
//! pixel esattamente la dose richiesta.
//!
//! ## Responsabilità:
//! - Passthrough 1:1 per gruppi con una sola maschera
//! - Folding delle maschere a durata zero nel primo passaggio emesso
//! - Rifiuto conservativo della fusione quando le maschere si sovrappongono
//! - Fusione (unione pixel-wise) di maschere disgiunte a durata uguale
//! - Decomposizione delta per maschere disgiunte a durate diverse
//!
//! ## Invariante:
//! Per ogni pixel, la somma delle durate dei passaggi emessi in cui il pixel
//! è acceso è uguale alla durata richiesta dal gruppo di input.
//!
//! ## Schedule delta:
//! Le durate distinte vengono ordinate in modo crescente; ogni soglia produce
//! un passaggio la cui maschera è l'unione delle maschere ancora attive e la
//! cui durata è l'incremento rispetto alla soglia precedente. È l'equivalente
//! di una decomposizione run-length lungo l'asse delle durate.

use crate::mask::{self, GrayImage};

/// One projector pass emitted by the scheduler.
#[derive(Debug)]
pub struct Pass {
    pub duration_ms: u64,
    pub mask: PassMask,
}

/// The raster a pass projects.
#[derive(Debug)]
pub enum PassMask {
    /// The input mask at this index, reused unchanged (1:1 passthrough).
    Original(usize),
    /// A newly composed raster owned by this pass.
    Composite(GrayImage),
}

impl Pass {
    /// Resolve this pass's raster against the scheduler's input entries.
    pub fn resolve<'a>(&'a self, entries: &[(&'a GrayImage, u64)]) -> &'a GrayImage {
        match &self.mask {
            PassMask::Original(index) => entries[*index].0,
            PassMask::Composite(composite) => composite,
        }
    }
}

/// Compute the minimal pass schedule for one compatibility group.
///
/// All entries must share the canvas dimensions; the caller validates
/// that before scheduling. Durations and mask order are taken as given.
pub fn schedule(entries: &[(&GrayImage, u64)]) -> Vec<Pass> {
    if entries.is_empty() {
        return Vec::new();
    }

    // A lone mask has nothing to merge with: pass it through untouched.
    if entries.len() == 1 {
        return vec![Pass {
            duration_ms: entries[0].1,
            mask: PassMask::Original(0),
        }];
    }

    let positive: Vec<usize> = (0..entries.len()).filter(|&i| entries[i].1 > 0).collect();
    let zero: Vec<usize> = (0..entries.len()).filter(|&i| entries[i].1 == 0).collect();

    // Zero-duration masks carry pixels that must appear in some pass but
    // never earn a pass of their own. With no positive mask to ride on,
    // the whole group collapses to a single zero-length union.
    if positive.is_empty() {
        let mut composite = blank_like(entries[0].0);
        for &i in &zero {
            mask::union_into(&mut composite, entries[i].0);
        }
        return vec![Pass {
            duration_ms: 0,
            mask: PassMask::Composite(composite),
        }];
    }

    // Overlapping masks cannot be merged: there is no compositional rule
    // for re-dosing the shared region, so each mask keeps its own pass,
    // re-encoded so every emitted entry is uniformly optimizer output.
    if any_overlap(entries, &positive) {
        let mut passes = Vec::with_capacity(positive.len());
        for (emitted, &i) in positive.iter().enumerate() {
            let mut composite = entries[i].0.clone();
            if emitted == 0 {
                for &z in &zero {
                    mask::union_into(&mut composite, entries[z].0);
                }
            }
            passes.push(Pass {
                duration_ms: entries[i].1,
                mask: PassMask::Composite(composite),
            });
        }
        return passes;
    }

    // Delta schedule over the distinct exposure thresholds, ascending. A
    // mask participates in every pass up to its own total duration, so the
    // per-pixel sum of increments reproduces the requested dose exactly.
    let mut thresholds: Vec<u64> = positive.iter().map(|&i| entries[i].1).collect();
    thresholds.sort_unstable();
    thresholds.dedup();

    let mut passes = Vec::with_capacity(thresholds.len());
    let mut emitted_ms = 0;
    for &threshold in &thresholds {
        let mut composite = blank_like(entries[0].0);
        for &i in &positive {
            if entries[i].1 >= threshold {
                mask::union_into(&mut composite, entries[i].0);
            }
        }
        if emitted_ms == 0 {
            for &z in &zero {
                mask::union_into(&mut composite, entries[z].0);
            }
        }
        passes.push(Pass {
            duration_ms: threshold - emitted_ms,
            mask: PassMask::Composite(composite),
        });
        emitted_ms = threshold;
    }

    passes
}

fn blank_like(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    GrayImage::new(width, height)
}

fn any_overlap(entries: &[(&GrayImage, u64)], positive: &[usize]) -> bool {
    for (k, &i) in positive.iter().enumerate() {
        for &j in &positive[k + 1..] {
            if mask::overlaps(entries[i].0, entries[j].0) {
                return true;
            }
        }
    }
    false
}
