//! # Print Settings Document Model
//!
//! This module models the settings document carried at the top level of a
//! print job archive. The document is the wire contract of the printer, so
//! every field this tool does not recognize must survive a
//! decode/optimize/encode round trip untouched, including field order.
//!
//! Known fields are captured as typed struct members; everything else lands
//! in a `#[serde(flatten)]` map backed by `serde_json` with `preserve_order`,
//! which keeps insertion order and compares equal regardless of it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One projector pass: a mask file exposed for a fixed duration.
///
/// `image_file` and `exposure_ms` are rewritten by the optimizer; `extra`
/// is carried verbatim and doubles as the compatibility fingerprint
/// (only settings with equal `extra` may be merged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSetting {
    #[serde(rename = "Image file")]
    pub image_file: String,

    #[serde(rename = "Layer exposure time (ms)")]
    pub exposure_ms: u64,

    /// Every unrecognized field of the setting, in document order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageSetting {
    /// Two settings are compatible when every field except the image file
    /// and the exposure time is equal. Field order does not matter: the
    /// underlying map compares by key-value pairs.
    pub fn compatible_with(&self, other: &ImageSetting) -> bool {
        self.extra == other.extra
    }
}

/// One layer of the job: the ordered list of passes that realize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(rename = "Image settings list")]
    pub image_settings: Vec<ImageSetting>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole settings document: ordered layers plus any document-level
/// fields the printer firmware defines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrintSettings {
    #[serde(rename = "Layers")]
    pub layers: Vec<Layer>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrintSettings {
    /// Decode a settings document from JSON text.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Encode the document back to JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Every mask file name referenced anywhere in the document.
    pub fn referenced_masks(&self) -> BTreeSet<&str> {
        self.layers
            .iter()
            .flat_map(|layer| layer.image_settings.iter())
            .map(|setting| setting.image_file.as_str())
            .collect()
    }

    /// Total pass count across all layers.
    pub fn pass_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.image_settings.len()).sum()
    }

    /// Total exposure time across all layers, in milliseconds.
    pub fn total_exposure_ms(&self) -> u64 {
        self.layers
            .iter()
            .flat_map(|layer| layer.image_settings.iter())
            .map(|setting| setting.exposure_ms)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(file: &str, exposure: u64, extra_json: &str) -> ImageSetting {
        ImageSetting {
            image_file: file.to_string(),
            exposure_ms: exposure,
            extra: serde_json::from_str(extra_json).unwrap(),
        }
    }

    #[test]
    fn test_decode_known_and_unknown_fields() {
        let doc = r#"{
            "Machine": "XL-2",
            "Layers": [
                {
                    "Layer height (mm)": 0.05,
                    "Image settings list": [
                        {
                            "Image file": "image1.png",
                            "Layer exposure time (ms)": 1000,
                            "Light intensity": 80
                        }
                    ]
                }
            ]
        }"#;

        let settings = PrintSettings::from_json(doc).unwrap();
        assert_eq!(settings.layers.len(), 1);
        assert_eq!(settings.extra["Machine"], "XL-2");
        assert_eq!(settings.layers[0].extra["Layer height (mm)"], 0.05);

        let pass = &settings.layers[0].image_settings[0];
        assert_eq!(pass.image_file, "image1.png");
        assert_eq!(pass.exposure_ms, 1000);
        assert_eq!(pass.extra["Light intensity"], 80);
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let doc = r#"{"Layers":[{"Image settings list":[{"Image file":"a.png","Layer exposure time (ms)":500,"Zeta":1,"Alpha":2}],"Lift speed":3}],"Firmware":"v2"}"#;

        let settings = PrintSettings::from_json(doc).unwrap();
        let reencoded = settings.to_json().unwrap();
        let again = PrintSettings::from_json(&reencoded).unwrap();
        assert_eq!(settings, again);

        // preserve_order keeps "Zeta" before "Alpha" through the round trip
        let zeta = reencoded.find("\"Zeta\"").unwrap();
        let alpha = reencoded.find("\"Alpha\"").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_invalid_document_is_a_decode_error() {
        assert!(PrintSettings::from_json("invalid json").is_err());
        // a well-formed document without the Layers list is also malformed
        assert!(PrintSettings::from_json("{\"Other\": 1}").is_err());
    }

    #[test]
    fn test_compatibility_ignores_field_order() {
        let a = setting("a.png", 1000, r#"{"x": 1, "y": {"n": 1, "m": 2}}"#);
        let b = setting("b.png", 2000, r#"{"y": {"m": 2, "n": 1}, "x": 1}"#);
        let c = setting("c.png", 1000, r#"{"x": 1, "y": {"n": 1, "m": 3}}"#);

        assert!(a.compatible_with(&b));
        assert!(!a.compatible_with(&c));
    }

    #[test]
    fn test_referenced_masks_and_totals() {
        let doc = r#"{"Layers":[
            {"Image settings list":[
                {"Image file":"a.png","Layer exposure time (ms)":1000},
                {"Image file":"b.png","Layer exposure time (ms)":2000}
            ]},
            {"Image settings list":[
                {"Image file":"a.png","Layer exposure time (ms)":500}
            ]},
            {"Image settings list":[]}
        ]}"#;

        let settings = PrintSettings::from_json(doc).unwrap();
        let referenced = settings.referenced_masks();
        assert_eq!(referenced.into_iter().collect::<Vec<_>>(), vec!["a.png", "b.png"]);
        assert_eq!(settings.pass_count(), 3);
        assert_eq!(settings.total_exposure_ms(), 3500);
    }
}
