//! # Settings Grouper
//!
//! Partiziona le impostazioni di un layer in bucket di compatibilità: solo
//! maschere che condividono tutti i campi tranne file e tempo di esposizione
//! possono essere fuse in un unico passaggio del proiettore.

use crate::settings::ImageSetting;

/// Partition a layer's settings into compatibility groups.
///
/// Bucket identity is the full set of fields minus the image file and the
/// exposure time, compared by value (field order never matters). Group order
/// is the first-occurrence order of each bucket; order within a group is
/// input order. Settings with equal fields but different exposure times are
/// still group-mates: exposure is the scheduler's concern, not the grouper's.
pub fn group_by_settings(settings: &[ImageSetting]) -> Vec<Vec<ImageSetting>> {
    let mut groups: Vec<Vec<ImageSetting>> = Vec::new();

    for setting in settings {
        match groups
            .iter_mut()
            .find(|group| group[0].compatible_with(setting))
        {
            Some(group) => group.push(setting.clone()),
            None => groups.push(vec![setting.clone()]),
        }
    }

    groups
}
