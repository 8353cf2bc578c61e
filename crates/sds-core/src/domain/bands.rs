//! Sentinel-2 band naming.
//!
//! Image files zero-pad band numbers (`B07`), the product metadata does not
//! (`B7`). `B8A` is spelled the same in both.

use std::collections::BTreeMap;

/// Spatial resolution in metres per band, keyed by metadata-style name.
pub type SpectralResolutions = BTreeMap<String, u32>;

/// `B7` → `B07`.
pub fn file_band_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(prefix), Some(digit), None) => format!("{prefix}0{digit}"),
        _ => name.to_string(),
    }
}

/// `B07` → `B7`.
pub fn meta_band_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(prefix), Some('0')) => std::iter::once(prefix).chain(chars).collect(),
        _ => name.to_string(),
    }
}
