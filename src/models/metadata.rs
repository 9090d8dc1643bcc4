//! Computed metadata attached to every upload.

use std::collections::HashMap;
use std::path::Path;

/// Base name of `path` without its extension.
///
/// `docs/report.pdf` → `report`, `archive.tar.gz` → `archive.tar`,
/// `.env` → `.env`.
pub fn name_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension of the base name of `path`, without the leading dot.
///
/// Returns an empty string when there is none (including dotfiles).
pub fn extension_from_path(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Metadata derived from the object key and payload size.
pub fn computed_metadata(key: &str, size: usize) -> HashMap<String, String> {
    HashMap::from([
        ("filesize".to_string(), size.to_string()),
        ("extension".to_string(), extension_from_path(key)),
        ("name".to_string(), name_from_path(key)),
    ])
}

/// Merge caller metadata over the computed entries.
///
/// Caller values are applied last and win on collision with `filesize`,
/// `extension` or `name`.
pub fn merge_metadata(
    mut computed: HashMap<String, String>,
    caller: HashMap<String, String>,
) -> HashMap<String, String> {
    computed.extend(caller);
    computed
}
