//! Remote key derivation
//!
//! Maps a file's path relative to the walked root onto its object key:
//! the optional prefix joined with the relative path, using `/` separators
//! on every platform.

use std::path::Path;

/// Derive the remote object key for a file.
///
/// `relative` is the file's path relative to the walked root. Separators are
/// normalized by iterating path components, so the key uses `/` regardless
/// of the host convention while a literal backslash inside a file name
/// survives on platforms where it is an ordinary byte.
///
/// An empty prefix yields the bare relative path; a trailing `/` on the
/// prefix does not produce a double slash.
pub fn derive_key(prefix: &str, relative: &Path) -> String {
    let rel = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        rel
    } else {
        format!("{prefix}/{rel}")
    }
}
