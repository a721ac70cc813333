use std::path::Path;

/// Regular files directly inside `dir`, in enumeration order.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_files(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    entries
        .filter_map(|entry| entry.ok())
        // Follows symlinks, like a plain `is_file` check on the joined path
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}
