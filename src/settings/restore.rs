use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::transfer::copy_into;

/// File an uploaded settings document into `presets_dir` under its own name.
///
/// Accepted by `.json` extension only. The document is copied verbatim and not parsed,
/// so restoring does not change any live setting.
pub fn restore_file(upload: &Path, presets_dir: &Path) -> Result<PathBuf> {
    let is_json = upload
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(Error::Validation(format!(
            "{} is not a .json file",
            upload.display()
        )));
    }
    if !upload.is_file() {
        return Err(Error::NotFound(upload.display().to_string()));
    }
    copy_into(upload, presets_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_verbatim_without_parsing() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = tmp.path().join("upload").join("Preset.JSON");
        std::fs::create_dir_all(upload.parent().unwrap()).unwrap();
        // Not valid JSON on purpose
        std::fs::write(&upload, b"{ not: json").unwrap();

        let presets = tmp.path().join("presets");
        let dest = restore_file(&upload, &presets).unwrap();
        assert_eq!(dest, presets.join("Preset.JSON"));
        assert_eq!(std::fs::read(dest).unwrap(), b"{ not: json");
    }

    #[test]
    fn other_extensions_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = tmp.path().join("preset.txt");
        std::fs::write(&upload, b"{}").unwrap();
        let err = restore_file(&upload, tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_upload_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = restore_file(&tmp.path().join("gone.json"), tmp.path()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
