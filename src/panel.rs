//! The "Others" tab actions.
//!
//! Each method takes the values of the relevant widgets and returns what the UI should
//! render. Failures are turned into status lines here and never propagate further.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Folder, PathResolver};
use crate::error::Error;
use crate::files::{self, DeleteOutcome};
use crate::settings::{self, SettingsRecord};
use crate::transfer::{self, Acquired};

/// One status line shown under an action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Failure(String),
    Warning(String),
}

impl Status {
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Success(_) => "✅",
            Status::Failure(_) => "❌",
            Status::Warning(_) => "⚠️",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Status::Success(m) | Status::Failure(m) | Status::Warning(m) => m,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failure(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph(), self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub status: Status,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    pub status: Status,
    /// Listing of the folder after the deletion, for the file picker.
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResult {
    pub status: Status,
    pub path: Option<PathBuf>,
}

pub struct OthersPanel<'a> {
    paths: &'a PathResolver,
}

impl<'a> OthersPanel<'a> {
    pub fn new(paths: &'a PathResolver) -> Self {
        Self { paths }
    }

    /// Download a URL or copy a local file into `folder`.
    pub fn download<F>(&self, source: &str, folder: Folder, on_progress: F) -> DownloadResult
    where
        F: FnMut(u64, u64),
    {
        let target = self.paths.resolve(folder);
        match transfer::acquire(source, &target, on_progress) {
            Ok((how, path)) => {
                let verb = match how {
                    Acquired::Downloaded => "Downloaded",
                    Acquired::Copied => "Copied",
                };
                DownloadResult {
                    status: Status::Success(format!("{} to: {}", verb, path.display())),
                    path: Some(path),
                }
            }
            Err(Error::NotFound(src)) => {
                tracing::warn!("download source not found: {:?}", src);
                DownloadResult {
                    status: Status::Failure("Error: File not found or invalid input.".into()),
                    path: None,
                }
            }
            Err(e) => {
                tracing::error!("download of {} into {} failed: {}", source, folder, e);
                DownloadResult {
                    status: Status::Failure(format!("Failed: {}", e)),
                    path: None,
                }
            }
        }
    }

    /// Files currently in `folder`; empty when the folder cannot be read.
    pub fn list(&self, folder: Folder) -> Vec<String> {
        files::list_files(&self.paths.resolve(folder))
    }

    pub fn delete<S: AsRef<str>>(&self, folder: Folder, selected: &[S]) -> DeleteResult {
        let dir = self.paths.resolve(folder);
        let status = match files::delete_files(&dir, selected) {
            DeleteOutcome::NothingSelected => Status::Warning("No files selected.".into()),
            DeleteOutcome::Completed(report) => {
                let deleted = (!report.deleted.is_empty())
                    .then(|| format!("Deleted: {}.", report.deleted.join(", ")));
                let failed = (!report.failed.is_empty()).then(|| {
                    let names: Vec<String> = report
                        .failed
                        .iter()
                        .map(|f| format!("{} (error: {})", f.name, f.reason))
                        .collect();
                    format!("Failed: {}", names.join(", "))
                });
                match (deleted, failed) {
                    // Partial success keeps the failure glyph inline
                    (Some(ok), Some(bad)) => Status::Success(format!("{ok} ❌ {bad}")),
                    (Some(ok), None) => Status::Success(ok),
                    (None, Some(bad)) => Status::Failure(bad),
                    (None, None) => Status::Warning("No files selected.".into()),
                }
            }
        };
        DeleteResult {
            status,
            files: files::list_files(&dir),
        }
    }

    /// Write the settings backup into the outputs folder.
    pub fn backup(&self, name: &str, record: &SettingsRecord) -> BackupResult {
        if name.trim().is_empty() {
            return BackupResult {
                status: Status::Warning("Enter a backup filename first.".into()),
                path: None,
            };
        }
        let outputs = self.paths.resolve(Folder::Outputs);
        match settings::write_backup(&outputs, name, record) {
            Ok(path) => BackupResult {
                status: Status::Success(format!("Backup saved to {}", path.display())),
                path: Some(path),
            },
            Err(e) => {
                tracing::error!("settings backup failed: {}", e);
                BackupResult {
                    status: Status::Failure(format!("Backup failed: {}", e)),
                    path: None,
                }
            }
        }
    }

    /// Copy an uploaded settings document into the presets folder.
    pub fn restore(&self, upload: Option<&Path>) -> Status {
        let Some(upload) = upload else {
            return Status::Warning("No file selected.".into());
        };
        let result = self
            .paths
            .resolve_presets(true)
            .and_then(|presets| settings::restore_file(upload, &presets));
        match result {
            Ok(dest) => Status::Success(format!("Saved to {}", dest.display())),
            Err(e) => {
                tracing::error!("restore of {} failed: {}", upload.display(), e);
                Status::Failure(format!("Failed to restore: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathConfig;

    fn resolver(root: &Path) -> PathResolver {
        PathResolver::new(PathConfig {
            checkpoints: vec![root.join("checkpoints")],
            loras: vec![root.join("loras")],
            embeddings: root.join("embeddings"),
            vae: root.join("vae"),
            outputs: root.join("outputs"),
            presets: Some(root.join("presets")),
        })
        .unwrap()
    }

    #[test]
    fn status_lines_carry_glyphs() {
        assert_eq!(Status::Success("ok".into()).to_string(), "✅ ok");
        assert_eq!(Status::Failure("no".into()).to_string(), "❌ no");
        assert_eq!(Status::Warning("hm".into()).to_string(), "⚠️ hm");
    }

    #[test]
    fn missing_source_renders_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);
        let missing = tmp.path().join("nope.safetensors");
        let res = panel.download(missing.to_str().unwrap(), Folder::Loras, |_, _| {});
        assert_eq!(res.status.to_string(), "❌ Error: File not found or invalid input.");
        assert!(res.path.is_none());
    }

    #[test]
    fn local_copy_reports_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);
        let src = tmp.path().join("vae.pt");
        std::fs::write(&src, b"weights").unwrap();

        let res = panel.download(src.to_str().unwrap(), Folder::Vae, |_, _| {});
        let dest = tmp.path().join("vae").join("vae.pt");
        assert_eq!(res.path.as_deref(), Some(dest.as_path()));
        assert_eq!(
            res.status,
            Status::Success(format!("Copied to: {}", dest.display()))
        );
        assert_eq!(panel.list(Folder::Vae), vec!["vae.pt"]);
    }

    #[test]
    fn delete_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);
        let dir = tmp.path().join("outputs");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.txt"), b"a").unwrap();
        std::fs::write(dir.join("keep.txt"), b"k").unwrap();

        let none: [&str; 0] = [];
        let res = panel.delete(Folder::Outputs, &none);
        assert_eq!(res.status.to_string(), "⚠️ No files selected.");

        let res = panel.delete(Folder::Outputs, &["a.txt", "missing.txt"]);
        assert_eq!(
            res.status.to_string(),
            "✅ Deleted: a.txt. ❌ Failed: missing.txt (error: not a file)"
        );
        assert_eq!(res.files, vec!["keep.txt"]);

        let res = panel.delete(Folder::Outputs, &["missing.txt"]);
        assert_eq!(
            res.status,
            Status::Failure("Failed: missing.txt (error: not a file)".into())
        );
    }

    #[test]
    fn backup_needs_a_name() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);
        let res = panel.backup("  ", &SettingsRecord::default());
        assert!(matches!(res.status, Status::Warning(_)));
        assert!(res.path.is_none());
        assert!(!tmp.path().join("outputs").exists());
    }

    #[test]
    fn backup_lands_in_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);
        let record = SettingsRecord {
            prompt: "lighthouse at dusk".into(),
            ..Default::default()
        };
        let res = panel.backup("evening", &record);
        let expected = tmp.path().join("outputs").join("evening.json");
        assert_eq!(res.path.as_deref(), Some(expected.as_path()));
        assert!(expected.is_file());
    }

    #[test]
    fn restore_flow() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);

        assert_eq!(panel.restore(None).to_string(), "⚠️ No file selected.");

        let upload = tmp.path().join("shared.json");
        std::fs::write(&upload, b"{\"default_prompt\": \"x\"}").unwrap();
        let status = panel.restore(Some(upload.as_path()));
        let dest = tmp.path().join("presets").join("shared.json");
        assert_eq!(status, Status::Success(format!("Saved to {}", dest.display())));
        assert!(dest.is_file());

        let bad = tmp.path().join("shared.yaml");
        std::fs::write(&bad, b"x: 1").unwrap();
        let status = panel.restore(Some(bad.as_path()));
        assert!(status.is_failure());
        assert!(status.message().starts_with("Failed to restore:"));
    }

    #[test]
    fn copying_a_file_onto_itself_fails_without_data_loss() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = resolver(tmp.path());
        let panel = OthersPanel::new(&paths);

        let ckpt = tmp.path().join("checkpoints");
        std::fs::create_dir_all(&ckpt).unwrap();
        let model = ckpt.join("juggernaut.safetensors");
        std::fs::write(&model, b"0123456789abcdef").unwrap();
        let res = panel.download(model.to_str().unwrap(), Folder::Checkpoints, |_, _| {});
        assert!(res.status.to_string().starts_with("❌ Failed:"), "{}", res.status);
        assert!(res.path.is_none());
        assert_eq!(std::fs::read(&model).unwrap(), b"0123456789abcdef");

        let presets = tmp.path().join("presets");
        std::fs::create_dir_all(&presets).unwrap();
        let preset = presets.join("default.json");
        std::fs::write(&preset, b"{\"default_prompt\": \"x\"}").unwrap();
        let status = panel.restore(Some(preset.as_path()));
        assert!(status.is_failure());
        assert!(status.message().starts_with("Failed to restore:"));
        assert_eq!(
            std::fs::read(&preset).unwrap(),
            b"{\"default_prompt\": \"x\"}"
        );
    }
}
