use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::utils::is_plain_file_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub name: String,
    pub reason: String,
}

/// Per-file results of one delete request, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The selection was empty; nothing was attempted.
    NothingSelected,
    Completed(DeleteReport),
}

/// Delete each named file inside `dir`. One bad name never aborts the rest.
pub fn delete_files<S: AsRef<str>>(dir: &Path, names: &[S]) -> DeleteOutcome {
    delete_files_with(dir, names, |path| std::fs::remove_file(path))
}

fn delete_files_with<S, R>(dir: &Path, names: &[S], mut remove: R) -> DeleteOutcome
where
    S: AsRef<str>,
    R: FnMut(&Path) -> io::Result<()>,
{
    if names.is_empty() {
        return DeleteOutcome::NothingSelected;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut report = DeleteReport::default();
    for name in names {
        let name: &str = name.as_ref();
        if !seen.insert(name) {
            continue;
        }
        match delete_one(dir, name, &mut remove) {
            Ok(()) => {
                tracing::info!("deleted {}", dir.join(name).display());
                report.deleted.push(name.to_string());
            }
            Err(reason) => {
                tracing::warn!("could not delete {} in {}: {}", name, dir.display(), reason);
                report.failed.push(FailedDeletion {
                    name: name.to_string(),
                    reason,
                });
            }
        }
    }
    DeleteOutcome::Completed(report)
}

fn delete_one<R>(dir: &Path, name: &str, remove: &mut R) -> Result<(), String>
where
    R: FnMut(&Path) -> io::Result<()>,
{
    if !is_plain_file_name(name) {
        return Err("outside folder".to_string());
    }
    let path = dir.join(name);
    if !path.is_file() {
        return Err("not a file".to_string());
    }
    remove(&path).map_err(|e| e.to_string())
}
