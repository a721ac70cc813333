use std::path::{Path, PathBuf};

use super::download::download_into;
use crate::error::{Error, Result};

/// How a file landed in the target folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    Downloaded,
    Copied,
}

pub fn is_http_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch `source` (HTTP(S) URL or local file path) into `target_dir`.
pub fn acquire<F>(source: &str, target_dir: &Path, on_progress: F) -> Result<(Acquired, PathBuf)>
where
    F: FnMut(u64, u64),
{
    let source = source.trim();
    if is_http_url(source) {
        let path = download_into(source, target_dir, on_progress)?;
        return Ok((Acquired::Downloaded, path));
    }

    let local = Path::new(source);
    if !source.is_empty() && local.is_file() {
        let path = copy_into(local, target_dir)?;
        return Ok((Acquired::Copied, path));
    }

    Err(Error::NotFound(source.to_string()))
}

/// Copy a local file into `target_dir` under its own basename, overwriting.
pub fn copy_into(src: &Path, target_dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| Error::NotFound(src.display().to_string()))?;
    std::fs::create_dir_all(target_dir).map_err(|e| Error::fs(target_dir, e))?;
    let dest = target_dir.join(name);
    if is_same_file(src, &dest) {
        return Err(Error::Validation(format!(
            "{} and {} are the same file",
            src.display(),
            dest.display()
        )));
    }
    let bytes = std::fs::copy(src, &dest).map_err(|e| Error::fs(&dest, e))?;
    tracing::info!("[Copy] {} -> {} ({} bytes)", src.display(), dest.display(), bytes);
    Ok(dest)
}

// `fs::copy` truncates the destination first, so copying a file onto itself empties it.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
