use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::default_config_path;

/// Logical folders the panel can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Folder {
    Checkpoints,
    Loras,
    Embeddings,
    Vae,
    Outputs,
    Presets,
}

impl Folder {
    pub const ALL: [Folder; 6] = [
        Folder::Checkpoints,
        Folder::Loras,
        Folder::Embeddings,
        Folder::Vae,
        Folder::Outputs,
        Folder::Presets,
    ];

    /// Choices offered as download/copy destinations.
    pub const DOWNLOAD_TARGETS: [Folder; 5] = [
        Folder::Checkpoints,
        Folder::Loras,
        Folder::Embeddings,
        Folder::Vae,
        Folder::Outputs,
    ];

    /// Choices offered for file deletion (downloads plus presets).
    pub const DELETE_TARGETS: [Folder; 6] = Folder::ALL;

    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Checkpoints => "checkpoints",
            Folder::Loras => "loras",
            Folder::Embeddings => "embeddings",
            Folder::Vae => "vae",
            Folder::Outputs => "outputs",
            Folder::Presets => "presets",
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Folder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Folder::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown folder '{}' (expected one of: {})",
                    s,
                    Folder::ALL.map(Folder::as_str).join(", ")
                ))
            })
    }
}

/// On-disk folder configuration (`paths.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathConfig {
    // Only the first entry is offered as a target
    pub checkpoints: Vec<PathBuf>,
    pub loras: Vec<PathBuf>,
    pub embeddings: PathBuf,
    pub vae: PathBuf,
    pub outputs: PathBuf,
    pub presets: Option<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            checkpoints: vec![PathBuf::from("models/checkpoints")],
            loras: vec![PathBuf::from("models/loras")],
            embeddings: PathBuf::from("models/embeddings"),
            vae: PathBuf::from("models/vae"),
            outputs: PathBuf::from("outputs"),
            presets: None,
        }
    }
}

/// Used when `presets` is not configured.
pub const DEFAULT_PRESETS_DIR: &str = "../presets";

impl PathConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from the OS config dir, or defaults when no file exists yet.
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if path.exists() {
            tracing::debug!("loading folder config from {}", path.display());
            return Self::load(&path);
        }
        tracing::debug!("no folder config at {}, using defaults", path.display());
        Ok(Self::default())
    }
}

/// Resolves logical folders to directories. Built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct PathResolver {
    config: PathConfig,
}

impl PathResolver {
    pub fn new(config: PathConfig) -> Result<Self> {
        if config.checkpoints.is_empty() {
            return Err(Error::Config("checkpoints needs at least one directory".into()));
        }
        if config.loras.is_empty() {
            return Err(Error::Config("loras needs at least one directory".into()));
        }
        let resolver = Self { config };
        for folder in Folder::ALL {
            if resolver.resolve(folder).as_os_str().is_empty() {
                return Err(Error::Config(format!("{} directory is empty", folder)));
            }
        }
        Ok(resolver)
    }

    /// Configured directory for `folder`. Never touches the filesystem.
    pub fn resolve(&self, folder: Folder) -> PathBuf {
        match folder {
            Folder::Checkpoints => self.config.checkpoints[0].clone(),
            Folder::Loras => self.config.loras[0].clone(),
            Folder::Embeddings => self.config.embeddings.clone(),
            Folder::Vae => self.config.vae.clone(),
            Folder::Outputs => self.config.outputs.clone(),
            Folder::Presets => self
                .config
                .presets
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PRESETS_DIR)),
        }
    }

    /// Presets directory, created on demand when `create` is set.
    pub fn resolve_presets(&self, create: bool) -> Result<PathBuf> {
        let dir = self.resolve(Folder::Presets);
        if create && !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| Error::fs(&dir, e))?;
            tracing::info!("created presets directory {}", dir.display());
        }
        Ok(dir)
    }
}
