pub mod config;
pub mod error;
pub mod files;
pub mod panel;
pub mod settings;
pub mod transfer;
pub mod utils;

pub use config::{Folder, PathConfig, PathResolver};
pub use error::{Error, Result};
pub use panel::{OthersPanel, Status};
pub use settings::{LoraEntry, SettingsRecord};
