use directories::BaseDirs;
use std::path::PathBuf;

/// Application config directory (OS standard)
/// Linux: ~/.config/presetdesk
/// macOS: ~/Library/Application Support/presetdesk
/// Windows: %APPDATA%\\presetdesk
pub fn app_config_dir() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.config_dir().join("presetdesk");
    }
    // Fallback: current working directory
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Default location of the folder configuration file
pub fn default_config_path() -> PathBuf {
    app_config_dir().join("paths.toml")
}

/// True when `name` is exactly one normal path component (no separators, no `..`).
pub fn is_plain_file_name(name: &str) -> bool {
    use std::path::Component;
    let mut comps = std::path::Path::new(name).components();
    matches!(
        (comps.next(), comps.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::is_plain_file_name;

    #[test]
    fn plain_names_only() {
        assert!(is_plain_file_name("model.safetensors"));
        assert!(is_plain_file_name("with space.bin"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../escape.bin"));
        assert!(!is_plain_file_name("nested/file.bin"));
        assert!(!is_plain_file_name("/abs.bin"));
        assert!(!is_plain_file_name("back\\slash.bin"));
    }
}
