//! Configuration file discovery.

use sift::{SiftConfig, SiftError};
use std::path::{Path, PathBuf};

/// `<config dir>/sift/config.toml`, e.g. `~/.config/sift/config.toml` on Linux.
pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sift")
        .join("config.toml")
}

/// Load the configuration named on the command line, else the default file if
/// it exists, else built-in defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<SiftConfig, SiftError> {
    if let Some(path) = explicit {
        return SiftConfig::load(path);
    }

    let path = default_config_path();
    if path.is_file() {
        tracing::debug!(path = %path.display(), "using default config file");
        SiftConfig::load(&path)
    } else {
        Ok(SiftConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("sift/config.toml"));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        assert!(load_config(Some(Path::new("/definitely/not/here/sift.toml"))).is_err());
    }
}
