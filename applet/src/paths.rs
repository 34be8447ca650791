//! Canonical file locations.
//!
//!   - `~/.jackd_cmd.txt`  Written by the user, read once at startup.
//!   - `$XDG_RUNTIME_DIR/jackd-status/status.toml`  Written by the applet for panel scripts.
use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR_NAME: &str = "jackd-status";
pub const COMMAND_FILE_NAME: &str = ".jackd_cmd.txt";
pub const STATUS_FILE_NAME: &str = "status.toml";

/// Path of the startup command file in the user's home directory.
pub fn command_file_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(home.join(COMMAND_FILE_NAME))
}

/// The command file path as shown to the user, with the home directory abbreviated.
pub fn display_path(path: &std::path::Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(PathBuf::from)) {
        Some(rel) => format!("~/{}", rel.display()),
        None => path.display().to_string(),
    }
}

/// Directory for runtime files: the XDG runtime dir when available, else the cache dir.
pub fn app_runtime_dir() -> Option<PathBuf> {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join(APP_DIR_NAME))
}

/// Full path of the status snapshot.
pub fn status_file_path() -> Option<PathBuf> {
    app_runtime_dir().map(|dir| dir.join(STATUS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_file_has_correct_name() {
        let path = command_file_path().unwrap();
        assert_eq!(path.file_name().unwrap(), COMMAND_FILE_NAME);
    }

    #[test]
    fn command_file_is_in_home() {
        let path = command_file_path().unwrap();
        assert_eq!(path.parent(), dirs::home_dir().as_deref());
    }

    #[test]
    fn display_path_abbreviates_home() {
        let path = command_file_path().unwrap();
        assert_eq!(display_path(&path), "~/.jackd_cmd.txt");
    }

    #[test]
    fn display_path_leaves_other_paths_alone() {
        assert_eq!(
            display_path(std::path::Path::new("/etc/jackd_cmd.txt")),
            "/etc/jackd_cmd.txt"
        );
    }

    #[test]
    fn status_file_lives_in_app_dir() {
        if let Some(path) = status_file_path() {
            assert_eq!(path.file_name().unwrap(), STATUS_FILE_NAME);
            assert_eq!(path.parent().unwrap().file_name().unwrap(), APP_DIR_NAME);
        }
    }
}
