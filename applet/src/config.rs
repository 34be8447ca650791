use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

/// jackd's argument vector as written on the first line of the command file.
///
/// Tokens are split on spaces with no quoting or escaping, so paths containing
/// spaces cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupCommand {
    argv: Vec<String>,
}

impl StartupCommand {
    /// Splits a raw command line. Returns `None` when no tokens remain.
    ///
    /// A trailing `&` is dropped since the command is spawned directly rather
    /// than through a shell.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut argv: Vec<String> = line
            .trim()
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if argv.last().is_some_and(|t| t == "&") {
            argv.pop();
        }

        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The executable to launch (`argv[0]`).
    pub fn program(&self) -> &str {
        &self.argv[0]
    }
}

impl fmt::Display for StartupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

/// Reads the startup command from the first line of `path`.
pub fn load_startup_command(path: &Path) -> Result<StartupCommand, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .lines()
        .next()
        .and_then(StartupCommand::from_line)
        .ok_or_else(|| ConfigError::Empty {
            path: path.to_path_buf(),
        })
}
