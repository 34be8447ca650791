//! Everything the applet asks of the operating system about jackd: is it
//! running, with which arguments, how busy is it, and please stop.

use std::path::Path;
use std::process::Stdio;

use sysinfo::{
    Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, Signal, System, UpdateKind,
};

use crate::error::ProcessQueryError;

/// Executable name of the supervised daemon.
pub const JACKD_EXECUTABLE: &str = "jackd";

/// OS operations consumed by the lifecycle controller.
pub trait ProcessHost {
    /// Pid of the process named exactly `name`, if one exists.
    fn find_process_id(&mut self, name: &str) -> Result<Option<u32>, ProcessQueryError>;

    /// Live argument vector of `pid`, including `argv[0]`.
    fn cmdline(&mut self, pid: u32) -> Option<Vec<String>>;

    /// CPU utilisation of `pid` since the previous sample.
    fn cpu_percent(&mut self, pid: u32) -> Option<f32>;

    /// Sends SIGTERM. Returns whether the signal was delivered.
    fn terminate(&mut self, pid: u32) -> bool;

    /// Starts `argv` as a detached child whose output is discarded.
    fn launch(&mut self, argv: &[String]) -> std::io::Result<()>;

    /// Whether `program` can be launched at all.
    fn is_installed(&self, program: &str) -> bool;
}

/// Returns the lowest pid among `candidates`, which keeps the answer stable when
/// several processes share the name.
pub fn select_pid(candidates: impl IntoIterator<Item = u32>) -> Option<u32> {
    candidates.into_iter().min()
}

/// Production [`ProcessHost`] backed by `sysinfo` and `tokio::process`.
pub struct SysinfoHost {
    sys: System,
}

impl SysinfoHost {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for SysinfoHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessHost for SysinfoHost {
    fn find_process_id(&mut self, name: &str) -> Result<Option<u32>, ProcessQueryError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProcessQueryError::Unavailable(
                "sysinfo does not support this platform".to_string(),
            ));
        }

        self.sys.refresh_processes(ProcessesToUpdate::All, true);

        let matches = self
            .sys
            .processes()
            .iter()
            .filter(|(_, p)| p.thread_kind().is_none())
            // An exited jackd we have not reaped yet is not running.
            .filter(|(_, p)| p.status() != ProcessStatus::Zombie)
            .filter(|(_, p)| p.name() == name)
            .map(|(pid, _)| pid.as_u32());

        Ok(select_pid(matches))
    }

    fn cmdline(&mut self, pid: u32) -> Option<Vec<String>> {
        let pid = Pid::from_u32(pid);
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_cmd(UpdateKind::Always),
        );
        let process = self.sys.process(pid)?;
        Some(
            process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
        )
    }

    fn cpu_percent(&mut self, pid: u32) -> Option<f32> {
        // `find_process_id` refreshed CPU times for every process this tick.
        self.sys.process(Pid::from_u32(pid)).map(|p| p.cpu_usage())
    }

    fn terminate(&mut self, pid: u32) -> bool {
        match self.sys.process(Pid::from_u32(pid)) {
            Some(process) => process.kill_with(Signal::Term).unwrap_or(false),
            None => false,
        }
    }

    fn launch(&mut self, argv: &[String]) -> std::io::Result<()> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty startup command")
        })?;

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        tracing::info!(pid = ?child.id(), "launched jackd");

        // Reap the child so it does not linger as a zombie named "jackd".
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::info!(%status, "jackd exited"),
                Err(e) => tracing::warn!(error = %e, "failed to wait for jackd"),
            }
        });
        Ok(())
    }

    fn is_installed(&self, program: &str) -> bool {
        if program.contains('/') {
            return is_executable(Path::new(program));
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| is_executable(&dir.join(program))))
            .unwrap_or(false)
    }
}

/// A regular file the current user could execute.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
