use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cmdline::JackInfo;
use crate::controller::{DaemonState, Phase};

/// Coarse daemon state as seen by panel scripts.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    NotInstalled,
    NotRunning,
    Starting,
    Running,
    Stopping,
}

/// Snapshot written to `$XDG_RUNTIME_DIR/jackd-status/status.toml`.
/// Each write replaces the previous one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DaemonStatus {
    /// Applet version (set from Cargo.toml at compile time).
    pub version: String,
    pub state: StatusState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// RFC 3339 time this snapshot was taken.
    pub updated_at: String,
    /// Settings parsed from the running jackd's command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<JackInfo>,
}

impl DaemonStatus {
    /// Builds a snapshot. An in-flight `phase` takes precedence over the last observed state.
    pub fn snapshot(state: &DaemonState, phase: Phase) -> Self {
        let (state, pid, info) = match (phase, state) {
            (Phase::Starting, _) => (StatusState::Starting, None, None),
            (Phase::Stopping, DaemonState::Running { pid, .. }) => {
                (StatusState::Stopping, Some(*pid), None)
            }
            (Phase::Stopping, _) => (StatusState::Stopping, None, None),
            (_, DaemonState::Running { pid, info, .. }) => {
                (StatusState::Running, Some(*pid), info.clone())
            }
            (_, DaemonState::NotRunning) => (StatusState::NotRunning, None, None),
            (_, DaemonState::NotInstalled) => (StatusState::NotInstalled, None, None),
        };

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            state,
            pid,
            updated_at: chrono::Local::now().to_rfc3339(),
            info,
        }
    }

    /// Whether `other` describes the same daemon state, ignoring the timestamp.
    pub fn same_state(&self, other: &DaemonStatus) -> bool {
        self.state == other.state && self.pid == other.pid && self.info == other.info
    }
}

/// Serializes `status` to TOML and writes it to `path`.
/// Creates the parent directory if it does not exist.
/// Failures are logged, never propagated.
pub fn write_status(path: &Path, status: &DaemonStatus) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(dir = %parent.display(), error = %e, "failed to create status directory");
            return;
        }
    }
    match toml::to_string_pretty(status) {
        Ok(content) => {
            if let Err(e) = std::fs::write(path, content) {
                tracing::warn!(error = %e, "failed to write status file");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize status"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdline::parse_info;

    fn running() -> DaemonState {
        DaemonState::Running {
            pid: 4242,
            info: Some(parse_info(&["jackd", "-dalsa", "-r48000"])),
            cpu_percent: Some(1.0),
        }
    }

    // ── snapshot ──────────────────────────────────────────────────────────────

    #[test]
    fn snapshot_of_running_carries_pid_and_info() {
        let s = DaemonStatus::snapshot(&running(), Phase::Running);
        assert_eq!(s.state, StatusState::Running);
        assert_eq!(s.pid, Some(4242));
        assert_eq!(s.info.unwrap().driver.as_deref(), Some("alsa"));
        assert_eq!(s.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn snapshot_in_flight_phase_wins() {
        let starting = DaemonStatus::snapshot(&DaemonState::NotRunning, Phase::Starting);
        assert_eq!(starting.state, StatusState::Starting);

        let stopping = DaemonStatus::snapshot(&running(), Phase::Stopping);
        assert_eq!(stopping.state, StatusState::Stopping);
        assert_eq!(stopping.pid, Some(4242));
        assert!(stopping.info.is_none());
    }

    #[test]
    fn snapshot_not_installed() {
        let s = DaemonStatus::snapshot(&DaemonState::NotInstalled, Phase::Stopped);
        assert_eq!(s.state, StatusState::NotInstalled);
        assert!(s.pid.is_none());
    }

    #[test]
    fn same_state_ignores_timestamp_and_cpu() {
        let a = DaemonStatus::snapshot(&running(), Phase::Running);
        let mut other = running();
        if let DaemonState::Running { cpu_percent, .. } = &mut other {
            *cpu_percent = Some(80.0);
        }
        let mut b = DaemonStatus::snapshot(&other, Phase::Running);
        b.updated_at = "2000-01-01T00:00:00+00:00".to_string();
        assert!(a.same_state(&b));

        let c = DaemonStatus::snapshot(&DaemonState::NotRunning, Phase::Stopped);
        assert!(!a.same_state(&c));
    }

    #[test]
    fn state_serializes_to_snake_case() {
        let s = DaemonStatus::snapshot(&DaemonState::NotInstalled, Phase::Stopped);
        let toml = toml::to_string_pretty(&s).unwrap();
        assert!(toml.contains("state = \"not_installed\""));
    }

    // ── write_status ──────────────────────────────────────────────────────────

    #[test]
    fn write_status_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("status.toml");
        write_status(&path, &DaemonStatus::snapshot(&DaemonState::NotRunning, Phase::Stopped));
        assert!(path.exists());
    }

    #[test]
    fn write_status_content_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.toml");
        write_status(&path, &DaemonStatus::snapshot(&running(), Phase::Running));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: DaemonStatus = toml::from_str(&content).unwrap();
        assert_eq!(parsed.state, StatusState::Running);
        assert_eq!(parsed.pid, Some(4242));
        let info = parsed.info.unwrap();
        assert_eq!(info.sample_rate.as_deref(), Some("48000"));
        assert!(info.frames_per_period.is_none());
    }

    #[test]
    fn write_status_omits_none_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.toml");
        write_status(&path, &DaemonStatus::snapshot(&DaemonState::NotRunning, Phase::Stopped));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("pid"));
        assert!(!content.contains("info"));
        assert!(content.contains("updated_at"));
    }
}
