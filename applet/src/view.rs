//! What the tray shows for each daemon state. Kept free of any toolkit types so
//! the same text drives the tray, the log, and tests.

use crate::controller::{DaemonState, Phase};

/// Icon vocabulary, mapped onto freedesktop theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    NotFound,
    NotRunning,
    Transition,
    Running,
}

impl IconState {
    pub fn icon_name(self) -> &'static str {
        match self {
            IconState::NotFound => "computer-fail",
            IconState::NotRunning => "state_shutoff",
            IconState::Transition => "state_paused",
            IconState::Running => "state_running",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub label: String,
    pub icon: IconState,
    pub tooltip: String,
    /// Text of the start/stop menu entry.
    pub menu_label: String,
}

impl StatusView {
    /// View for a settled state. `command_file` is shown when jackd is not running.
    pub fn render(state: &DaemonState, command_file: &str) -> Self {
        match state {
            DaemonState::Running {
                info, cpu_percent, ..
            } => {
                let cpu = match cpu_percent {
                    Some(cpu) => format!("{cpu:.1}"),
                    None => "?".to_string(),
                };
                let details = info.as_ref().map(|i| i.describe()).unwrap_or_default();
                let tooltip = format!("CPU %: {cpu}\n{details}").trim_end().to_string();
                Self {
                    label: "jackd is running".to_string(),
                    icon: IconState::Running,
                    tooltip,
                    menu_label: "Stop jackd".to_string(),
                }
            }
            DaemonState::NotRunning => Self {
                label: "jackd not running".to_string(),
                icon: IconState::NotRunning,
                tooltip: format!(
                    "To start Jack, be sure {command_file}\ncontains your jackd startup command"
                ),
                menu_label: "Start jackd".to_string(),
            },
            DaemonState::NotInstalled => Self {
                label: "jackd not found".to_string(),
                icon: IconState::NotFound,
                tooltip: "Searched path for 'jackd'".to_string(),
                menu_label: "Start jackd".to_string(),
            },
        }
    }

    /// Whether the start/stop entry may be used. False while a start or stop is in flight.
    pub fn actionable(&self) -> bool {
        self.icon != IconState::Transition
    }

    /// View shown while a start or stop is in flight. Settled phases have none.
    pub fn transition(phase: Phase) -> Option<Self> {
        let text = match phase {
            Phase::Starting => "Starting jackd...",
            Phase::Stopping => "Stopping jackd...",
            Phase::Stopped | Phase::Running => return None,
        };
        Some(Self {
            label: text.to_string(),
            icon: IconState::Transition,
            tooltip: text.to_string(),
            menu_label: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdline::parse_info;

    const CMD_FILE: &str = "~/.jackd_cmd.txt";

    #[test]
    fn running_tooltip_has_cpu_then_info() {
        let state = DaemonState::Running {
            pid: 1234,
            info: Some(parse_info(&["jackd", "-dalsa", "-r44100", "-p1024", "-n3"])),
            cpu_percent: Some(3.4),
        };
        let view = StatusView::render(&state, CMD_FILE);
        assert_eq!(view.label, "jackd is running");
        assert_eq!(view.icon, IconState::Running);
        assert_eq!(
            view.tooltip,
            "CPU %: 3.4\ndriver: alsa\nfs: 44100\nframes/period: 1024\nperiods/buffer: 3"
        );
        assert_eq!(view.menu_label, "Stop jackd");
    }

    #[test]
    fn running_without_info_is_trimmed() {
        let state = DaemonState::Running {
            pid: 1,
            info: None,
            cpu_percent: None,
        };
        let view = StatusView::render(&state, CMD_FILE);
        assert_eq!(view.tooltip, "CPU %: ?");
    }

    #[test]
    fn not_running_points_at_command_file() {
        let view = StatusView::render(&DaemonState::NotRunning, CMD_FILE);
        assert_eq!(view.label, "jackd not running");
        assert_eq!(view.icon.icon_name(), "state_shutoff");
        assert!(view.tooltip.contains(CMD_FILE));
        assert_eq!(view.menu_label, "Start jackd");
    }

    #[test]
    fn not_installed_uses_fail_icon() {
        let view = StatusView::render(&DaemonState::NotInstalled, CMD_FILE);
        assert_eq!(view.label, "jackd not found");
        assert_eq!(view.icon.icon_name(), "computer-fail");
        assert_eq!(view.tooltip, "Searched path for 'jackd'");
    }

    #[test]
    fn transitions_use_paused_icon() {
        let starting = StatusView::transition(Phase::Starting).unwrap();
        assert_eq!(starting.label, "Starting jackd...");
        assert_eq!(starting.icon.icon_name(), "state_paused");

        let stopping = StatusView::transition(Phase::Stopping).unwrap();
        assert_eq!(stopping.tooltip, "Stopping jackd...");
    }

    #[test]
    fn menu_entry_is_disabled_only_mid_transition() {
        for phase in [Phase::Starting, Phase::Stopping] {
            assert!(!StatusView::transition(phase).unwrap().actionable());
        }
        let running = DaemonState::Running {
            pid: 1,
            info: None,
            cpu_percent: None,
        };
        for state in [running, DaemonState::NotRunning, DaemonState::NotInstalled] {
            assert!(StatusView::render(&state, CMD_FILE).actionable());
        }
    }

    #[test]
    fn settled_phases_have_no_transition_view() {
        assert!(StatusView::transition(Phase::Stopped).is_none());
        assert!(StatusView::transition(Phase::Running).is_none());
    }
}
