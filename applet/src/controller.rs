//! Start/stop state machine around a single jackd process.
//!
//! The controller holds no timer. Whoever owns it calls [`LifecycleController::poll_once`]
//! on a fixed cadence, which is also how a jackd killed behind our back is noticed.

use crate::cmdline::{parse_info, JackInfo};
use crate::config::StartupCommand;
use crate::error::ControlError;
use crate::process_monitor::{ProcessHost, JACKD_EXECUTABLE};
use crate::wait::{poll_until, WaitPolicy};

/// What the last poll observed.
#[derive(Debug, Clone, PartialEq)]
pub enum DaemonState {
    /// jackd is neither on `PATH` nor where the startup command points.
    NotInstalled,
    NotRunning,
    Running {
        pid: u32,
        info: Option<JackInfo>,
        cpu_percent: Option<f32>,
    },
}

impl DaemonState {
    pub fn is_running(&self) -> bool {
        matches!(self, DaemonState::Running { .. })
    }
}

/// Where the controller believes jackd is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Starting,
    Running,
    Stopping,
}

pub struct LifecycleController<H> {
    command: StartupCommand,
    host: H,
    policy: WaitPolicy,
    phase: Phase,
    pid: Option<u32>,
    /// Parsed once per run; `Some` only while `pid` is.
    info: Option<JackInfo>,
    state: DaemonState,
}

impl<H: ProcessHost> LifecycleController<H> {
    pub fn new(command: StartupCommand, host: H, policy: WaitPolicy) -> Self {
        Self {
            command,
            host,
            policy,
            phase: Phase::Stopped,
            pid: None,
            info: None,
            state: DaemonState::NotRunning,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &DaemonState {
        &self.state
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Re-derives the daemon state from the process table.
    pub fn poll_once(&mut self) -> &DaemonState {
        let found = find_jackd(&mut self.host);

        self.state = match found {
            Some(pid) => {
                if self.pid != Some(pid) {
                    if let Some(old) = self.pid {
                        tracing::info!(old, new = pid, "jackd pid changed");
                    }
                    self.info = None;
                    self.pid = Some(pid);
                }
                if self.info.is_none() {
                    self.info = self.host.cmdline(pid).map(|argv| parse_info(&argv));
                }
                self.phase = Phase::Running;
                DaemonState::Running {
                    pid,
                    info: self.info.clone(),
                    cpu_percent: self.host.cpu_percent(pid),
                }
            }
            None => {
                self.pid = None;
                self.info = None;
                self.phase = Phase::Stopped;
                if self.jackd_installed() {
                    DaemonState::NotRunning
                } else {
                    DaemonState::NotInstalled
                }
            }
        };

        &self.state
    }

    /// Launches the startup command and waits for jackd to appear.
    ///
    /// Not seeing jackd within the wait policy's timeout is not an error; the
    /// controller simply settles back into [`Phase::Stopped`].
    pub async fn start(&mut self) -> Result<&DaemonState, ControlError> {
        if self.phase != Phase::Stopped {
            return Err(ControlError::InvalidPhase {
                op: "start",
                phase: self.phase,
            });
        }

        self.phase = Phase::Starting;
        tracing::info!(command = %self.command, "starting jackd");
        if let Err(e) = self.host.launch(self.command.argv()) {
            tracing::warn!(error = %e, program = self.command.program(), "failed to launch jackd");
        }

        let host = &mut self.host;
        let found = poll_until(
            self.policy,
            || find_jackd(host),
            |pid| pid.is_some(),
        )
        .await;
        if found.is_none() {
            tracing::warn!(timeout = ?self.policy.timeout, "jackd did not start in time");
        }

        Ok(self.poll_once())
    }

    /// Sends SIGTERM to the tracked jackd and waits for it to disappear.
    pub async fn stop(&mut self) -> Result<&DaemonState, ControlError> {
        let pid = match (self.phase, self.pid) {
            (Phase::Running, Some(pid)) => pid,
            (phase, _) => return Err(ControlError::InvalidPhase { op: "stop", phase }),
        };

        self.phase = Phase::Stopping;
        tracing::info!(pid, "stopping jackd");
        if !self.host.terminate(pid) {
            tracing::warn!(pid, "failed to signal jackd");
        }

        let host = &mut self.host;
        let found = poll_until(
            self.policy,
            || find_jackd(host),
            |pid| pid.is_none(),
        )
        .await;
        if found.is_some() {
            tracing::warn!(timeout = ?self.policy.timeout, "jackd did not stop in time");
        }

        Ok(self.poll_once())
    }

    /// Starts jackd when stopped, stops it otherwise.
    pub async fn toggle(&mut self) -> Result<&DaemonState, ControlError> {
        match self.phase {
            Phase::Stopped => self.start().await,
            _ => self.stop().await,
        }
    }

    fn jackd_installed(&self) -> bool {
        self.host.is_installed(JACKD_EXECUTABLE) || self.host.is_installed(self.command.program())
    }
}

/// Looks jackd up, treating a failed query as "not running".
fn find_jackd<H: ProcessHost>(host: &mut H) -> Option<u32> {
    match host.find_process_id(JACKD_EXECUTABLE) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, "process lookup failed; treating jackd as not running");
            None
        }
    }
}
