mod cmdline;
mod config;
mod controller;
mod error;
mod event;
mod paths;
mod process_monitor;
mod status;
mod tray;
mod view;
mod wait;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use crate::controller::{LifecycleController, Phase};
use crate::event::AppletEvent;
use crate::process_monitor::{ProcessHost, SysinfoHost};
use crate::status::DaemonStatus;
use crate::view::StatusView;
use crate::wait::WaitPolicy;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Tray icon showing whether jackd is running, with a menu to start or stop it.
#[derive(Debug, Parser)]
#[command(name = "jackd-status", version, about)]
struct Cli {
    /// File whose first line is the jackd startup command [default: ~/.jackd_cmd.txt]
    #[arg(long, value_name = "PATH")]
    command_file: Option<PathBuf>,

    /// Where to write the status snapshot [default: $XDG_RUNTIME_DIR/jackd-status/status.toml]
    #[arg(long, value_name = "PATH")]
    status_file: Option<PathBuf>,

    /// Run without a tray icon, only logging and writing the status snapshot
    #[arg(long)]
    no_tray: bool,

    /// Seconds to wait for jackd to start or stop
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    timeout_secs: u64,
}

/// Pushes controller output to the tray, the log, and the status file.
struct Presenter {
    tray: Option<tray::TrayHandle>,
    status_path: Option<PathBuf>,
    command_file: String,
    last_view: Option<StatusView>,
    last_status: Option<DaemonStatus>,
}

impl Presenter {
    fn show<H: ProcessHost>(&mut self, controller: &LifecycleController<H>) {
        let view = StatusView::transition(controller.phase())
            .unwrap_or_else(|| StatusView::render(controller.state(), &self.command_file));
        let status = DaemonStatus::snapshot(controller.state(), controller.phase());
        self.show_view(view, status);
    }

    /// Shows the in-flight view for `phase` before a blocking start or stop.
    fn show_transition<H: ProcessHost>(&mut self, controller: &LifecycleController<H>, phase: Phase) {
        if let Some(view) = StatusView::transition(phase) {
            let status = DaemonStatus::snapshot(controller.state(), phase);
            self.show_view(view, status);
        }
    }

    fn show_view(&mut self, view: StatusView, status: DaemonStatus) {
        if self.last_view.as_ref().map(|v| &v.label) != Some(&view.label) {
            tracing::info!(status = %view.label, "jackd status changed");
        }
        if self.last_view.as_ref() != Some(&view) {
            if let Some(tray) = &self.tray {
                tray.show(&view);
            }
            self.last_view = Some(view);
        }

        let changed = self
            .last_status
            .as_ref()
            .map_or(true, |last| !last.same_state(&status));
        if changed {
            if let Some(path) = &self.status_path {
                status::write_status(path, &status);
            }
            self.last_status = Some(status);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Startup command ───────────────────────────────────────────────────────
    let command_file = match cli.command_file {
        Some(path) => path,
        None => paths::command_file_path()?,
    };
    let command = config::load_startup_command(&command_file)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        command = %command,
        "jackd-status started"
    );

    let policy = WaitPolicy {
        timeout: Duration::from_secs(cli.timeout_secs),
        ..WaitPolicy::default()
    };
    let mut controller = LifecycleController::new(command, SysinfoHost::new(), policy);

    // ── Presentation ──────────────────────────────────────────────────────────
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppletEvent>();
    let command_file = paths::display_path(&command_file);

    controller.poll_once();
    let initial = StatusView::render(controller.state(), &command_file);
    let tray = if cli.no_tray {
        None
    } else {
        tray::spawn(initial, event_tx.clone())
    };

    let mut presenter = Presenter {
        tray,
        status_path: cli.status_file.or_else(paths::status_file_path),
        command_file,
        last_view: None,
        last_status: None,
    };
    presenter.show(&controller);

    // Graceful shutdown on Ctrl+C.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(AppletEvent::Shutdown);
            }
        });
    }

    // ── Event loop ────────────────────────────────────────────────────────────
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.poll_once();
                presenter.show(&controller);
            }
            Some(evt) = event_rx.recv() => match evt {
                AppletEvent::ToggleRequested => {
                    let next = match controller.phase() {
                        Phase::Stopped => Phase::Starting,
                        _ => Phase::Stopping,
                    };
                    presenter.show_transition(&controller, next);
                    match controller.toggle().await {
                        Ok(state) => {
                            let running = state.is_running();
                            tracing::info!(running, pid = ?controller.pid(), "menu action finished");
                        }
                        Err(e) => tracing::warn!(error = %e, "ignoring menu action"),
                    }
                    presenter.show(&controller);
                    if event::discard_stale_toggles(&mut event_rx) {
                        tracing::info!("shutting down");
                        break;
                    }
                }
                AppletEvent::Shutdown => {
                    tracing::info!("shutting down");
                    break;
                }
            },
        }
    }

    if let Some(tray) = &presenter.tray {
        tray.shutdown();
    }
    Ok(())
}
