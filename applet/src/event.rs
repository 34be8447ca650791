use tokio::sync::mpsc;

#[derive(Debug, PartialEq, Eq)]
pub enum AppletEvent {
    /// The start/stop menu entry was activated.
    ToggleRequested,
    /// Quit was chosen from the menu, or Ctrl+C received.
    Shutdown,
}

/// Empties `rx` after a start or stop has finished.
///
/// Toggles queued while the action was in flight were aimed at the state
/// before it, so they are dropped. Returns whether a shutdown was queued.
pub fn discard_stale_toggles(rx: &mut mpsc::UnboundedReceiver<AppletEvent>) -> bool {
    let mut shutdown = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            AppletEvent::ToggleRequested => tracing::debug!("dropping toggle queued mid-transition"),
            AppletEvent::Shutdown => shutdown = true,
        }
    }
    shutdown
}
