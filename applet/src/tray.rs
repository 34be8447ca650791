//! StatusNotifierItem tray icon.
//!
//! The tray runs on its own D-Bus thread owned by `ksni`. It only renders the
//! latest [`StatusView`] and forwards menu clicks to the main event loop; it
//! never touches the controller.
//!
//! On non-Linux platforms [`spawn`] returns `None` and the applet runs headless.
use tokio::sync::mpsc;

use crate::event::AppletEvent;
use crate::view::StatusView;

#[cfg(target_os = "linux")]
mod imp {
    use tokio::sync::mpsc;

    use crate::event::AppletEvent;
    use crate::view::StatusView;

    pub struct JackdTray {
        pub view: StatusView,
        pub tx: mpsc::UnboundedSender<AppletEvent>,
    }

    impl JackdTray {
        fn send(&self, event: AppletEvent) {
            if self.tx.send(event).is_err() {
                tracing::warn!("event loop gone; dropping tray action");
            }
        }
    }

    impl ksni::Tray for JackdTray {
        fn id(&self) -> String {
            env!("CARGO_PKG_NAME").into()
        }

        fn category(&self) -> ksni::Category {
            ksni::Category::ApplicationStatus
        }

        fn title(&self) -> String {
            self.view.label.clone()
        }

        fn icon_name(&self) -> String {
            self.view.icon.icon_name().into()
        }

        fn tool_tip(&self) -> ksni::ToolTip {
            ksni::ToolTip {
                title: self.view.label.clone(),
                description: self.view.tooltip.clone(),
                ..Default::default()
            }
        }

        fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
            use ksni::menu::*;
            vec![
                StandardItem {
                    label: self.view.menu_label.clone(),
                    enabled: self.view.actionable(),
                    activate: Box::new(|tray: &mut Self| tray.send(AppletEvent::ToggleRequested)),
                    ..Default::default()
                }
                .into(),
                MenuItem::Separator,
                StandardItem {
                    label: "Quit".into(),
                    icon_name: "application-exit".into(),
                    activate: Box::new(|tray: &mut Self| tray.send(AppletEvent::Shutdown)),
                    ..Default::default()
                }
                .into(),
            ]
        }
    }

    pub struct TrayHandle(pub ksni::Handle<JackdTray>);

    impl TrayHandle {
        pub fn show(&self, view: &StatusView) {
            let view = view.clone();
            self.0.update(move |tray| tray.view = view);
        }

        pub fn shutdown(&self) {
            self.0.shutdown();
        }
    }

    pub fn spawn(initial: StatusView, tx: mpsc::UnboundedSender<AppletEvent>) -> Option<TrayHandle> {
        let service = ksni::TrayService::new(JackdTray { view: initial, tx });
        let handle = service.handle();
        service.spawn();
        Some(TrayHandle(handle))
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    use tokio::sync::mpsc;

    use crate::event::AppletEvent;
    use crate::view::StatusView;

    pub struct TrayHandle;

    impl TrayHandle {
        pub fn show(&self, _view: &StatusView) {}

        pub fn shutdown(&self) {}
    }

    pub fn spawn(_initial: StatusView, _tx: mpsc::UnboundedSender<AppletEvent>) -> Option<TrayHandle> {
        tracing::info!("no tray support on this platform; running headless");
        None
    }
}

pub use imp::TrayHandle;

/// Puts the tray icon up, showing `initial` until the first poll.
pub fn spawn(initial: StatusView, tx: mpsc::UnboundedSender<AppletEvent>) -> Option<TrayHandle> {
    imp::spawn(initial, tx)
}
