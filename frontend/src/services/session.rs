//! Runs an import session in the browser and mirrors it into signals.

use leptos::*;
use vetimport::{ImportConfig, ImportSession, SessionController, SessionDriver, SessionObserver, SessionSettings, SessionSnapshot, TableType};

use super::{DromoProvider, GlooImportClient, GlooTimer};

/// Writes every snapshot into a signal.
///
/// Uses `try_set` so a driver outliving its component never panics on a
/// disposed signal.
pub struct SignalObserver {
    snapshot: WriteSignal<Option<SessionSnapshot>>,
}

impl SessionObserver for SignalObserver {
    fn state_changed(&mut self, snapshot: &SessionSnapshot) {
        if self.snapshot.try_set(Some(snapshot.clone())).is_some() {
            log::debug!("Dialog gone; dropping snapshot for session {}", snapshot.id);
        }
    }
}

/// Start a session for `table_type` and return its controller.
///
/// The driver runs on the local executor until the controller sends
/// `unmount` or every clone of it is dropped.
pub fn start_session(
    config: &ImportConfig,
    table_type: TableType,
    token: Option<String>,
    snapshot: WriteSignal<Option<SessionSnapshot>>,
) -> SessionController {
    let settings = SessionSettings::from_config(config, table_type, token.as_deref());
    let submitter = GlooImportClient::new(&config.api_base_url).with_credential(token);
    let session = ImportSession::new(settings);
    log::info!("🧾 Import session {} ready for {}", session.id(), session.table_type());

    let (driver, controller) = SessionDriver::new(session, DromoProvider, submitter, GlooTimer, SignalObserver { snapshot });
    spawn_local(async move {
        let session = driver.run().await;
        log::debug!("Session {} ended in {}", session.id(), session.state());
    });
    controller
}
