//! The import dialog: one session for one table.
//!
//! The dialog owns nothing but signals. It starts a session driver on
//! mount, forwards button presses as commands, renders the latest
//! snapshot, and unmounts the session when it is removed from the page.
//! Mount it under a key of the table type so switching tables starts a
//! fresh session.

use std::rc::Rc;

use leptos::*;
use vetimport::{ImportFailure, ImportResult, ImportState, SessionSnapshot, TableType, WidgetUser};

use crate::components::{ErrorsPanel, LogsPanel, PreviewSection};
use crate::config::import_config;
use crate::services::auth::ANONYMOUS_USER;
use crate::services::start_session;

#[component]
pub fn ImportDialog(
    table_type: TableType,
    /// Operator session token, sent to the import API and the webhook
    #[prop(optional_no_strip)]
    token: Option<String>,
    /// Operator passed to the widget
    #[prop(optional)]
    user: Option<WidgetUser>,
    /// Called once each time a session reaches `done`
    #[prop(optional, into)]
    on_success: Option<Callback<ImportResult>>,
    /// Called once each time a session reaches `error`
    #[prop(optional, into)]
    on_failure: Option<Callback<ImportFailure>>,
) -> impl IntoView {
    let config = import_config();
    let max_rows = config.preview_max_rows;
    let user = user.unwrap_or_else(|| WidgetUser::new(ANONYMOUS_USER));

    let (snapshot, set_snapshot) = create_signal(None::<SessionSnapshot>);
    let controller = start_session(&config, table_type.clone(), token, set_snapshot);

    on_cleanup({
        let controller = controller.clone();
        move || {
            controller.unmount();
        }
    });

    // Relay terminal transitions to the host once per transition.
    create_effect(move |previous: Option<Option<ImportState>>| {
        let state = snapshot.with(|s| s.as_ref().map(|s| s.state));
        if state != previous.flatten() {
            snapshot.with_untracked(|s| {
                let Some(s) = s else { return };
                match (s.state, &s.result, &s.failure) {
                    (ImportState::Done, Some(result), _) => {
                        if let Some(callback) = on_success {
                            callback.call(result.clone());
                        }
                    }
                    (ImportState::Error, _, Some(failure)) => {
                        if let Some(callback) = on_failure {
                            callback.call(failure.clone());
                        }
                    }
                    _ => {}
                }
            });
        }
        state
    });

    let state = move || snapshot.with(|s| s.as_ref().map(|s| s.state).unwrap_or(ImportState::Idle));
    let is_initializing = move || snapshot.with(|s| s.as_ref().is_some_and(|s| s.is_initializing));
    let can_launch = move || snapshot.with(|s| s.as_ref().is_some_and(|s| s.can_launch));
    let has_widget = move || snapshot.with(|s| s.as_ref().is_some_and(|s| s.has_widget));
    let message = move || snapshot.with(|s| s.as_ref().map(|s| s.message.clone()).unwrap_or_default());

    let rows = Signal::derive(move || {
        snapshot.with(|s| s.as_ref().map(|s| Rc::clone(&s.preview_rows)).unwrap_or_default())
    });
    let errors = Signal::derive(move || snapshot.with(|s| s.as_ref().map(|s| s.errors.clone()).unwrap_or_default()));
    let activity = Signal::derive(move || snapshot.with(|s| s.as_ref().map(|s| s.activity.clone()).unwrap_or_default()));
    let can_confirm = Signal::derive(move || snapshot.with(|s| s.as_ref().is_some_and(|s| s.can_confirm)));
    let sending = Signal::derive(move || state() == ImportState::Sending);
    let summary = move || snapshot.with(|s| s.as_ref().and_then(|s| s.result.as_ref()).map(ImportResult::summary));

    let on_launch = {
        let controller = controller.clone();
        move |_| {
            controller.launch(user.clone());
        }
    };
    let on_reset = {
        let controller = controller.clone();
        move |_| {
            controller.reset();
        }
    };
    let confirm = {
        let controller = controller.clone();
        Callback::new(move |_: ()| {
            controller.confirm();
        })
    };
    let cancel = Callback::new(move |_: ()| {
        controller.reset();
    });

    let title = format!("📥 Import {}", table_type.label());
    let preview_table = table_type.clone();
    let errors_table = table_type;

    view! {
        <div class="import-dialog">
            <div class="dialog-header">
                <span class="dialog-title">{title}</span>
                <span class=move || format!("state-badge state-{}", state().as_str())>{move || state().to_string()}</span>
            </div>

            <p class="dialog-status" class:error=move || state() == ImportState::Error>{message}</p>

            <div class="dialog-actions">
                <button class="btn btn-primary" on:click=on_launch disabled=move || !can_launch()>
                    {move || {
                        if is_initializing() {
                            "Loading importer..."
                        } else if has_widget() {
                            "Importer open"
                        } else {
                            "Upload file"
                        }
                    }}
                </button>
                <button
                    class="btn btn-secondary"
                    on:click=on_reset
                    disabled=move || state() == ImportState::Idle && !has_widget() && !is_initializing()
                >
                    "Start over"
                </button>
            </div>

            <Show
                when=move || matches!(state(), ImportState::Preview | ImportState::Sending)
                fallback=|| view! {}
            >
                <PreviewSection
                    table_type=preview_table.clone()
                    rows=rows
                    max_rows=max_rows
                    can_confirm=can_confirm
                    sending=sending
                    on_confirm=confirm
                    on_cancel=cancel
                />
            </Show>

            <Show when=move || summary().is_some() fallback=|| view! {}>
                <div class="result-summary">"✅ " {move || summary().unwrap_or_default()}</div>
            </Show>

            <Show when=move || errors.with(|e| !e.is_empty()) fallback=|| view! {}>
                <ErrorsPanel table_type=errors_table.clone() errors=errors/>
            </Show>

            <LogsPanel entries=activity/>
        </div>
    }
}
