//! Vetfield import dialog - Frontend Rust/Leptos Application
//!
//! A WebAssembly shell around the `vetimport` session: pick a table, open
//! the Dromo uploader, review the rows it returns, and send them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (signed-in operator)                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Table selector                                          │
//! │  └── ImportDialog (keyed by table)                           │
//! │      ├── PreviewSection (preview / sending)                  │
//! │      ├── ErrorsPanel (rejected rows)                         │
//! │      └── LogsPanel (session activity)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Build-time import configuration
//! - [`components`] - UI components (ImportDialog, Preview, Errors, ...)
//! - [`services`] - Widget binding, import client, timer, downloads

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use vetimport::{ImportFailure, ImportResult, TableType};

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install logging and mount the application.
pub fn start() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 {} import - Starting Leptos App", APP_NAME);

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=format!("{} · Bulk import", APP_NAME)/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                    <Route path="/import/:table" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let session = current_session();
    let token = session.as_ref().and_then(|s| s.token.clone());
    let user = current_user(session.as_ref());

    // `/import/:table` preselects a table; aliases are accepted
    let params = use_params_map();
    let initial = params.with_untracked(|p| p.get("table").map(|t| TableType::parse(t)));
    let (table, set_table) = create_signal(initial.unwrap_or(TableType::Clients));
    let (notice, set_notice) = create_signal(None::<(bool, String)>);

    let on_success = Callback::new(move |result: ImportResult| {
        log::info!("✅ Import finished: {}", result.summary());
        set_notice.set(Some((true, result.summary())));
    });
    let on_failure = Callback::new(move |failure: ImportFailure| {
        set_notice.set(Some((false, failure.to_string())));
    });

    let on_select = move |ev: web_sys::Event| {
        set_notice.set(None);
        set_table.set(TableType::parse(&event_target_value(&ev)));
    };

    view! {
        <Header session=session/>

        <div class="container">
            <div class="table-picker">
                <label for="tableType">"Table"</label>
                <select id="tableType" on:change=on_select>
                    {TableType::all()
                        .iter()
                        .map(|t| {
                            let slug = t.slug().to_string();
                            let selected = t.clone();
                            view! {
                                <option value=slug selected=move || table.get() == selected>
                                    {t.label().to_string()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <Show when=move || notice.with(Option::is_some) fallback=|| view! {}>
                <div class="notice" class:success=move || notice.with(|n| matches!(n, Some((true, _))))>
                    {move || notice.get().map(|(_, text)| text).unwrap_or_default()}
                </div>
            </Show>

            // Re-created on every table change; the old session is unmounted
            {move || {
                let table_type = table.get();
                let token = token.clone();
                let user = user.clone();
                view! {
                    <ImportDialog
                        table_type=table_type
                        token=token
                        user=user
                        on_success=on_success
                        on_failure=on_failure
                    />
                }
            }}
        </div>

        <Footer/>
    }
}
