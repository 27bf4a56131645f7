//! Per-row errors of a finished import, with CSV export.

use leptos::*;
use vetimport::{ErrorReport, ImportError, TableType};

use crate::services::download_report;

/// Rows listed inline before pointing at the download.
const MAX_LISTED: usize = 50;

#[component]
pub fn ErrorsPanel(table_type: TableType, #[prop(into)] errors: Signal<Vec<ImportError>>) -> impl IntoView {
    let (download_error, set_download_error) = create_signal(None::<String>);

    let on_download = move |_| {
        let outcome = errors.with(|errors| ErrorReport::build_today(&table_type, errors));
        let result = match outcome {
            Ok(report) => download_report(&report),
            Err(e) => Err(e.to_string()),
        };
        if let Err(ref e) = result {
            log::error!("❌ Error report download failed: {}", e);
        }
        set_download_error.set(result.err());
    };

    view! {
        <div class="errors-panel">
            <div class="errors-header">
                <span class="errors-title">
                    "⚠️ " {move || errors.with(Vec::len)} " rows were rejected"
                </span>
                <button class="btn btn-secondary" on:click=on_download>"Download errors (CSV)"</button>
            </div>
            <ul class="errors-list">
                <For
                    each=move || errors.get().into_iter().take(MAX_LISTED).enumerate()
                    key=|(i, _)| *i
                    children=move |(_, error)| {
                        view! {
                            <li class="error-entry">
                                <span class="error-row">"Row " {error.row_index}</span>
                                <span class="error-field">{error.field.clone()}</span>
                                {error.message.clone()}
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || errors.with(|e| e.len() > MAX_LISTED) fallback=|| view! {}>
                <p class="errors-more">"Download the report to see every rejected row."</p>
            </Show>
            <Show when=move || download_error.with(Option::is_some) fallback=|| view! {}>
                <p class="error-text">{move || download_error.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
