//! Session activity panel.
//!
//! Shows the bounded activity log each import session keeps, scrolling to
//! the newest entry as transitions arrive.

use leptos::*;
use vetimport::LogEntry;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Request animation frame helper for smooth scrolling
fn request_animation_frame(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    if window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .is_ok()
    {
        closure.forget();
    }
}

#[component]
pub fn LogsPanel(
    /// Entries of the current session
    #[prop(into)]
    entries: Signal<Vec<LogEntry>>,
) -> impl IntoView {
    let (collapsed, set_collapsed) = create_signal(false);
    let logs_container = create_node_ref::<leptos::html::Div>();

    // Auto-scroll to bottom when logs change
    create_effect(move |_| {
        let _ = entries.with(Vec::len);

        if let Some(container) = logs_container.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="logs-panel" class:collapsed=move || collapsed.get()>
            <div class="logs-header">
                <span class="logs-title">"📋 Activity"</span>
                <button class="logs-clear" on:click=move |_| set_collapsed.update(|c| *c = !*c)>
                    {move || if collapsed.get() { "Show" } else { "Hide" }}
                </button>
            </div>
            <Show when=move || !collapsed.get() fallback=|| view! {}>
                <div class="logs-content" node_ref=logs_container>
                    <For
                        each=move || entries.get().into_iter().enumerate()
                        key=|(i, entry)| (*i, entry.timestamp)
                        children=move |(_, entry)| {
                            view! {
                                <div class=format!("log-entry {}", entry.level.css_class())>
                                    <span class="log-time">"[" {entry.time_label()} "] "</span>
                                    {entry.message.clone()}
                                </div>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}
