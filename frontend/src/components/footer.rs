//! Footer component

use leptos::*;

use crate::config::APP_NAME;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>{APP_NAME} " field records • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href="https://developer.dromo.io/" class="footer-link" target="_blank">
                    "Dromo docs"
                </a>
            </div>
        </footer>
    }
}
